//! Progression applier
//!
//! Commits a `GrowthResult` to a ledger. Every change for one action is made
//! on a staged copy and swapped in at the end, so an error leaves the
//! caller's ledger exactly as it was.

use crate::character::{CharacterLedger, DomainTier};
use crate::core::config::ProgressionConfig;
use crate::core::error::{ProgressionError, Result};
use crate::core::types::CharacterId;
use crate::growth::GrowthResult;
use crate::progression::events::ProgressionEvent;
use crate::progression::mastery;
use crate::resolution::ResolutionOutcome;

pub fn apply_growth(
    config: &ProgressionConfig,
    ledger: &mut CharacterLedger,
    character: CharacterId,
    outcome: &ResolutionOutcome,
    growth: &GrowthResult,
) -> Result<Vec<ProgressionEvent>> {
    let domain = outcome
        .primary_domain()
        .ok_or_else(|| ProgressionError::UnknownDomain("<none>".to_string()))?;

    let mut staged = ledger.clone();
    let mut events = Vec::new();

    let (before, after) =
        staged.add_domain_growth(domain, growth.growth_points, config.domain_cap)?;
    let (from, to) = (DomainTier::from_value(before), DomainTier::from_value(after));
    if to > from {
        events.push(ProgressionEvent::DomainTierAdvanced {
            character,
            domain,
            from,
            to,
            value: after,
        });
    }

    if growth.tag_experience > 0 {
        for tag in &outcome.tags_used {
            let advance = staged.advance_tag(tag, growth.tag_experience as u64);
            if advance.ranked_up() {
                events.push(ProgressionEvent::TagRankUp {
                    character,
                    tag: tag.clone(),
                    from: advance.previous_rank,
                    to: advance.new_rank,
                });
            }
        }
    }

    staged.add_insight(growth.insight_points);

    if to.allows_mastery() {
        events.extend(mastery::record_eligibility(&mut staged, domain, character)?);
    }

    *ledger = staged;
    Ok(events)
}
