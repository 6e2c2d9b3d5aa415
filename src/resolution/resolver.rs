//! Action resolvers
//!
//! Two implementations of one capability. [`SimpleResolver`] knows nothing
//! about the acting character and runs the bare probability model;
//! [`CharacterAwareResolver`] reads a ledger and runs method selection plus
//! whichever resolver it picks. Callers choose which one they need.

use rand::RngCore;

use crate::character::{CharacterLedger, TagName};
use crate::core::config::ProgressionConfig;
use crate::core::error::Result;
use crate::resolution::dice::DiscreteRoll;
use crate::resolution::outcome::{OutcomeDetail, ResolutionOutcome};
use crate::resolution::probability::{self, Likelihood};
use crate::resolution::request::{ActionRequest, ResolutionMethod};
use crate::resolution::selector::select_method;

pub trait ActionResolver {
    fn resolve(&self, request: &ActionRequest, rng: &mut dyn RngCore) -> Result<ResolutionOutcome>;
}

fn probability_outcome(
    config: &ProgressionConfig,
    request: &ActionRequest,
    domain_value: u32,
    tag_rank: u32,
    justification: String,
    mut rng: &mut dyn RngCore,
) -> ResolutionOutcome {
    let calc = probability::success_chance(config, domain_value, tag_rank, &request.modifiers);
    let decision = probability::decide(config, calc.chance, &mut rng);

    ResolutionOutcome {
        method: ResolutionMethod::Probability,
        success: decision.success(),
        detail: OutcomeDetail::Probability {
            chance: calc.chance,
            decision,
            likelihood: Likelihood::from_chance(calc.chance),
        },
        critical_success: false,
        critical_failure: false,
        domains_used: request.domains_used(),
        tags_used: request.tags_used(),
        justification,
        breakdown: probability::describe(calc.chance, &decision),
        notes: calc.notes,
    }
}

/// Character-less resolver: pure probability from the request's modifiers
#[derive(Debug, Clone, Default)]
pub struct SimpleResolver {
    config: ProgressionConfig,
}

impl SimpleResolver {
    pub fn new(config: ProgressionConfig) -> Self {
        Self { config }
    }
}

impl ActionResolver for SimpleResolver {
    fn resolve(&self, request: &ActionRequest, rng: &mut dyn RngCore) -> Result<ResolutionOutcome> {
        Ok(probability_outcome(
            &self.config,
            request,
            0,
            0,
            "no character context".to_string(),
            rng,
        ))
    }
}

/// Full resolver reading domain and tag values from a character ledger
#[derive(Debug, Clone, Copy)]
pub struct CharacterAwareResolver<'a> {
    config: &'a ProgressionConfig,
    ledger: &'a CharacterLedger,
}

impl<'a> CharacterAwareResolver<'a> {
    pub fn new(config: &'a ProgressionConfig, ledger: &'a CharacterLedger) -> Self {
        Self { config, ledger }
    }
}

impl ActionResolver for CharacterAwareResolver<'_> {
    fn resolve(
        &self,
        request: &ActionRequest,
        mut rng: &mut dyn RngCore,
    ) -> Result<ResolutionOutcome> {
        let domain_value = self.ledger.domain_value(request.domain)?;
        for secondary in &request.secondary_domains {
            self.ledger.domain_value(*secondary)?;
        }

        let selection = select_method(request);

        let outcome = match selection.method {
            ResolutionMethod::DiscreteRoll => {
                let tag_ranks: Vec<(TagName, u32)> = request
                    .tags_used()
                    .into_iter()
                    .map(|tag| {
                        let rank = self.ledger.tag_rank(&tag);
                        (tag, rank)
                    })
                    .collect();

                let roll = DiscreteRoll::roll(
                    &mut rng,
                    request.domain,
                    domain_value,
                    tag_ranks,
                    request.difficulty,
                );

                ResolutionOutcome {
                    method: ResolutionMethod::DiscreteRoll,
                    success: roll.success,
                    critical_success: roll.natural_20(),
                    critical_failure: roll.natural_1(),
                    domains_used: request.domains_used(),
                    tags_used: request.tags_used(),
                    justification: selection.justification,
                    breakdown: roll.breakdown(),
                    notes: Vec::new(),
                    detail: OutcomeDetail::Discrete(roll),
                }
            }
            ResolutionMethod::Probability => {
                let tag_rank = request
                    .tag
                    .as_ref()
                    .map_or(0, |tag| self.ledger.tag_rank(tag));
                probability_outcome(
                    self.config,
                    request,
                    domain_value,
                    tag_rank,
                    selection.justification,
                    rng,
                )
            }
        };

        tracing::debug!(
            method = outcome.method.name(),
            success = outcome.success,
            "{}",
            outcome.breakdown
        );

        Ok(outcome)
    }
}
