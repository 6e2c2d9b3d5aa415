//! Significance classification
//!
//! Scores how much an action matters, from declared goals, narrative impact
//! and an optional game-master override. Risk does not change the tier; it
//! becomes a separate reward multiplier.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::character::normalize_goal;
use crate::core::error::ProgressionError;
use crate::resolution::ActionRequest;

/// Five-level weight of an action
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum SignificanceTier {
    Trivial,
    #[default]
    Minor,
    Significant,
    Major,
    Legendary,
}

impl SignificanceTier {
    pub fn all() -> &'static [SignificanceTier] {
        &[
            SignificanceTier::Trivial,
            SignificanceTier::Minor,
            SignificanceTier::Significant,
            SignificanceTier::Major,
            SignificanceTier::Legendary,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            SignificanceTier::Trivial => "Trivial",
            SignificanceTier::Minor => "Minor",
            SignificanceTier::Significant => "Significant",
            SignificanceTier::Major => "Major",
            SignificanceTier::Legendary => "Legendary",
        }
    }

    /// Base growth drawn for an action of this tier
    pub fn growth_range(&self) -> RangeInclusive<u32> {
        match self {
            SignificanceTier::Trivial => 1..=2,
            SignificanceTier::Minor => 3..=5,
            SignificanceTier::Significant => 6..=10,
            SignificanceTier::Major => 12..=20,
            SignificanceTier::Legendary => 25..=30,
        }
    }

    /// Base insight drawn when an action of this tier fails
    pub fn insight_range(&self) -> RangeInclusive<u32> {
        match self {
            SignificanceTier::Trivial => 1..=2,
            SignificanceTier::Minor => 2..=3,
            SignificanceTier::Significant => 3..=4,
            SignificanceTier::Major => 4..=5,
            SignificanceTier::Legendary => 5..=6,
        }
    }
}

impl fmt::Display for SignificanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SignificanceTier {
    type Err = ProgressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SignificanceTier::all()
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ProgressionError::InvalidSignificanceOverride(s.to_string()))
    }
}

/// Classifier output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Significance {
    pub tier: SignificanceTier,
    pub risk_multiplier: f32,
    pub reasons: Vec<String>,
}

/// First declared goal this action serves, if any
///
/// Matches the primary and secondary tag names, the primary domain's name
/// and any goal labels the narrative layer attached to the request.
pub fn aligned_goal(request: &ActionRequest, goals: &BTreeSet<String>) -> Option<String> {
    if goals.is_empty() {
        return None;
    }

    let mut labels: Vec<String> = request
        .tags_used()
        .iter()
        .map(|tag| normalize_goal(tag.as_str()))
        .collect();
    labels.push(normalize_goal(request.domain.name()));
    labels.extend(request.goal_tags.iter().map(|g| normalize_goal(g)));

    labels.into_iter().find(|label| goals.contains(label))
}

pub fn classify(request: &ActionRequest, goals: &BTreeSet<String>) -> Significance {
    let mut tier = SignificanceTier::Minor;
    let mut reasons = Vec::new();

    if let Some(goal) = aligned_goal(request, goals) {
        tier = tier.max(SignificanceTier::Significant);
        reasons.push(format!("Advances declared goal '{}'", goal));
    }

    match request.narrative_impact.level() {
        3 => {
            tier = SignificanceTier::Major;
            reasons.push("Story-defining narrative impact".to_string());
        }
        2 if tier == SignificanceTier::Minor => {
            tier = SignificanceTier::Significant;
            reasons.push("Notable narrative impact".to_string());
        }
        _ => {}
    }

    let risk_multiplier = request.risk.multiplier();
    if risk_multiplier != 1.0 {
        reasons.push(format!(
            "{} risk (x{:.2} growth)",
            request.risk.name(),
            risk_multiplier
        ));
    }

    if let Some(raw) = &request.significance_override {
        match raw.parse::<SignificanceTier>() {
            Ok(forced) => {
                tier = forced;
                reasons.push(format!("Significance set to {} by override", forced));
            }
            Err(err) => {
                tracing::warn!("{}; keeping computed tier {}", err, tier);
                reasons.push(format!("{}; kept computed tier {}", err, tier));
            }
        }
    }

    Significance {
        tier,
        risk_multiplier,
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Domain;
    use crate::resolution::RiskLevel;

    fn goals(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|g| normalize_goal(g)).collect()
    }

    #[test]
    fn test_default_is_minor() {
        let sig = classify(&ActionRequest::new(Domain::Mind), &BTreeSet::new());
        assert_eq!(sig.tier, SignificanceTier::Minor);
        assert_eq!(sig.risk_multiplier, 1.0);
        assert!(sig.reasons.is_empty());
    }

    #[test]
    fn test_goal_alignment_raises_to_significant() {
        let req = ActionRequest::new(Domain::Body).with_tag("Swordsmanship").unwrap();
        let sig = classify(&req, &goals(&["swordsmanship"]));
        assert_eq!(sig.tier, SignificanceTier::Significant);
        assert!(sig.reasons[0].contains("swordsmanship"));
    }

    #[test]
    fn test_goal_alignment_via_request_goal_tags() {
        let req = ActionRequest::new(Domain::Social).with_goal_tag("Win the Duke's favor");
        let sig = classify(&req, &goals(&["win the duke's favor"]));
        assert_eq!(sig.tier, SignificanceTier::Significant);
    }

    #[test]
    fn test_impact_three_is_major() {
        let req = ActionRequest::new(Domain::Mind).with_impact(3);
        assert_eq!(classify(&req, &BTreeSet::new()).tier, SignificanceTier::Major);
    }

    #[test]
    fn test_impact_two_only_lifts_minor() {
        let req = ActionRequest::new(Domain::Mind).with_impact(2);
        let sig = classify(&req, &BTreeSet::new());
        assert_eq!(sig.tier, SignificanceTier::Significant);

        let aligned = ActionRequest::new(Domain::Mind).with_impact(2);
        let sig = classify(&aligned, &goals(&["mind"]));
        assert_eq!(sig.tier, SignificanceTier::Significant);
        assert_eq!(sig.reasons.len(), 1);
    }

    #[test]
    fn test_risk_is_multiplier_not_tier() {
        let req = ActionRequest::new(Domain::Mind).with_risk(RiskLevel::Extreme);
        let sig = classify(&req, &BTreeSet::new());
        assert_eq!(sig.tier, SignificanceTier::Minor);
        assert_eq!(sig.risk_multiplier, 1.5);
    }

    #[test]
    fn test_override_replaces_tier_even_downward() {
        let req = ActionRequest::new(Domain::Mind)
            .with_impact(3)
            .with_significance_override("trivial");
        let sig = classify(&req, &BTreeSet::new());
        assert_eq!(sig.tier, SignificanceTier::Trivial);
        assert!(sig.reasons.last().unwrap().contains("override"));
    }

    #[test]
    fn test_unrecognized_override_keeps_computed_tier() {
        let req = ActionRequest::new(Domain::Mind)
            .with_impact(3)
            .with_significance_override("epic");
        let sig = classify(&req, &BTreeSet::new());
        assert_eq!(sig.tier, SignificanceTier::Major);
        assert!(sig.reasons.last().unwrap().contains("epic"));
    }

    #[test]
    fn test_tier_ranges() {
        assert_eq!(SignificanceTier::Significant.growth_range(), 6..=10);
        assert_eq!(SignificanceTier::Significant.insight_range(), 3..=4);
        assert_eq!(SignificanceTier::Legendary.growth_range(), 25..=30);
    }

    #[test]
    fn test_tier_parse() {
        assert_eq!("MAJOR".parse::<SignificanceTier>().unwrap(), SignificanceTier::Major);
        assert!(matches!(
            "huge".parse::<SignificanceTier>(),
            Err(ProgressionError::InvalidSignificanceOverride(_))
        ));
    }
}
