//! Growth and insight rewards
//!
//! Converts a resolved outcome into growth points, tag experience and (on
//! failure only) insight. Random draws happen in a fixed order so that two
//! runs from the same seed draw the same numbers whatever the grind factor:
//! base growth, creative bonus, base insight, risk insight.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::core::config::ProgressionConfig;
use crate::growth::grinding::GrindFactor;
use crate::growth::significance::{Significance, SignificanceTier};
use crate::resolution::{ActionRequest, ResolutionOutcome};

/// Rewards earned by one action, ready to commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthResult {
    /// Added to the primary domain
    pub growth_points: u32,
    /// Added to the insight balance
    pub insight_points: u32,
    /// Added to every tag used
    pub tag_experience: u32,
    pub significance: SignificanceTier,
    pub risk_multiplier: f32,
    pub grind_factor: GrindFactor,
    pub reasons: Vec<String>,
}

/// floor(value * factor), never negative
fn scale(value: u32, factor: f64) -> u32 {
    (value as f64 * factor).floor().max(0.0) as u32
}

pub fn calculate_growth(
    config: &ProgressionConfig,
    request: &ActionRequest,
    outcome: &ResolutionOutcome,
    significance: &Significance,
    momentum: f32,
    grind: GrindFactor,
    rng: &mut dyn RngCore,
) -> GrowthResult {
    let tier = significance.tier;
    let risk = significance.risk_multiplier as f64;
    let mut reasons = significance.reasons.clone();

    let base = rng.gen_range(tier.growth_range());
    let creative_bonus = if request.creative_approach {
        rng.gen_range(config.creative_bonus_min..=config.creative_bonus_max)
    } else {
        0
    };

    let mut growth = if outcome.success {
        reasons.push(format!("{} success: {} base growth", tier, base));
        scale(base, risk)
    } else {
        reasons.push(format!(
            "{} failure: {} base growth at {:.0}%",
            tier,
            base,
            config.failure_growth_factor as f64 * 100.0
        ));
        scale(base, risk * config.failure_growth_factor as f64)
    };

    if creative_bonus > 0 {
        growth += creative_bonus;
        reasons.push(format!("Creative approach: +{} growth", creative_bonus));
    }

    if momentum != 1.0 {
        growth = scale(growth, momentum as f64);
        reasons.push(format!("Growth momentum x{:.2}", momentum));
    }

    let mut tag_experience = growth;
    if outcome.critical_success {
        tag_experience = scale(growth, config.critical_tag_multiplier as f64);
        reasons.push(format!(
            "Critical success: tag experience x{:.1}",
            config.critical_tag_multiplier
        ));
    }

    let mut insight = 0;
    if !outcome.success {
        insight = rng.gen_range(tier.insight_range());
        if request.creative_approach {
            insight += config.creative_insight_bonus;
        }
        if request.risk.is_dangerous() {
            insight += rng.gen_range(config.risk_insight_bonus_min..=config.risk_insight_bonus_max);
        }
        reasons.push(format!("Learned from failure: {} insight", insight));
    }

    if grind.is_reduced() {
        growth = scale(growth, grind.growth as f64);
        tag_experience = scale(tag_experience, grind.growth as f64);
        insight = scale(insight, grind.insight as f64);
        reasons.push(format!(
            "Repetition #{} in window: growth x{:.1}, insight x{:.1}",
            grind.occurrence, grind.growth, grind.insight
        ));
    }

    GrowthResult {
        growth_points: growth,
        insight_points: insight,
        tag_experience,
        significance: tier,
        risk_multiplier: significance.risk_multiplier,
        grind_factor: grind,
        reasons,
    }
}
