//! Continuous probability resolution
//!
//! chance = clamp(50 + domain*5 + tag_rank*8 + modifiers, 0, 100)
//!
//! Near-certain outcomes are settled without a draw; everything between the
//! two thresholds is a percentile draw against the chance.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::ProgressionConfig;
use crate::resolution::request::Modifiers;

pub const PERCENTILE_MIN: u32 = 1;
pub const PERCENTILE_MAX: u32 = 100;

/// UI label for a success chance; carries no mechanical weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Likelihood {
    AlmostCertainSuccess,
    VeryLikely,
    Uncertain,
    Risky,
    AlmostCertainFailure,
}

impl Likelihood {
    pub fn from_chance(chance: u32) -> Self {
        match chance {
            90..=u32::MAX => Likelihood::AlmostCertainSuccess,
            70..=89 => Likelihood::VeryLikely,
            40..=69 => Likelihood::Uncertain,
            15..=39 => Likelihood::Risky,
            _ => Likelihood::AlmostCertainFailure,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Likelihood::AlmostCertainSuccess => "Almost Certain Success",
            Likelihood::VeryLikely => "Very Likely",
            Likelihood::Uncertain => "Uncertain",
            Likelihood::Risky => "Risky",
            Likelihood::AlmostCertainFailure => "Almost Certain Failure",
        }
    }
}

/// Success chance with the notes produced while computing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChanceCalculation {
    pub chance: u32,
    /// Recovered out-of-range modifiers
    pub notes: Vec<String>,
}

/// Compute the 0-100 success chance
///
/// Modifiers outside their documented range are clamped and noted rather
/// than rejected.
pub fn success_chance(
    config: &ProgressionConfig,
    domain_value: u32,
    tag_rank: u32,
    modifiers: &Modifiers,
) -> ChanceCalculation {
    let mut notes = Vec::new();
    let mut modifier_total: i64 = 0;

    for (range, value) in modifiers.entries() {
        let applied = match range.check(value) {
            Ok(v) => v,
            Err(err) => {
                let clamped = range.clamp(value);
                tracing::warn!("{}; clamped to {}", err, clamped);
                notes.push(format!("{} clamped to {}", err, clamped));
                clamped
            }
        };
        modifier_total += applied as i64;
    }

    let raw = config.base_chance as i64
        + domain_value as i64 * config.chance_per_domain_point as i64
        + tag_rank as i64 * config.chance_per_tag_rank as i64
        + modifier_total;

    ChanceCalculation {
        chance: raw.clamp(0, PERCENTILE_MAX as i64) as u32,
        notes,
    }
}

/// How a probability check was settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbabilityDecision {
    /// chance at or above the auto-success threshold, no draw made
    AutoSuccess,
    /// chance at or below the auto-failure threshold, no draw made
    AutoFailure,
    /// percentile draw; success iff draw <= chance
    Drawn { draw: u32, success: bool },
}

impl ProbabilityDecision {
    pub fn success(&self) -> bool {
        match self {
            ProbabilityDecision::AutoSuccess => true,
            ProbabilityDecision::AutoFailure => false,
            ProbabilityDecision::Drawn { success, .. } => *success,
        }
    }

    pub fn draw(&self) -> Option<u32> {
        match self {
            ProbabilityDecision::Drawn { draw, .. } => Some(*draw),
            _ => None,
        }
    }
}

/// Settle a check, calling `draw` only when the chance is genuinely uncertain
pub fn decide_with<F>(config: &ProgressionConfig, chance: u32, draw: F) -> ProbabilityDecision
where
    F: FnOnce() -> u32,
{
    if chance >= config.auto_success_threshold {
        return ProbabilityDecision::AutoSuccess;
    }
    if chance <= config.auto_failure_threshold {
        return ProbabilityDecision::AutoFailure;
    }
    let draw = draw();
    ProbabilityDecision::Drawn {
        draw,
        success: draw <= chance,
    }
}

/// Settle a check with a percentile draw from `rng`
pub fn decide<R: Rng>(
    config: &ProgressionConfig,
    chance: u32,
    rng: &mut R,
) -> ProbabilityDecision {
    decide_with(config, chance, || {
        rng.gen_range(PERCENTILE_MIN..=PERCENTILE_MAX)
    })
}

/// Audit line for a probability check
pub fn describe(chance: u32, decision: &ProbabilityDecision) -> String {
    let likelihood = Likelihood::from_chance(chance).label();
    match decision {
        ProbabilityDecision::AutoSuccess => {
            format!("chance {}% ({}): automatic success", chance, likelihood)
        }
        ProbabilityDecision::AutoFailure => {
            format!("chance {}% ({}): automatic failure", chance, likelihood)
        }
        ProbabilityDecision::Drawn { draw, success } => format!(
            "chance {}% ({}): drew {}: {}",
            chance,
            likelihood,
            draw,
            if *success { "success" } else { "failure" }
        ),
    }
}
