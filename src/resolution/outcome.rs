//! Resolution outcomes

use serde::{Deserialize, Serialize};

use crate::character::{Domain, TagName};
use crate::resolution::dice::DiscreteRoll;
use crate::resolution::probability::{Likelihood, ProbabilityDecision};
use crate::resolution::request::ResolutionMethod;

/// Method-specific numbers behind an outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeDetail {
    Discrete(DiscreteRoll),
    Probability {
        chance: u32,
        decision: ProbabilityDecision,
        likelihood: Likelihood,
    },
}

/// Result of resolving one action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionOutcome {
    pub method: ResolutionMethod,
    pub success: bool,
    pub detail: OutcomeDetail,
    pub critical_success: bool,
    pub critical_failure: bool,
    /// Primary domain first
    pub domains_used: Vec<Domain>,
    /// Primary tag first, if any
    pub tags_used: Vec<TagName>,
    /// Why this method was chosen
    pub justification: String,
    /// Human-readable audit of the numbers
    pub breakdown: String,
    /// Recovered input problems (clamped modifiers and the like)
    pub notes: Vec<String>,
}

impl ResolutionOutcome {
    pub fn primary_domain(&self) -> Option<Domain> {
        self.domains_used.first().copied()
    }

    /// Margin over the difficulty (discrete rolls only)
    pub fn margin(&self) -> Option<i32> {
        match &self.detail {
            OutcomeDetail::Discrete(roll) => Some(roll.margin),
            OutcomeDetail::Probability { .. } => None,
        }
    }

    /// The d20 or percentile value drawn, if any draw was made
    pub fn draw(&self) -> Option<u32> {
        match &self.detail {
            OutcomeDetail::Discrete(roll) => Some(roll.draw),
            OutcomeDetail::Probability { decision, .. } => decision.draw(),
        }
    }

    /// Success chance (probability checks only)
    pub fn chance(&self) -> Option<u32> {
        match &self.detail {
            OutcomeDetail::Discrete(_) => None,
            OutcomeDetail::Probability { chance, .. } => Some(*chance),
        }
    }
}
