//! Action resolution
//!
//! Turns an [`ActionRequest`] into a [`ResolutionOutcome`]: pick a method,
//! then either roll a d20 against a difficulty or draw against a percentile
//! chance. Nothing here mutates character state.

pub mod dice;
pub mod outcome;
pub mod probability;
pub mod request;
pub mod resolver;
pub mod selector;

pub use dice::{roll_d20, DiscreteRoll, D20_MAX, D20_MIN};
pub use outcome::{OutcomeDetail, ResolutionOutcome};
pub use probability::{decide, decide_with, success_chance, Likelihood, ProbabilityDecision};
pub use request::{
    ActionKind, ActionRequest, Modifiers, NarrativeImpact, ResolutionMethod, RiskLevel,
};
pub use resolver::{ActionResolver, CharacterAwareResolver, SimpleResolver};
pub use selector::{select_method, MethodSelection};
