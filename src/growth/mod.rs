//! Reward calculation
//!
//! Significance decides how much an action is worth, the calculator turns
//! that into growth and insight, and the grind history trims rewards for
//! actions repeated too often in a short span.

pub mod calculator;
pub mod grinding;
pub mod significance;

pub use calculator::{calculate_growth, GrowthResult};
pub use grinding::{ActionSignature, GrindFactor, GrindHistory};
pub use significance::{aligned_goal, classify, Significance, SignificanceTier};
