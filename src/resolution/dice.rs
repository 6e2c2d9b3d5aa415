//! Discrete d20 roll resolution
//!
//! total = d20 + primary domain value + sum of tag ranks used.
//! A natural 20 always succeeds and a natural 1 always fails, whatever the
//! numbers say. The margin is still reported as plain `total - difficulty`.
//! Totals and margins clamp to the `i32` range instead of wrapping.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::character::{Domain, TagName};

pub const D20_MIN: u32 = 1;
pub const D20_MAX: u32 = 20;

/// Draw one d20
pub fn roll_d20<R: Rng>(rng: &mut R) -> u32 {
    rng.gen_range(D20_MIN..=D20_MAX)
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Fully evaluated discrete roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscreteRoll {
    pub draw: u32,
    pub domain: Domain,
    pub domain_value: u32,
    pub tag_ranks: Vec<(TagName, u32)>,
    pub total: i32,
    pub difficulty: i32,
    pub margin: i32,
    pub success: bool,
}

impl DiscreteRoll {
    /// Evaluate a known draw; `draw` is expected in 1..=20
    pub fn evaluate(
        draw: u32,
        domain: Domain,
        domain_value: u32,
        tag_ranks: Vec<(TagName, u32)>,
        difficulty: i32,
    ) -> Self {
        let tag_total = tag_ranks
            .iter()
            .fold(0i64, |sum, (_, rank)| sum.saturating_add(i64::from(*rank)));
        let total = saturate(i64::from(draw) + i64::from(domain_value) + tag_total);
        let margin = saturate(i64::from(total) - i64::from(difficulty));

        let success = match draw {
            D20_MAX => true,
            D20_MIN => false,
            _ => total >= difficulty,
        };

        Self {
            draw,
            domain,
            domain_value,
            tag_ranks,
            total,
            difficulty,
            margin,
            success,
        }
    }

    /// Roll and evaluate
    pub fn roll<R: Rng>(
        rng: &mut R,
        domain: Domain,
        domain_value: u32,
        tag_ranks: Vec<(TagName, u32)>,
        difficulty: i32,
    ) -> Self {
        let draw = roll_d20(rng);
        Self::evaluate(draw, domain, domain_value, tag_ranks, difficulty)
    }

    pub fn natural_20(&self) -> bool {
        self.draw == D20_MAX
    }

    pub fn natural_1(&self) -> bool {
        self.draw == D20_MIN
    }

    /// Audit line enumerating every term of the total
    pub fn breakdown(&self) -> String {
        let mut line = format!("d20({}) + {} {}", self.draw, self.domain, self.domain_value);
        for (tag, rank) in &self.tag_ranks {
            line.push_str(&format!(" + {} {}", tag, rank));
        }
        line.push_str(&format!(
            " = {} vs DC {} (margin {:+})",
            self.total, self.difficulty, self.margin
        ));
        if self.natural_20() {
            line.push_str(", natural 20");
        } else if self.natural_1() {
            line.push_str(", natural 1");
        }
        line.push_str(if self.success { ": success" } else { ": failure" });
        line
    }
}
