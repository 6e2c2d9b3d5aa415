//! Anti-grinding
//!
//! Each character keeps a short history of action signatures. Repeating the
//! same signature more than the free allowance inside the window cuts growth
//! and insight for that action. The cut is flat: the 4th and the 40th repeat
//! are reduced by the same factor.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::character::Domain;
use crate::core::config::ProgressionConfig;
use crate::core::types::Timestamp;
use crate::resolution::{ActionKind, ActionRequest};

/// Normalized identity of an action for repetition tracking
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionSignature {
    pub domain: Domain,
    /// Lowercased primary tag
    pub tag: Option<String>,
    pub kind: ActionKind,
}

impl ActionSignature {
    pub fn from_request(request: &ActionRequest) -> Self {
        Self {
            domain: request.domain,
            tag: request.tag.as_ref().map(|t| t.key().to_string()),
            kind: request.kind,
        }
    }
}

/// Reward scaling for one action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrindFactor {
    pub growth: f32,
    pub insight: f32,
    /// 1-based occurrence of this signature inside the window, this action included
    pub occurrence: usize,
}

impl GrindFactor {
    pub fn full(occurrence: usize) -> Self {
        Self {
            growth: 1.0,
            insight: 1.0,
            occurrence,
        }
    }

    pub fn is_reduced(&self) -> bool {
        self.growth < 1.0 || self.insight < 1.0
    }
}

/// Per-character repetition history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrindHistory {
    entries: VecDeque<(ActionSignature, Timestamp)>,
}

impl GrindHistory {
    pub fn new() -> Self {
        Self::default()
    }

    fn in_window(now: Timestamp, at: Timestamp, window: u64) -> bool {
        now.saturating_sub(at) < window
    }

    /// Earlier occurrences of `signature` still inside the window
    pub fn occurrences(&self, signature: &ActionSignature, now: Timestamp, window: u64) -> usize {
        self.entries
            .iter()
            .filter(|(sig, at)| sig == signature && Self::in_window(now, *at, window))
            .count()
    }

    /// Scaling for the next occurrence of `signature`
    ///
    /// Read-only: stale entries are skipped here and dropped on the next
    /// `record`.
    pub fn factor(
        &self,
        signature: &ActionSignature,
        now: Timestamp,
        config: &ProgressionConfig,
    ) -> GrindFactor {
        let occurrence = self.occurrences(signature, now, config.grind_window_secs) + 1;
        if occurrence <= config.grind_free_repeats {
            return GrindFactor::full(occurrence);
        }
        GrindFactor {
            growth: config.grind_growth_factor,
            insight: config.grind_insight_factor,
            occurrence,
        }
    }

    /// Record a committed action, pruning anything outside the window
    pub fn record(
        &mut self,
        signature: ActionSignature,
        now: Timestamp,
        config: &ProgressionConfig,
    ) {
        self.prune(now, config.grind_window_secs);
        self.entries.push_back((signature, now));
    }

    /// Drop entries that have left the window
    pub fn prune(&mut self, now: Timestamp, window: u64) {
        self.entries.retain(|(_, at)| Self::in_window(now, *at, window));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
