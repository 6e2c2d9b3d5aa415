//! Rankable skill tags
//!
//! Tags are narrower than domains ("Swordsmanship", "Haggling"). Names are
//! validated when the tag is constructed, so a ledger never holds a key that
//! lookups could silently miss.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::core::error::{ProgressionError, Result};

/// Longest accepted tag name, in characters
pub const MAX_TAG_NAME_LEN: usize = 48;

/// Validated tag name
///
/// Equality, ordering and hashing ignore ASCII case, so "swordsmanship" and
/// "Swordsmanship" name the same tag. The first spelling seen is kept for
/// display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagName {
    display: String,
    key: String,
}

impl TagName {
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let raw = name.as_ref();
        let trimmed = raw.trim();

        let valid_chars = trimmed
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '\''));

        if trimmed.is_empty() || trimmed.chars().count() > MAX_TAG_NAME_LEN || !valid_chars {
            return Err(ProgressionError::InvalidTagName(raw.to_string()));
        }

        Ok(Self {
            display: trimmed.to_string(),
            key: trimmed.to_ascii_lowercase(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// Lowercased form used for comparisons and action signatures
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for TagName {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for TagName {}

impl Hash for TagName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for TagName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TagName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl TryFrom<String> for TagName {
    type Error = ProgressionError;

    fn try_from(value: String) -> Result<Self> {
        TagName::new(value)
    }
}

impl From<TagName> for String {
    fn from(value: TagName) -> Self {
        value.display
    }
}

/// Highest rank a tag can hold
///
/// Seeding above it is rejected and experience stops advancing there. At
/// this cap the threshold is 500_500 experience.
pub const MAX_TAG_RANK: u32 = 1_000;

/// Cumulative experience needed to hold `rank`
///
/// 10, 30, 60, 100, 150, ... Experience is never consumed by a rank-up.
/// Saturates at `u64::MAX` instead of overflowing.
pub fn experience_for_rank(rank: u32) -> u64 {
    let r = u64::from(rank);
    r.saturating_mul(r + 1).saturating_mul(5)
}

/// Result of feeding experience into a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagAdvance {
    pub previous_rank: u32,
    pub new_rank: u32,
}

impl TagAdvance {
    pub fn ranked_up(&self) -> bool {
        self.new_rank > self.previous_rank
    }
}

/// Per-character state of one tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tag {
    pub rank: u32,
    pub experience: u64,
}

impl Tag {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tag seeded at `rank` with exactly the experience that rank requires
    pub fn at_rank(rank: u32) -> Self {
        Self {
            rank,
            experience: experience_for_rank(rank),
        }
    }

    /// Experience still missing for the next rank
    pub fn experience_to_next(&self) -> u64 {
        experience_for_rank(self.rank.saturating_add(1)).saturating_sub(self.experience)
    }

    /// Add experience and advance rank across every threshold crossed
    ///
    /// Ranks stop at `MAX_TAG_RANK`; experience keeps accumulating.
    pub fn add_experience(&mut self, amount: u64) -> TagAdvance {
        let previous_rank = self.rank;
        self.experience = self.experience.saturating_add(amount);
        while self.rank < MAX_TAG_RANK && self.experience >= experience_for_rank(self.rank + 1) {
            self.rank += 1;
        }
        TagAdvance {
            previous_rank,
            new_rank: self.rank,
        }
    }
}
