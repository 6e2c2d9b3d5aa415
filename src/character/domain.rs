//! Character domains and their tier ladder

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::ProgressionError;

/// Broad character attributes used as check modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Domain {
    /// Strength, agility, endurance
    Body,
    /// Reasoning, memory, study
    Mind,
    /// Making and repairing things
    Craft,
    /// Persuasion, deception, rapport
    Social,
    /// Command, intimidation, leadership
    Authority,
    /// Perception, intuition, search
    Awareness,
    /// Willpower, faith, resistance
    Spirit,
}

impl Domain {
    /// Get all domains
    pub fn all() -> &'static [Domain] {
        &[
            Domain::Body,
            Domain::Mind,
            Domain::Craft,
            Domain::Social,
            Domain::Authority,
            Domain::Awareness,
            Domain::Spirit,
        ]
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Domain::Body => "Body",
            Domain::Mind => "Mind",
            Domain::Craft => "Craft",
            Domain::Social => "Social",
            Domain::Authority => "Authority",
            Domain::Awareness => "Awareness",
            Domain::Spirit => "Spirit",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Domain {
    type Err = ProgressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Domain::all()
            .iter()
            .copied()
            .find(|d| d.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ProgressionError::UnknownDomain(s.to_string()))
    }
}

/// Tier ladder derived from a domain's point value
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum DomainTier {
    /// 0-7
    #[default]
    Novice,
    /// 8-12
    Skilled,
    /// 13-17
    Adept,
    /// 18-22
    Expert,
    /// 23-27
    Master,
    /// 28-32
    Grandmaster,
    /// 33-50
    Legendary,
}

impl DomainTier {
    /// Tier for a domain value
    pub fn from_value(value: u32) -> Self {
        match value {
            0..=7 => DomainTier::Novice,
            8..=12 => DomainTier::Skilled,
            13..=17 => DomainTier::Adept,
            18..=22 => DomainTier::Expert,
            23..=27 => DomainTier::Master,
            28..=32 => DomainTier::Grandmaster,
            _ => DomainTier::Legendary,
        }
    }

    /// Lowest value that belongs to this tier
    pub fn threshold(&self) -> u32 {
        match self {
            DomainTier::Novice => 0,
            DomainTier::Skilled => 8,
            DomainTier::Adept => 13,
            DomainTier::Expert => 18,
            DomainTier::Master => 23,
            DomainTier::Grandmaster => 28,
            DomainTier::Legendary => 33,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DomainTier::Novice => "Novice",
            DomainTier::Skilled => "Skilled",
            DomainTier::Adept => "Adept",
            DomainTier::Expert => "Expert",
            DomainTier::Master => "Master",
            DomainTier::Grandmaster => "Grandmaster",
            DomainTier::Legendary => "Legendary",
        }
    }

    /// Mastery paths open up from Expert onward
    pub fn allows_mastery(&self) -> bool {
        *self >= DomainTier::Expert
    }
}

impl fmt::Display for DomainTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
