//! Progression configuration with documented constants
//!
//! All tunable numbers of the resolution and growth rules are collected here
//! with explanations of their purpose and how they interact with each other.
//! Fixed tables (tier ranges, tier thresholds) live next to the enums they
//! describe; everything a designer might want to tune lives here.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{ProgressionError, Result};

/// Configuration for resolution and progression
///
/// These values produce the baseline pacing. Changing them affects how fast
/// characters advance and how punishing repetition is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    // === PROBABILITY RESOLUTION ===
    /// Chance (0-100) at or above which an action succeeds without a draw
    pub auto_success_threshold: u32,

    /// Chance (0-100) at or below which an action fails without a draw
    ///
    /// Must stay below `auto_success_threshold`, otherwise no action would
    /// ever reach the percentile draw.
    pub auto_failure_threshold: u32,

    /// Base chance before domain, tag and modifiers are added
    pub base_chance: i32,

    /// Chance added per point of domain value
    pub chance_per_domain_point: i32,

    /// Chance added per rank of the primary tag
    pub chance_per_tag_rank: i32,

    // === GROWTH ===
    /// Fraction of base growth kept on a failed action
    ///
    /// At 0.6 a failure still teaches more than half of what success would.
    pub failure_growth_factor: f32,

    /// Tag experience multiplier on a critical success
    pub critical_tag_multiplier: f32,

    /// Inclusive range of the creative-approach growth bonus
    pub creative_bonus_min: u32,
    pub creative_bonus_max: u32,

    /// Flat insight bonus for a creative approach on failure
    pub creative_insight_bonus: u32,

    /// Inclusive range of the extra insight for failing a high/extreme risk action
    pub risk_insight_bonus_min: u32,
    pub risk_insight_bonus_max: u32,

    /// Hard ceiling for any domain value
    pub domain_cap: u32,

    // === ANTI-GRINDING ===
    /// Length of the repetition window in seconds
    pub grind_window_secs: u64,

    /// Occurrences of one signature inside the window that are rewarded in full
    ///
    /// With 3, the 4th identical action inside the window is the first one
    /// that gets reduced.
    pub grind_free_repeats: usize,

    /// Growth multiplier once the free repeats are used up
    pub grind_growth_factor: f32,

    /// Insight multiplier once the free repeats are used up
    ///
    /// Lower than the growth factor: farming failures for insight is the
    /// exploit this is meant to close.
    pub grind_insight_factor: f32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            // Probability (50 + 5/domain point + 8/tag rank)
            auto_success_threshold: 90,
            auto_failure_threshold: 14,
            base_chance: 50,
            chance_per_domain_point: 5,
            chance_per_tag_rank: 8,

            // Growth
            failure_growth_factor: 0.6,
            critical_tag_multiplier: 1.5,
            creative_bonus_min: 3,
            creative_bonus_max: 5,
            creative_insight_bonus: 2,
            risk_insight_bonus_min: 1,
            risk_insight_bonus_max: 3,
            domain_cap: 50,

            // Anti-grinding (5 minute window)
            grind_window_secs: 300,
            grind_free_repeats: 3,
            grind_growth_factor: 0.5,
            grind_insight_factor: 0.3,
        }
    }
}

impl ProgressionConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ProgressionConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.auto_failure_threshold >= self.auto_success_threshold {
            return Err(ProgressionError::InvalidConfig(format!(
                "auto_failure_threshold ({}) should be < auto_success_threshold ({})",
                self.auto_failure_threshold, self.auto_success_threshold
            )));
        }

        if self.auto_success_threshold > 100 {
            return Err(ProgressionError::InvalidConfig(format!(
                "auto_success_threshold ({}) should be <= 100",
                self.auto_success_threshold
            )));
        }

        if self.creative_bonus_min > self.creative_bonus_max
            || self.risk_insight_bonus_min > self.risk_insight_bonus_max
        {
            return Err(ProgressionError::InvalidConfig(
                "bonus ranges must have min <= max".into(),
            ));
        }

        let factors = [
            ("failure_growth_factor", self.failure_growth_factor),
            ("grind_growth_factor", self.grind_growth_factor),
            ("grind_insight_factor", self.grind_insight_factor),
        ];
        for (name, factor) in factors {
            if !(0.0..=1.0).contains(&factor) {
                return Err(ProgressionError::InvalidConfig(format!(
                    "{} ({}) should be within [0, 1]",
                    name, factor
                )));
            }
        }

        if self.critical_tag_multiplier < 1.0 {
            return Err(ProgressionError::InvalidConfig(format!(
                "critical_tag_multiplier ({}) should be >= 1",
                self.critical_tag_multiplier
            )));
        }

        if self.grind_window_secs == 0 {
            return Err(ProgressionError::InvalidConfig(
                "grind_window_secs must be positive".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ProgressionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let config = ProgressionConfig {
            auto_failure_threshold: 95,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ProgressionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ProgressionConfig::from_toml_str("grind_window_secs = 600\n").unwrap();
        assert_eq!(config.grind_window_secs, 600);
        assert_eq!(config.auto_success_threshold, 90);
        assert_eq!(config.grind_free_repeats, 3);
    }

    #[test]
    fn test_invalid_toml_value_rejected() {
        let result = ProgressionConfig::from_toml_str("grind_growth_factor = 1.5\n");
        assert!(matches!(result, Err(ProgressionError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_toml() {
        let result = ProgressionConfig::from_toml_str("grind_window_secs = \"soon\"");
        assert!(matches!(result, Err(ProgressionError::TomlError(_))));
    }

    #[test]
    fn test_bundled_config_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/progression.toml");
        let config = ProgressionConfig::load(&path).unwrap();
        assert_eq!(config, ProgressionConfig::default());
    }
}
