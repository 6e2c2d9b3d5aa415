//! Action requests
//!
//! An `ActionRequest` is built per call by the narrative layer, which has
//! already classified free text into risk, impact and the creative flag.

use serde::{Deserialize, Serialize};

use crate::character::{Domain, TagName};
use crate::core::error::{ProgressionError, Result};

/// How an action's outcome is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionMethod {
    /// d20 + domain + tag ranks against a difficulty
    DiscreteRoll,
    /// Percentile chance built from domain, tag and modifiers
    Probability,
}

impl ResolutionMethod {
    pub fn name(&self) -> &'static str {
        match self {
            ResolutionMethod::DiscreteRoll => "discrete roll",
            ResolutionMethod::Probability => "probability",
        }
    }
}

/// Coarse category of the attempted action, used by method selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActionKind {
    #[default]
    General,
    CombatAttack,
    PhysicalChallenge,
    EnvironmentalHazard,
    Contested,
    CombatCraft,
    ExperimentalCraft,
    RushedCraft,
    ActiveSearchCombat,
    MentalContest,
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::General => "general",
            ActionKind::CombatAttack => "combat-attack",
            ActionKind::PhysicalChallenge => "physical-challenge",
            ActionKind::EnvironmentalHazard => "environmental-hazard",
            ActionKind::Contested => "contested",
            ActionKind::CombatCraft => "combat-craft",
            ActionKind::ExperimentalCraft => "experimental-craft",
            ActionKind::RushedCraft => "rushed-craft",
            ActionKind::ActiveSearchCombat => "active-search-combat",
            ActionKind::MentalContest => "mental-contest",
        }
    }
}

/// Declared risk of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
    Extreme,
}

impl RiskLevel {
    /// Reward multiplier applied to base growth
    pub fn multiplier(&self) -> f32 {
        match self {
            RiskLevel::Low => 0.75,
            RiskLevel::Medium => 1.0,
            RiskLevel::High => 1.25,
            RiskLevel::Extreme => 1.5,
        }
    }

    /// High and extreme risk earn extra insight on failure
    pub fn is_dangerous(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Extreme)
    }

    pub fn name(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Extreme => "extreme",
        }
    }
}

/// Narrative weight of an action, 0 (none) to 3 (story-defining)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct NarrativeImpact(u8);

impl From<u8> for NarrativeImpact {
    fn from(level: u8) -> Self {
        NarrativeImpact::new(level)
    }
}

impl From<NarrativeImpact> for u8 {
    fn from(impact: NarrativeImpact) -> Self {
        impact.0
    }
}

impl NarrativeImpact {
    pub const NONE: NarrativeImpact = NarrativeImpact(0);
    pub const MAX: u8 = 3;

    /// Values above 3 are clamped
    pub fn new(level: u8) -> Self {
        Self(level.min(Self::MAX))
    }

    pub fn level(&self) -> u8 {
        self.0
    }
}

/// One situational modifier with its documented range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifierRange {
    pub name: &'static str,
    pub min: i32,
    pub max: i32,
}

pub const PREPARATION_RANGE: ModifierRange = ModifierRange {
    name: "preparation_quality",
    min: -20,
    max: 30,
};
pub const APPROACH_RANGE: ModifierRange = ModifierRange {
    name: "approach_effectiveness",
    min: -30,
    max: 25,
};
pub const DISPOSITION_RANGE: ModifierRange = ModifierRange {
    name: "disposition",
    min: -40,
    max: 20,
};
pub const RELATIONSHIP_RANGE: ModifierRange = ModifierRange {
    name: "relationship_history",
    min: -25,
    max: 25,
};

impl ModifierRange {
    pub fn check(&self, value: i32) -> Result<i32> {
        if value < self.min || value > self.max {
            return Err(ProgressionError::OutOfRangeModifier {
                name: self.name,
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(value)
    }

    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }
}

/// Situational modifiers for probability checks; absent entries count as 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub preparation_quality: Option<i32>,
    pub approach_effectiveness: Option<i32>,
    pub disposition: Option<i32>,
    pub relationship_history: Option<i32>,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preparation(mut self, value: i32) -> Self {
        self.preparation_quality = Some(value);
        self
    }

    pub fn with_approach(mut self, value: i32) -> Self {
        self.approach_effectiveness = Some(value);
        self
    }

    pub fn with_disposition(mut self, value: i32) -> Self {
        self.disposition = Some(value);
        self
    }

    pub fn with_relationship(mut self, value: i32) -> Self {
        self.relationship_history = Some(value);
        self
    }

    /// Present modifiers paired with their ranges
    pub fn entries(&self) -> impl Iterator<Item = (ModifierRange, i32)> {
        [
            (PREPARATION_RANGE, self.preparation_quality),
            (APPROACH_RANGE, self.approach_effectiveness),
            (DISPOSITION_RANGE, self.disposition),
            (RELATIONSHIP_RANGE, self.relationship_history),
        ]
        .into_iter()
        .filter_map(|(range, value)| value.map(|v| (range, v)))
    }
}

/// Everything the engine needs to resolve one action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub domain: Domain,
    pub tag: Option<TagName>,
    #[serde(default)]
    pub secondary_domains: Vec<Domain>,
    #[serde(default)]
    pub secondary_tags: Vec<TagName>,
    #[serde(default)]
    pub kind: ActionKind,
    /// Target number for discrete rolls
    pub difficulty: i32,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub risk: RiskLevel,
    #[serde(default)]
    pub narrative_impact: NarrativeImpact,
    /// Tier name chosen by the game master, replaces the computed tier
    #[serde(default)]
    pub significance_override: Option<String>,
    #[serde(default)]
    pub combat_active: bool,
    #[serde(default)]
    pub external_challenge: bool,
    #[serde(default)]
    pub high_stakes: bool,
    #[serde(default)]
    pub creative_approach: bool,
    /// Goal labels the narrative layer associated with this action
    #[serde(default)]
    pub goal_tags: Vec<String>,
    #[serde(default)]
    pub forced_method: Option<ResolutionMethod>,
}

impl ActionRequest {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            tag: None,
            secondary_domains: Vec::new(),
            secondary_tags: Vec::new(),
            kind: ActionKind::General,
            difficulty: 10,
            modifiers: Modifiers::default(),
            risk: RiskLevel::Medium,
            narrative_impact: NarrativeImpact::NONE,
            significance_override: None,
            combat_active: false,
            external_challenge: false,
            high_stakes: false,
            creative_approach: false,
            goal_tags: Vec::new(),
            forced_method: None,
        }
    }

    pub fn with_tag(mut self, name: &str) -> Result<Self> {
        self.tag = Some(TagName::new(name)?);
        Ok(self)
    }

    pub fn with_secondary_tag(mut self, name: &str) -> Result<Self> {
        let name = TagName::new(name)?;
        if self.tag.as_ref() != Some(&name) && !self.secondary_tags.contains(&name) {
            self.secondary_tags.push(name);
        }
        Ok(self)
    }

    pub fn with_secondary_domain(mut self, domain: Domain) -> Self {
        if domain != self.domain && !self.secondary_domains.contains(&domain) {
            self.secondary_domains.push(domain);
        }
        self
    }

    pub fn with_kind(mut self, kind: ActionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_difficulty(mut self, difficulty: i32) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_risk(mut self, risk: RiskLevel) -> Self {
        self.risk = risk;
        self
    }

    pub fn with_impact(mut self, level: u8) -> Self {
        self.narrative_impact = NarrativeImpact::new(level);
        self
    }

    pub fn with_significance_override(mut self, tier: &str) -> Self {
        self.significance_override = Some(tier.to_string());
        self
    }

    pub fn in_combat(mut self) -> Self {
        self.combat_active = true;
        self
    }

    pub fn as_external_challenge(mut self) -> Self {
        self.external_challenge = true;
        self
    }

    pub fn high_stakes(mut self) -> Self {
        self.high_stakes = true;
        self
    }

    pub fn creative(mut self) -> Self {
        self.creative_approach = true;
        self
    }

    pub fn with_goal_tag(mut self, goal: &str) -> Self {
        self.goal_tags.push(goal.to_string());
        self
    }

    pub fn forced(mut self, method: ResolutionMethod) -> Self {
        self.forced_method = Some(method);
        self
    }

    /// Primary tag followed by secondary tags
    pub fn tags_used(&self) -> Vec<TagName> {
        self.tag
            .iter()
            .chain(self.secondary_tags.iter())
            .cloned()
            .collect()
    }

    /// Primary domain followed by secondary domains
    pub fn domains_used(&self) -> Vec<Domain> {
        std::iter::once(self.domain)
            .chain(self.secondary_domains.iter().copied())
            .collect()
    }
}
