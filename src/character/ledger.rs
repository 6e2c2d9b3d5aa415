//! Per-character progression ledger
//!
//! Owns domain values, tag ranks, insight and mastery state. Public accessors
//! are read-only; growth is applied through crate-internal mutators used by
//! the progression applier.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::character::domain::{Domain, DomainTier};
use crate::character::tags::{Tag, TagAdvance, TagName, MAX_TAG_RANK};
use crate::core::error::{ProgressionError, Result};

/// Highest value any domain can hold
pub const MAX_DOMAIN_VALUE: u32 = 50;

/// A mastery path as recorded on a character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryPath {
    pub name: String,
    pub domain: Domain,
    pub unlocked: bool,
    pub active: bool,
}

impl MasteryPath {
    /// A path the character qualifies for but has not unlocked
    pub fn eligible(name: impl Into<String>, domain: Domain) -> Self {
        Self {
            name: name.into(),
            domain,
            unlocked: false,
            active: false,
        }
    }
}

/// Normalize a free-form goal or label for comparison
pub fn normalize_goal(goal: &str) -> String {
    goal.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterLedger {
    domains: BTreeMap<Domain, u32>,
    #[serde(default)]
    tags: BTreeMap<TagName, Tag>,
    #[serde(default)]
    insight_points: u32,
    /// Per-domain growth multiplier, reserved for streak mechanics
    #[serde(default)]
    growth_momentum: BTreeMap<Domain, f32>,
    #[serde(default)]
    mastery_paths: Vec<MasteryPath>,
    #[serde(default)]
    declared_goals: BTreeSet<String>,
}

impl Default for CharacterLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterLedger {
    /// Fresh character: every domain at 0, neutral momentum
    pub fn new() -> Self {
        Self {
            domains: Domain::all().iter().map(|d| (*d, 0)).collect(),
            tags: BTreeMap::new(),
            insight_points: 0,
            growth_momentum: Domain::all().iter().map(|d| (*d, 1.0)).collect(),
            mastery_paths: Vec::new(),
            declared_goals: BTreeSet::new(),
        }
    }

    /// Seed a domain value at construction time
    pub fn with_domain(mut self, domain: Domain, value: u32) -> Result<Self> {
        if value > MAX_DOMAIN_VALUE {
            return Err(ProgressionError::DomainValueOutOfRange {
                domain: domain.name().to_string(),
                value,
                max: MAX_DOMAIN_VALUE,
            });
        }
        self.domains.insert(domain, value);
        Ok(self)
    }

    /// Seed a tag at `rank` at construction time; `rank` may not exceed
    /// `MAX_TAG_RANK`
    pub fn with_tag(mut self, name: &str, rank: u32) -> Result<Self> {
        let name = TagName::new(name)?;
        if rank > MAX_TAG_RANK {
            return Err(ProgressionError::TagRankOutOfRange {
                tag: name.to_string(),
                rank,
                max: MAX_TAG_RANK,
            });
        }
        self.tags.insert(name, Tag::at_rank(rank));
        Ok(self)
    }

    pub fn with_goal(mut self, goal: &str) -> Self {
        self.declare_goal(goal);
        self
    }

    pub fn with_insight(mut self, points: u32) -> Self {
        self.insight_points = points;
        self
    }

    // === DOMAINS ===

    pub fn domain_value(&self, domain: Domain) -> Result<u32> {
        self.domains
            .get(&domain)
            .copied()
            .ok_or_else(|| ProgressionError::UnknownDomain(domain.name().to_string()))
    }

    pub fn domain_tier(&self, domain: Domain) -> Result<DomainTier> {
        self.domain_value(domain).map(DomainTier::from_value)
    }

    pub fn domains(&self) -> &BTreeMap<Domain, u32> {
        &self.domains
    }

    /// Growth multiplier for a domain (1.0 when unset)
    pub fn momentum(&self, domain: Domain) -> f32 {
        self.growth_momentum.get(&domain).copied().unwrap_or(1.0)
    }

    pub fn set_momentum(&mut self, domain: Domain, multiplier: f32) {
        self.growth_momentum.insert(domain, multiplier.max(0.0));
    }

    /// Add growth to a domain, saturating at `cap`
    ///
    /// Returns (value before, value after).
    pub(crate) fn add_domain_growth(
        &mut self,
        domain: Domain,
        points: u32,
        cap: u32,
    ) -> Result<(u32, u32)> {
        let cap = cap.min(MAX_DOMAIN_VALUE);
        let value = self
            .domains
            .get_mut(&domain)
            .ok_or_else(|| ProgressionError::UnknownDomain(domain.name().to_string()))?;
        let before = *value;
        *value = before.saturating_add(points).min(cap.max(before));
        Ok((before, *value))
    }

    // === TAGS ===

    pub fn tag(&self, name: &TagName) -> Option<&Tag> {
        self.tags.get(name)
    }

    /// Rank of a tag, 0 when the character has never used it
    pub fn tag_rank(&self, name: &TagName) -> u32 {
        self.tags.get(name).map_or(0, |t| t.rank)
    }

    pub fn tags(&self) -> &BTreeMap<TagName, Tag> {
        &self.tags
    }

    /// Feed experience into a tag, learning it first if needed
    pub(crate) fn advance_tag(&mut self, name: &TagName, experience: u64) -> TagAdvance {
        self.tags
            .entry(name.clone())
            .or_default()
            .add_experience(experience)
    }

    // === INSIGHT ===

    pub fn insight_points(&self) -> u32 {
        self.insight_points
    }

    pub(crate) fn add_insight(&mut self, points: u32) {
        self.insight_points = self.insight_points.saturating_add(points);
    }

    /// Spend insight; fails without change when the balance is too low
    pub fn spend_insight(&mut self, amount: u32) -> Result<u32> {
        if amount > self.insight_points {
            return Err(ProgressionError::InsufficientInsight {
                requested: amount,
                available: self.insight_points,
            });
        }
        self.insight_points -= amount;
        Ok(self.insight_points)
    }

    // === GOALS ===

    pub fn declared_goals(&self) -> &BTreeSet<String> {
        &self.declared_goals
    }

    pub fn declare_goal(&mut self, goal: &str) {
        let goal = normalize_goal(goal);
        if !goal.is_empty() {
            self.declared_goals.insert(goal);
        }
    }

    pub fn has_goal(&self, label: &str) -> bool {
        self.declared_goals.contains(&normalize_goal(label))
    }

    // === MASTERY ===

    pub fn mastery_paths(&self) -> &[MasteryPath] {
        &self.mastery_paths
    }

    pub fn mastery_path(&self, name: &str) -> Option<&MasteryPath> {
        self.mastery_paths
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn mastery_paths_for(&self, domain: Domain) -> impl Iterator<Item = &MasteryPath> {
        self.mastery_paths.iter().filter(move |p| p.domain == domain)
    }

    pub fn active_path(&self, domain: Domain) -> Option<&MasteryPath> {
        self.mastery_paths_for(domain).find(|p| p.active)
    }

    /// Record a newly eligible path; returns false if it was already known
    pub(crate) fn record_eligible_path(&mut self, name: &str, domain: Domain) -> bool {
        if self.mastery_path(name).is_some() {
            return false;
        }
        self.mastery_paths.push(MasteryPath::eligible(name, domain));
        true
    }

    fn path_mut(&mut self, name: &str) -> Result<&mut MasteryPath> {
        self.mastery_paths
            .iter_mut()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ProgressionError::MasteryPathNotEligible(name.to_string()))
    }

    /// Unlock an eligible path; unlocking never activates it
    pub(crate) fn unlock_path(&mut self, name: &str) -> Result<()> {
        self.path_mut(name)?.unlocked = true;
        Ok(())
    }

    /// Activate an unlocked path, deactivating any other in its domain
    pub(crate) fn activate_path(&mut self, name: &str) -> Result<Domain> {
        let path = self.path_mut(name)?;
        if !path.unlocked {
            return Err(ProgressionError::MasteryPathLocked(path.name.clone()));
        }
        let domain = path.domain;
        let chosen = path.name.clone();
        for path in self.mastery_paths.iter_mut().filter(|p| p.domain == domain) {
            path.active = path.name == chosen;
        }
        Ok(domain)
    }

    pub(crate) fn deactivate_path(&mut self, name: &str) -> Result<()> {
        self.path_mut(name)?.active = false;
        Ok(())
    }
}
