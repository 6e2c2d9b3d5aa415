//! Mastery path registry
//!
//! Each domain has a small catalog of specializations. A path becomes
//! eligible once the domain reaches the path's tier and at least one
//! declared goal mentions one of its keywords. Eligible paths must then be
//! unlocked and finally activated, one active path per domain.

use std::collections::BTreeSet;

use crate::character::{CharacterLedger, Domain, DomainTier, MasteryPath};
use crate::core::error::{ProgressionError, Result};
use crate::core::types::CharacterId;
use crate::progression::events::ProgressionEvent;

/// Catalog entry for a mastery path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasteryPathDefinition {
    pub name: &'static str,
    pub domain: Domain,
    pub min_tier: DomainTier,
    /// Whole words of a declared goal; a trailing plural "s" also matches
    pub goal_keywords: &'static [&'static str],
    pub description: &'static str,
}

impl MasteryPathDefinition {
    /// Number of declared goals mentioning any keyword
    pub fn goal_score(&self, goals: &BTreeSet<String>) -> u32 {
        goals.iter().filter(|goal| self.matches_goal(goal)).count() as u32
    }

    fn matches_goal(&self, goal: &str) -> bool {
        goal.split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .any(|word| {
                let singular = word.strip_suffix('s').unwrap_or(word);
                self.goal_keywords
                    .iter()
                    .any(|kw| word.eq_ignore_ascii_case(kw) || singular.eq_ignore_ascii_case(kw))
            })
    }
}

pub static MASTERY_CATALOG: &[MasteryPathDefinition] = &[
    // Body
    MasteryPathDefinition {
        name: "Blademaster",
        domain: Domain::Body,
        min_tier: DomainTier::Expert,
        goal_keywords: &[
            "sword", "swordsman", "swordsmanship", "blade", "duel", "duelist", "fencing",
        ],
        description: "Weapon forms refined into a personal fighting style",
    },
    MasteryPathDefinition {
        name: "Juggernaut",
        domain: Domain::Body,
        min_tier: DomainTier::Expert,
        goal_keywords: &[
            "strength", "strong", "endurance", "brawl", "brawler", "brawling", "unstoppable",
        ],
        description: "Raw power and the ability to shrug off punishment",
    },
    MasteryPathDefinition {
        name: "Shadowstep",
        domain: Domain::Body,
        min_tier: DomainTier::Master,
        goal_keywords: &[
            "stealth", "acrobat", "acrobatics", "assassin", "thief", "thieves",
        ],
        description: "Movement that is never seen coming",
    },
    // Mind
    MasteryPathDefinition {
        name: "Archivist",
        domain: Domain::Mind,
        min_tier: DomainTier::Expert,
        goal_keywords: &[
            "lore", "knowledge", "history", "histories", "historian", "scholar", "research",
        ],
        description: "Recall and cross-reference of everything ever read",
    },
    MasteryPathDefinition {
        name: "Strategist",
        domain: Domain::Mind,
        min_tier: DomainTier::Expert,
        goal_keywords: &[
            "tactic", "strategy", "strategist", "plan", "planning", "war", "warfare",
        ],
        description: "Seeing several moves ahead on any battlefield",
    },
    // Craft
    MasteryPathDefinition {
        name: "Master Smith",
        domain: Domain::Craft,
        min_tier: DomainTier::Expert,
        goal_keywords: &[
            "smith", "smithing", "forge", "forging", "armor", "armorer", "metal",
        ],
        description: "Arms and armor of exceptional quality",
    },
    MasteryPathDefinition {
        name: "Artificer",
        domain: Domain::Craft,
        min_tier: DomainTier::Expert,
        goal_keywords: &[
            "invent", "inventor", "invention", "machine", "device", "tinker", "tinkering",
        ],
        description: "Mechanisms nobody has built before",
    },
    MasteryPathDefinition {
        name: "Alchemist",
        domain: Domain::Craft,
        min_tier: DomainTier::Master,
        goal_keywords: &[
            "alchemy", "alchemist", "potion", "brew", "brewing", "transmute", "transmutation",
        ],
        description: "Reagents, elixirs and volatile compounds",
    },
    // Social
    MasteryPathDefinition {
        name: "Silver Tongue",
        domain: Domain::Social,
        min_tier: DomainTier::Expert,
        goal_keywords: &[
            "persuade", "persuasion", "negotiate", "negotiation", "diplomat", "diplomacy",
            "charm", "favor",
        ],
        description: "Words that open any door",
    },
    MasteryPathDefinition {
        name: "Spymaster",
        domain: Domain::Social,
        min_tier: DomainTier::Master,
        goal_keywords: &[
            "spy", "spies", "spymaster", "secret", "intrigue", "informant",
        ],
        description: "A web of informants and quiet leverage",
    },
    // Authority
    MasteryPathDefinition {
        name: "Warlord",
        domain: Domain::Authority,
        min_tier: DomainTier::Expert,
        goal_keywords: &[
            "army", "armies", "command", "commander", "conquer", "conquest", "soldier",
        ],
        description: "Troops that follow into any fight",
    },
    MasteryPathDefinition {
        name: "Sovereign",
        domain: Domain::Authority,
        min_tier: DomainTier::Grandmaster,
        goal_keywords: &["rule", "ruler", "throne", "crown", "kingdom"],
        description: "Rulership recognized across the realm",
    },
    // Awareness
    MasteryPathDefinition {
        name: "Pathfinder",
        domain: Domain::Awareness,
        min_tier: DomainTier::Expert,
        goal_keywords: &[
            "track", "tracker", "tracking", "explore", "explorer", "wilderness", "hunt",
            "hunter", "hunting", "scout",
        ],
        description: "No trail goes cold, no wilderness is unknown",
    },
    MasteryPathDefinition {
        name: "Seer",
        domain: Domain::Awareness,
        min_tier: DomainTier::Master,
        goal_keywords: &["omen", "vision", "prophecy", "prophet", "foresight"],
        description: "Glimpses of what has not happened yet",
    },
    // Spirit
    MasteryPathDefinition {
        name: "Ascetic",
        domain: Domain::Spirit,
        min_tier: DomainTier::Expert,
        goal_keywords: &[
            "discipline", "meditate", "meditation", "willpower", "monk",
        ],
        description: "A will that bends for nothing",
    },
    MasteryPathDefinition {
        name: "Oathkeeper",
        domain: Domain::Spirit,
        min_tier: DomainTier::Expert,
        goal_keywords: &["oath", "vow", "faith", "protect", "protector"],
        description: "Strength drawn from promises kept",
    },
    MasteryPathDefinition {
        name: "Mystic",
        domain: Domain::Spirit,
        min_tier: DomainTier::Master,
        goal_keywords: &["magic", "arcane", "ritual", "soul"],
        description: "Communion with forces beyond the body",
    },
];

pub fn definitions_for(domain: Domain) -> impl Iterator<Item = &'static MasteryPathDefinition> {
    MASTERY_CATALOG.iter().filter(move |d| d.domain == domain)
}

/// Catalog lookup, case-insensitive
pub fn find_definition(name: &str) -> Option<&'static MasteryPathDefinition> {
    let wanted = name.trim();
    MASTERY_CATALOG
        .iter()
        .find(|d| d.name.eq_ignore_ascii_case(wanted))
}

/// A catalog path the character currently qualifies for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasteryCandidate {
    pub definition: &'static MasteryPathDefinition,
    pub score: u32,
}

/// Qualifying catalog paths for a domain, best score first
pub fn eligible_paths(ledger: &CharacterLedger, domain: Domain) -> Result<Vec<MasteryCandidate>> {
    let tier = ledger.domain_tier(domain)?;
    if !tier.allows_mastery() {
        return Ok(Vec::new());
    }

    let mut candidates: Vec<MasteryCandidate> = definitions_for(domain)
        .filter(|d| tier >= d.min_tier)
        .map(|definition| MasteryCandidate {
            definition,
            score: definition.goal_score(ledger.declared_goals()),
        })
        .filter(|c| c.score > 0)
        .collect();
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    Ok(candidates)
}

/// Record newly qualifying paths on the ledger
///
/// Paths already on the ledger, in any state, are left alone.
pub fn record_eligibility(
    ledger: &mut CharacterLedger,
    domain: Domain,
    character: CharacterId,
) -> Result<Vec<ProgressionEvent>> {
    let mut events = Vec::new();
    for candidate in eligible_paths(ledger, domain)? {
        if ledger.record_eligible_path(candidate.definition.name, domain) {
            events.push(ProgressionEvent::MasteryPathEligible {
                character,
                domain,
                path: candidate.definition.name.to_string(),
            });
        }
    }
    Ok(events)
}

pub fn mastery_options(ledger: &CharacterLedger, domain: Domain) -> Vec<MasteryPath> {
    ledger.mastery_paths_for(domain).cloned().collect()
}

/// Path state on the ledger, with catalog-aware errors
fn known_path<'a>(ledger: &'a CharacterLedger, name: &str) -> Result<&'a MasteryPath> {
    match ledger.mastery_path(name) {
        Some(path) => Ok(path),
        None if find_definition(name).is_some() => {
            Err(ProgressionError::MasteryPathNotEligible(name.to_string()))
        }
        None => Err(ProgressionError::UnknownMasteryPath(name.to_string())),
    }
}

pub fn unlock(
    ledger: &mut CharacterLedger,
    name: &str,
    character: CharacterId,
) -> Result<Option<ProgressionEvent>> {
    let path = known_path(ledger, name)?;
    if path.unlocked {
        return Ok(None);
    }
    let (canonical, domain) = (path.name.clone(), path.domain);
    ledger.unlock_path(&canonical)?;
    Ok(Some(ProgressionEvent::MasteryPathUnlocked {
        character,
        domain,
        path: canonical,
    }))
}

pub fn activate(
    ledger: &mut CharacterLedger,
    name: &str,
    character: CharacterId,
) -> Result<Option<ProgressionEvent>> {
    let path = known_path(ledger, name)?;
    if path.active {
        return Ok(None);
    }
    let canonical = path.name.clone();
    let replaced = ledger.active_path(path.domain).map(|p| p.name.clone());
    let domain = ledger.activate_path(&canonical)?;
    Ok(Some(ProgressionEvent::MasteryPathActivated {
        character,
        domain,
        path: canonical,
        replaced,
    }))
}

pub fn deactivate(
    ledger: &mut CharacterLedger,
    name: &str,
    character: CharacterId,
) -> Result<Option<ProgressionEvent>> {
    let path = known_path(ledger, name)?;
    if !path.active {
        return Ok(None);
    }
    let (canonical, domain) = (path.name.clone(), path.domain);
    ledger.deactivate_path(&canonical)?;
    Ok(Some(ProgressionEvent::MasteryPathDeactivated {
        character,
        domain,
        path: canonical,
    }))
}
