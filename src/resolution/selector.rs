//! Resolution method selection
//!
//! Decides whether an action is settled by a discrete roll or by the
//! probability model. Rules are evaluated top to bottom; the first match wins.
//!
//! Every domain has its own arm, so the match is exhaustive and there is no
//! catch-all "unknown domain" policy to fall through to.

use crate::character::Domain;
use crate::resolution::request::{ActionKind, ActionRequest, ResolutionMethod};

/// Chosen method plus the rule that chose it (telemetry only)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSelection {
    pub method: ResolutionMethod,
    pub justification: String,
}

impl MethodSelection {
    fn new(method: ResolutionMethod, justification: impl Into<String>) -> Self {
        Self {
            method,
            justification: justification.into(),
        }
    }
}

/// Action kinds that always call for a roll regardless of domain
const ROLL_KINDS: &[ActionKind] = &[
    ActionKind::CombatAttack,
    ActionKind::PhysicalChallenge,
    ActionKind::EnvironmentalHazard,
];

const CRAFT_ROLL_KINDS: &[ActionKind] = &[
    ActionKind::CombatCraft,
    ActionKind::ExperimentalCraft,
    ActionKind::RushedCraft,
];

const PERCEPTION_ROLL_KINDS: &[ActionKind] =
    &[ActionKind::ActiveSearchCombat, ActionKind::MentalContest];

pub fn select_method(request: &ActionRequest) -> MethodSelection {
    use ResolutionMethod::{DiscreteRoll, Probability};

    if let Some(forced) = request.forced_method {
        return MethodSelection::new(forced, format!("forced {}", forced.name()));
    }

    let kind = request.kind;

    if ROLL_KINDS.contains(&kind) {
        return MethodSelection::new(
            DiscreteRoll,
            format!("{} action ({}) is a physical test", request.domain, kind.name()),
        );
    }

    match request.domain {
        Domain::Body => MethodSelection::new(DiscreteRoll, "physical test"),
        Domain::Authority | Domain::Social => {
            if kind == ActionKind::Contested {
                MethodSelection::new(DiscreteRoll, "contested social exchange")
            } else if request.high_stakes {
                MethodSelection::new(DiscreteRoll, "high-stakes social exchange")
            } else {
                MethodSelection::new(Probability, "uncontested social exchange")
            }
        }
        Domain::Craft => {
            if CRAFT_ROLL_KINDS.contains(&kind) {
                MethodSelection::new(DiscreteRoll, format!("{} under pressure", kind.name()))
            } else if request.combat_active {
                MethodSelection::new(DiscreteRoll, "crafting during combat")
            } else {
                MethodSelection::new(Probability, "routine crafting")
            }
        }
        Domain::Awareness | Domain::Mind => {
            if PERCEPTION_ROLL_KINDS.contains(&kind) {
                MethodSelection::new(DiscreteRoll, format!("{} is opposed", kind.name()))
            } else if request.combat_active {
                MethodSelection::new(DiscreteRoll, "mental effort during combat")
            } else {
                MethodSelection::new(Probability, "unhurried mental effort")
            }
        }
        Domain::Spirit => MethodSelection::new(DiscreteRoll, "willpower resistance check"),
    }
}
