//! Integration tests for the resolve-and-grow pipeline

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use unified_progression::character::{CharacterLedger, Domain, DomainTier, TagName};
use unified_progression::core::{CharacterId, ManualClock, ProgressionConfig, ProgressionError};
use unified_progression::growth::{classify, SignificanceTier};
use unified_progression::progression::{ProgressionEvent, RecordingEventSink};
use unified_progression::resolution::{
    decide_with, select_method, success_chance, ActionKind, ActionRequest, ActionResolver,
    CharacterAwareResolver, DiscreteRoll, Modifiers, ProbabilityDecision, ResolutionMethod,
    RiskLevel, SimpleResolver,
};
use unified_progression::session::{CharacterRepository, GameSession};

fn session_with_sink() -> (GameSession, Arc<ManualClock>, Arc<RecordingEventSink>) {
    let clock = Arc::new(ManualClock::new(10_000));
    let sink = Arc::new(RecordingEventSink::new());
    let session = GameSession::new(ProgressionConfig::default())
        .unwrap()
        .with_clock(clock.clone())
        .with_event_sink(sink.clone());
    (session, clock, sink)
}

/// Body 4, Swordsmanship 2, d20 shows 15 against DC 15
#[test]
fn test_sword_strike_breakdown() {
    let request = ActionRequest::new(Domain::Body)
        .with_tag("Swordsmanship")
        .unwrap()
        .with_kind(ActionKind::CombatAttack)
        .with_difficulty(15);
    assert_eq!(select_method(&request).method, ResolutionMethod::DiscreteRoll);

    let roll = DiscreteRoll::evaluate(
        15,
        Domain::Body,
        4,
        vec![(TagName::new("Swordsmanship").unwrap(), 2)],
        15,
    );
    assert_eq!(roll.total, 21);
    assert_eq!(roll.margin, 6);
    assert!(roll.success);
    let breakdown = roll.breakdown();
    assert!(breakdown.contains("d20(15)"));
    assert!(breakdown.contains("Body 4"));
    assert!(breakdown.contains("Swordsmanship 2"));
}

/// Social 3 with preparation +10 gives 75%
#[test]
fn test_social_persuasion_chance() {
    let config = ProgressionConfig::default();
    let request = ActionRequest::new(Domain::Social)
        .with_modifiers(Modifiers::new().with_preparation(10));
    assert_eq!(select_method(&request).method, ResolutionMethod::Probability);

    let calc = success_chance(&config, 3, 0, &request.modifiers);
    assert_eq!(calc.chance, 75);
    assert!(decide_with(&config, calc.chance, || 70).success());
    assert!(!decide_with(&config, calc.chance, || 80).success());
}

#[test]
fn test_high_chance_never_draws() {
    let config = ProgressionConfig::default();
    let calc = success_chance(&config, 5, 2, &Modifiers::new().with_approach(1));
    assert_eq!(calc.chance, 92);
    let decision = decide_with(&config, calc.chance, || panic!("no draw expected"));
    assert_eq!(decision, ProbabilityDecision::AutoSuccess);
}

#[test]
fn test_out_of_range_modifier_is_clamped_not_surfaced() {
    let (session, _, _) = session_with_sink();
    let id = session
        .add_character(CharacterLedger::new().with_domain(Domain::Social, 3).unwrap())
        .unwrap();
    let request = ActionRequest::new(Domain::Social)
        .with_modifiers(Modifiers::new().with_disposition(-90));
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    let report = session.resolve_and_apply(id, &request, &mut rng).unwrap();
    assert_eq!(report.outcome.chance(), Some(50 + 15 - 40));
    assert!(!report.outcome.notes.is_empty());
}

#[test]
fn test_both_resolvers_behind_one_trait() {
    let config = ProgressionConfig::default();
    let ledger = CharacterLedger::new()
        .with_domain(Domain::Spirit, 6)
        .unwrap()
        .with_tag("Meditation", 1)
        .unwrap();
    let request = ActionRequest::new(Domain::Spirit).with_tag("Meditation").unwrap();

    let resolvers: Vec<Box<dyn ActionResolver + '_>> = vec![
        Box::new(SimpleResolver::new(config.clone())),
        Box::new(CharacterAwareResolver::new(&config, &ledger)),
    ];
    let methods: Vec<ResolutionMethod> = resolvers
        .iter()
        .map(|r| {
            let mut rng = ChaCha8Rng::seed_from_u64(1);
            r.resolve(&request, &mut rng).unwrap().method
        })
        .collect();
    assert_eq!(
        methods,
        vec![ResolutionMethod::Probability, ResolutionMethod::DiscreteRoll]
    );
}

#[test]
fn test_goal_aligned_action_is_significant() {
    let ledger = CharacterLedger::new().with_goal("Smithing");
    let request = ActionRequest::new(Domain::Craft).with_tag("smithing").unwrap();
    let sig = classify(&request, ledger.declared_goals());
    assert_eq!(sig.tier, SignificanceTier::Significant);
}

#[test]
fn test_insight_only_from_failure() {
    let (session, clock, _) = session_with_sink();
    let id = session.add_character(CharacterLedger::new()).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(21);

    for round in 0..40 {
        let request = ActionRequest::new(Domain::Spirit)
            .with_tag(&format!("Prayer {}", round % 7))
            .unwrap()
            .with_risk(RiskLevel::High);
        let report = session.resolve_and_apply(id, &request, &mut rng).unwrap();
        clock.advance(100);
        if report.outcome.success {
            assert_eq!(report.growth.insight_points, 0);
        } else {
            assert!(report.growth.insight_points > 0);
        }
    }
}

#[test]
fn test_naturals_override_totals() {
    let roll = DiscreteRoll::evaluate(20, Domain::Body, 0, vec![], 40);
    assert!(roll.success);
    assert_eq!(roll.margin, -20);
    let roll = DiscreteRoll::evaluate(1, Domain::Body, 30, vec![], 5);
    assert!(!roll.success);
}

#[test]
fn test_grinding_through_session() {
    let (session, clock, _) = session_with_sink();
    let id = session.add_character(CharacterLedger::new()).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(12);
    let request = ActionRequest::new(Domain::Body)
        .with_tag("Athletics")
        .unwrap()
        .with_kind(ActionKind::PhysicalChallenge);

    let mut occurrences = Vec::new();
    for _ in 0..5 {
        let report = session.resolve_and_apply(id, &request, &mut rng).unwrap();
        occurrences.push(report.growth.grind_factor.is_reduced());
        clock.advance(30);
    }
    assert_eq!(occurrences, vec![false, false, false, true, true]);

    // A different tag is a different action
    let other = ActionRequest::new(Domain::Body)
        .with_tag("Brawling")
        .unwrap()
        .with_kind(ActionKind::PhysicalChallenge);
    let report = session.resolve_and_apply(id, &other, &mut rng).unwrap();
    assert!(!report.growth.grind_factor.is_reduced());
}

#[test]
fn test_unknown_character_errors() {
    let (session, _, _) = session_with_sink();
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    assert!(matches!(
        session.resolve_and_apply(CharacterId::new(), &ActionRequest::new(Domain::Mind), &mut rng),
        Err(ProgressionError::UnknownCharacter(_))
    ));
    assert!(matches!(
        session.get_mastery_options(CharacterId::new(), Domain::Mind),
        Err(ProgressionError::UnknownCharacter(_))
    ));
}

#[test]
fn test_domain_growth_saturates_at_fifty() {
    let (session, _, _) = session_with_sink();
    let id = session
        .add_character(CharacterLedger::new().with_domain(Domain::Authority, 49).unwrap())
        .unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let request = ActionRequest::new(Domain::Authority)
        .high_stakes()
        .with_significance_override("Legendary");
    session.resolve_and_apply(id, &request, &mut rng).unwrap();

    let ledger = session.ledger_snapshot(id).unwrap();
    assert_eq!(ledger.domain_value(Domain::Authority).unwrap(), 50);
    assert_eq!(ledger.domain_tier(Domain::Authority).unwrap(), DomainTier::Legendary);
}

#[test]
fn test_tag_learned_on_first_use() {
    let (session, _, sink) = session_with_sink();
    let id = session.add_character(CharacterLedger::new()).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(30);
    let request = ActionRequest::new(Domain::Craft)
        .with_tag("Glassblowing")
        .unwrap()
        .with_significance_override("Major");

    let report = session.resolve_and_apply(id, &request, &mut rng).unwrap();
    let ledger = session.ledger_snapshot(id).unwrap();
    let tag = ledger.tag(&TagName::new("glassblowing").unwrap()).unwrap();
    assert_eq!(tag.experience, report.growth.tag_experience as u64);
    // 10 experience reaches rank 1
    if tag.experience >= 10 {
        assert!(sink
            .events()
            .iter()
            .any(|e| matches!(e, ProgressionEvent::TagRankUp { .. })));
    }
}

#[test]
fn test_mastery_unlock_and_activate_are_distinct() {
    let (session, _, sink) = session_with_sink();
    let ledger = CharacterLedger::new()
        .with_domain(Domain::Awareness, 30)
        .unwrap()
        .with_goal("Track the beast to its lair")
        .with_goal("Follow the vision");
    let id = session.add_character(ledger).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(17);

    session
        .resolve_and_apply(id, &ActionRequest::new(Domain::Awareness), &mut rng)
        .unwrap();

    let names: Vec<String> = session
        .get_mastery_options(id, Domain::Awareness)
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert!(names.contains(&"Pathfinder".to_string()));
    assert!(names.contains(&"Seer".to_string()));

    session.unlock_mastery_path(id, "Pathfinder").unwrap();
    session.unlock_mastery_path(id, "Seer").unwrap();
    let options = session.get_mastery_options(id, Domain::Awareness).unwrap();
    assert!(options.iter().all(|p| p.unlocked && !p.active));

    session.activate_mastery_path(id, "Pathfinder").unwrap();
    session.activate_mastery_path(id, "Seer").unwrap();
    let ledger = session.ledger_snapshot(id).unwrap();
    assert_eq!(ledger.active_path(Domain::Awareness).unwrap().name, "Seer");
    assert_eq!(
        ledger.mastery_paths_for(Domain::Awareness).filter(|p| p.active).count(),
        1
    );

    assert!(sink.events().iter().any(|e| matches!(
        e,
        ProgressionEvent::MasteryPathActivated { replaced: Some(old), .. } if old == "Pathfinder"
    )));
}

#[test]
fn test_spend_insight_checks_balance() {
    let (session, _, _) = session_with_sink();
    let id = session
        .add_character(CharacterLedger::new().with_insight(6))
        .unwrap();
    assert_eq!(session.spend_insight(id, 4).unwrap(), 2);
    assert!(matches!(
        session.spend_insight(id, 3),
        Err(ProgressionError::InsufficientInsight {
            requested: 3,
            available: 2
        })
    ));
    assert_eq!(session.ledger_snapshot(id).unwrap().insight_points(), 2);
}

#[test]
fn test_ledger_survives_json_round_trip() {
    let (session, _, _) = session_with_sink();
    let ledger = CharacterLedger::new()
        .with_domain(Domain::Mind, 12)
        .unwrap()
        .with_tag("History", 2)
        .unwrap()
        .with_goal("Uncover the lost history of the empire");
    let id = session.add_character(ledger).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(40);
    session
        .resolve_and_apply(
            id,
            &ActionRequest::new(Domain::Mind).with_tag("History").unwrap(),
            &mut rng,
        )
        .unwrap();

    let saved = session.ledger_snapshot(id).unwrap();
    let json = serde_json::to_string(&saved).unwrap();
    let restored: CharacterLedger = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, saved);

    let removed = session.remove(id).unwrap();
    assert_eq!(removed, saved);
    assert!(matches!(
        session.ledger_snapshot(id),
        Err(ProgressionError::UnknownCharacter(_))
    ));
}
