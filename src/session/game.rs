//! Game session
//!
//! Owns every live character and runs the full pipeline for one action:
//! resolve, classify, check repetition, calculate, commit. The commit for a
//! character happens under that character's mutex, so two actions on the
//! same character never interleave while different characters proceed in
//! parallel.

use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ahash::AHashMap;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::character::{CharacterLedger, Domain, MasteryPath};
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::ProgressionConfig;
use crate::core::error::{ProgressionError, Result};
use crate::core::types::CharacterId;
use crate::growth::{calculate_growth, classify, ActionSignature, GrowthResult};
use crate::progression::{apply_growth, mastery, EventSink, ProgressionEvent, TracingEventSink};
use crate::resolution::{ActionRequest, ActionResolver, CharacterAwareResolver, ResolutionOutcome};
use crate::session::repository::{CharacterRepository, CharacterSlot, SharedSlot};

/// Everything one action produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionReport {
    pub outcome: ResolutionOutcome,
    pub growth: GrowthResult,
    pub events: Vec<ProgressionEvent>,
}

pub struct GameSession {
    config: ProgressionConfig,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn EventSink>,
    characters: RwLock<AHashMap<CharacterId, SharedSlot>>,
}

impl GameSession {
    /// Session with the wall clock and tracing event output
    pub fn new(config: ProgressionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            clock: Arc::new(SystemClock),
            sink: Arc::new(TracingEventSink),
            characters: RwLock::new(AHashMap::new()),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    // === CHARACTERS ===

    pub fn register(&self, id: CharacterId, ledger: CharacterLedger) -> Result<()> {
        self.insert(id, ledger)
    }

    /// Register under a fresh id
    pub fn add_character(&self, ledger: CharacterLedger) -> Result<CharacterId> {
        let id = CharacterId::new();
        self.insert(id, ledger)?;
        Ok(id)
    }

    /// Consistent copy of a character's ledger
    pub fn ledger_snapshot(&self, id: CharacterId) -> Result<CharacterLedger> {
        let slot = self.slot(id)?;
        let guard = lock_slot(&slot, id);
        Ok(guard.ledger.clone())
    }

    pub fn declare_goal(&self, id: CharacterId, goal: &str) -> Result<()> {
        let slot = self.slot(id)?;
        let mut guard = lock_slot(&slot, id);
        guard.ledger.declare_goal(goal);
        Ok(())
    }

    // === ACTIONS ===

    /// Resolve one action and commit its rewards
    ///
    /// On error nothing about the character changes: neither the ledger nor
    /// the repetition history.
    pub fn resolve_and_apply(
        &self,
        id: CharacterId,
        request: &ActionRequest,
        rng: &mut dyn RngCore,
    ) -> Result<ActionReport> {
        let slot = self.slot(id)?;
        let mut guard = lock_slot(&slot, id);
        let state = &mut *guard;
        let now = self.clock.now();

        let outcome =
            CharacterAwareResolver::new(&self.config, &state.ledger).resolve(request, rng)?;
        let significance = classify(request, state.ledger.declared_goals());
        let signature = ActionSignature::from_request(request);
        let grind = state.grind.factor(&signature, now, &self.config);
        let momentum = state.ledger.momentum(request.domain);

        let growth = calculate_growth(
            &self.config,
            request,
            &outcome,
            &significance,
            momentum,
            grind,
            rng,
        );

        let events = apply_growth(&self.config, &mut state.ledger, id, &outcome, &growth)?;
        state.grind.record(signature, now, &self.config);
        drop(guard);

        tracing::debug!(
            character = %id,
            domain = %request.domain,
            success = outcome.success,
            growth = growth.growth_points,
            insight = growth.insight_points,
            "Action committed"
        );
        self.emit_all(&events);

        Ok(ActionReport {
            outcome,
            growth,
            events,
        })
    }

    pub fn spend_insight(&self, id: CharacterId, amount: u32) -> Result<u32> {
        let slot = self.slot(id)?;
        let mut guard = lock_slot(&slot, id);
        guard.ledger.spend_insight(amount)
    }

    // === MASTERY ===

    pub fn get_mastery_options(&self, id: CharacterId, domain: Domain) -> Result<Vec<MasteryPath>> {
        let slot = self.slot(id)?;
        let guard = lock_slot(&slot, id);
        Ok(mastery::mastery_options(&guard.ledger, domain))
    }

    pub fn unlock_mastery_path(&self, id: CharacterId, path: &str) -> Result<()> {
        self.mastery_change(id, |ledger| mastery::unlock(ledger, path, id))
    }

    pub fn activate_mastery_path(&self, id: CharacterId, path: &str) -> Result<()> {
        self.mastery_change(id, |ledger| mastery::activate(ledger, path, id))
    }

    pub fn deactivate_mastery_path(&self, id: CharacterId, path: &str) -> Result<()> {
        self.mastery_change(id, |ledger| mastery::deactivate(ledger, path, id))
    }

    fn mastery_change<F>(&self, id: CharacterId, change: F) -> Result<()>
    where
        F: FnOnce(&mut CharacterLedger) -> Result<Option<ProgressionEvent>>,
    {
        let slot = self.slot(id)?;
        let event = {
            let mut guard = lock_slot(&slot, id);
            change(&mut guard.ledger)?
        };
        if let Some(event) = event {
            self.sink.emit(&event);
        }
        Ok(())
    }

    fn read_registry(&self) -> Result<RwLockReadGuard<'_, AHashMap<CharacterId, SharedSlot>>> {
        self.characters
            .read()
            .map_err(|_| ProgressionError::LockPoisoned(REGISTRY))
    }

    fn write_registry(&self) -> Result<RwLockWriteGuard<'_, AHashMap<CharacterId, SharedSlot>>> {
        self.characters
            .write()
            .map_err(|_| ProgressionError::LockPoisoned(REGISTRY))
    }

    fn emit_all(&self, events: &[ProgressionEvent]) {
        for event in events {
            self.sink.emit(event);
        }
    }
}

/// Lock one character, recovering from a panic in an earlier holder
///
/// Every commit swaps in a fully staged ledger, so a poisoned slot still
/// holds the last committed state.
fn lock_slot(slot: &SharedSlot, id: CharacterId) -> MutexGuard<'_, CharacterSlot> {
    slot.lock().unwrap_or_else(|poisoned| {
        tracing::warn!(character = %id, "Recovering character state after a panic");
        slot.clear_poison();
        poisoned.into_inner()
    })
}

const REGISTRY: &str = "character registry";

impl CharacterRepository for GameSession {
    fn slot(&self, id: CharacterId) -> Result<SharedSlot> {
        let characters = self.read_registry()?;
        characters
            .get(&id)
            .cloned()
            .ok_or(ProgressionError::UnknownCharacter(id))
    }

    fn insert(&self, id: CharacterId, ledger: CharacterLedger) -> Result<()> {
        let mut characters = self.write_registry()?;
        if characters.contains_key(&id) {
            return Err(ProgressionError::DuplicateCharacter(id));
        }
        characters.insert(id, Arc::new(Mutex::new(CharacterSlot::new(ledger))));
        tracing::debug!(character = %id, "Character registered");
        Ok(())
    }

    fn remove(&self, id: CharacterId) -> Result<CharacterLedger> {
        let slot = {
            let mut characters = self.write_registry()?;
            characters
                .remove(&id)
                .ok_or(ProgressionError::UnknownCharacter(id))?
        };
        let guard = lock_slot(&slot, id);
        Ok(guard.ledger.clone())
    }

    fn ids(&self) -> Result<Vec<CharacterId>> {
        let mut ids: Vec<CharacterId> = self.read_registry()?.keys().copied().collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::progression::RecordingEventSink;
    use crate::resolution::{ActionKind, RiskLevel};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn session() -> (GameSession, Arc<ManualClock>, Arc<RecordingEventSink>) {
        let clock = Arc::new(ManualClock::new(1_000));
        let sink = Arc::new(RecordingEventSink::new());
        let session = GameSession::new(ProgressionConfig::default())
            .unwrap()
            .with_clock(clock.clone())
            .with_event_sink(sink.clone());
        (session, clock, sink)
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let (session, _, _) = session();
        let id = CharacterId::new();
        session.register(id, CharacterLedger::new()).unwrap();
        assert!(matches!(
            session.register(id, CharacterLedger::new()),
            Err(ProgressionError::DuplicateCharacter(_))
        ));
        assert_eq!(session.ids().unwrap(), vec![id]);
    }

    #[test]
    fn test_unknown_character() {
        let (session, _, _) = session();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = session.resolve_and_apply(
            CharacterId::new(),
            &ActionRequest::new(Domain::Body),
            &mut rng,
        );
        assert!(matches!(result, Err(ProgressionError::UnknownCharacter(_))));
    }

    #[test]
    fn test_resolve_and_apply_commits_growth() {
        let (session, _, _) = session();
        let id = session
            .add_character(CharacterLedger::new().with_domain(Domain::Body, 4).unwrap())
            .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let request = ActionRequest::new(Domain::Body)
            .with_tag("Swordsmanship")
            .unwrap()
            .with_kind(ActionKind::CombatAttack)
            .with_risk(RiskLevel::Medium);
        let report = session.resolve_and_apply(id, &request, &mut rng).unwrap();

        let ledger = session.ledger_snapshot(id).unwrap();
        assert_eq!(
            ledger.domain_value(Domain::Body).unwrap(),
            4 + report.growth.growth_points
        );
        assert_eq!(ledger.insight_points(), report.growth.insight_points);
        let tag = crate::character::TagName::new("swordsmanship").unwrap();
        assert_eq!(
            ledger.tag(&tag).map_or(0, |t| t.experience),
            report.growth.tag_experience as u64
        );
    }

    #[test]
    fn test_fourth_repeat_is_reduced_until_window_passes() {
        let (session, clock, _) = session();
        let id = session.add_character(CharacterLedger::new()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let request = ActionRequest::new(Domain::Craft).with_tag("Smithing").unwrap();

        for _ in 0..3 {
            let report = session.resolve_and_apply(id, &request, &mut rng).unwrap();
            assert!(!report.growth.grind_factor.is_reduced());
        }
        let fourth = session.resolve_and_apply(id, &request, &mut rng).unwrap();
        assert_eq!(fourth.growth.grind_factor.occurrence, 4);
        assert!(fourth.growth.grind_factor.is_reduced());

        clock.advance(300);
        let later = session.resolve_and_apply(id, &request, &mut rng).unwrap();
        assert!(!later.growth.grind_factor.is_reduced());
    }

    #[test]
    fn test_failed_action_changes_nothing() {
        let (session, _, _) = session();
        // A stored ledger that lost its Mind entry
        let ledger: CharacterLedger =
            serde_json::from_str(r#"{"domains":{"Body":3},"insight_points":2}"#).unwrap();
        let id = session.add_character(ledger).unwrap();
        let before = session.ledger_snapshot(id).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let result = session.resolve_and_apply(id, &ActionRequest::new(Domain::Mind), &mut rng);
        assert!(matches!(result, Err(ProgressionError::UnknownDomain(_))));
        assert!(matches!(
            session.spend_insight(id, 5),
            Err(ProgressionError::InsufficientInsight { .. })
        ));
        assert_eq!(session.ledger_snapshot(id).unwrap(), before);

        let slot = session.slot(id).unwrap();
        assert!(slot.lock().unwrap().grind_history().is_empty());
        session
            .resolve_and_apply(id, &ActionRequest::new(Domain::Body), &mut rng)
            .unwrap();
        assert_eq!(slot.lock().unwrap().grind_history().len(), 1);
    }

    #[test]
    fn test_extreme_difficulty_resolves() {
        let (session, _, _) = session();
        let id = session.add_character(CharacterLedger::new()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        for raw in [
            r#"{"domain":"Body","difficulty":-2147483648}"#,
            r#"{"domain":"Body","difficulty":2147483647}"#,
        ] {
            let request: ActionRequest = serde_json::from_str(raw).unwrap();
            let report = session.resolve_and_apply(id, &request, &mut rng).unwrap();
            assert!(report.outcome.margin().is_some());
        }
        assert_eq!(session.ids().unwrap(), vec![id]);
    }

    #[test]
    fn test_panicked_holder_does_not_lock_out_character() {
        let (session, _, _) = session();
        let ledger = CharacterLedger::new().with_domain(Domain::Mind, 6).unwrap();
        let id = session.add_character(ledger.clone()).unwrap();

        let slot = session.slot(id).unwrap();
        let holder = Arc::clone(&slot);
        let crashed = std::thread::spawn(move || {
            let _guard = holder.lock().unwrap();
            panic!("holder crashed mid-action");
        })
        .join();
        assert!(crashed.is_err());
        assert!(slot.is_poisoned());

        assert_eq!(session.ledger_snapshot(id).unwrap(), ledger);
        assert!(!slot.is_poisoned());
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        session
            .resolve_and_apply(id, &ActionRequest::new(Domain::Mind), &mut rng)
            .unwrap();
        assert_eq!(slot.lock().unwrap().grind_history().len(), 1);
    }

    #[test]
    fn test_poisoned_registry_is_an_error_not_an_empty_list() {
        let (session, _, _) = session();
        session.add_character(CharacterLedger::new()).unwrap();

        let crashed = std::thread::scope(|scope| {
            scope
                .spawn(|| {
                    let _registry = session.characters.write().unwrap();
                    panic!("registry writer crashed");
                })
                .join()
        });
        assert!(crashed.is_err());
        assert!(matches!(session.ids(), Err(ProgressionError::LockPoisoned(_))));
        assert!(matches!(
            session.add_character(CharacterLedger::new()),
            Err(ProgressionError::LockPoisoned(_))
        ));
    }

    #[test]
    fn test_mastery_flow_emits_events() {
        let (session, _, sink) = session();
        let ledger = CharacterLedger::new()
            .with_domain(Domain::Spirit, 17)
            .unwrap()
            .with_goal("keep my oath to the order");
        let id = session.add_character(ledger).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        // Major grows at least 7 even on failure, lifting Spirit to Expert
        let request = ActionRequest::new(Domain::Spirit).with_significance_override("Major");
        session.resolve_and_apply(id, &request, &mut rng).unwrap();

        let options = session.get_mastery_options(id, Domain::Spirit).unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].name, "Oathkeeper");

        assert!(matches!(
            session.activate_mastery_path(id, "Oathkeeper"),
            Err(ProgressionError::MasteryPathLocked(_))
        ));
        session.unlock_mastery_path(id, "Oathkeeper").unwrap();
        session.activate_mastery_path(id, "Oathkeeper").unwrap();
        session.deactivate_mastery_path(id, "Oathkeeper").unwrap();

        let events = sink.events();
        assert!(events
            .iter()
            .any(|e| matches!(e, ProgressionEvent::MasteryPathEligible { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, ProgressionEvent::MasteryPathActivated { .. })));
        assert!(matches!(
            events.last(),
            Some(ProgressionEvent::MasteryPathDeactivated { .. })
        ));
    }

    #[test]
    fn test_remove_returns_final_ledger() {
        let (session, _, _) = session();
        let ledger = CharacterLedger::new().with_insight(4);
        let id = session.add_character(ledger.clone()).unwrap();
        assert_eq!(session.remove(id).unwrap(), ledger);
        assert!(!session.contains(id));
    }
}
