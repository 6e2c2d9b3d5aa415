//! Character storage seam

use std::sync::{Arc, Mutex};

use crate::character::CharacterLedger;
use crate::core::error::Result;
use crate::core::types::CharacterId;
use crate::growth::GrindHistory;

/// Live state of one character: the ledger plus its repetition history
#[derive(Debug, Clone, Default)]
pub struct CharacterSlot {
    pub(crate) ledger: CharacterLedger,
    pub(crate) grind: GrindHistory,
}

impl CharacterSlot {
    pub fn new(ledger: CharacterLedger) -> Self {
        Self {
            ledger,
            grind: GrindHistory::new(),
        }
    }

    pub fn ledger(&self) -> &CharacterLedger {
        &self.ledger
    }

    pub fn grind_history(&self) -> &GrindHistory {
        &self.grind
    }
}

/// Shared handle; the mutex is the single writer for that character
pub type SharedSlot = Arc<Mutex<CharacterSlot>>;

/// Resolves a character id to its one live slot
pub trait CharacterRepository: Send + Sync {
    fn slot(&self, id: CharacterId) -> Result<SharedSlot>;

    /// Add a character; fails if the id is taken
    fn insert(&self, id: CharacterId, ledger: CharacterLedger) -> Result<()>;

    /// Take a character out, returning its final ledger
    fn remove(&self, id: CharacterId) -> Result<CharacterLedger>;

    /// Every registered id, sorted; errors if the registry lock is poisoned
    fn ids(&self) -> Result<Vec<CharacterId>>;

    fn contains(&self, id: CharacterId) -> bool {
        self.slot(id).is_ok()
    }
}
