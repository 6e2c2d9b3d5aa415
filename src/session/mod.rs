//! Session layer: character ownership and the per-action pipeline

pub mod game;
pub mod repository;

pub use game::{ActionReport, GameSession};
pub use repository::{CharacterRepository, CharacterSlot, SharedSlot};
