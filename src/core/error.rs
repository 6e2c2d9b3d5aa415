use thiserror::Error;

use crate::core::types::CharacterId;

#[derive(Error, Debug)]
pub enum ProgressionError {
    #[error("Unknown character: {0}")]
    UnknownCharacter(CharacterId),

    #[error("Character already registered: {0}")]
    DuplicateCharacter(CharacterId),

    #[error("Unknown domain: {0}")]
    UnknownDomain(String),

    #[error("Domain value {value} out of range for {domain} (max {max})")]
    DomainValueOutOfRange {
        domain: String,
        value: u32,
        max: u32,
    },

    #[error("Invalid tag name: {0:?}")]
    InvalidTagName(String),

    #[error("Tag rank {rank} out of range for {tag} (max {max})")]
    TagRankOutOfRange { tag: String, rank: u32, max: u32 },

    #[error("Unrecognized significance override: {0:?}")]
    InvalidSignificanceOverride(String),

    #[error("Modifier {name} = {value} outside [{min}, {max}]")]
    OutOfRangeModifier {
        name: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("Insufficient insight: requested {requested}, available {available}")]
    InsufficientInsight { requested: u32, available: u32 },

    #[error("Unknown mastery path: {0}")]
    UnknownMasteryPath(String),

    #[error("Mastery path {0} has not been unlocked")]
    MasteryPathLocked(String),

    #[error("Mastery path {0} is not eligible for this character")]
    MasteryPathNotEligible(String),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProgressionError>;
