//! Character progression state
//!
//! A character's competence is tracked on two scales: seven broad domains
//! with integer values, and any number of narrower named tags that rank up
//! with accumulated experience.

pub mod domain;
pub mod ledger;
pub mod tags;

pub use domain::{Domain, DomainTier};
pub use ledger::{normalize_goal, CharacterLedger, MasteryPath, MAX_DOMAIN_VALUE};
pub use tags::{experience_for_rank, Tag, TagAdvance, TagName, MAX_TAG_RANK};
