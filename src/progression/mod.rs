//! Committing rewards to a character
//!
//! The applier writes growth into the ledger and reports what changed. The
//! mastery registry opens specializations once a domain reaches Expert.

pub mod applier;
pub mod events;
pub mod mastery;

pub use applier::apply_growth;
pub use events::{EventSink, ProgressionEvent, RecordingEventSink, TracingEventSink};
pub use mastery::{
    definitions_for, eligible_paths, find_definition, MasteryCandidate, MasteryPathDefinition,
    MASTERY_CATALOG,
};
