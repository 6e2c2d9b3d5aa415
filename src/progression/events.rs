//! Progression events and sinks
//!
//! The engine only emits events; storing or displaying them is the job of
//! whatever sink the session was built with.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::character::{Domain, DomainTier, TagName};
use crate::core::types::CharacterId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressionEvent {
    DomainTierAdvanced {
        character: CharacterId,
        domain: Domain,
        from: DomainTier,
        to: DomainTier,
        value: u32,
    },
    TagRankUp {
        character: CharacterId,
        tag: TagName,
        from: u32,
        to: u32,
    },
    MasteryPathEligible {
        character: CharacterId,
        domain: Domain,
        path: String,
    },
    MasteryPathUnlocked {
        character: CharacterId,
        domain: Domain,
        path: String,
    },
    MasteryPathActivated {
        character: CharacterId,
        domain: Domain,
        path: String,
        replaced: Option<String>,
    },
    MasteryPathDeactivated {
        character: CharacterId,
        domain: Domain,
        path: String,
    },
}

impl ProgressionEvent {
    pub fn character(&self) -> CharacterId {
        match self {
            ProgressionEvent::DomainTierAdvanced { character, .. }
            | ProgressionEvent::TagRankUp { character, .. }
            | ProgressionEvent::MasteryPathEligible { character, .. }
            | ProgressionEvent::MasteryPathUnlocked { character, .. }
            | ProgressionEvent::MasteryPathActivated { character, .. }
            | ProgressionEvent::MasteryPathDeactivated { character, .. } => *character,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ProgressionEvent::DomainTierAdvanced {
                domain, from, to, value, ..
            } => format!("{} advanced from {} to {} ({})", domain, from, to, value),
            ProgressionEvent::TagRankUp { tag, from, to, .. } => {
                format!("{} rank {} -> {}", tag, from, to)
            }
            ProgressionEvent::MasteryPathEligible { domain, path, .. } => {
                format!("{} mastery path '{}' is now available", domain, path)
            }
            ProgressionEvent::MasteryPathUnlocked { path, .. } => {
                format!("Mastery path '{}' unlocked", path)
            }
            ProgressionEvent::MasteryPathActivated { path, replaced, .. } => match replaced {
                Some(old) => format!("Mastery path '{}' activated, replacing '{}'", path, old),
                None => format!("Mastery path '{}' activated", path),
            },
            ProgressionEvent::MasteryPathDeactivated { path, .. } => {
                format!("Mastery path '{}' deactivated", path)
            }
        }
    }
}

/// Receiver for emitted events
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &ProgressionEvent);
}

/// Logs every event at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: &ProgressionEvent) {
        tracing::info!(character = %event.character(), "{}", event.describe());
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<ProgressionEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything received so far
    pub fn events(&self) -> Vec<ProgressionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: &ProgressionEvent) {
        let mut events = self
            .events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        events.push(event.clone());
    }
}
