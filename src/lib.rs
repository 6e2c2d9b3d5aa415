//! Unified Progression - action resolution and character growth for tabletop-style RPGs

pub mod character;
pub mod core;
pub mod growth;
pub mod progression;
pub mod resolution;
pub mod session;
