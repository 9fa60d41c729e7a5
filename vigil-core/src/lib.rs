//! Vigil Core - Domain model and session state for the OSINT console
//!
//! This crate provides the foundational primitives:
//! - Passive value types for alerts and targets
//! - The session store (single source of truth with change notifications)
//! - Clock abstraction for `HH:MM` stamping
//! - Seed data loaded at session start
//! - JSON export with slugged filenames

pub mod alert;
pub mod clock;
pub mod export;
pub mod seed;
pub mod store;
pub mod target;

pub use alert::*;
pub use clock::*;
pub use export::*;
pub use seed::*;
pub use store::*;
pub use target::*;

/// Prefix of synthesized target identifiers
pub const TARGET_ID_PREFIX: &str = "TGT-";

/// Minimum digit width of the target sequence number
pub const TARGET_ID_WIDTH: usize = 3;

/// Capacity of the store's change notification channel
pub const STORE_EVENT_CAPACITY: usize = 64;
