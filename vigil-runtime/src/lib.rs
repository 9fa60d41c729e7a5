//! Vigil Runtime - the console shell
//!
//! Wires the shared session store, the search source and the feature
//! modules together:
//! - Module navigation and the new-target modal
//! - Search dispatch with last-request-wins sequencing
//! - Surveillance refresh tick
//! - TOML configuration

pub mod config;
pub mod console;

pub use config::*;
pub use console::*;

/// Default config file looked up by the binary
pub const DEFAULT_CONFIG_FILE: &str = "vigil.toml";
