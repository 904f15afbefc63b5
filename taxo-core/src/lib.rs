//! Shared foundation for the taxonomy consolidation engine.
//!
//! Typed identifiers, fast collection aliases, per-subsystem error enums,
//! and TOML-based configuration. No algorithmic logic lives here.

pub mod config;
pub mod errors;
pub mod types;
