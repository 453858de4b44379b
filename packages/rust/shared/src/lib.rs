//! Shared types, error model, and configuration for component-relations.
//!
//! This crate is the foundation depended on by all other component-relations crates.
//! It provides:
//! - [`RelationsError`]: the unified error type
//! - Domain types ([`Component`], [`UsageIndex`])
//! - Configuration ([`RelationsConfig`], [`OutputConfig`], [`ConfigOverrides`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    CONFIG_FILE_NAME, ConfigOverrides, OutputConfig, RelationsConfig, init_config, load_config,
    load_config_from,
};
pub use error::{RelationsError, Result};
pub use types::{Component, UsageIndex};
