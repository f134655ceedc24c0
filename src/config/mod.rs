// src/config/mod.rs

//! Configuration loading, defaults and validation.
//!
//! - [`model`] holds the serde types for `Sidecar.toml`.
//! - [`validate`] turns a [`RawConfigFile`] into a checked [`ConfigFile`].
//! - [`loader`] reads files and decides between explicit, default and
//!   built-in configuration.
//! - [`resolve`] derives the runtime settings (deployment mode, resources
//!   directory) from CLI flags, environment and config.

pub mod loader;
pub mod model;
pub mod resolve;
pub mod validate;

pub use loader::{load_and_validate, load_or_default};
pub use model::{BackendSection, ConfigFile, RawConfigFile, ShellSection};
pub use resolve::{resolve_mode, resolve_resources_dir, MODE_ENV_VAR};
