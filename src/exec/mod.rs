// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] provides the `ProcessBackend` trait and the production
//!   `RealProcessBackend`, which tests replace with a fake.
//! - [`process_runner`] owns a spawned child, forwards its output and exit
//!   as events, and stops it on request.
//! - [`signal`] sends the shutdown request itself.

pub mod backend;
pub mod process_runner;
pub mod signal;

pub use backend::{LaunchRequest, ProcessBackend, ProcessHandle, RealProcessBackend};
