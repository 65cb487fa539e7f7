#![forbid(unsafe_code)]

//! Test fixtures for the rectveil engine.
//!
//! [`determinism`] centralizes seed selection so test runs are reproducible
//! by default and overridable from the environment. [`host`] provides
//! [`host::ScriptedHost`], an installer double that drives the engine's
//! declarative tables the way a real host binding would.

pub mod determinism;
pub mod host;

pub use determinism::SeedFixture;
pub use host::ScriptedHost;
