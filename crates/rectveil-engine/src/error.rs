#![forbid(unsafe_code)]

//! Engine error model.
//!
//! Every fallible engine path returns [`Result`]; nothing in the engine
//! panics for well-formed finite input. The taxonomy is deliberately small:
//! a missing randomness source, a failed policy accessor, and a write
//! against a read-only rectangle.

use std::fmt;

/// Failure of a policy accessor for a single read or write.
///
/// Scoped to the one access that triggered it; cache state for other
/// entries is unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyError {
    /// Setting the accessor was asked for.
    pub setting: &'static str,
    /// Accessor-supplied detail.
    pub detail: String,
}

impl PolicyError {
    /// Create a policy error for the named setting.
    pub fn new(setting: &'static str, detail: impl Into<String>) -> Self {
        Self {
            setting,
            detail: detail.into(),
        }
    }
}

/// Errors surfaced by the spoofing engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// No randomness source was injected before the first fake was needed.
    /// The call fails; the engine never degrades to returning unfaked
    /// geometry.
    RandomSupplyMissing,
    /// A policy accessor failed for this read or write.
    Policy(PolicyError),
    /// A write accessor was invoked on a read-only rectangle.
    ReadOnlyWrite {
        /// Property the write targeted.
        property: &'static str,
    },
}

/// Standard result type for engine APIs.
pub type Result<T> = std::result::Result<T, EngineError>;

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "policy accessor failed for {:?}: {}", self.setting, self.detail)
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RandomSupplyMissing => {
                write!(f, "random supply not configured before first fake")
            }
            Self::Policy(err) => err.fmt(f),
            Self::ReadOnlyWrite { property } => {
                write!(f, "write to {property:?} on a read-only rectangle")
            }
        }
    }
}

impl std::error::Error for PolicyError {}

impl std::error::Error for EngineError {}

impl From<PolicyError> for EngineError {
    fn from(err: PolicyError) -> Self {
        Self::Policy(err)
    }
}
