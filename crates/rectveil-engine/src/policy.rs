#![forbid(unsafe_code)]

//! Policy accessors and the activation resolver.
//!
//! Every fake/no-fake decision goes through a [`PolicyAccessor`] injected
//! by the installer; the engine hard-codes nothing. The accessor is
//! fallible: a broken settings store fails the single read or write that
//! consulted it and nothing else.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::ContextId;
use crate::error::Result;

/// Setting name reported when the activation lookup fails.
pub const SETTING_PROTECT: &str = "protectDomRect";
/// Setting name reported when the alignment-factor lookup fails.
pub const SETTING_INTEGER_FACTOR: &str = "domRectIntegerFactor";

/// Per-call policy access.
pub trait PolicyAccessor: fmt::Debug {
    /// Whether spoofing applies at all for this context.
    fn active(&self, ctx: ContextId) -> Result<bool>;

    /// Scaling factor for the pixel-alignment check.
    ///
    /// A component where `value * factor` is an integer is pixel-aligned
    /// under the current scaling and passes through unperturbed.
    fn integer_factor(&self, ctx: ContextId) -> Result<f64>;
}

/// Effective settings for one context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySettings {
    /// Master switch for DOMRect protection.
    pub protect_dom_rect: bool,
    /// Pixel-alignment factor, usually the device pixel ratio.
    pub integer_factor: f64,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            protect_dom_rect: true,
            integer_factor: 1.0,
        }
    }
}

/// Map-backed policy store with per-context overrides.
///
/// Contexts without an override use the defaults. Lookups are infallible
/// for this store; the trait stays fallible for stores that are not.
#[derive(Debug, Clone, Default)]
pub struct SettingsPolicy {
    defaults: PolicySettings,
    overrides: FxHashMap<ContextId, PolicySettings>,
}

impl SettingsPolicy {
    /// Store with the given defaults and no overrides.
    pub fn new(defaults: PolicySettings) -> Self {
        Self {
            defaults,
            overrides: FxHashMap::default(),
        }
    }

    /// Builder-style per-context override.
    #[must_use]
    pub fn with_override(mut self, ctx: ContextId, settings: PolicySettings) -> Self {
        self.overrides.insert(ctx, settings);
        self
    }

    /// Install or replace a per-context override.
    pub fn set_override(&mut self, ctx: ContextId, settings: PolicySettings) {
        self.overrides.insert(ctx, settings);
    }

    /// Effective settings for a context.
    pub fn settings_for(&self, ctx: ContextId) -> PolicySettings {
        self.overrides.get(&ctx).copied().unwrap_or(self.defaults)
    }
}

impl PolicyAccessor for SettingsPolicy {
    fn active(&self, ctx: ContextId) -> Result<bool> {
        Ok(self.settings_for(ctx).protect_dom_rect)
    }

    fn integer_factor(&self, ctx: ContextId) -> Result<f64> {
        Ok(self.settings_for(ctx).integer_factor)
    }
}

/// Ambient activation status handed to the resolver by the installer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadoutStatus {
    /// Whether interception should be installed for this context.
    pub active: bool,
}

/// Resolve whether readout protection applies for `ctx`.
///
/// The installer calls this once per binding site before installing the
/// interception tables. The accessor's verdict replaces the ambient flag
/// outright, so an accessor that turns protection on wins even when the
/// ambient status arrived inactive.
pub fn readout_status(
    policy: &dyn PolicyAccessor,
    ctx: ContextId,
    ambient: ReadoutStatus,
) -> Result<ReadoutStatus> {
    let mut status = ambient;
    status.active = policy.active(ctx)?;
    Ok(status)
}
