//! Lean-query plugin wiring
//!
//! Plugins are an explicit capability list supplied by the caller instead of
//! being probed from the environment. A schema generated with a plugin
//! enabled defaults the corresponding lean-query behavior on; every default
//! remains overridable per call.

/// The three lean-query plugins a generated schema may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginSet {
    pub lean_virtuals: bool,
    pub lean_defaults: bool,
    pub lean_getters: bool,
}

impl Default for PluginSet {
    fn default() -> Self {
        Self {
            lean_virtuals: true,
            lean_defaults: true,
            lean_getters: true,
        }
    }
}

impl PluginSet {
    /// A set with every plugin disabled
    pub fn none() -> Self {
        Self {
            lean_virtuals: false,
            lean_defaults: false,
            lean_getters: false,
        }
    }
}

/// Per-call overrides for lean-query behavior. Unset entries fall back to
/// the schema's plugin defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeanOptions {
    pub virtuals: Option<bool>,
    pub defaults: Option<bool>,
    pub getters: Option<bool>,
    /// Whether the version key appears in lean results. Suppressed by
    /// default.
    pub version_key: Option<bool>,
}

/// Fully resolved lean-query behavior for one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLean {
    pub virtuals: bool,
    pub defaults: bool,
    pub getters: bool,
    pub version_key: bool,
}

impl PluginSet {
    /// Resolve lean-query behavior: enabled plugins default on, the version
    /// key defaults off, explicit overrides always win.
    pub fn resolve_lean(&self, overrides: &LeanOptions) -> ResolvedLean {
        ResolvedLean {
            virtuals: overrides.virtuals.unwrap_or(self.lean_virtuals),
            defaults: overrides.defaults.unwrap_or(self.lean_defaults),
            getters: overrides.getters.unwrap_or(self.lean_getters),
            version_key: overrides.version_key.unwrap_or(false),
        }
    }
}
