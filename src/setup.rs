//! Process-wide setup
//!
//! Optional, one-shot configuration of translation defaults. The first
//! `setup` call wins; later calls are no-ops so independent libraries can
//! each call it defensively without clobbering the host application's
//! configuration.

use std::sync::OnceLock;

use crate::translate::TranslateOptions;

/// Process-wide configuration accepted by [`setup`]
#[derive(Debug, Clone, Default)]
pub struct SetupOptions {
    /// Defaults applied by [`crate::translate::to_model_schema`]
    pub default_translate_options: TranslateOptions,
}

static SETUP: OnceLock<SetupOptions> = OnceLock::new();

/// Install process-wide defaults. Idempotent: only the first call has any
/// effect. Returns whether this call performed the installation.
pub fn setup(options: SetupOptions) -> bool {
    let mut installed = false;
    SETUP.get_or_init(|| {
        installed = true;
        options
    });
    installed
}

/// Whether [`setup`] has already run
pub fn is_set_up() -> bool {
    SETUP.get().is_some()
}

/// The translation options used when a call site supplies none. Built-in
/// defaults apply until [`setup`] runs.
pub fn default_translate_options() -> TranslateOptions {
    SETUP
        .get()
        .map(|s| s.default_translate_options.clone())
        .unwrap_or_default()
}
