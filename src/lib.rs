// Numerus - message-catalog resolution and pluralization for Rust
//
// This library resolves user-visible strings against per-locale catalogs,
// with locale fallback, CLDR plural forms and positional placeholders.

// Re-export the engine
pub use numerus_i18n::*;

// Re-export logging
pub use numerus_log as log;

/// Build a translator from the environment (`NUMERUS_*`, `LC_ALL`,
/// `LC_MESSAGES`, `LANG`), initialising logging first.
pub fn from_env() -> Result<Translator> {
    numerus_log::init();
    let config = TranslatorConfig::from_env()?;
    Ok(TranslatorBuilder::from_config(&config)?.build())
}

// Prelude for common imports
pub mod prelude {
    pub use numerus_i18n::prelude::*;
    pub use numerus_log::{debug, error, info, trace, warn};
}
