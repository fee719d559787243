//! Message Catalogs and Pluralization for Numerus
//!
//! Resolves user-visible strings against per-locale message catalogs:
//!
//! - **Catalogs**: Per-locale message tables keyed by context, source text
//!   and disambiguating comment
//! - **Fallback**: Region to language to default locale, with the source
//!   text as the last resort
//! - **Pluralization**: CLDR-style plural categories mapped to catalog forms
//! - **Placeholders**: `%1`..`%99` and `%n` substitution
//! - **Active Locale**: Switched atomically at runtime
//!
//! Resolution never fails: every degraded outcome is recovered locally and
//! reported as a [`Recovery`].
//!
//! # Quick Start
//!
//! ```rust
//! use numerus_i18n::{CatalogRecord, Locale, Message, Translator};
//!
//! let translator = Translator::builder()
//!     .with_default_locale(Locale::en())
//!     .load_records(&Locale::en(), vec![
//!         CatalogRecord::plural("FolderModel", "%n file(s)", ["%n file", "%n files"]),
//!     ])
//!     .load_records(&Locale::ru(), vec![
//!         CatalogRecord::plural("FolderModel", "%n file(s)", ["%n файл", "%n файла", "%n файлов"]),
//!     ])
//!     .build();
//!
//! let msg = Message::new("FolderModel", "%n file(s)").count(5);
//! assert_eq!(translator.translate(&msg), "5 files");
//!
//! translator.set_active_locale(Locale::parse("ru_RU").unwrap());
//! assert_eq!(translator.translate(&msg), "5 файлов");
//! ```
//!
//! # Loading Catalogs
//!
//! ```rust,no_run
//! use numerus_i18n::{Translator, TranslatorBuilder, TranslatorConfig};
//!
//! let config = TranslatorConfig::from_env()?;
//! let translator = TranslatorBuilder::from_config(&config)?.build();
//!
//! // Or explicitly
//! let translator = Translator::builder().load_dir("lang/")?.build();
//! # Ok::<(), numerus_i18n::I18nError>(())
//! ```

mod catalog;
mod config;
mod error;
mod locale;
pub mod placeholder;
mod plural;
mod source;
mod translator;

pub use catalog::{CatalogStore, LoadReport, LocaleCatalog, MessageEntry, MessageKey, MessageState};
pub use config::{ConfigFormat, TranslatorConfig};
pub use error::{I18nError, Recovery};
pub use locale::{FallbackChain, Locale, best_match, negotiate_locale, system_locale};
pub use placeholder::{Placeholder, Signature};
pub use plural::{PluralCategory, PluralRuleTable, PluralRules, plural_category};
pub use source::{CatalogFile, CatalogRecord, load_dir};
pub use translator::{ContextTranslator, Message, Resolution, Translator, TranslatorBuilder};

/// Result type for catalog loading and configuration
pub type Result<T> = std::result::Result<T, I18nError>;

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        CatalogRecord, I18nError, Locale, Message, MessageState, PluralCategory, Recovery,
        Resolution, Result, Translator, TranslatorBuilder, TranslatorConfig, negotiate_locale,
        plural_category,
    };
}
