//! Error types for catalog loading and resolution

use crate::Locale;
use thiserror::Error;

/// Errors raised while building a translator: parsing locales, reading
/// catalogs and reading configuration.
///
/// Resolution itself never fails; see [`Recovery`].
#[derive(Debug, Error)]
pub enum I18nError {
    /// Invalid locale string
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    /// Catalog content could not be interpreted
    #[error("Failed to parse catalog: {0}")]
    ParseError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parse error
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Configuration value rejected
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid plural category name
    #[error("Invalid plural category: {0}")]
    InvalidPluralCategory(String),
}

/// A degraded outcome that resolution recovered from locally.
///
/// Every variant still produces a displayable string; recoveries are
/// reported on [`Resolution`](crate::Resolution) and logged, never
/// returned as errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Recovery {
    /// No displayable entry anywhere in the chain; the source text was used.
    #[error("no translation in the fallback chain of {locale}, using source text")]
    MissingTranslation { locale: Locale },

    /// Neither the locale nor its base language has a catalog.
    #[error("no catalog for {requested}, falling back to the default locale")]
    UnknownLocale { requested: Locale },

    /// The plural rule picked a form the entry does not have.
    #[error("plural form {index} requested but only {available} present, using the last")]
    PluralCategoryOutOfRange { index: usize, available: usize },

    /// A placeholder had no value to substitute and was left as written.
    #[error("placeholder {placeholder} left unsubstituted")]
    PlaceholderMismatch { placeholder: String },
}
