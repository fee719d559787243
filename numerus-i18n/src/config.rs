//! Translator Configuration
//!
//! Settings are read from environment variables or from a JSON/TOML file:
//!
//! ```toml
//! default_locale = "en"
//! active_locale = "ru-RU"
//! show_unfinished = false
//! catalog_dir = "lang"
//! ```
//!
//! Environment variables:
//!
//! - `NUMERUS_DEFAULT_LOCALE` - locale the source texts are written in
//! - `NUMERUS_LOCALE` - active locale; otherwise `LC_ALL`, `LC_MESSAGES`, `LANG`
//! - `NUMERUS_SHOW_UNFINISHED=1` - display unapproved translations
//! - `NUMERUS_CATALOG_DIR` - directory of JSON catalogs to load

use crate::locale::system_locale_from;
use crate::{I18nError, Locale, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Settings for building a [`Translator`](crate::Translator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Locale of the source texts; always last in every fallback chain
    pub default_locale: Locale,
    /// Locale active after startup; the default locale when unset
    pub active_locale: Option<Locale>,
    /// Whether unfinished translations may be displayed
    pub show_unfinished: bool,
    /// Directory of JSON catalogs loaded at startup
    pub catalog_dir: Option<PathBuf>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            default_locale: Locale::en(),
            active_locale: None,
            show_unfinished: false,
            catalog_dir: None,
        }
    }
}

impl TranslatorConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    ///
    /// An explicitly set locale variable that does not parse is an error;
    /// unusable POSIX locale variables are skipped.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(tag) = lookup("NUMERUS_DEFAULT_LOCALE") {
            config.default_locale = Locale::parse(&tag)?;
        }

        config.active_locale = match lookup("NUMERUS_LOCALE") {
            Some(tag) => Some(Locale::parse(&tag)?),
            None => system_locale_from(&lookup),
        };

        if let Some(flag) = lookup("NUMERUS_SHOW_UNFINISHED") {
            config.show_unfinished = parse_flag(&flag)?;
        }

        if let Some(dir) = lookup("NUMERUS_CATALOG_DIR") {
            if !dir.trim().is_empty() {
                config.catalog_dir = Some(PathBuf::from(dir));
            }
        }

        Ok(config)
    }

    /// Parse TOML settings.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse JSON settings.
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read settings from a file, choosing the format by extension.
    ///
    /// A relative `catalog_dir` is resolved against the file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| I18nError::ConfigError(format!("No file extension: {}", path.display())))?;
        let format = ConfigFormat::from_extension(ext)
            .ok_or_else(|| I18nError::ConfigError(format!("Unsupported format: {}", ext)))?;

        let content = fs::read_to_string(path)?;
        let mut config = match format {
            ConfigFormat::Json => Self::from_json_str(&content)?,
            ConfigFormat::Toml => Self::from_toml_str(&content)?,
        };

        if let (Some(dir), Some(base)) = (config.catalog_dir.as_ref(), path.parent()) {
            if dir.is_relative() {
                config.catalog_dir = Some(base.join(dir));
            }
        }

        Ok(config)
    }

    /// The active locale, or the default locale when none is set.
    pub fn effective_locale(&self) -> &Locale {
        self.active_locale.as_ref().unwrap_or(&self.default_locale)
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(I18nError::ConfigError(format!(
            "Expected a boolean, got {:?}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = TranslatorConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, TranslatorConfig::default());
        assert_eq!(config.effective_locale(), &Locale::en());
    }

    #[test]
    fn test_env_overrides() {
        let config = TranslatorConfig::from_lookup(lookup_from(&[
            ("NUMERUS_DEFAULT_LOCALE", "en_US"),
            ("NUMERUS_LOCALE", "ru-RU"),
            ("NUMERUS_SHOW_UNFINISHED", "yes"),
            ("NUMERUS_CATALOG_DIR", "/usr/share/librevault/lang"),
        ]))
        .unwrap();

        assert_eq!(config.default_locale, Locale::en_us());
        assert_eq!(config.active_locale, Some(Locale::ru_ru()));
        assert!(config.show_unfinished);
        assert_eq!(
            config.catalog_dir,
            Some(PathBuf::from("/usr/share/librevault/lang"))
        );
    }

    #[test]
    fn test_env_system_locale() {
        let config = TranslatorConfig::from_lookup(lookup_from(&[
            ("LC_ALL", "C"),
            ("LANG", "de_DE.UTF-8"),
        ]))
        .unwrap();
        assert_eq!(config.active_locale, Some(Locale::de_de()));
    }

    #[test]
    fn test_env_invalid_values() {
        let bad_locale = TranslatorConfig::from_lookup(lookup_from(&[("NUMERUS_LOCALE", "?")]));
        assert!(matches!(bad_locale, Err(I18nError::InvalidLocale(_))));

        let bad_flag =
            TranslatorConfig::from_lookup(lookup_from(&[("NUMERUS_SHOW_UNFINISHED", "maybe")]));
        assert!(matches!(bad_flag, Err(I18nError::ConfigError(_))));
    }

    #[test]
    fn test_from_toml() {
        let config = TranslatorConfig::from_toml_str(
            r#"
            default_locale = "en"
            active_locale = "ru"
            show_unfinished = true
        "#,
        )
        .unwrap();

        assert_eq!(config.active_locale, Some(Locale::ru()));
        assert!(config.show_unfinished);
        assert_eq!(config.catalog_dir, None);
    }

    #[test]
    fn test_from_json_partial() {
        let config = TranslatorConfig::from_json_str(r#"{"active_locale": "de-DE"}"#).unwrap();
        assert_eq!(config.default_locale, Locale::en());
        assert_eq!(config.effective_locale(), &Locale::de_de());
    }

    #[test]
    fn test_from_file_resolves_catalog_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("numerus.toml");
        fs::write(&path, "catalog_dir = \"lang\"\n").unwrap();

        let config = TranslatorConfig::from_file(&path).unwrap();
        assert_eq!(config.catalog_dir, Some(dir.path().join("lang")));
    }

    #[test]
    fn test_from_file_unsupported_format() {
        let result = TranslatorConfig::from_file("numerus.yaml");
        assert!(matches!(result, Err(I18nError::ConfigError(_))));
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ConfigFormat::from_extension("json"), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_extension("TOML"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("ini"), None);
    }
}
