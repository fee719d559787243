//! Catalog Sources
//!
//! Catalog records arrive as an abstract sequence: context, source text,
//! optional disambiguating comment, translated variants and a state tag.
//! This module defines that record and a JSON interchange file holding one
//! locale's records.
//!
//! ```json
//! {
//!   "language": "ru",
//!   "messages": [
//!     { "context": "FolderModel", "source": "%n file(s)",
//!       "translations": ["%n файл", "%n файла", "%n файлов"] },
//!     { "context": "Settings", "source": "Status",
//!       "translations": ["Состояние"], "state": "unfinished" }
//!   ]
//! }
//! ```

use crate::{I18nError, Locale, MessageKey, MessageState, Result};
use numerus_log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One message of a locale's catalog, as delivered by a catalog source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Logical group, usually the dialog or model asking for the string
    pub context: String,
    /// Original-language text
    pub source: String,
    /// Disambiguating comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Translated variants; more than one for plural forms
    #[serde(default)]
    pub translations: Vec<String>,
    /// Translation state
    #[serde(default)]
    pub state: MessageState,
}

impl CatalogRecord {
    /// A finished, non-plural translation.
    pub fn new(
        context: impl Into<String>,
        source: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        Self {
            context: context.into(),
            source: source.into(),
            comment: None,
            translations: vec![translation.into()],
            state: MessageState::Final,
        }
    }

    /// A finished translation with one variant per plural form.
    pub fn plural<I, S>(context: impl Into<String>, source: impl Into<String>, forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            context: context.into(),
            source: source.into(),
            comment: None,
            translations: forms.into_iter().map(Into::into).collect(),
            state: MessageState::Final,
        }
    }

    /// Set the disambiguating comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set the translation state.
    pub fn with_state(mut self, state: MessageState) -> Self {
        self.state = state;
        self
    }

    /// The lookup key of this record.
    pub fn key(&self) -> MessageKey {
        let key = MessageKey::new(self.context.clone(), self.source.clone());
        match self.comment {
            Some(ref comment) => key.with_disambiguator(comment.clone()),
            None => key,
        }
    }
}

/// A JSON catalog file: one locale's records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Locale the translations are written in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Locale>,
    /// The records, in catalog order
    #[serde(default)]
    pub messages: Vec<CatalogRecord>,
}

impl CatalogFile {
    /// Parse a catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the catalog as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a catalog file.
    ///
    /// The locale is the declared `language`, or else the one encoded in
    /// the file name (`ru.json`, `librevault_ru.json`, `app_pt_BR.json`).
    pub fn load(path: impl AsRef<Path>) -> Result<(Locale, Self)> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let file = Self::from_json(&content)?;

        let locale = match file.language {
            Some(ref language) => language.clone(),
            None => locale_from_path(path)?,
        };

        debug!(
            target: "numerus::source",
            "Read {} records for {} from {}",
            file.messages.len(),
            locale,
            path.display()
        );
        Ok((locale, file))
    }
}

/// Infer a locale from a catalog file name.
///
/// The locale is the trailing part of the stem: the last `_`-separated
/// segment, or the last two when the final one is written as a region or
/// script subtag (`pt_BR`, `zh_Hans`).
fn locale_from_path(path: &Path) -> Result<Locale> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| I18nError::ParseError(format!("Invalid file name: {}", path.display())))?;

    let mut suffixes = stem.rmatch_indices('_').map(|(pos, _)| &stem[pos + 1..]);
    let last = suffixes.next().unwrap_or(stem);
    let last_two = if is_subtag_spelling(last) {
        Some(suffixes.next().unwrap_or(stem))
    } else {
        None
    };

    last_two
        .and_then(|tag| Locale::parse(tag).ok())
        .or_else(|| Locale::parse(last).ok())
        .ok_or_else(|| {
            I18nError::ParseError(format!(
                "Cannot infer a locale from file name: {}",
                path.display()
            ))
        })
}

/// Whether a file-name segment is spelled like a region (`BR`, `419`) or a
/// script (`Hans`) rather than a language.
fn is_subtag_spelling(segment: &str) -> bool {
    let region = (segment.len() == 2 && segment.bytes().all(|b| b.is_ascii_uppercase()))
        || (segment.len() == 3 && segment.bytes().all(|b| b.is_ascii_digit()));
    let script = segment.len() == 4
        && segment.starts_with(|c: char| c.is_ascii_uppercase())
        && segment[1..].bytes().all(|b| b.is_ascii_lowercase());
    region || script
}

/// Read every `*.json` catalog in a directory, ordered by file name.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<Vec<(Locale, CatalogFile)>> {
    let dir = dir.as_ref();

    if !dir.is_dir() {
        return Err(I18nError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Catalog directory not found: {}", dir.display()),
        )));
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    paths.iter().map(CatalogFile::load).collect()
}
