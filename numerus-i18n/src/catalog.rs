//! Catalog Store
//!
//! Per-locale message tables. The store is filled once while a translator
//! is being built and is read-only afterwards; lookups are exact-match
//! reads with no fallback, which is the translator's job.

use crate::placeholder::{self, Signature};
use crate::{CatalogRecord, Locale};
use numerus_log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

/// Identity of a message within one locale's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageKey {
    context: String,
    source_text: String,
    disambiguator: Option<String>,
}

impl MessageKey {
    /// A key without a disambiguator.
    pub fn new(context: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            source_text: source_text.into(),
            disambiguator: None,
        }
    }

    /// Set the disambiguator. An empty one is the same as none.
    pub fn with_disambiguator(mut self, disambiguator: impl Into<String>) -> Self {
        let disambiguator = disambiguator.into();
        self.disambiguator = (!disambiguator.is_empty()).then_some(disambiguator);
        self
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn disambiguator(&self) -> Option<&str> {
        self.disambiguator.as_deref()
    }

    /// The same key with the disambiguator dropped, if it had one.
    pub fn without_disambiguator(&self) -> Option<Self> {
        self.disambiguator.as_ref()?;
        Some(Self::new(self.context.clone(), self.source_text.clone()))
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{:?}", self.context, self.source_text)?;
        if let Some(ref disambiguator) = self.disambiguator {
            write!(f, " ({})", disambiguator)?;
        }
        Ok(())
    }
}

/// Translation state of a catalog entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageState {
    /// Approved; safe to display
    #[default]
    #[serde(alias = "finished")]
    Final,
    /// Not yet approved by a translator
    Unfinished,
    /// Source text no longer exists in the application
    Vanished,
    /// Kept for history only
    Obsolete,
}

impl MessageState {
    /// Whether entries in this state are kept in memory at all.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Final | Self::Unfinished)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Final => "final",
            Self::Unfinished => "unfinished",
            Self::Vanished => "vanished",
            Self::Obsolete => "obsolete",
        }
    }
}

impl fmt::Display for MessageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A translated message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntry {
    variants: Vec<String>,
    state: MessageState,
    signature: Signature,
}

impl MessageEntry {
    /// Create an entry; placeholder usage is read from the source text.
    pub fn new(source_text: &str, variants: Vec<String>, state: MessageState) -> Self {
        Self {
            variants,
            state,
            signature: placeholder::signature(source_text),
        }
    }

    /// Variants in plural-form order.
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    pub fn state(&self) -> MessageState {
        self.state
    }

    /// Highest positional placeholder (`%1`, `%2`, ...) of the source text.
    pub fn argument_arity(&self) -> usize {
        self.signature.arity
    }

    /// Whether the source text contains `%n`.
    pub fn uses_count(&self) -> bool {
        self.signature.uses_count
    }

    /// Whether the entry carries plural forms.
    pub fn is_plural(&self) -> bool {
        self.variants.len() > 1
    }

    /// Whether every variant has text.
    pub fn is_complete(&self) -> bool {
        !self.variants.is_empty() && self.variants.iter().all(|v| !v.is_empty())
    }
}

/// Outcome of loading records into a catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// New keys stored
    pub inserted: usize,
    /// Existing keys overwritten by a later record
    pub replaced: usize,
    /// Vanished or obsolete records dropped
    pub discarded_inactive: usize,
    /// Records dropped for missing or empty variants
    pub discarded_empty: usize,
}

impl LoadReport {
    /// Records that ended up in the catalog.
    pub fn accepted(&self) -> usize {
        self.inserted + self.replaced
    }

    /// Records that were dropped.
    pub fn discarded(&self) -> usize {
        self.discarded_inactive + self.discarded_empty
    }
}

/// Messages of a single locale.
#[derive(Debug, Clone, Default)]
pub struct LocaleCatalog {
    entries: HashMap<MessageKey, MessageEntry>,
}

impl LocaleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for an exact key.
    pub fn get(&self, key: &MessageKey) -> Option<&MessageEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &MessageKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MessageKey, &MessageEntry)> {
        self.entries.iter()
    }
}

/// All loaded catalogs, keyed by locale.
///
/// # Example
///
/// ```
/// use numerus_i18n::{CatalogRecord, CatalogStore, Locale, MessageKey, MessageState};
///
/// let mut store = CatalogStore::new();
/// let report = store.load(&Locale::de(), vec![
///     CatalogRecord::new("FolderModel", "Name", "Name"),
///     CatalogRecord::new("FolderModel", "Peers", "Teilnehmer"),
///     CatalogRecord::new("Byte size", "%1 KB", "%1 KB").with_state(MessageState::Vanished),
/// ]);
///
/// assert_eq!(report.inserted, 2);
/// assert_eq!(report.discarded_inactive, 1);
///
/// let key = MessageKey::new("FolderModel", "Peers");
/// assert_eq!(store.lookup(&Locale::de(), &key).unwrap().variants(), ["Teilnehmer"]);
/// assert!(store.lookup(&Locale::de_de(), &key).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    catalogs: HashMap<Locale, LocaleCatalog>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-insert records for a locale.
    ///
    /// Later records win over earlier ones with the same key. Vanished,
    /// obsolete and incomplete records are dropped. Loading a locale a
    /// second time merges into its existing catalog.
    pub fn load<I>(&mut self, locale: &Locale, records: I) -> LoadReport
    where
        I: IntoIterator<Item = CatalogRecord>,
    {
        let catalog = self.catalogs.entry(locale.clone()).or_default();
        let mut report = LoadReport::default();

        for record in records {
            let key = record.key();

            if !record.state.is_live() {
                trace!(
                    target: "numerus::catalog",
                    "Discarding {} record {} for {}",
                    record.state,
                    key,
                    locale
                );
                report.discarded_inactive += 1;
                continue;
            }

            let entry = MessageEntry::new(&record.source, record.translations, record.state);
            if !entry.is_complete() {
                trace!(
                    target: "numerus::catalog",
                    "Discarding incomplete record {} for {}",
                    key,
                    locale
                );
                report.discarded_empty += 1;
                continue;
            }

            match catalog.entries.entry(key) {
                Entry::Occupied(mut slot) => {
                    debug!(
                        target: "numerus::catalog",
                        "Duplicate record {} for {}, keeping the later one",
                        slot.key(),
                        locale
                    );
                    slot.insert(entry);
                    report.replaced += 1;
                }
                Entry::Vacant(slot) => {
                    slot.insert(entry);
                    report.inserted += 1;
                }
            }
        }

        info!(
            target: "numerus::catalog",
            "Loaded {} messages for {} ({} replaced, {} discarded)",
            report.accepted(),
            locale,
            report.replaced,
            report.discarded()
        );
        report
    }

    /// Exact-match lookup in one locale.
    pub fn lookup(&self, locale: &Locale, key: &MessageKey) -> Option<&MessageEntry> {
        self.catalogs.get(locale)?.get(key)
    }

    /// The catalog of a locale.
    pub fn catalog(&self, locale: &Locale) -> Option<&LocaleCatalog> {
        self.catalogs.get(locale)
    }

    pub fn contains_locale(&self, locale: &Locale) -> bool {
        self.catalogs.contains_key(locale)
    }

    /// Locales that have a catalog, in no particular order.
    pub fn locales(&self) -> impl Iterator<Item = &Locale> {
        self.catalogs.keys()
    }

    /// Number of locales.
    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }

    /// Number of messages across all locales.
    pub fn message_count(&self) -> usize {
        self.catalogs.values().map(LocaleCatalog::len).sum()
    }
}
