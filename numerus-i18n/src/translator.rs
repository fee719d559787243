//! Message Resolution
//!
//! [`Translator`] resolves a message key against a locale's fallback chain,
//! picks the plural form, substitutes placeholders and always returns a
//! displayable string. Anything that goes wrong along the way is recovered
//! locally and reported as a [`Recovery`].

use crate::placeholder;
use crate::source::{self, CatalogFile};
use crate::{
    CatalogRecord, CatalogStore, FallbackChain, I18nError, Locale, LoadReport, MessageEntry,
    MessageKey, MessageState, PluralRuleTable, Recovery, Result, TranslatorConfig,
};
use numerus_log::{debug, info, trace};
use parking_lot::RwLock;
use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// A message request: key, optional plural count and positional arguments.
///
/// ```
/// use numerus_i18n::Message;
///
/// let msg = Message::new("MainWindow", "%1 (%2)").arg("Alice").arg("alice@example.com");
/// assert_eq!(msg.key().context(), "MainWindow");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    key: MessageKey,
    count: Option<u64>,
    args: Vec<String>,
}

impl Message {
    pub fn new(context: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            key: MessageKey::new(context, source_text),
            count: None,
            args: Vec::new(),
        }
    }

    /// Set the disambiguating comment.
    pub fn disambiguator(mut self, disambiguator: impl Into<String>) -> Self {
        self.key = self.key.with_disambiguator(disambiguator);
        self
    }

    /// Set the plural count, also substituted for `%n`.
    pub fn count(mut self, n: u64) -> Self {
        self.count = Some(n);
        self
    }

    /// Append the next positional argument.
    pub fn arg(mut self, value: impl ToString) -> Self {
        self.args.push(value.to_string());
        self
    }

    /// Append several positional arguments.
    pub fn args<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.args.extend(values.into_iter().map(|v| v.to_string()));
        self
    }

    pub fn key(&self) -> &MessageKey {
        &self.key
    }
}

/// A resolved string and how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The display string
    pub text: String,
    /// Locale whose catalog supplied the text; `None` for the source text
    pub origin: Option<Locale>,
    /// State of the entry used, if any
    pub state: Option<MessageState>,
    /// Degradations applied, in the order they happened
    pub recoveries: Vec<Recovery>,
}

impl Resolution {
    /// Whether a catalog entry was used instead of the source text.
    pub fn from_catalog(&self) -> bool {
        self.origin.is_some()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Active locale together with its fallback chain.
#[derive(Debug)]
struct Selection {
    locale: Locale,
    chain: FallbackChain,
}

struct Shared {
    store: CatalogStore,
    plurals: PluralRuleTable,
    chains: HashMap<Locale, FallbackChain>,
    default_locale: Locale,
    show_unfinished: bool,
}

/// Thread-safe message resolver.
///
/// Catalogs are immutable once built; clones share them. The active locale
/// is a snapshot swapped atomically, so a resolution in flight during a
/// switch sees either the old or the new locale.
///
/// # Example
///
/// ```
/// use numerus_i18n::{CatalogRecord, Locale, Translator};
///
/// let translator = Translator::builder()
///     .with_default_locale(Locale::en())
///     .load_records(&Locale::ru(), vec![
///         CatalogRecord::plural("FolderModel", "%n file(s)", ["%n файл", "%n файла", "%n файлов"]),
///     ])
///     .build();
///
/// let ru = Locale::ru();
/// assert_eq!(translator.resolve(&ru, "FolderModel", "%n file(s)", None, Some(21), &[] as &[&str]), "21 файл");
/// assert_eq!(translator.resolve(&ru, "FolderModel", "%n file(s)", None, Some(3), &[] as &[&str]), "3 файла");
/// assert_eq!(translator.resolve(&ru, "FolderModel", "%n file(s)", None, Some(11), &[] as &[&str]), "11 файлов");
/// ```
#[derive(Clone)]
pub struct Translator {
    shared: Arc<Shared>,
    active: Arc<RwLock<Arc<Selection>>>,
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("default_locale", &self.shared.default_locale)
            .field("active_locale", &self.active.read().locale)
            .field("locales", &self.shared.store.len())
            .finish_non_exhaustive()
    }
}

impl Translator {
    /// Start building a translator.
    pub fn builder() -> TranslatorBuilder {
        TranslatorBuilder::new()
    }

    /// Locale of the source texts.
    pub fn default_locale(&self) -> &Locale {
        &self.shared.default_locale
    }

    /// Whether unfinished translations are displayed.
    pub fn shows_unfinished(&self) -> bool {
        self.shared.show_unfinished
    }

    pub fn store(&self) -> &CatalogStore {
        &self.shared.store
    }

    pub fn plural_rules(&self) -> &PluralRuleTable {
        &self.shared.plurals
    }

    /// Every loaded locale plus the default locale.
    pub fn supported_locales(&self) -> BTreeSet<Locale> {
        self.shared
            .store
            .locales()
            .cloned()
            .chain(std::iter::once(self.shared.default_locale.clone()))
            .collect()
    }

    /// Fallback chain for a locale; precomputed for supported locales.
    pub fn fallback_chain(&self, locale: &Locale) -> Cow<'_, FallbackChain> {
        match self.shared.chains.get(locale) {
            Some(chain) => Cow::Borrowed(chain),
            None => Cow::Owned(FallbackChain::new(locale, &self.shared.default_locale)),
        }
    }

    // ------------------------------------------------------------------------
    // Active locale
    // ------------------------------------------------------------------------

    /// The active locale.
    pub fn active_locale(&self) -> Locale {
        self.active.read().locale.clone()
    }

    /// Publish a new active locale and return the previous one.
    pub fn set_active_locale(&self, locale: Locale) -> Locale {
        let chain = self.fallback_chain(&locale).into_owned();
        let next = Arc::new(Selection {
            locale: locale.clone(),
            chain,
        });

        let previous = std::mem::replace(&mut *self.active.write(), next);
        info!(
            target: "numerus::translator",
            "Active locale changed from {} to {}",
            previous.locale,
            locale
        );
        previous.locale.clone()
    }

    fn selection(&self) -> Arc<Selection> {
        Arc::clone(&*self.active.read())
    }

    // ------------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------------

    /// Resolve a message to a display string. Never fails.
    pub fn resolve<S: AsRef<str>>(
        &self,
        locale: &Locale,
        context: &str,
        source_text: &str,
        disambiguator: Option<&str>,
        count: Option<u64>,
        args: &[S],
    ) -> String {
        let mut key = MessageKey::new(context, source_text);
        if let Some(disambiguator) = disambiguator {
            key = key.with_disambiguator(disambiguator);
        }
        let chain = self.fallback_chain(locale);
        self.resolve_in_chain(&chain, &key, count, args).text
    }

    /// Resolve a message and report where the text came from.
    pub fn resolve_message(&self, locale: &Locale, message: &Message) -> Resolution {
        let chain = self.fallback_chain(locale);
        self.resolve_in_chain(&chain, &message.key, message.count, &message.args)
    }

    /// Resolve a message against the active locale.
    pub fn translate(&self, message: &Message) -> String {
        let selection = self.selection();
        self.resolve_in_chain(&selection.chain, &message.key, message.count, &message.args)
            .text
    }

    /// Qt-style helpers bound to one context and the active locale.
    pub fn context<'a>(&'a self, name: &'a str) -> ContextTranslator<'a> {
        ContextTranslator {
            translator: self,
            context: name,
        }
    }

    /// Whether the locale's own catalog can display the key.
    pub fn is_translated(&self, locale: &Locale, key: &MessageKey) -> bool {
        self.find_in_locale(locale, key).is_some()
    }

    fn is_displayable(&self, entry: &MessageEntry) -> bool {
        match entry.state() {
            MessageState::Final => true,
            MessageState::Unfinished => self.shared.show_unfinished,
            MessageState::Vanished | MessageState::Obsolete => false,
        }
    }

    /// Displayable entry for the exact key, else for the key without its
    /// disambiguator.
    fn find_in_locale(&self, locale: &Locale, key: &MessageKey) -> Option<&MessageEntry> {
        let store = &self.shared.store;
        let displayable = |entry: &&MessageEntry| {
            let shown = self.is_displayable(entry);
            if !shown {
                trace!(
                    target: "numerus::translator",
                    "Skipping {} translation of {} in {}",
                    entry.state(),
                    key,
                    locale
                );
            }
            shown
        };

        store.lookup(locale, key).filter(&displayable).or_else(|| {
            key.without_disambiguator()
                .and_then(|bare| store.lookup(locale, &bare))
                .filter(&displayable)
        })
    }

    fn resolve_in_chain<S: AsRef<str>>(
        &self,
        chain: &FallbackChain,
        key: &MessageKey,
        count: Option<u64>,
        args: &[S],
    ) -> Resolution {
        let mut recoveries = Vec::new();
        let requested = chain.primary();

        if requested.language != self.shared.default_locale.language
            && !self.has_catalog_for_language(chain, &requested.language)
        {
            recoveries.push(Recovery::UnknownLocale {
                requested: requested.clone(),
            });
        }

        let found = chain
            .iter()
            .find_map(|locale| self.find_in_locale(locale, key).map(|entry| (locale, entry)));

        let (template, origin, state) = match found {
            Some((locale, entry)) => {
                let template = self.select_variant(locale, entry, key, count, &mut recoveries);
                (template, Some(locale.clone()), Some(entry.state()))
            }
            None => {
                recoveries.push(Recovery::MissingTranslation {
                    locale: requested.clone(),
                });
                (key.source_text(), None, None)
            }
        };

        let substituted = placeholder::substitute(template, count, args);
        recoveries.extend(
            substituted
                .unmatched
                .into_iter()
                .map(|placeholder| Recovery::PlaceholderMismatch { placeholder }),
        );

        for recovery in &recoveries {
            match recovery {
                Recovery::MissingTranslation { .. } => {
                    trace!(target: "numerus::translator", "{}: {}", key, recovery);
                }
                _ => {
                    debug!(target: "numerus::translator", "{}: {}", key, recovery);
                }
            }
        }

        Resolution {
            text: substituted.text,
            origin,
            state,
            recoveries,
        }
    }

    /// Whether any link of the given language has a catalog.
    fn has_catalog_for_language(&self, chain: &FallbackChain, language: &str) -> bool {
        chain
            .iter()
            .any(|l| l.language == language && self.shared.store.contains_locale(l))
    }

    fn select_variant<'e>(
        &self,
        locale: &Locale,
        entry: &'e MessageEntry,
        key: &'e MessageKey,
        count: Option<u64>,
        recoveries: &mut Vec<Recovery>,
    ) -> &'e str {
        let variants = entry.variants();

        let index = match count {
            Some(n) if variants.len() > 1 => self.shared.plurals.category_index(locale, n),
            _ => 0,
        };

        match variants.get(index).or_else(|| variants.last()) {
            Some(variant) => {
                if index >= variants.len() {
                    recoveries.push(Recovery::PluralCategoryOutOfRange {
                        index,
                        available: variants.len(),
                    });
                }
                variant.as_str()
            }
            None => key.source_text(),
        }
    }
}

/// Translator bound to one context, resolving against the active locale.
///
/// ```
/// use numerus_i18n::{CatalogRecord, Locale, Translator};
///
/// let translator = Translator::builder()
///     .load_records(&Locale::de(), vec![
///         CatalogRecord::plural("FolderModel", "%n peer(s)", ["%n Peer", "%n Peers"]),
///     ])
///     .with_active_locale(Locale::de_de())
///     .build();
///
/// let tr = translator.context("FolderModel");
/// assert_eq!(tr.tr_n("%n peer(s)", 1), "1 Peer");
/// assert_eq!(tr.tr_n("%n peer(s)", 0), "0 Peers");
/// assert_eq!(tr.tr("Name"), "Name");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ContextTranslator<'a> {
    translator: &'a Translator,
    context: &'a str,
}

impl ContextTranslator<'_> {
    pub fn context(&self) -> &str {
        self.context
    }

    /// Translate a plain message.
    pub fn tr(&self, source_text: &str) -> String {
        self.translator.translate(&Message::new(self.context, source_text))
    }

    /// Translate a message with a disambiguating comment.
    pub fn tr_disambiguated(&self, source_text: &str, disambiguator: &str) -> String {
        self.translator
            .translate(&Message::new(self.context, source_text).disambiguator(disambiguator))
    }

    /// Translate a plural message.
    pub fn tr_n(&self, source_text: &str, n: u64) -> String {
        self.translator
            .translate(&Message::new(self.context, source_text).count(n))
    }

    /// Translate a message with positional arguments.
    pub fn tr_args<S: AsRef<str>>(&self, source_text: &str, args: &[S]) -> String {
        let selection = self.translator.selection();
        let key = MessageKey::new(self.context, source_text);
        self.translator
            .resolve_in_chain(&selection.chain, &key, None, args)
            .text
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Collects catalogs and settings, then builds an immutable [`Translator`].
#[derive(Debug)]
pub struct TranslatorBuilder {
    store: CatalogStore,
    default_locale: Locale,
    active_locale: Option<Locale>,
    show_unfinished: bool,
}

impl Default for TranslatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslatorBuilder {
    pub fn new() -> Self {
        Self {
            store: CatalogStore::new(),
            default_locale: Locale::en(),
            active_locale: None,
            show_unfinished: false,
        }
    }

    /// Apply a configuration, loading its catalog directory if set.
    pub fn from_config(config: &TranslatorConfig) -> Result<Self> {
        let mut builder = Self::new()
            .with_default_locale(config.default_locale.clone())
            .show_unfinished(config.show_unfinished);
        builder.active_locale = config.active_locale.clone();

        match config.catalog_dir {
            Some(ref dir) => builder.load_dir(dir),
            None => Ok(builder),
        }
    }

    /// Locale of the source texts.
    pub fn with_default_locale(mut self, locale: Locale) -> Self {
        self.default_locale = locale;
        self
    }

    /// Locale active after building; defaults to the default locale.
    pub fn with_active_locale(mut self, locale: Locale) -> Self {
        self.active_locale = Some(locale);
        self
    }

    /// Allow unfinished translations to be displayed.
    pub fn show_unfinished(mut self, show: bool) -> Self {
        self.show_unfinished = show;
        self
    }

    /// Add records for a locale.
    pub fn load_records<I>(mut self, locale: &Locale, records: I) -> Self
    where
        I: IntoIterator<Item = CatalogRecord>,
    {
        self.store.load(locale, records);
        self
    }

    /// Add records and return the load report.
    pub fn load_records_with_report<I>(&mut self, locale: &Locale, records: I) -> LoadReport
    where
        I: IntoIterator<Item = CatalogRecord>,
    {
        self.store.load(locale, records)
    }

    /// Add a JSON catalog; it must declare its `language`.
    pub fn load_json(mut self, json: &str) -> Result<Self> {
        let file = CatalogFile::from_json(json)?;
        let locale = file.language.ok_or_else(|| {
            I18nError::ParseError("Catalog does not declare its language".to_string())
        })?;
        self.store.load(&locale, file.messages);
        Ok(self)
    }

    /// Add a JSON catalog file.
    pub fn load_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        let (locale, file) = CatalogFile::load(path)?;
        self.store.load(&locale, file.messages);
        Ok(self)
    }

    /// Add every JSON catalog of a directory.
    pub fn load_dir(mut self, dir: impl AsRef<Path>) -> Result<Self> {
        for (locale, file) in source::load_dir(dir)? {
            self.store.load(&locale, file.messages);
        }
        Ok(self)
    }

    /// Freeze the catalogs and precompute fallback chains.
    pub fn build(self) -> Translator {
        let default_locale = self.default_locale;

        let chains: HashMap<Locale, FallbackChain> = self
            .store
            .locales()
            .chain(std::iter::once(&default_locale))
            .map(|locale| (locale.clone(), FallbackChain::new(locale, &default_locale)))
            .collect();

        let active_locale = self
            .active_locale
            .unwrap_or_else(|| default_locale.clone());
        let active_chain = chains
            .get(&active_locale)
            .cloned()
            .unwrap_or_else(|| FallbackChain::new(&active_locale, &default_locale));

        info!(
            target: "numerus::translator",
            "Translator ready: {} locales, {} messages, default {}, active {}",
            self.store.len(),
            self.store.message_count(),
            default_locale,
            active_locale
        );

        Translator {
            shared: Arc::new(Shared {
                store: self.store,
                plurals: PluralRuleTable::new(default_locale.clone()),
                chains,
                default_locale,
                show_unfinished: self.show_unfinished,
            }),
            active: Arc::new(RwLock::new(Arc::new(Selection {
                locale: active_locale,
                chain: active_chain,
            }))),
        }
    }
}
