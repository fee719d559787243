//! Locale Identifiers and Fallback Chains
//!
//! Locales are parsed from BCP 47 tags (`zh-Hans-CN`) or POSIX names
//! (`ru_RU.UTF-8`). Each locale expands into an explicit [`FallbackChain`]
//! that the translator walks when a catalog lacks a message.

use crate::{I18nError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

/// A locale: language plus optional script and region.
///
/// # Examples
///
/// ```
/// use numerus_i18n::Locale;
///
/// let ru = Locale::parse("ru_RU.UTF-8").unwrap();
/// assert_eq!(ru.tag(), "ru-RU");
///
/// let zh = Locale::parse("zh-hans-cn").unwrap();
/// assert_eq!(zh.tag(), "zh-Hans-CN");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    /// Language code (ISO 639, e.g. "en", "ru")
    pub language: String,
    /// Optional script (ISO 15924, e.g. "Hans")
    pub script: Option<String>,
    /// Optional region (ISO 3166-1 or UN M.49, e.g. "US", "419")
    pub region: Option<String>,
}

impl Locale {
    /// Create a locale from a language and optional region.
    pub fn new(language: impl Into<String>, region: Option<impl Into<String>>) -> Self {
        Self {
            language: language.into().to_lowercase(),
            script: None,
            region: region.map(|r| r.into().to_uppercase()),
        }
    }

    /// Create a locale with a script.
    pub fn with_script(
        language: impl Into<String>,
        script: Option<impl Into<String>>,
        region: Option<impl Into<String>>,
    ) -> Self {
        Self {
            language: language.into().to_lowercase(),
            script: script.map(|s| title_case(&s.into())),
            region: region.map(|r| r.into().to_uppercase()),
        }
    }

    /// Parse a BCP 47 tag or a POSIX locale name.
    ///
    /// Encoding (`.UTF-8`) and modifier (`@euro`) suffixes are ignored.
    /// `C` and `POSIX` are rejected because they name no language.
    pub fn parse(tag: &str) -> Result<Self> {
        let name = tag
            .trim()
            .split(['.', '@'])
            .next()
            .unwrap_or_default();
        let mut parts = name.split(['-', '_']);

        let language = parts.next().unwrap_or_default().to_lowercase();
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(I18nError::InvalidLocale(tag.to_string()));
        }

        let mut script = None;
        let mut region = None;

        // Subtags must appear as script, then region, each at most once.
        for part in parts {
            let is_script = part.len() == 4 && part.chars().all(|c| c.is_ascii_alphabetic());
            let is_region = (part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()))
                || (part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()));

            if is_script && script.is_none() && region.is_none() {
                script = Some(title_case(part));
            } else if is_region && region.is_none() {
                region = Some(part.to_uppercase());
            } else {
                return Err(I18nError::InvalidLocale(tag.to_string()));
            }
        }

        Ok(Self {
            language,
            script,
            region,
        })
    }

    /// The normalised tag (e.g. "en-US", "zh-Hans-CN").
    pub fn tag(&self) -> String {
        let mut tag = self.language.clone();
        if let Some(ref script) = self.script {
            tag.push('-');
            tag.push_str(script);
        }
        if let Some(ref region) = self.region {
            tag.push('-');
            tag.push_str(region);
        }
        tag
    }

    /// The locale without its region, keeping the script.
    pub fn without_region(&self) -> Self {
        Self {
            language: self.language.clone(),
            script: self.script.clone(),
            region: None,
        }
    }

    /// The bare language.
    pub fn language_only(&self) -> Self {
        Self {
            language: self.language.clone(),
            script: None,
            region: None,
        }
    }

    /// Ordered fallback chain ending in `default`.
    pub fn fallback_chain(&self, default: &Locale) -> FallbackChain {
        FallbackChain::new(self, default)
    }

    /// Match score of `self` as a candidate for `requested` (higher is better).
    ///
    /// - 100: identical
    /// - 50: same language and region
    /// - 25: same language and script
    /// - 15: same language, candidate is the generic language locale
    /// - 10: same language only
    /// - 0: different language
    pub fn match_score(&self, requested: &Locale) -> u32 {
        if self.language != requested.language {
            return 0;
        }
        if self == requested {
            return 100;
        }

        let mut score = 10;
        if self.region.is_some() && self.region == requested.region {
            score += 40;
        }
        if self.script.is_some() && self.script == requested.script {
            score += 15;
        }
        if self.region.is_none() && self.script.is_none() {
            score += 5;
        }
        score
    }

    // Common locales

    /// English (no region)
    pub fn en() -> Self {
        Self::new("en", None::<&str>)
    }

    /// English (US)
    pub fn en_us() -> Self {
        Self::new("en", Some("US"))
    }

    /// German (no region)
    pub fn de() -> Self {
        Self::new("de", None::<&str>)
    }

    /// German (Germany)
    pub fn de_de() -> Self {
        Self::new("de", Some("DE"))
    }

    /// Russian (no region)
    pub fn ru() -> Self {
        Self::new("ru", None::<&str>)
    }

    /// Russian (Russia)
    pub fn ru_ru() -> Self {
        Self::new("ru", Some("RU"))
    }

    /// French (no region)
    pub fn fr() -> Self {
        Self::new("fr", None::<&str>)
    }

    /// Japanese
    pub fn ja() -> Self {
        Self::new("ja", None::<&str>)
    }

    /// Chinese (China, Simplified)
    pub fn zh_cn() -> Self {
        Self::with_script("zh", Some("Hans"), Some("CN"))
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self> {
        Locale::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = I18nError;

    fn try_from(value: String) -> Result<Self> {
        Locale::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.tag()
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::en()
    }
}

// ============================================================================
// Fallback Chains
// ============================================================================

/// Ordered list of locales consulted for a requested locale.
///
/// The chain runs from most to least specific: the requested locale and
/// its base forms, then the default locale and its base forms. A locale
/// appears once, at its first position.
///
/// ```
/// use numerus_i18n::{FallbackChain, Locale};
///
/// let chain = FallbackChain::new(&Locale::parse("zh-Hans-CN").unwrap(), &Locale::en());
/// let tags: Vec<String> = chain.iter().map(|l| l.tag()).collect();
/// assert_eq!(tags, ["zh-Hans-CN", "zh-Hans", "zh", "en"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackChain {
    locales: Vec<Locale>,
}

impl FallbackChain {
    /// Build the chain for `locale`, falling back to `default`.
    pub fn new(locale: &Locale, default: &Locale) -> Self {
        let mut chain = Self {
            locales: Vec::with_capacity(4),
        };

        chain.expand(locale);
        chain.expand(default);
        chain
    }

    /// Append a locale followed by its less specific forms.
    fn expand(&mut self, locale: &Locale) {
        self.push(locale.clone());
        if locale.region.is_some() {
            self.push(locale.without_region());
        }
        if locale.script.is_some() {
            self.push(locale.language_only());
        }
    }

    fn push(&mut self, locale: Locale) {
        if !self.locales.contains(&locale) {
            self.locales.push(locale);
        }
    }

    /// The requested locale (first link).
    pub fn primary(&self) -> &Locale {
        &self.locales[0]
    }

    /// Iterate from most to least specific.
    pub fn iter(&self) -> std::slice::Iter<'_, Locale> {
        self.locales.iter()
    }

    /// Number of links.
    pub fn len(&self) -> usize {
        self.locales.len()
    }

    /// Always false; a chain holds at least the requested locale.
    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    /// The links as a slice.
    pub fn as_slice(&self) -> &[Locale] {
        &self.locales
    }
}

impl<'a> IntoIterator for &'a FallbackChain {
    type Item = &'a Locale;
    type IntoIter = std::slice::Iter<'a, Locale>;

    fn into_iter(self) -> Self::IntoIter {
        self.locales.iter()
    }
}

// ============================================================================
// Negotiation
// ============================================================================

/// Pick the best available locale for a list of requested locales.
///
/// Requested locales are tried in order; the first one with any
/// same-language candidate wins, taking its best-scoring candidate.
///
/// # Example
///
/// ```
/// use numerus_i18n::{negotiate_locale, Locale};
///
/// let available = vec![Locale::en(), Locale::de_de(), Locale::ru()];
/// let requested = vec![Locale::parse("ru-UA").unwrap(), Locale::de()];
///
/// let default = Locale::en();
/// let best = negotiate_locale(&requested, &available, &default);
/// assert_eq!(best.tag(), "ru");
/// ```
pub fn negotiate_locale<'a>(
    requested: &[Locale],
    available: &'a [Locale],
    default: &'a Locale,
) -> &'a Locale {
    requested
        .iter()
        .find_map(|req| best_match(req, available))
        .unwrap_or(default)
}

/// Best-scoring available locale for one requested locale.
pub fn best_match<'a>(requested: &Locale, available: &'a [Locale]) -> Option<&'a Locale> {
    let mut best: Option<(&Locale, u32)> = None;

    for candidate in available {
        let score = candidate.match_score(requested);
        if score == 0 {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((candidate, score)),
        }
    }

    best.map(|(locale, _)| locale)
}

/// The user's locale from the POSIX environment variables.
pub fn system_locale() -> Option<Locale> {
    system_locale_from(|key| env::var(key).ok())
}

/// The user's locale through an arbitrary variable lookup.
///
/// Checks `LC_ALL`, `LC_MESSAGES` and `LANG` in that order, skipping empty
/// values and the `C`/`POSIX` pseudo-locales.
pub fn system_locale_from<F>(lookup: F) -> Option<Locale>
where
    F: Fn(&str) -> Option<String>,
{
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|key| lookup(key))
        .find_map(|value| Locale::parse(&value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_parse() {
        let en = Locale::parse("en").unwrap();
        assert_eq!(en.language, "en");
        assert!(en.region.is_none());

        let en_us = Locale::parse("en-US").unwrap();
        assert_eq!(en_us.region, Some("US".to_string()));

        let zh = Locale::parse("zh-Hans-CN").unwrap();
        assert_eq!(zh.script, Some("Hans".to_string()));
        assert_eq!(zh.region, Some("CN".to_string()));

        let es = Locale::parse("es-419").unwrap();
        assert_eq!(es.region, Some("419".to_string()));
    }

    #[test]
    fn test_locale_parse_posix() {
        assert_eq!(Locale::parse("ru_RU.UTF-8").unwrap(), Locale::ru_ru());
        assert_eq!(Locale::parse("de_DE@euro").unwrap(), Locale::de_de());
        assert_eq!(Locale::parse("en_US.UTF-8@latin").unwrap(), Locale::en_us());
    }

    #[test]
    fn test_locale_parse_rejects_garbage() {
        assert!(Locale::parse("").is_err());
        assert!(Locale::parse("C").is_err());
        assert!(Locale::parse("POSIX").is_err());
        assert!(Locale::parse("english").is_err());
        assert!(Locale::parse("en-toolongpart").is_err());
        assert!(Locale::parse("app_en_US").is_err());
        assert!(Locale::parse("zh-CN-Hans").is_err());
    }

    #[test]
    fn test_locale_tag_normalisation() {
        let locale = Locale::with_script("ZH", Some("hANS"), Some("cn"));
        assert_eq!(locale.tag(), "zh-Hans-CN");
        assert_eq!(locale.to_string(), "zh-Hans-CN");
    }

    #[test]
    fn test_locale_serde_as_tag() {
        let json = serde_json::to_string(&Locale::ru_ru()).unwrap();
        assert_eq!(json, "\"ru-RU\"");

        let parsed: Locale = serde_json::from_str("\"de_DE\"").unwrap();
        assert_eq!(parsed, Locale::de_de());

        assert!(serde_json::from_str::<Locale>("\"x\"").is_err());
    }

    #[test]
    fn test_fallback_chain_region() {
        let chain = Locale::de_de().fallback_chain(&Locale::en());
        assert_eq!(chain.as_slice(), &[Locale::de_de(), Locale::de(), Locale::en()]);
        assert_eq!(chain.primary(), &Locale::de_de());
    }

    #[test]
    fn test_fallback_chain_includes_default_base_language() {
        let chain = Locale::ru().fallback_chain(&Locale::en_us());
        assert_eq!(chain.as_slice(), &[Locale::ru(), Locale::en_us(), Locale::en()]);

        let chain = Locale::new("en", Some("GB")).fallback_chain(&Locale::en_us());
        assert_eq!(
            chain.as_slice(),
            &[Locale::new("en", Some("GB")), Locale::en(), Locale::en_us()]
        );

        let zh = Locale::parse("zh-Hans-CN").unwrap();
        let chain = Locale::de_de().fallback_chain(&zh);
        let tags: Vec<String> = chain.iter().map(Locale::tag).collect();
        assert_eq!(tags, ["de-DE", "de", "zh-Hans-CN", "zh-Hans", "zh"]);
    }

    #[test]
    fn test_fallback_chain_default_is_last_and_unique() {
        let chain = Locale::en_us().fallback_chain(&Locale::en());
        assert_eq!(chain.as_slice(), &[Locale::en_us(), Locale::en()]);

        let chain = Locale::en().fallback_chain(&Locale::en());
        assert_eq!(chain.len(), 1);
        assert!(!chain.is_empty());

        let chain = Locale::en_us().fallback_chain(&Locale::en_us());
        assert_eq!(chain.as_slice(), &[Locale::en_us(), Locale::en()]);
        assert_eq!(chain.primary(), &Locale::en_us());
    }

    #[test]
    fn test_match_score() {
        let en_us = Locale::en_us();
        assert_eq!(en_us.match_score(&en_us), 100);
        assert!(Locale::en().match_score(&en_us) > 0);
        assert!(Locale::en().match_score(&en_us) > Locale::new("en", Some("GB")).match_score(&en_us));
        assert_eq!(Locale::fr().match_score(&en_us), 0);
    }

    #[test]
    fn test_negotiate_prefers_generic_language() {
        let available = vec![Locale::de_de(), Locale::de(), Locale::en()];
        let requested = vec![Locale::new("de", Some("AT"))];

        let best = negotiate_locale(&requested, &available, &available[2]);
        assert_eq!(best, &Locale::de());
    }

    #[test]
    fn test_negotiate_falls_back_to_default() {
        let available = vec![Locale::en(), Locale::ru()];
        let default = Locale::en();
        let requested = vec![Locale::ja(), Locale::fr()];

        assert_eq!(negotiate_locale(&requested, &available, &default), &default);
    }

    #[test]
    fn test_system_locale_from_posix_vars() {
        let vars = |key: &str| match key {
            "LC_ALL" => Some(String::new()),
            "LC_MESSAGES" => Some("C".to_string()),
            "LANG" => Some("ru_RU.UTF-8".to_string()),
            _ => None,
        };
        assert_eq!(system_locale_from(vars), Some(Locale::ru_ru()));
        assert_eq!(system_locale_from(|_| None), None);
    }
}
