//! Pluralization Rules
//!
//! CLDR cardinal rules for non-negative integer counts. A language's
//! categories are listed in the same order catalogs list their plural
//! forms, so the position of a category is the index of the variant to
//! display: English has 2 forms (one, other), Russian 3 (one, few, many).

use crate::{I18nError, Locale, Result};
use std::fmt;
use std::str::FromStr;

/// CLDR plural categories.
///
/// Not all languages use all categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    /// Zero items (Arabic, Welsh)
    Zero,
    /// One item (most languages)
    One,
    /// Two items (Arabic, Welsh)
    Two,
    /// Few items (Slavic languages)
    Few,
    /// Many items (Slavic languages, Arabic)
    Many,
    /// All other cases
    Other,
}

impl PluralCategory {
    /// Category name as used by CLDR.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }
}

impl FromStr for PluralCategory {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "zero" => Ok(Self::Zero),
            "one" => Ok(Self::One),
            "two" => Ok(Self::Two),
            "few" => Ok(Self::Few),
            "many" => Ok(Self::Many),
            "other" => Ok(Self::Other),
            _ => Err(I18nError::InvalidPluralCategory(s.to_string())),
        }
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plural rules for one language.
pub trait PluralRules: Send + Sync {
    /// Category of a count.
    fn category(&self, n: u64) -> PluralCategory;

    /// Categories used by the language, in catalog form order.
    fn categories(&self) -> &'static [PluralCategory];

    /// Index of the catalog form to use for a count.
    fn index(&self, n: u64) -> usize {
        let category = self.category(n);
        let categories = self.categories();
        categories
            .iter()
            .position(|c| *c == category)
            .unwrap_or(categories.len().saturating_sub(1))
    }
}

/// Locale-aware plural rule lookup.
///
/// Languages without a known rule use the rule of the table's default
/// locale, and the English rule if that is unknown as well.
///
/// # Example
///
/// ```
/// use numerus_i18n::{Locale, PluralRuleTable};
///
/// let table = PluralRuleTable::new(Locale::en());
/// assert_eq!(table.category_count(&Locale::ru()), 3);
/// assert_eq!(table.category_index(&Locale::ru(), 21), 0);
/// assert_eq!(table.category_index(&Locale::ru(), 3), 1);
/// assert_eq!(table.category_index(&Locale::ru(), 11), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralRuleTable {
    default_locale: Locale,
}

impl PluralRuleTable {
    /// Create a table whose unknown-language rule is that of `default_locale`.
    pub fn new(default_locale: Locale) -> Self {
        Self { default_locale }
    }

    /// The locale whose rule unknown languages inherit.
    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// Whether the locale's language has its own rule.
    pub fn is_known(&self, locale: &Locale) -> bool {
        rules_for_language(&locale.language).is_some()
    }

    /// The rules applied to a locale.
    pub fn rules(&self, locale: &Locale) -> &'static dyn PluralRules {
        rules_for_language(&locale.language)
            .or_else(|| rules_for_language(&self.default_locale.language))
            .unwrap_or(&OneOther)
    }

    /// Category of `n` in `locale`.
    pub fn category(&self, locale: &Locale, n: u64) -> PluralCategory {
        self.rules(locale).category(n)
    }

    /// Index of the catalog form for `n` in `locale`, in `[0, category_count)`.
    pub fn category_index(&self, locale: &Locale, n: u64) -> usize {
        self.rules(locale).index(n)
    }

    /// Number of plural forms a catalog for `locale` should carry.
    pub fn category_count(&self, locale: &Locale) -> usize {
        self.rules(locale).categories().len()
    }
}

impl Default for PluralRuleTable {
    fn default() -> Self {
        Self::new(Locale::en())
    }
}

/// Plural category of a count in a locale, with English as the default rule.
///
/// # Example
///
/// ```
/// use numerus_i18n::{plural_category, PluralCategory, Locale};
///
/// assert_eq!(plural_category(1, &Locale::en()), PluralCategory::One);
/// assert_eq!(plural_category(2, &Locale::en()), PluralCategory::Other);
/// assert_eq!(plural_category(0, &Locale::en()), PluralCategory::Other);
/// ```
pub fn plural_category(n: u64, locale: &Locale) -> PluralCategory {
    PluralRuleTable::default().category(locale, n)
}

fn rules_for_language(language: &str) -> Option<&'static dyn PluralRules> {
    let rules: &'static dyn PluralRules = match language {
        "en" | "de" | "nl" | "sv" | "da" | "no" | "nb" | "nn" | "is" | "fi" | "et" | "es"
        | "it" | "pt" | "ca" | "gl" | "el" | "hu" | "tr" | "bg" | "eo" => &OneOther,

        "fr" => &French,

        "ja" | "ko" | "zh" | "vi" | "th" | "id" | "ms" => &NoPlurals,

        "ru" | "uk" | "be" => &EastSlavic,
        "pl" => &Polish,
        "cs" | "sk" => &Czech,

        "cy" => &Welsh,
        "ar" => &Arabic,

        _ => return None,
    };
    Some(rules)
}

// ============================================================================
// Plural Rule Implementations
// ============================================================================

/// English-like: 1 is one, everything else (including 0) is other.
struct OneOther;

impl PluralRules for OneOther {
    fn category(&self, n: u64) -> PluralCategory {
        if n == 1 {
            PluralCategory::One
        } else {
            PluralCategory::Other
        }
    }

    fn categories(&self) -> &'static [PluralCategory] {
        &[PluralCategory::One, PluralCategory::Other]
    }
}

/// French: 0 and 1 are one.
struct French;

impl PluralRules for French {
    fn category(&self, n: u64) -> PluralCategory {
        if n <= 1 {
            PluralCategory::One
        } else {
            PluralCategory::Other
        }
    }

    fn categories(&self) -> &'static [PluralCategory] {
        &[PluralCategory::One, PluralCategory::Other]
    }
}

/// A single form (Chinese, Japanese, Korean, ...).
struct NoPlurals;

impl PluralRules for NoPlurals {
    fn category(&self, _n: u64) -> PluralCategory {
        PluralCategory::Other
    }

    fn categories(&self) -> &'static [PluralCategory] {
        &[PluralCategory::Other]
    }
}

/// Russian, Ukrainian, Belarusian.
///
/// - one: 1, 21, 31, ..., 101, ... (not 11)
/// - few: 2-4, 22-24, ... (not 12-14)
/// - many: 0, 5-20, 25-30, ...
struct EastSlavic;

impl PluralRules for EastSlavic {
    fn category(&self, n: u64) -> PluralCategory {
        let mod10 = n % 10;
        let mod100 = n % 100;

        if mod10 == 1 && mod100 != 11 {
            PluralCategory::One
        } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
            PluralCategory::Few
        } else {
            PluralCategory::Many
        }
    }

    fn categories(&self) -> &'static [PluralCategory] {
        &[PluralCategory::One, PluralCategory::Few, PluralCategory::Many]
    }
}

/// Polish.
///
/// - one: 1
/// - few: 2-4, 22-24, 32-34, ...
/// - many: 0, 5-21, 25-31, ...
struct Polish;

impl PluralRules for Polish {
    fn category(&self, n: u64) -> PluralCategory {
        if n == 1 {
            return PluralCategory::One;
        }

        let mod10 = n % 10;
        let mod100 = n % 100;

        if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
            PluralCategory::Few
        } else {
            PluralCategory::Many
        }
    }

    fn categories(&self) -> &'static [PluralCategory] {
        &[PluralCategory::One, PluralCategory::Few, PluralCategory::Many]
    }
}

/// Czech and Slovak (integer counts only; "many" is for fractions).
struct Czech;

impl PluralRules for Czech {
    fn category(&self, n: u64) -> PluralCategory {
        match n {
            1 => PluralCategory::One,
            2..=4 => PluralCategory::Few,
            _ => PluralCategory::Other,
        }
    }

    fn categories(&self) -> &'static [PluralCategory] {
        &[PluralCategory::One, PluralCategory::Few, PluralCategory::Other]
    }
}

/// Welsh: 0 zero, 1 one, 2 two, 3 few, 6 many, rest other.
struct Welsh;

impl PluralRules for Welsh {
    fn category(&self, n: u64) -> PluralCategory {
        match n {
            0 => PluralCategory::Zero,
            1 => PluralCategory::One,
            2 => PluralCategory::Two,
            3 => PluralCategory::Few,
            6 => PluralCategory::Many,
            _ => PluralCategory::Other,
        }
    }

    fn categories(&self) -> &'static [PluralCategory] {
        &[
            PluralCategory::Zero,
            PluralCategory::One,
            PluralCategory::Two,
            PluralCategory::Few,
            PluralCategory::Many,
            PluralCategory::Other,
        ]
    }
}

/// Arabic.
///
/// - zero: 0
/// - one: 1
/// - two: 2
/// - few: 3-10, 103-110, ...
/// - many: 11-99, 111-199, ...
/// - other: 100-102, 200-202, ...
struct Arabic;

impl PluralRules for Arabic {
    fn category(&self, n: u64) -> PluralCategory {
        let mod100 = n % 100;

        match n {
            0 => PluralCategory::Zero,
            1 => PluralCategory::One,
            2 => PluralCategory::Two,
            _ if (3..=10).contains(&mod100) => PluralCategory::Few,
            _ if (11..=99).contains(&mod100) => PluralCategory::Many,
            _ => PluralCategory::Other,
        }
    }

    fn categories(&self) -> &'static [PluralCategory] {
        &[
            PluralCategory::Zero,
            PluralCategory::One,
            PluralCategory::Two,
            PluralCategory::Few,
            PluralCategory::Many,
            PluralCategory::Other,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_plurals() {
        let en = Locale::en();
        assert_eq!(plural_category(0, &en), PluralCategory::Other);
        assert_eq!(plural_category(1, &en), PluralCategory::One);
        assert_eq!(plural_category(2, &en), PluralCategory::Other);
        assert_eq!(plural_category(100, &en), PluralCategory::Other);
    }

    #[test]
    fn test_english_and_german_indices() {
        let table = PluralRuleTable::default();
        for locale in [Locale::en(), Locale::de()] {
            assert_eq!(table.category_count(&locale), 2);
            assert_eq!(table.category_index(&locale, 0), 1);
            assert_eq!(table.category_index(&locale, 1), 0);
            assert_eq!(table.category_index(&locale, 2), 1);
        }
    }

    #[test]
    fn test_french_plurals() {
        let fr = Locale::fr();
        assert_eq!(plural_category(0, &fr), PluralCategory::One);
        assert_eq!(plural_category(1, &fr), PluralCategory::One);
        assert_eq!(plural_category(2, &fr), PluralCategory::Other);
    }

    #[test]
    fn test_russian_plurals() {
        let ru = Locale::ru();
        assert_eq!(plural_category(1, &ru), PluralCategory::One);
        for n in 2..=4 {
            assert_eq!(plural_category(n, &ru), PluralCategory::Few);
        }
        for n in 5..=20 {
            assert_eq!(plural_category(n, &ru), PluralCategory::Many, "n = {}", n);
        }
        assert_eq!(plural_category(21, &ru), PluralCategory::One);
        assert_eq!(plural_category(22, &ru), PluralCategory::Few);
        assert_eq!(plural_category(25, &ru), PluralCategory::Many);
        assert_eq!(plural_category(111, &ru), PluralCategory::Many);
        assert_eq!(plural_category(0, &ru), PluralCategory::Many);
    }

    #[test]
    fn test_russian_indices_follow_catalog_order() {
        let table = PluralRuleTable::default();
        let ru = Locale::ru_ru();
        assert_eq!(table.category_index(&ru, 1), 0);
        assert_eq!(table.category_index(&ru, 4), 1);
        assert_eq!(table.category_index(&ru, 12), 2);
        assert_eq!(table.category_index(&ru, 1001), 0);
    }

    #[test]
    fn test_polish_and_czech() {
        let pl = Locale::new("pl", None::<&str>);
        assert_eq!(plural_category(1, &pl), PluralCategory::One);
        assert_eq!(plural_category(21, &pl), PluralCategory::Many);
        assert_eq!(plural_category(24, &pl), PluralCategory::Few);

        let cs = Locale::new("cs", None::<&str>);
        assert_eq!(plural_category(3, &cs), PluralCategory::Few);
        assert_eq!(plural_category(5, &cs), PluralCategory::Other);
        assert_eq!(PluralRuleTable::default().category_index(&cs, 5), 2);
    }

    #[test]
    fn test_japanese_plurals() {
        let ja = Locale::ja();
        let table = PluralRuleTable::default();
        assert_eq!(plural_category(1, &ja), PluralCategory::Other);
        assert_eq!(table.category_count(&ja), 1);
        assert_eq!(table.category_index(&ja, 7), 0);
    }

    #[test]
    fn test_arabic_plurals() {
        let ar = Locale::new("ar", None::<&str>);
        assert_eq!(plural_category(0, &ar), PluralCategory::Zero);
        assert_eq!(plural_category(2, &ar), PluralCategory::Two);
        assert_eq!(plural_category(105, &ar), PluralCategory::Few);
        assert_eq!(plural_category(11, &ar), PluralCategory::Many);
        assert_eq!(plural_category(100, &ar), PluralCategory::Other);
        assert_eq!(PluralRuleTable::default().category_index(&ar, 100), 5);
    }

    #[test]
    fn test_unknown_language_uses_default_locale_rule() {
        let klingon = Locale::new("tlh", None::<&str>);

        let english_default = PluralRuleTable::new(Locale::en());
        assert!(!english_default.is_known(&klingon));
        assert_eq!(english_default.category_count(&klingon), 2);

        let russian_default = PluralRuleTable::new(Locale::ru());
        assert_eq!(russian_default.category_count(&klingon), 3);
        assert_eq!(russian_default.category(&klingon, 5), PluralCategory::Many);

        let unknown_default = PluralRuleTable::new(Locale::new("xx", None::<&str>));
        assert_eq!(unknown_default.category_index(&klingon, 1), 0);
        assert_eq!(unknown_default.category_index(&klingon, 0), 1);
    }

    #[test]
    fn test_indices_always_in_range() {
        let table = PluralRuleTable::default();
        let locales = ["en", "fr", "ja", "ru", "pl", "cs", "cy", "ar", "xx"];
        for tag in locales {
            let locale = Locale::parse(tag).unwrap();
            let count = table.category_count(&locale);
            for n in 0..250 {
                assert!(table.category_index(&locale, n) < count, "{} {}", tag, n);
            }
        }
    }

    #[test]
    fn test_plural_category_parse() {
        assert_eq!("one".parse::<PluralCategory>().unwrap(), PluralCategory::One);
        assert_eq!("OTHER".parse::<PluralCategory>().unwrap(), PluralCategory::Other);
        assert!("several".parse::<PluralCategory>().is_err());
        assert_eq!(PluralCategory::Few.to_string(), "few");
    }
}
