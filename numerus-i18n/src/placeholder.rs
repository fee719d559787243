//! Placeholder Substitution
//!
//! Catalog strings carry positional placeholders `%1` through `%99` and the
//! count placeholder `%n`. The `%L1`/`%Ln` spellings, which ask for
//! locale-aware number rendering, are accepted and substituted verbatim.
//!
//! Substitution is a single pass over the template: replacement values are
//! never rescanned, and a placeholder without a value stays as written.

/// What a placeholder stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// `%1`, `%2`, ... (1-based)
    Positional(usize),
    /// `%n`, the plural count
    Count,
}

/// A piece of a tokenized template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text copied as-is
    Literal(&'a str),
    /// A placeholder and its original spelling
    Placeholder { kind: Placeholder, raw: &'a str },
}

/// Split a template into literal text and placeholders.
///
/// ```
/// use numerus_i18n::placeholder::{tokenize, Placeholder, Segment};
///
/// let segments = tokenize("%n of %12 done");
/// assert_eq!(segments[0], Segment::Placeholder { kind: Placeholder::Count, raw: "%n" });
/// assert_eq!(segments[1], Segment::Literal(" of "));
/// assert_eq!(segments[2], Segment::Placeholder { kind: Placeholder::Positional(12), raw: "%12" });
/// ```
pub fn tokenize(template: &str) -> Vec<Segment<'_>> {
    let bytes = template.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }

        match scan_placeholder(bytes, i) {
            Some((kind, end)) => {
                if literal_start < i {
                    segments.push(Segment::Literal(&template[literal_start..i]));
                }
                segments.push(Segment::Placeholder {
                    kind,
                    raw: &template[i..end],
                });
                i = end;
                literal_start = end;
            }
            None => i += 1,
        }
    }

    if literal_start < bytes.len() {
        segments.push(Segment::Literal(&template[literal_start..]));
    }
    segments
}

/// Recognise a placeholder starting at `bytes[start] == b'%'`.
///
/// Returns the placeholder and the index one past its last byte.
fn scan_placeholder(bytes: &[u8], start: usize) -> Option<(Placeholder, usize)> {
    let mut i = start + 1;
    if bytes.get(i) == Some(&b'L') {
        i += 1;
    }

    match bytes.get(i).copied()? {
        b'n' => Some((Placeholder::Count, i + 1)),
        first @ b'1'..=b'9' => {
            let mut index = usize::from(first - b'0');
            i += 1;
            if let Some(d @ b'0'..=b'9') = bytes.get(i).copied() {
                index = index * 10 + usize::from(d - b'0');
                i += 1;
            }
            Some((Placeholder::Positional(index), i))
        }
        _ => None,
    }
}

/// Placeholder usage of a source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signature {
    /// Highest positional index used (0 when there are none)
    pub arity: usize,
    /// Whether `%n` appears
    pub uses_count: bool,
}

/// Summarise the placeholders a template uses.
pub fn signature(template: &str) -> Signature {
    tokenize(template)
        .iter()
        .fold(Signature::default(), |mut sig, segment| {
            match segment {
                Segment::Placeholder {
                    kind: Placeholder::Positional(index),
                    ..
                } => sig.arity = sig.arity.max(*index),
                Segment::Placeholder {
                    kind: Placeholder::Count,
                    ..
                } => sig.uses_count = true,
                Segment::Literal(_) => {}
            }
            sig
        })
}

/// Result of a substitution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substituted {
    /// The rendered text
    pub text: String,
    /// Spellings of placeholders that had no value, in order of appearance
    pub unmatched: Vec<String>,
}

/// Replace `%1..%99` with `args` and `%n` with `count`.
///
/// ```
/// use numerus_i18n::placeholder::substitute;
///
/// let full = substitute("%1 (%2)", None, &["Alice", "alice@example.com"]);
/// assert_eq!(full.text, "Alice (alice@example.com)");
///
/// let partial = substitute("%1 (%2)", None, &["Alice"]);
/// assert_eq!(partial.text, "Alice (%2)");
/// assert_eq!(partial.unmatched, ["%2"]);
/// ```
pub fn substitute<S: AsRef<str>>(template: &str, count: Option<u64>, args: &[S]) -> Substituted {
    if !template.contains('%') {
        return Substituted {
            text: template.to_string(),
            unmatched: Vec::new(),
        };
    }

    let mut text = String::with_capacity(template.len() + 16);
    let mut unmatched = Vec::new();

    for segment in tokenize(template) {
        match segment {
            Segment::Literal(literal) => text.push_str(literal),
            Segment::Placeholder { kind, raw } => {
                let value = match kind {
                    Placeholder::Positional(index) => {
                        args.get(index - 1).map(|a| a.as_ref().to_string())
                    }
                    Placeholder::Count => count.map(|n| n.to_string()),
                };
                match value {
                    Some(value) => text.push_str(&value),
                    None => {
                        text.push_str(raw);
                        unmatched.push(raw.to_string());
                    }
                }
            }
        }
    }

    Substituted { text, unmatched }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_ARGS: &[&str] = &[];

    #[test]
    fn test_tokenize_plain_text() {
        assert_eq!(tokenize("Peers"), vec![Segment::Literal("Peers")]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_tokenize_ignores_non_placeholders() {
        assert_eq!(tokenize("100% done"), vec![Segment::Literal("100% done")]);
        assert_eq!(tokenize("%0 and %x"), vec![Segment::Literal("%0 and %x")]);
        assert_eq!(tokenize("trailing %"), vec![Segment::Literal("trailing %")]);
    }

    #[test]
    fn test_tokenize_localized_spelling() {
        assert_eq!(
            tokenize("%L1/%Ln"),
            vec![
                Segment::Placeholder {
                    kind: Placeholder::Positional(1),
                    raw: "%L1"
                },
                Segment::Literal("/"),
                Segment::Placeholder {
                    kind: Placeholder::Count,
                    raw: "%Ln"
                },
            ]
        );
    }

    #[test]
    fn test_tokenize_multibyte_literals() {
        let segments = tokenize("%1 ГБ из %2 ГБ");
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[1], Segment::Literal(" ГБ из "));
        assert_eq!(segments[3], Segment::Literal(" ГБ"));
    }

    #[test]
    fn test_signature() {
        assert_eq!(signature("Name"), Signature::default());
        assert_eq!(
            signature("%1 GB of %2 GB used"),
            Signature {
                arity: 2,
                uses_count: false
            }
        );
        assert_eq!(
            signature("%n file(s)"),
            Signature {
                arity: 0,
                uses_count: true
            }
        );
    }

    #[test]
    fn test_substitute_count() {
        assert_eq!(substitute("%n файлов", Some(25), NO_ARGS).text, "25 файлов");
        let missing = substitute("%n files", None, NO_ARGS);
        assert_eq!(missing.text, "%n files");
        assert_eq!(missing.unmatched, ["%n"]);
    }

    #[test]
    fn test_substitute_reordered_arguments() {
        let result = substitute("%2 von %1", None, &["10 GB", "3 GB"]);
        assert_eq!(result.text, "3 GB von 10 GB");
        assert!(result.unmatched.is_empty());
    }

    #[test]
    fn test_substitute_does_not_rescan_values() {
        let result = substitute("%1 and %2", None, &["%2", "x"]);
        assert_eq!(result.text, "%2 and x");
        assert!(result.unmatched.is_empty());
    }

    #[test]
    fn test_substitute_extra_args_are_ignored() {
        let result = substitute("%1", None, &["a", "b", "c"]);
        assert_eq!(result.text, "a");
    }

    #[test]
    fn test_substitute_owned_args() {
        let args = vec!["Alice".to_string()];
        assert_eq!(substitute("Hi %1", None, &args).text, "Hi Alice");
    }
}
