//! Locale handling for bundled search-engine catalogs
//!
//! Bundled engine definitions ship in per-locale directories. Resolving a
//! locale means turning an identifier like `zh-Hans-CN` into an ordered chain
//! of directories to consult, from most to least specific, ending at the
//! product's fallback locale.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// ISO 639-1 language codes, plus the two Sorbian 639-2 codes the product
/// ships catalogs for. The language segment of a locale identifier must be
/// one of these.
pub const ISO_LANGUAGE_CODES: &[&str] = &[
    "aa", "ab", "ae", "af", "ak", "am", "an", "ar", "as", "av", "ay", "az", "ba", "be", "bg",
    "bh", "bi", "bm", "bn", "bo", "br", "bs", "ca", "ce", "ch", "co", "cr", "cs", "cu", "cv",
    "cy", "da", "de", "dv", "dz", "ee", "el", "en", "eo", "es", "et", "eu", "fa", "ff", "fi",
    "fj", "fo", "fr", "fy", "ga", "gd", "gl", "gn", "gu", "gv", "ha", "he", "hi", "ho", "hr",
    "ht", "hu", "hy", "hz", "ia", "id", "ie", "ig", "ii", "ik", "io", "is", "it", "iu", "ja",
    "jv", "ka", "kg", "ki", "kj", "kk", "kl", "km", "kn", "ko", "kr", "ks", "ku", "kv", "kw",
    "ky", "la", "lb", "lg", "li", "ln", "lo", "lt", "lu", "lv", "mg", "mh", "mi", "mk", "ml",
    "mn", "mr", "ms", "mt", "my", "na", "nb", "nd", "ne", "ng", "nl", "nn", "no", "nr", "nv",
    "ny", "oc", "oj", "om", "or", "os", "pa", "pi", "pl", "ps", "pt", "qu", "rm", "rn", "ro",
    "ru", "rw", "sa", "sc", "sd", "se", "sg", "si", "sk", "sl", "sm", "sn", "so", "sq", "sr",
    "ss", "st", "su", "sv", "sw", "ta", "te", "tg", "th", "ti", "tk", "tl", "tn", "to", "tr",
    "ts", "tt", "tw", "ty", "ug", "uk", "ur", "uz", "ve", "vi", "vo", "wa", "wo", "xh", "yi",
    "yo", "za", "zh", "zu", "dsb", "hsb",
];

/// A well-formed identifier is one to three dash-separated ASCII alphanumeric
/// segments, none of them empty. Anything else (underscores, path separators,
/// spaces) is rejected outright.
static LANGUAGE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+(-[A-Za-z0-9]+){0,2}$").unwrap());

/// Check whether a language identifier is well-formed and names a language we
/// recognize. Identifiers like `foo`, `nl_NL`, or `../../etc/passwd` are all
/// rejected.
pub fn is_valid_language_identifier(identifier: &str) -> bool {
    if !LANGUAGE_ID_RE.is_match(identifier) {
        return false;
    }
    let language = identifier.split('-').next().unwrap_or_default();
    ISO_LANGUAGE_CODES.contains(&language)
}

/// Produce the ordered locale fallback chain for an identifier.
///
/// `es-MX` with fallback `en` yields `[es-MX, es, en]`; a three-segment
/// identifier such as `zh-Hans-CN` also tries the language-region
/// reconstruction (`zh-CN`) before the bare language. Exact duplicates are
/// collapsed, first occurrence wins.
///
/// A malformed or unrecognized identifier resolves to the fallback alone.
/// This fails closed: garbage identifiers must never reach the filesystem.
pub fn fallback_chain(identifier: &str, fallback: &str) -> Vec<String> {
    let mut chain: Vec<String> = Vec::new();

    if is_valid_language_identifier(identifier) {
        let segments: Vec<&str> = identifier.split('-').collect();
        chain.push(identifier.to_string());
        if segments.len() == 3 {
            // Drop the script segment: zh-Hans-CN also searches zh-CN.
            chain.push(format!("{}-{}", segments[0], segments[2]));
        }
        if segments.len() >= 2 {
            chain.push(segments[0].to_string());
        }
    }
    chain.push(fallback.to_string());

    let mut seen = Vec::with_capacity(chain.len());
    for candidate in chain {
        if !seen.contains(&candidate) {
            seen.push(candidate);
        }
    }
    seen
}

/// Map a locale identifier to the ordered list of catalog directories under
/// `base_path`, most specific first, ending with the fallback locale's
/// directory.
pub fn fallback_directories(identifier: &str, base_path: &Path, fallback: &str) -> Vec<PathBuf> {
    fallback_chain(identifier, fallback)
        .into_iter()
        .map(|locale| base_path.join(locale))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dirs(identifier: &str) -> Vec<PathBuf> {
        fallback_directories(identifier, Path::new("/tmp"), "en")
    }

    #[test]
    fn test_directories_for_language_identifier() {
        assert_eq!(
            dirs("nl"),
            vec![PathBuf::from("/tmp/nl"), PathBuf::from("/tmp/en")]
        );
        assert_eq!(
            dirs("en-US"),
            vec![PathBuf::from("/tmp/en-US"), PathBuf::from("/tmp/en")]
        );
        assert_eq!(
            dirs("es-MX"),
            vec![
                PathBuf::from("/tmp/es-MX"),
                PathBuf::from("/tmp/es"),
                PathBuf::from("/tmp/en")
            ]
        );
        assert_eq!(
            dirs("zh-Hans-CN"),
            vec![
                PathBuf::from("/tmp/zh-Hans-CN"),
                PathBuf::from("/tmp/zh-CN"),
                PathBuf::from("/tmp/zh"),
                PathBuf::from("/tmp/en")
            ]
        );
    }

    #[test]
    fn test_fallback_locale_itself_is_not_duplicated() {
        assert_eq!(dirs("en"), vec![PathBuf::from("/tmp/en")]);
    }

    #[test]
    fn test_directories_for_invalid_language_identifier() {
        for identifier in [
            "",
            "-",
            "_",
            "foo",
            "foo/bar",
            "$foo",
            "foo_bar",
            "../../../../etc/passwd",
            "-foo",
            "_bar",
            "I like cheese",
        ] {
            assert_eq!(
                dirs(identifier),
                vec![PathBuf::from("/tmp/en")],
                "identifier {:?} must resolve to the fallback only",
                identifier
            );
        }
    }

    #[test]
    fn test_validity() {
        assert!(is_valid_language_identifier("nl"));
        assert!(is_valid_language_identifier("dsb"));
        assert!(is_valid_language_identifier("zh-Hans-CN"));
        assert!(!is_valid_language_identifier("nl-"));
        assert!(!is_valid_language_identifier("nl--NL"));
        assert!(!is_valid_language_identifier("nl_NL"));
        assert!(!is_valid_language_identifier("foo"));
    }
}
