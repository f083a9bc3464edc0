//! Street address normalization.
//!
//! A raw address such as `"123 Main St., Springfield, OR"` is reduced to
//! its street part (`"123 Main St."`) and then to the canonical token form
//! `123-main-st`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Any character that is not an ASCII letter, digit, or space.
static NON_ALNUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9a-zA-Z ]").expect("valid regex"));

/// Runs of one or more spaces.
static SPACES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +").expect("valid regex"));

/// Street-type tokens recognised at the end of a normalized address.
pub static ROAD_SUFFIXES: &[&str] = &[
    "st",
    "street",
    "ave",
    "avenue",
    "rd",
    "road",
    "dr",
    "drive",
    "ct",
    "court",
    "blvd",
    "boulevard",
    "ln",
    "lane",
];

/// Returns `true` if `token` is a known road suffix (case-insensitive).
#[must_use]
pub fn is_road_suffix(token: &str) -> bool {
    ROAD_SUFFIXES
        .iter()
        .any(|suffix| suffix.eq_ignore_ascii_case(token))
}

/// Returns the street portion of a full address: everything before the
/// first comma, or the whole input when there is no comma.
#[must_use]
pub fn street_part(full_address: &str) -> &str {
    full_address
        .split_once(',')
        .map_or(full_address, |(street, _)| street)
}

/// A street address reduced to lowercase alphanumeric tokens.
///
/// Stored in its canonical hyphen-joined form (`"123-main-st"`). An empty
/// street normalizes to the empty string, whose token sequence is a single
/// empty token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NormalizedAddress(String);

impl NormalizedAddress {
    /// Returns the canonical hyphen-joined form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the token sequence, in order.
    ///
    /// Always contains at least one element; the empty address yields
    /// `[""]`.
    #[must_use]
    pub fn tokens(&self) -> Vec<&str> {
        self.0.split('-').collect()
    }

    /// Returns `true` if the address has no street tokens at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if the final token is a road suffix (`st`, `avenue`, ...).
    #[must_use]
    pub fn has_road_suffix(&self) -> bool {
        self.0.rsplit('-').next().is_some_and(is_road_suffix)
    }
}

impl fmt::Display for NormalizedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalizes street text into a [`NormalizedAddress`].
///
/// The pipeline:
/// 1. Replace every non-alphanumeric, non-space character with a space
/// 2. Collapse runs of spaces
/// 3. Trim and lowercase
/// 4. Join the remaining words with `-`
#[must_use]
pub fn normalize(street: &str) -> NormalizedAddress {
    let spaced = NON_ALNUM_RE.replace_all(street, " ");
    let collapsed = SPACES_RE.replace_all(&spaced, " ");
    let lower = collapsed.trim().to_ascii_lowercase();
    NormalizedAddress(lower.replace(' ', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_trailing_punctuation() {
        assert_eq!(normalize("123 Main St.").tokens(), vec!["123", "main", "st"]);
    }

    #[test]
    fn normalizes_to_hyphenated_form() {
        assert_eq!(normalize("4260 SW Council Crest Dr").as_str(), "4260-sw-council-crest-dr");
    }

    #[test]
    fn collapses_punctuation_and_whitespace() {
        assert_eq!(
            normalize("  12-B   Elm\tSt. #4 ").tokens(),
            vec!["12", "b", "elm", "st", "4"]
        );
    }

    #[test]
    fn replaces_non_ascii_characters() {
        assert_eq!(normalize("10 Café Ct").tokens(), vec!["10", "caf", "ct"]);
    }

    #[test]
    fn empty_street_has_single_empty_token() {
        let addr = normalize("");
        assert!(addr.is_empty());
        assert_eq!(addr.tokens(), vec![""]);
    }

    #[test]
    fn punctuation_only_street_is_empty() {
        assert!(normalize(" ,.# ").is_empty());
    }

    #[test]
    fn is_idempotent_on_its_own_output() {
        for raw in ["123 Main St.", "4260 SW Council Crest Dr", "", "PO Box 7"] {
            let once = normalize(raw);
            let twice = normalize(&once.tokens().join(" "));
            assert_eq!(once, twice, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn takes_street_part_before_first_comma() {
        assert_eq!(street_part("123 Main St, Springfield, OR"), "123 Main St");
        assert_eq!(street_part("123 Main St"), "123 Main St");
        assert_eq!(street_part(""), "");
        assert_eq!(street_part(", Portland"), "");
    }

    #[test]
    fn detects_road_suffix() {
        assert!(normalize("123 Main St").has_road_suffix());
        assert!(normalize("9 Ocean Boulevard").has_road_suffix());
        assert!(!normalize("123 Broadway").has_road_suffix());
        assert!(!normalize("").has_road_suffix());
        assert!(is_road_suffix("AVE"));
    }
}
