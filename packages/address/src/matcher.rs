//! Listing URL verification.
//!
//! A candidate URL is accepted only when it lives on the trusted listing
//! host and its path contains the address tokens as a contiguous run
//! starting at the first occurrence of the house number (or whatever the
//! leading token is).

use url::Url;

use crate::normalize::NormalizedAddress;

/// Scheme and host every accepted listing URL must start with.
pub const DEFAULT_TRUSTED_PREFIX: &str = "https://www.redfin.com";

/// How a listing URL matched an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The address ends in a road suffix and the path repeats it exactly.
    WithSuffix,
    /// The address carries no road suffix; the path may or may not have one
    /// after the matched tokens.
    Bare,
}

/// Verifies listing URLs against normalized street addresses.
#[derive(Debug, Clone)]
pub struct AddressMatcher {
    /// Raw prefix, e.g. `https://www.redfin.com`.
    prefix: String,
    scheme: String,
    host: String,
}

impl Default for AddressMatcher {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_TRUSTED_PREFIX.to_string(),
            scheme: "https".to_string(),
            host: "www.redfin.com".to_string(),
        }
    }
}

impl AddressMatcher {
    /// Creates a matcher trusting the given `scheme://host` prefix.
    ///
    /// Returns `None` if the prefix is not an absolute URL with a host.
    #[must_use]
    pub fn new(trusted_prefix: &str) -> Option<Self> {
        let trimmed = trusted_prefix.trim_end_matches('/');
        let parsed = Url::parse(trimmed).ok()?;
        let host = parsed.host_str()?.to_string();
        Some(Self {
            prefix: trimmed.to_string(),
            scheme: parsed.scheme().to_string(),
            host,
        })
    }

    /// Returns the trusted prefix.
    #[must_use]
    pub fn trusted_prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns `true` if `candidate` is on the trusted scheme and host.
    ///
    /// The raw string must start with the prefix *and* parse to exactly the
    /// trusted host, so look-alike hosts such as
    /// `https://www.redfin.com.example.net` are rejected.
    #[must_use]
    pub fn is_trusted(&self, candidate: &str) -> bool {
        if candidate.is_empty() || !candidate.starts_with(&self.prefix) {
            return false;
        }
        Url::parse(candidate).is_ok_and(|url| {
            url.scheme() == self.scheme && url.host_str() == Some(self.host.as_str())
        })
    }

    /// Returns `true` if `candidate` references the same property as
    /// `address`.
    #[must_use]
    pub fn matches(&self, candidate: &str, address: &NormalizedAddress) -> bool {
        self.match_kind(candidate, address).is_some()
    }

    /// Like [`Self::matches`], but reports which rule accepted the URL.
    #[must_use]
    pub fn match_kind(&self, candidate: &str, address: &NormalizedAddress) -> Option<MatchKind> {
        if !self.is_trusted(candidate) {
            return None;
        }
        let path = path_tokens(candidate);
        let tokens = address.tokens();

        // The window is exactly as long as the address, so a bare address
        // tolerates a suffix after it in the path, while an address that
        // names its suffix must repeat it verbatim ("court" and "ct" are not
        // interchangeable).
        if !window_matches(&path, &tokens) {
            return None;
        }

        Some(if address.has_road_suffix() {
            MatchKind::WithSuffix
        } else {
            MatchKind::Bare
        })
    }
}

/// Checks `candidate` against `address` using the default trusted prefix.
#[must_use]
pub fn matches(candidate: &str, address: &NormalizedAddress) -> bool {
    AddressMatcher::default().matches(candidate, address)
}

/// Splits a URL's path into lowercase tokens on `/` and `-`, dropping empty
/// tokens. Query string and fragment are ignored.
///
/// The path is taken verbatim from the text after the authority: `.`/`..`
/// segments are kept as tokens and a `\` does not start a path. Tab, CR and
/// LF are removed first. URLs without a `scheme://` authority yield no
/// tokens.
#[must_use]
pub fn path_tokens(candidate: &str) -> Vec<String> {
    let cleaned: String = candidate
        .chars()
        .filter(|c| !matches!(c, '\t' | '\r' | '\n'))
        .collect();
    raw_path(&cleaned)
        .to_ascii_lowercase()
        .split(['/', '-'])
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Returns the path exactly as written: everything from the first `/` after
/// the authority up to the query or fragment.
fn raw_path(url: &str) -> &str {
    let Some((_, rest)) = url.split_once("://") else {
        return "";
    };
    let rest = rest.find(['?', '#']).map_or(rest, |end| &rest[..end]);
    rest.find('/').map_or("", |start| &rest[start..])
}

/// Finds the first occurrence of `tokens[0]` in `path` and compares the
/// window of `tokens.len()` path tokens starting there.
///
/// Later occurrences of the leading token are never tried.
fn window_matches(path: &[String], tokens: &[&str]) -> bool {
    let Some(first) = tokens.first() else {
        return false;
    };
    let Some(start) = path.iter().position(|t| t == first) else {
        return false;
    };
    path.get(start..start + tokens.len())
        .is_some_and(|window| window.iter().zip(tokens).all(|(p, t)| p == t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    const LISTING: &str = "https://www.redfin.com/OR/Portland/123-Main-St-Springfield-OR-97201/home/1234567";

    #[test]
    fn accepts_exact_match_with_suffix() {
        let addr = normalize("123 Main St");
        assert_eq!(
            AddressMatcher::default().match_kind(LISTING, &addr),
            Some(MatchKind::WithSuffix)
        );
    }

    #[test]
    fn accepts_suffix_followed_by_other_city() {
        let addr = normalize("123 Main St");
        assert!(matches(
            "https://www.redfin.com/x/123-main-st-other-city/home/1",
            &addr
        ));
    }

    #[test]
    fn rejects_different_suffix() {
        let addr = normalize("123 Main St");
        assert!(!matches("https://www.redfin.com/x/123-main-avenue/home/1", &addr));
    }

    #[test]
    fn rejects_suffix_variant() {
        let addr = normalize("5 Oak Court");
        assert!(!matches("https://www.redfin.com/x/5-oak-ct/home/1", &addr));
    }

    #[test]
    fn accepts_bare_address_when_path_has_suffix() {
        let addr = normalize("123 Main");
        assert_eq!(
            AddressMatcher::default()
                .match_kind("https://www.redfin.com/x/123-main-st/home/1", &addr),
            Some(MatchKind::Bare)
        );
    }

    #[test]
    fn rejects_untrusted_host_even_with_verbatim_address() {
        let addr = normalize("123 Main St");
        assert!(!matches("https://www.zillow.com/homedetails/123-main-st/", &addr));
        assert!(!matches("http://www.redfin.com/x/123-main-st/home/1", &addr));
        assert!(!matches("https://redfin.com/x/123-main-st/home/1", &addr));
        assert!(!matches(
            "https://www.redfin.com.example.net/x/123-main-st/home/1",
            &addr
        ));
    }

    #[test]
    fn rejects_empty_and_malformed_urls() {
        let addr = normalize("123 Main St");
        assert!(!matches("", &addr));
        assert!(!matches("not a url", &addr));
        assert!(!matches("www.redfin.com/x/123-main-st", &addr));
    }

    #[test]
    fn rejects_when_leading_token_absent() {
        let addr = normalize("123 Main St");
        assert!(!matches("https://www.redfin.com/x/456-main-st/home/1", &addr));
    }

    #[test]
    fn empty_address_never_matches() {
        let addr = normalize("");
        assert!(!matches(LISTING, &addr));
        assert!(!matches("https://www.redfin.com/", &addr));
        assert!(!matches("https://www.redfin.com//--//", &addr));
    }

    #[test]
    fn only_first_occurrence_of_leading_token_is_tried() {
        let addr = normalize("12 Elm St");
        assert!(!matches(
            "https://www.redfin.com/x/12-oak-ave/12-elm-st/home/1",
            &addr
        ));
    }

    #[test]
    fn rejects_window_running_past_end_of_path() {
        let addr = normalize("123 Main St");
        assert!(!matches("https://www.redfin.com/x/123-main", &addr));
    }

    #[test]
    fn ignores_query_string() {
        let addr = normalize("123 Main St");
        assert!(!matches("https://www.redfin.com/home/1?addr=123-main-st", &addr));
    }

    #[test]
    fn tokenizes_path_on_slashes_and_hyphens() {
        assert_eq!(
            path_tokens("https://www.redfin.com/OR//Portland/4260-SW-Council--Crest-Dr"),
            vec!["or", "portland", "4260", "sw", "council", "crest", "dr"]
        );
        assert!(path_tokens("::").is_empty());
    }

    #[test]
    fn dot_segments_are_not_resolved() {
        let addr = normalize("12 Elm St");
        assert!(!matches(
            "https://www.redfin.com/x/12-oak/../12-elm-st/home/1",
            &addr
        ));
        assert_eq!(
            path_tokens("https://www.redfin.com/a/./b/../c"),
            vec!["a", ".", "b", "..", "c"]
        );
    }

    #[test]
    fn backslashes_do_not_start_a_path() {
        let addr = normalize("12 Elm St");
        assert!(path_tokens(r"https://www.redfin.com\x\12-elm-st").is_empty());
        assert!(!matches(r"https://www.redfin.com\x\12-elm-st", &addr));
    }

    #[test]
    fn raw_path_stops_at_query_or_fragment() {
        assert!(path_tokens("https://www.redfin.com?q=/12-elm-st").is_empty());
        assert_eq!(
            path_tokens("https://www.redfin.com:443/12-Elm#st"),
            vec!["12", "elm"]
        );
    }

    #[test]
    fn tabs_and_newlines_are_dropped_before_tokenizing() {
        let addr = normalize("12 Elm St");
        assert!(matches("https://www.redfin.com/x/12-elm-s\tt/home/1", &addr));
    }

    #[test]
    fn custom_prefix_is_honoured() {
        let matcher = AddressMatcher::new("https://listings.example.com/").unwrap();
        assert_eq!(matcher.trusted_prefix(), "https://listings.example.com");
        let addr = normalize("7 Pine Ln");
        assert!(matcher.matches("https://listings.example.com/7-pine-ln", &addr));
        assert!(!matcher.matches(LISTING, &addr));
        assert!(AddressMatcher::new("not a prefix").is_none());
    }
}
