//! Text normalization for matching keys
//!
//! Venue names, websites, and postcodes arrive from scrapers and manual
//! entry in every imaginable casing and punctuation. Matching never happens
//! on raw values; everything funnels through these canonicalizers first.

use unicode_normalization::UnicodeNormalization;
use url::Url;

/// Generic venue words carrying no identity.
const NAME_STOPWORDS: [&str; 7] = [
    "the", "shopping", "centre", "center", "mall", "park", "retail",
];

/// Normalize a venue name for comparison
///
/// - Removes diacritics
/// - Converts to lowercase
/// - Drops the generic venue stopwords (whole words only)
/// - Strips everything that is not ASCII alphanumeric
///
/// "The Pentagon Shopping Centre" and "Pentagon Centre" both reduce to
/// `"pentagon"`. Never use the result as a display value.
pub fn normalize_name(raw: &str) -> String {
    // NFKD splits off combining marks; mapping every non-alphanumeric to a
    // space keeps word boundaries so "theatre" is not mangled by "the".
    let folded: String = raw
        .nfkd()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();

    folded
        .split_whitespace()
        .filter(|word| !NAME_STOPWORDS.contains(word))
        .collect()
}

/// Canonicalize a website URL, or `None` when it cannot be parsed
///
/// Lowercases, assumes `https://` when no scheme is present, strips a
/// leading `www.` from the host and a trailing `/` from the path, and
/// returns `host + path`. Two URLs differing only in scheme, `www.`,
/// trailing slash, or case are equal after normalization.
pub fn normalize_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().to_lowercase();
    if trimmed.is_empty() {
        return None;
    }
    let with_scheme = if trimmed.contains("://") {
        trimmed
    } else {
        format!("https://{}", trimmed)
    };
    let parsed = Url::parse(&with_scheme).ok()?;
    let host = parsed.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    let path = parsed.path();
    let path = path.strip_suffix('/').unwrap_or(path);
    Some(format!("{}{}", host, path))
}

/// Normalize a postcode for exact bucketing: strip whitespace, uppercase.
pub fn normalize_postcode(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
