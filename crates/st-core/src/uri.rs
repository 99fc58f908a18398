//! Navigation URI and query string helpers

use std::collections::HashMap;

/// Error type for URI handling.
#[derive(Debug, thiserror::Error)]
pub enum UriError {
    #[error("Invalid URL: {0}")]
    Parse(#[from] url::ParseError),
    #[error("URL has no host: {0}")]
    MissingHost(String),
    #[error("Malformed percent escape in {0:?}")]
    MalformedEscape(String),
    #[error("Decoded value is not valid UTF-8")]
    InvalidUtf8,
}

/// The parts of a navigation URI the search term logic reads.
///
/// `path` keeps the query string: `/search?q=rust`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationUri {
    pub host: String,
    pub path: String,
}

impl NavigationUri {
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
        }
    }

    /// Parse an absolute URL. The fragment is dropped.
    pub fn parse(input: &str) -> Result<Self, UriError> {
        let url = url::Url::parse(input)?;
        let host = url
            .host_str()
            .ok_or_else(|| UriError::MissingHost(input.to_string()))?
            .to_string();

        let path = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };

        Ok(Self { host, path })
    }
}

impl std::str::FromStr for NavigationUri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// =============================================================================
// Query Parameter Handling
// =============================================================================

/// Split a query string into name/value pairs.
///
/// Names and values are percent-decoded once with [`decode_component`]; a
/// part that fails to decode is kept as written. `+` is not turned into a
/// space. Empty pairs are skipped and the last occurrence of a repeated name
/// wins.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();

    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = match pair.find('=') {
            Some(eq_pos) => (&pair[..eq_pos], &pair[eq_pos + 1..]),
            None => (pair, ""),
        };
        if key.is_empty() {
            continue;
        }
        params.insert(decode_lenient(key), decode_lenient(value));
    }

    params
}

fn decode_lenient(part: &str) -> String {
    decode_component(part).unwrap_or_else(|_| part.to_string())
}

/// Percent-decode a URI component.
///
/// `+` is left alone. A `%` not followed by two hex digits, or escapes that
/// decode to invalid UTF-8, are errors. `urlencoding::decode` passes bad
/// escapes through untouched, hence the scan before it.
pub fn decode_component(value: &str) -> Result<String, UriError> {
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let well_formed = i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !well_formed {
                return Err(UriError::MalformedEscape(value.to_string()));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    urlencoding::decode(value)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| UriError::InvalidUtf8)
}
