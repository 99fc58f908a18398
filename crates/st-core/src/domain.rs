//! Domain resolution for eTLD+1 and public suffix lookups
//!
//! [`DomainResolver`] is the seam between the search term logic and whatever
//! knows about public suffixes. [`HeuristicResolver`] needs no list data and
//! is what surfaces fall back to before a real list is loaded; see
//! [`crate::psl::PslResolver`] for the list-backed implementation.
//!
//! # Examples
//!
//! ```
//! use st_core::domain::{DomainResolver, HeuristicResolver};
//!
//! let resolver = HeuristicResolver;
//! assert_eq!(resolver.base_domain("sub.example.com").unwrap(), "example.com");
//! assert_eq!(resolver.base_domain("sub.example.co.uk").unwrap(), "example.co.uk");
//! ```

use std::net::IpAddr;

/// Error type for domain resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Empty host")]
    EmptyHost,
    #[error("Host is an IP address: {0}")]
    IpAddress(String),
    #[error("Host has no label below its public suffix: {0}")]
    InsufficientDomainLevels(String),
    #[error("Invalid host: {0}")]
    InvalidHost(String),
    #[error("Unknown public suffix for host: {0}")]
    UnknownSuffix(String),
    #[error("Failed to load suffix list: {0}")]
    List(String),
}

/// Effective TLD resolution service.
///
/// Implementations may fail for malformed or unknown hosts; callers that need
/// a value no matter what go through [`crate::SearchTermResolver`], which
/// falls back to the input host.
pub trait DomainResolver {
    /// Registrable domain (eTLD+1) of `host`.
    fn base_domain(&self, host: &str) -> Result<String, ResolveError>;

    /// Public suffix (eTLD) of `host`.
    fn public_suffix(&self, host: &str) -> Result<String, ResolveError>;
}

impl<R: DomainResolver + ?Sized> DomainResolver for Box<R> {
    fn base_domain(&self, host: &str) -> Result<String, ResolveError> {
        (**self).base_domain(host)
    }

    fn public_suffix(&self, host: &str) -> Result<String, ResolveError> {
        (**self).public_suffix(host)
    }
}

impl<R: DomainResolver + ?Sized> DomainResolver for &R {
    fn base_domain(&self, host: &str) -> Result<String, ResolveError> {
        (**self).base_domain(host)
    }

    fn public_suffix(&self, host: &str) -> Result<String, ResolveError> {
        (**self).public_suffix(host)
    }
}

// =============================================================================
// Host Normalization
// =============================================================================

/// Lowercase a host, strip a trailing dot, and reject hosts no suffix lookup
/// can answer for.
pub(crate) fn normalize_host(host: &str) -> Result<String, ResolveError> {
    let host = host.trim().trim_end_matches('.').to_lowercase();
    if host.is_empty() {
        return Err(ResolveError::EmptyHost);
    }

    let unbracketed = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(&host);
    if unbracketed.parse::<IpAddr>().is_ok() {
        return Err(ResolveError::IpAddress(host));
    }

    let labels_ok = host.split('.').all(|label| {
        !label.is_empty()
            && label
                .bytes()
                .all(|b| !b.is_ascii() || b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    });
    if !labels_ok {
        return Err(ResolveError::InvalidHost(host));
    }

    Ok(host)
}

// =============================================================================
// Heuristic Resolver
// =============================================================================

/// Common two-part public suffixes recognised without a list.
const COMMON_TWO_PART_TLDS: &[&str] = &[
    "co.uk", "co.jp", "co.nz", "co.za", "co.in", "co.kr",
    "com.au", "com.br", "com.cn", "com.mx", "com.tw", "com.hk",
    "net.au", "net.nz",
    "org.uk", "org.au",
    "gov.uk", "gov.au",
    "ac.uk", "ac.jp",
    "ne.jp", "or.jp",
];

/// List-free resolver: the suffix is the last label, or the last two when
/// they form a common two-part suffix.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicResolver;

impl HeuristicResolver {
    /// Number of trailing labels that make up the suffix.
    fn suffix_len(labels: &[&str]) -> usize {
        let n = labels.len();
        if n >= 2 {
            let last_two = format!("{}.{}", labels[n - 2], labels[n - 1]);
            if COMMON_TWO_PART_TLDS.contains(&last_two.as_str()) {
                return 2;
            }
        }
        1
    }
}

impl DomainResolver for HeuristicResolver {
    fn base_domain(&self, host: &str) -> Result<String, ResolveError> {
        let host = normalize_host(host)?;
        let labels: Vec<&str> = host.split('.').collect();
        let n = labels.len();
        let suffix_len = Self::suffix_len(&labels);

        if n <= suffix_len {
            return Err(ResolveError::InsufficientDomainLevels(host.clone()));
        }
        Ok(labels[n - suffix_len - 1..].join("."))
    }

    fn public_suffix(&self, host: &str) -> Result<String, ResolveError> {
        let host = normalize_host(host)?;
        let labels: Vec<&str> = host.split('.').collect();
        let n = labels.len();
        let suffix_len = Self::suffix_len(&labels);
        Ok(labels[n - suffix_len..].join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_base_domain_simple() {
        let r = HeuristicResolver;
        assert_eq!(r.base_domain("example.com").unwrap(), "example.com");
        assert_eq!(r.base_domain("sub.example.com").unwrap(), "example.com");
        assert_eq!(r.base_domain("WWW.Google.COM.").unwrap(), "google.com");
    }

    #[test]
    fn test_heuristic_base_domain_two_part() {
        let r = HeuristicResolver;
        assert_eq!(r.base_domain("sub.example.co.uk").unwrap(), "example.co.uk");
        assert_eq!(r.base_domain("example.co.uk").unwrap(), "example.co.uk");
    }

    #[test]
    fn test_heuristic_public_suffix() {
        let r = HeuristicResolver;
        assert_eq!(r.public_suffix("www.google.com").unwrap(), "com");
        assert_eq!(r.public_suffix("www.amazon.co.uk").unwrap(), "co.uk");
        assert_eq!(r.public_suffix("com").unwrap(), "com");
    }

    #[test]
    fn test_heuristic_insufficient_levels() {
        let r = HeuristicResolver;
        assert_eq!(
            r.base_domain("com"),
            Err(ResolveError::InsufficientDomainLevels("com".to_string()))
        );
        assert!(matches!(
            r.base_domain("co.uk"),
            Err(ResolveError::InsufficientDomainLevels(_))
        ));
    }

    #[test]
    fn test_normalize_rejects_bad_hosts() {
        assert_eq!(normalize_host(""), Err(ResolveError::EmptyHost));
        assert_eq!(normalize_host("."), Err(ResolveError::EmptyHost));
        assert!(matches!(normalize_host("127.0.0.1"), Err(ResolveError::IpAddress(_))));
        assert!(matches!(normalize_host("[::1]"), Err(ResolveError::IpAddress(_))));
        assert!(matches!(normalize_host("a..com"), Err(ResolveError::InvalidHost(_))));
        assert!(matches!(normalize_host("not a host"), Err(ResolveError::InvalidHost(_))));
    }

    #[test]
    fn test_boxed_resolver_delegates() {
        let boxed: Box<dyn DomainResolver + Send + Sync> = Box::new(HeuristicResolver);
        assert_eq!(boxed.base_domain("www.bing.com").unwrap(), "bing.com");
        assert_eq!(boxed.public_suffix("www.bing.com").unwrap(), "com");
    }
}
