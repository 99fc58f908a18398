//! Search term extraction and key derivation
//!
//! [`SearchTermResolver`] is the public entry point. Domain lookups never
//! fail from the caller's point of view: when the injected resolver errors,
//! the input host comes back unchanged and the failure is logged. A search
//! term of `""` means "no match", not an error.
//!
//! # Examples
//!
//! ```
//! use st_core::{HeuristicResolver, NavigationUri, SearchTermResolver};
//!
//! let resolver = SearchTermResolver::new(HeuristicResolver);
//! let uri = NavigationUri::new("www.bing.com", "/search?q=Rust%20Lang");
//! assert_eq!(resolver.search_term(&uri), "rust lang");
//! assert_eq!(resolver.key_for_host("www.bing.com").len(), 48);
//! ```

use log::{debug, warn};

use crate::domain::DomainResolver;
use crate::hash::{key_with, Hasher, Sha256Hasher};
use crate::providers::ProviderTable;
use crate::uri::{decode_component, parse_query, NavigationUri};

/// What [`SearchTermResolver::summarize`] learns about a URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriSummary {
    pub base_domain: String,
    pub suffix: String,
    pub term: String,
}

/// Extracts search terms and derives keys over an injected domain resolver
/// and hasher.
#[derive(Debug, Clone)]
pub struct SearchTermResolver<R, H = Sha256Hasher> {
    domains: R,
    hasher: H,
    providers: ProviderTable,
}

impl<R: DomainResolver> SearchTermResolver<R, Sha256Hasher> {
    /// Resolver with SHA-256 keys and the built-in provider table.
    pub fn new(domains: R) -> Self {
        Self {
            domains,
            hasher: Sha256Hasher,
            providers: ProviderTable::builtin(),
        }
    }
}

impl<R: DomainResolver, H: Hasher> SearchTermResolver<R, H> {
    /// Swap the hash primitive.
    pub fn with_hasher<H2: Hasher>(self, hasher: H2) -> SearchTermResolver<R, H2> {
        SearchTermResolver {
            domains: self.domains,
            hasher,
            providers: self.providers,
        }
    }

    /// Swap the provider table.
    pub fn with_providers(mut self, providers: ProviderTable) -> Self {
        self.providers = providers;
        self
    }

    pub fn providers(&self) -> &ProviderTable {
        &self.providers
    }

    pub fn domain_resolver(&self) -> &R {
        &self.domains
    }

    // =========================================================================
    // Domain Resolution
    // =========================================================================

    /// Base domain (eTLD+1) of `host`, or `host` itself if it cannot be
    /// resolved.
    pub fn base_domain(&self, host: &str) -> String {
        match self.domains.base_domain(host) {
            Ok(domain) => domain,
            Err(e) => {
                warn!("base domain lookup failed for {host:?}: {e}");
                host.to_string()
            }
        }
    }

    /// Public suffix of the URI's host, or the host itself if it cannot be
    /// resolved.
    pub fn public_suffix(&self, uri: &NavigationUri) -> String {
        match self.domains.public_suffix(&uri.host) {
            Ok(suffix) => suffix,
            Err(e) => {
                warn!("public suffix lookup failed for {:?}: {e}", uri.host);
                uri.host.clone()
            }
        }
    }

    // =========================================================================
    // Search Term Extraction
    // =========================================================================

    /// Normalized search term carried by `uri`, or `""` if the URI is not a
    /// search on a known provider.
    pub fn search_term(&self, uri: &NavigationUri) -> String {
        self.summarize(uri).term
    }

    /// Base domain, public suffix and search term of `uri`, each domain
    /// lookup done once.
    pub fn summarize(&self, uri: &NavigationUri) -> UriSummary {
        let base_domain = self.base_domain(&uri.host);
        let suffix = self.public_suffix(uri);
        let term = self.term_from_parts(uri, &base_domain, &suffix);
        UriSummary {
            base_domain,
            suffix,
            term,
        }
    }

    fn term_from_parts(&self, uri: &NavigationUri, host: &str, suffix: &str) -> String {
        // Both lookups may have fallen back independently
        if !host.contains(suffix) {
            debug!("suffix {suffix:?} not within base domain {host:?}");
            return String::new();
        }

        let short_name = provider_short_name(host, suffix);
        let Some(provider) = self.providers.get(short_name) else {
            debug!("no search provider for {short_name:?}");
            return String::new();
        };

        let Some(query) = uri.path.strip_prefix(provider.path_prefix.as_str()) else {
            debug!(
                "path {:?} does not start with {:?} for {}",
                uri.path, provider.path_prefix, provider.name
            );
            return String::new();
        };

        let params = parse_query(query);
        if params.is_empty() {
            warn!("no query parameters in {query:?} for {}", provider.name);
            return String::new();
        }

        let Some(value) = params.get(&provider.query_param) else {
            return String::new();
        };

        // Values come out of the query parser decoded once already
        match decode_component(value) {
            Ok(decoded) => normalize_term(&decoded),
            Err(e) => {
                warn!("failed to decode {} search term: {e}", provider.name);
                String::new()
            }
        }
    }

    // =========================================================================
    // Key Derivation
    // =========================================================================

    /// Key for an arbitrary string.
    #[inline]
    pub fn key_for(&self, input: &str) -> String {
        key_with(&self.hasher, input)
    }

    /// Key for the base domain of `host`.
    pub fn key_for_host(&self, host: &str) -> String {
        self.key_for(&self.base_domain(host))
    }

    /// Key for a query string, taken as-is.
    pub fn key_for_query(&self, query: &str) -> String {
        self.key_for(query)
    }
}

/// Strip `"." + suffix` from the end of `host` by length.
///
/// Saturates at zero; a cut that lands inside a multibyte character yields
/// an empty name.
fn provider_short_name<'a>(host: &'a str, suffix: &str) -> &'a str {
    let end = host.len().saturating_sub(suffix.len() + 1);
    host.get(..end).unwrap_or("")
}

/// Lowercase and turn the first `+` into a space.
///
/// Only the first `+` is replaced. Multi-word terms that still carry `+`
/// after decoding keep the rest.
fn normalize_term(decoded: &str) -> String {
    decoded.to_lowercase().replacen('+', " ", 1)
}
