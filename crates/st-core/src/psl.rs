//! Public Suffix List (PSL) backed domain resolution
//!
//! Wraps a parsed [`publicsuffix::List`]. The list text itself is supplied by
//! the caller (a copy of `public_suffix_list.dat`); nothing is bundled or
//! fetched here.
//!
//! Hosts under a TLD the list does not know fall under the implicit `*` rule,
//! so `foo.example.zz` resolves to base domain `example.zz` and suffix `zz`.

use std::fs;
use std::path::Path;

use publicsuffix::{List, Psl};

use crate::domain::{normalize_host, DomainResolver, ResolveError};

/// Domain resolver backed by a Public Suffix List.
pub struct PslResolver {
    list: List,
}

impl PslResolver {
    /// Parse a resolver from PSL text.
    pub fn from_list_text(text: &str) -> Result<Self, ResolveError> {
        let list: List = text
            .parse()
            .map_err(|e: publicsuffix::Error| ResolveError::List(e.to_string()))?;
        Ok(Self { list })
    }

    /// Read and parse a PSL file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ResolveError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| ResolveError::List(format!("{}: {}", path.display(), e)))?;
        Self::from_list_text(&text)
    }

    fn utf8_label(bytes: &[u8], host: &str) -> Result<String, ResolveError> {
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| ResolveError::InvalidHost(host.to_string()))
    }
}

impl std::fmt::Debug for PslResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PslResolver").finish_non_exhaustive()
    }
}

impl DomainResolver for PslResolver {
    fn base_domain(&self, host: &str) -> Result<String, ResolveError> {
        let host = normalize_host(host)?;

        if self.list.suffix(host.as_bytes()).is_none() {
            return Err(ResolveError::UnknownSuffix(host));
        }
        match self.list.domain(host.as_bytes()) {
            Some(domain) => Self::utf8_label(domain.as_bytes(), &host),
            None => Err(ResolveError::InsufficientDomainLevels(host)),
        }
    }

    fn public_suffix(&self, host: &str) -> Result<String, ResolveError> {
        let host = normalize_host(host)?;

        match self.list.suffix(host.as_bytes()) {
            Some(suffix) => Self::utf8_label(suffix.as_bytes(), &host),
            None => Err(ResolveError::UnknownSuffix(host)),
        }
    }
}
