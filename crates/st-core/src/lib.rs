//! SearchTerm Core Library
//!
//! This crate turns a browser navigation URI into a normalized search term and
//! derives stable, non-reversible keys for hosts and query strings.
//!
//! # Architecture
//!
//! Everything is a pure function of its input plus three injected pieces:
//! a [`DomainResolver`] for eTLD+1 and public suffix lookups, a [`Hasher`]
//! for key derivation, and an immutable [`ProviderTable`] of known search
//! engines. Resolution failures degrade to the input host instead of
//! surfacing to the caller.
//!
//! # Modules
//!
//! - `domain`: `DomainResolver` trait and the list-free heuristic resolver
//! - `psl`: Public Suffix List backed resolver
//! - `hash`: SHA-256 key derivation
//! - `providers`: Search provider table
//! - `uri`: Navigation URI and query string helpers
//! - `resolver`: `SearchTermResolver`, the public entry point

pub mod domain;
pub mod hash;
pub mod providers;
pub mod psl;
pub mod resolver;
pub mod uri;

// Re-export commonly used types
pub use domain::{DomainResolver, HeuristicResolver, ResolveError};
pub use hash::{key_for, Hasher, Sha256Hasher, KEY_BYTES, KEY_HEX_LEN};
pub use providers::{ProviderEntry, ProviderError, ProviderTable};
pub use psl::PslResolver;
pub use resolver::{SearchTermResolver, UriSummary};
pub use uri::{NavigationUri, UriError};
