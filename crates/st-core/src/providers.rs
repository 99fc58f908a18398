//! Search provider table
//!
//! Maps a provider short-name (the base domain with its public suffix
//! stripped, e.g. `google` for `google.com`) to where that provider puts the
//! search query. The table is fixed once built; lookups are exact.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Error type for provider table construction.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider name is empty")]
    EmptyName,
    #[error("Invalid path prefix for '{name}': {prefix:?} (must start with '/' and end with '?')")]
    InvalidPathPrefix { name: String, prefix: String },
    #[error("Empty query parameter for '{0}'")]
    EmptyQueryParam(String),
    #[error("Duplicate provider: {0}")]
    Duplicate(String),
    #[error("Invalid provider JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where a search provider carries its query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEntry {
    pub name: String,
    pub path_prefix: String,
    pub query_param: String,
}

impl ProviderEntry {
    pub fn new(
        name: impl Into<String>,
        path_prefix: impl Into<String>,
        query_param: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path_prefix: path_prefix.into(),
            query_param: query_param.into(),
        }
    }

    /// Check the entry invariants.
    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.name.is_empty() {
            return Err(ProviderError::EmptyName);
        }
        if !self.path_prefix.starts_with('/') || !self.path_prefix.ends_with('?') {
            return Err(ProviderError::InvalidPathPrefix {
                name: self.name.clone(),
                prefix: self.path_prefix.clone(),
            });
        }
        if self.query_param.is_empty() {
            return Err(ProviderError::EmptyQueryParam(self.name.clone()));
        }
        Ok(())
    }
}

/// Built-in providers as (short-name, path prefix, query parameter).
const BUILTIN_PROVIDERS: &[(&str, &str, &str)] = &[
    ("amazon", "/s?", "k"),
    ("google", "/search?", "q"),
    ("bing", "/search?", "q"),
    ("yahoo", "/search?", "p"),
];

/// Immutable short-name to [`ProviderEntry`] mapping.
#[derive(Debug, Clone)]
pub struct ProviderTable {
    entries: HashMap<String, ProviderEntry>,
}

impl ProviderTable {
    /// The built-in reference set.
    pub fn builtin() -> Self {
        let entries = BUILTIN_PROVIDERS
            .iter()
            .map(|&(name, prefix, param)| (name.to_string(), ProviderEntry::new(name, prefix, param)))
            .collect();
        Self { entries }
    }

    /// Build a table from entries, validating each one.
    pub fn from_entries<I>(entries: I) -> Result<Self, ProviderError>
    where
        I: IntoIterator<Item = ProviderEntry>,
    {
        let mut map = HashMap::new();
        for entry in entries {
            entry.validate()?;
            if map.contains_key(&entry.name) {
                return Err(ProviderError::Duplicate(entry.name));
            }
            map.insert(entry.name.clone(), entry);
        }
        Ok(Self { entries: map })
    }

    /// Build a table from a JSON array of entries.
    ///
    /// ```
    /// use st_core::ProviderTable;
    ///
    /// let table = ProviderTable::from_json(
    ///     r#"[{"name": "duckduckgo", "path_prefix": "/?", "query_param": "q"}]"#,
    /// ).unwrap();
    /// assert!(table.get("duckduckgo").is_some());
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ProviderError> {
        let entries: Vec<ProviderEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&ProviderEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by name.
    pub fn entries(&self) -> Vec<&ProviderEntry> {
        let mut entries: Vec<&ProviderEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }
}

impl Default for ProviderTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let table = ProviderTable::builtin();
        assert_eq!(table.len(), 4);
        assert_eq!(table.get("google").unwrap().query_param, "q");
        assert_eq!(table.get("yahoo").unwrap().query_param, "p");
        assert_eq!(table.get("amazon").unwrap().path_prefix, "/s?");
        assert!(table.get("duckduckgo").is_none());
    }

    #[test]
    fn test_builtin_entries_are_valid() {
        for entry in ProviderTable::builtin().entries() {
            entry.validate().unwrap();
        }
    }

    #[test]
    fn test_lookup_is_exact() {
        let table = ProviderTable::builtin();
        assert!(table.get("Google").is_none());
        assert!(table.get("goog").is_none());
        assert!(table.get("").is_none());
    }

    #[test]
    fn test_entries_sorted() {
        let table = ProviderTable::builtin();
        let names: Vec<&str> = table
            .entries()
            .into_iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, ["amazon", "bing", "google", "yahoo"]);
    }

    #[test]
    fn test_rejects_invalid_prefix() {
        let err = ProviderTable::from_entries([ProviderEntry::new("ddg", "search?", "q")]).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidPathPrefix { .. }));

        let err = ProviderTable::from_entries([ProviderEntry::new("ddg", "/search", "q")]).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidPathPrefix { .. }));
    }

    #[test]
    fn test_rejects_duplicates_and_empty_fields() {
        let err = ProviderTable::from_entries([
            ProviderEntry::new("ddg", "/?", "q"),
            ProviderEntry::new("ddg", "/html?", "q"),
        ])
        .unwrap_err();
        assert!(matches!(err, ProviderError::Duplicate(name) if name == "ddg"));

        assert!(matches!(
            ProviderTable::from_entries([ProviderEntry::new("", "/?", "q")]),
            Err(ProviderError::EmptyName)
        ));
        assert!(matches!(
            ProviderTable::from_entries([ProviderEntry::new("ddg", "/?", "")]),
            Err(ProviderError::EmptyQueryParam(_))
        ));
    }

    #[test]
    fn test_from_json_bad_input() {
        assert!(matches!(ProviderTable::from_json("not json"), Err(ProviderError::Json(_))));
    }
}
