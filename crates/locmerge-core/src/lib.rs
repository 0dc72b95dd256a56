use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Error taxonomy shared across crates. Parse and write failures carry the
/// file or locale they belong to so callers can report partial success.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no Android resource directory (src/main/res) found under {0}")]
    NoResourceDir(String),
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
    #[error("invalid mapping configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to write {path}: {message}")]
    Write { path: String, message: String },
    #[error("selection aborted")]
    Aborted,
}

/// One `<string>` resource. `value` is the XML-unescaped text used for
/// comparisons; `raw` keeps the serialized inner content exactly as it
/// appeared in (or will be written to) the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub key: String,
    pub value: String,
    pub raw: String,
}

/// Insertion-ordered key/value table for one locale folder.
///
/// Iteration order is the original file order. Re-inserting an existing key
/// replaces the value but keeps the key's original position, so a duplicate
/// key inside one file resolves to its last occurrence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocaleTable {
    /// Locale qualifier, e.g. "en" or "zh-rCN"; empty for the default locale.
    pub locale: String,
    /// Resource folder name, e.g. "values" or "values-zh-rCN".
    pub folder_name: String,
    entries: IndexMap<String, ResourceEntry>,
}

impl LocaleTable {
    pub fn new(locale: impl Into<String>, folder_name: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            folder_name: folder_name.into(),
            entries: IndexMap::new(),
        }
    }

    pub fn insert(&mut self, entry: ResourceEntry) {
        self.entries.insert(entry.key.clone(), entry);
    }

    pub fn get(&self, key: &str) -> Option<&ResourceEntry> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceEntry> {
        self.entries.values()
    }

    /// Union another table into this one, last write wins per key.
    pub fn merge_from(&mut self, other: &LocaleTable) {
        for entry in other.iter() {
            self.insert(entry.clone());
        }
    }
}
