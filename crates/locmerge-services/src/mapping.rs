use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use locmerge_core::{Error, LocaleTable, Result};
use locmerge_domain::{LocaleMapping, MappingConfig};
use tracing::debug;

use crate::sources::SourceXmlFile;
use crate::util::write_atomic;

/// One enabled mapping per source file, seeded from the scanner suggestions.
pub fn derive_initial_mappings(files: &[SourceXmlFile]) -> Vec<LocaleMapping> {
    files
        .iter()
        .map(|f| LocaleMapping {
            source_file_name: f.file_name.clone(),
            target_folder: f.suggested_folder.clone(),
            locale: f.suggested_locale.clone(),
            enabled: true,
            entry_count: f.table.len(),
        })
        .collect()
}

/// Immutable update: a new list with `enabled` flipped at `index`.
/// An out-of-range index returns the list unchanged.
pub fn toggled(mappings: &[LocaleMapping], index: usize) -> Vec<LocaleMapping> {
    mappings
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let mut m = m.clone();
            if i == index {
                m.enabled = !m.enabled;
            }
            m
        })
        .collect()
}

/// Field-level override for exactly one mapping.
#[derive(Debug, Clone, Default)]
pub struct MappingPatch {
    pub target_folder: Option<String>,
    pub locale: Option<String>,
    pub enabled: Option<bool>,
}

/// Immutable update: a new list with `patch` applied at `index` only.
pub fn updated(mappings: &[LocaleMapping], index: usize, patch: &MappingPatch) -> Vec<LocaleMapping> {
    mappings
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let mut m = m.clone();
            if i == index {
                if let Some(folder) = &patch.target_folder {
                    m.target_folder = folder.clone();
                    // keep the derived locale in sync when the folder is canonical
                    if let Some(locale) = locmerge_locales::locale_of(folder) {
                        m.locale = locale;
                    }
                }
                if let Some(locale) = &patch.locale {
                    m.locale = locale.clone();
                }
                if let Some(enabled) = patch.enabled {
                    m.enabled = enabled;
                }
            }
            m
        })
        .collect()
}

/// Build one effective source table per distinct target folder.
///
/// Mappings are applied in list order; two files mapped to the same folder
/// are unioned with last-processed-wins per key.
pub fn apply_mappings(files: &[SourceXmlFile], mappings: &[LocaleMapping]) -> Vec<LocaleTable> {
    let mut grouped: IndexMap<String, LocaleTable> = IndexMap::new();

    for mapping in mappings.iter().filter(|m| m.enabled) {
        let Some(file) = files.iter().find(|f| f.file_name == mapping.source_file_name) else {
            continue;
        };
        let locale = locmerge_locales::locale_of(&mapping.target_folder)
            .unwrap_or_else(|| mapping.locale.clone());
        let table = grouped
            .entry(mapping.target_folder.clone())
            .or_insert_with(|| LocaleTable::new(locale, mapping.target_folder.clone()));
        table.merge_from(&file.table);
        debug!(
            event = "mapping_applied",
            file = %mapping.source_file_name,
            folder = %mapping.target_folder,
            entries = table.len(),
        );
    }

    grouped.into_values().collect()
}

/// Snapshot the mapping list into the interchange blob.
pub fn export_config(mappings: &[LocaleMapping]) -> MappingConfig {
    MappingConfig {
        mappings: mappings.to_vec(),
        last_modified: chrono::Utc::now().to_rfc3339(),
    }
}

pub fn to_json(config: &MappingConfig) -> Result<String> {
    Ok(serde_json::to_string_pretty(config)?)
}

/// Parse an imported blob. Rejected wholesale — a corrupt blob, a missing
/// field, or a duplicate `sourceFileName` yields [`Error::InvalidConfig`]
/// and the caller keeps its prior mappings.
pub fn parse_config(blob: &str) -> Result<MappingConfig> {
    let config: MappingConfig = serde_json::from_str(blob)
        .map_err(|e| Error::InvalidConfig(e.to_string()))?;

    let mut seen: HashSet<&str> = HashSet::new();
    for mapping in &config.mappings {
        if !seen.insert(mapping.source_file_name.as_str()) {
            return Err(Error::InvalidConfig(format!(
                "duplicate sourceFileName: {}",
                mapping.source_file_name
            ))
            .into());
        }
    }
    Ok(config)
}

/// Persisted mapping store. The engine only needs load/save; where the blob
/// lives (file, browser storage, …) is a collaborator concern.
pub trait MappingStore {
    fn load(&self) -> Result<Option<MappingConfig>>;
    fn save(&self, config: &MappingConfig) -> Result<()>;
}

/// JSON-file implementation used by the CLI.
#[derive(Debug, Clone)]
pub struct FsMappingStore {
    path: PathBuf,
}

impl FsMappingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MappingStore for FsMappingStore {
    fn load(&self) -> Result<Option<MappingConfig>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let blob = std::fs::read_to_string(&self.path)?;
        parse_config(&blob).map(Some)
    }

    fn save(&self, config: &MappingConfig) -> Result<()> {
        let blob = to_json(config)?;
        write_atomic(&self.path, blob.as_bytes())?;
        Ok(())
    }
}
