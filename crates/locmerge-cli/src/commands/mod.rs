pub mod mappings;
pub mod merge;
pub mod preview;
pub mod scan;
pub mod sources;

use color_eyre::eyre::{eyre, Result};
use std::path::{Path, PathBuf};

use locmerge_core::LocaleTable;
use locmerge_domain::LocaleMapping;
use locmerge_services::scan::{
    default_resource_dir, find_resource_dirs, load_locale_tables, AndroidResourceDir, LoadedLocale,
    ScanWarning, DEFAULT_MAX_DEPTH,
};
use locmerge_services::sources::{scan_source_dir, SourceScan};
use locmerge_services::{apply_mappings, derive_initial_mappings, parse_config};

pub(crate) struct ProjectContext {
    pub dirs: Vec<AndroidResourceDir>,
    pub selected: AndroidResourceDir,
    pub locales: Vec<LoadedLocale>,
    pub warnings: Vec<ScanWarning>,
}

/// Discover res directories, pick a module and load its locale tables.
/// CLI flags override `locmerge.toml`, which overrides the built-in defaults.
pub(crate) fn load_project(
    root: &Path,
    module: Option<String>,
    max_depth: Option<usize>,
) -> Result<ProjectContext> {
    let cfg = locmerge_config::load_config().unwrap_or_default();
    let depth = max_depth
        .or(cfg.scan.as_ref().and_then(|s| s.max_depth))
        .unwrap_or(DEFAULT_MAX_DEPTH);

    let dirs = find_resource_dirs(root, depth)?;
    let selected = match module.or(cfg.module) {
        Some(name) => dirs
            .iter()
            .find(|d| d.name == name)
            .cloned()
            .ok_or_else(|| {
                let known: Vec<&str> = dirs.iter().map(|d| d.name.as_str()).collect();
                eyre!("module '{name}' not found; available: {}", known.join(", "))
            })?,
        None => default_resource_dir(&dirs)
            .cloned()
            .ok_or_else(|| eyre!("no module discovered"))?,
    };

    let scan = load_locale_tables(&selected.path)?;
    Ok(ProjectContext {
        dirs,
        selected,
        locales: scan.locales,
        warnings: scan.warnings,
    })
}

/// Scan the source directory and resolve the mapping list, either from a
/// configuration file or from the scanner's suggestions.
pub(crate) fn load_effective_sources(
    sources_dir: &Path,
    mappings_path: Option<PathBuf>,
) -> Result<(SourceScan, Vec<LocaleMapping>, Vec<LocaleTable>)> {
    let scan = scan_source_dir(sources_dir)?;
    if scan.files.is_empty() {
        return Err(eyre!(
            "no usable XML source files under {}",
            sources_dir.display()
        ));
    }

    let mappings = match mappings_path {
        Some(path) => {
            let blob = std::fs::read_to_string(&path)?;
            parse_config(&blob)?.mappings
        }
        None => derive_initial_mappings(&scan.files),
    };

    let tables = apply_mappings(&scan.files, &mappings);
    Ok((scan, mappings, tables))
}
