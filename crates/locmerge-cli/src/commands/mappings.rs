use color_eyre::eyre::{eyre, Result};
use std::path::PathBuf;

use locmerge_services::mapping::{export_config, to_json, FsMappingStore, MappingStore};
use locmerge_services::sources::scan_source_dir;
use locmerge_services::{derive_initial_mappings, parse_config};

/// Derive mappings from a source directory and emit them as a JSON blob.
pub fn run_export(dir: PathBuf, out: Option<PathBuf>) -> Result<()> {
    let scan = scan_source_dir(&dir)?;
    if scan.files.is_empty() {
        return Err(eyre!("no usable XML source files under {}", dir.display()));
    }
    let config = export_config(&derive_initial_mappings(&scan.files));

    match out {
        Some(path) => {
            let store = FsMappingStore::new(&path);
            store.save(&config)?;
            println!("✔ mappings saved to {}", path.display());
        }
        None => println!("{}", to_json(&config)?),
    }
    Ok(())
}

/// Validate a mapping configuration file. A corrupt blob is rejected
/// wholesale; nothing is applied.
pub fn run_import(file: PathBuf) -> Result<()> {
    let blob = std::fs::read_to_string(&file)?;
    let config = parse_config(&blob)?;
    println!(
        "✔ {} mapping(s) valid (last modified {})",
        config.mappings.len(),
        config.last_modified
    );
    Ok(())
}
