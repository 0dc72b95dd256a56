//! High-level orchestration layer over the parser and locale crates.
//! Intentionally thin: exposes stable functions used by the CLI (and any
//! future GUI shell) without those clients importing parser crates.

pub mod diff;
pub mod mapping;
pub mod merge;
pub mod scan;
pub mod sources;
pub mod util;

pub use locmerge_core::{Error, LocaleTable, ResourceEntry, Result};
pub use locmerge_domain::{
    LocaleMapping, LocaleStatus, MappingConfig, MergePreviewDetail, MergeResult, XmlDiffLine,
};

pub use diff::generate_preview;
pub use mapping::{apply_mappings, derive_initial_mappings, export_config, parse_config};
pub use merge::execute_merge;
pub use scan::{find_resource_dirs, load_locale_tables, AndroidResourceDir};
pub use sources::{scan_source_dir, SourceXmlFile};
pub use util::{Generation, GenerationToken};
