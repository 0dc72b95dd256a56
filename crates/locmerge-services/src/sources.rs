use std::path::Path;

use locmerge_core::{LocaleTable, Result};
use locmerge_locales::{infer_from_file_name, Confidence};
use locmerge_parsers_xml::parse_strings_xml;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::scan::ScanWarning;

/// One parsed translation file from the source directory. Immutable after
/// creation; a rescan replaces the whole set.
#[derive(Debug)]
pub struct SourceXmlFile {
    pub file_name: String,
    pub table: LocaleTable,
    pub suggested_folder: String,
    pub suggested_locale: String,
    pub confidence: Confidence,
}

#[derive(Debug, Default)]
pub struct SourceScan {
    pub files: Vec<SourceXmlFile>,
    pub invalid: Vec<ScanWarning>,
}

/// Recursively parse every `*.xml` under `dir`. A file that fails to parse
/// is excluded and reported; it never aborts the scan.
pub fn scan_source_dir(dir: &Path) -> Result<SourceScan> {
    let mut scan = SourceScan::default();

    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        let is_xml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("xml"))
            .unwrap_or(false);
        if !entry.file_type().is_file() || !is_xml {
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!(event = "source_read_failed", path = %path.display(), error = %e);
                scan.invalid.push(ScanWarning {
                    path: path.display().to_string(),
                    message: e.to_string(),
                });
                continue;
            }
        };

        match parse_strings_xml(&text) {
            Ok(document) => {
                let guess = infer_from_file_name(&file_name);
                let table = document.to_table(&guess.locale, &guess.folder);
                debug!(
                    event = "source_parsed",
                    file = %file_name,
                    entries = table.len(),
                    folder = %guess.folder,
                );
                scan.files.push(SourceXmlFile {
                    file_name,
                    table,
                    suggested_folder: guess.folder,
                    suggested_locale: guess.locale,
                    confidence: guess.confidence,
                });
            }
            Err(e) => {
                warn!(event = "source_parse_failed", path = %path.display(), error = %e);
                scan.invalid.push(ScanWarning {
                    path: path.display().to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    scan.files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(scan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn scans_nested_files_and_suggests_locales() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("strings_zh-CN.xml"),
            "<resources>\n    <string name=\"a\">甲</string>\n</resources>\n",
        );
        write(
            &dir.path().join("nested/japanese.xml"),
            "<resources>\n    <string name=\"a\">あ</string>\n</resources>\n",
        );
        write(&dir.path().join("notes.txt"), "not xml");

        let scan = scan_source_dir(dir.path()).unwrap();
        assert_eq!(scan.files.len(), 2);
        assert_eq!(scan.files[0].file_name, "japanese.xml");
        assert_eq!(scan.files[0].suggested_folder, "values-ja");
        assert_eq!(scan.files[1].suggested_folder, "values-zh-rCN");
        assert_eq!(scan.files[1].suggested_locale, "zh-rCN");
    }

    #[test]
    fn invalid_file_is_reported_and_excluded() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("good.xml"),
            "<resources>\n    <string name=\"a\">x</string>\n</resources>\n",
        );
        write(&dir.path().join("broken.xml"), "<resources><string name=");

        let scan = scan_source_dir(dir.path()).unwrap();
        assert_eq!(scan.files.len(), 1);
        assert_eq!(scan.invalid.len(), 1);
        assert!(scan.invalid[0].path.contains("broken.xml"));
    }

    #[test]
    fn unrecognized_name_defaults_to_values() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("translations.xml"),
            "<resources>\n    <string name=\"a\">x</string>\n</resources>\n",
        );

        let scan = scan_source_dir(dir.path()).unwrap();
        assert_eq!(scan.files[0].suggested_folder, "values");
        assert_eq!(scan.files[0].suggested_locale, "");
        assert_eq!(scan.files[0].confidence, Confidence::Low);
    }
}
