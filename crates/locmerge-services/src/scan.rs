use std::path::{Path, PathBuf};

use locmerge_core::{Error, LocaleTable, Result};
use locmerge_parsers_xml::{parse_strings_xml, StringsDocument};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Default bound for the project walk; deep enough for any sane Gradle
/// layout, shallow enough to not crawl vendored trees.
pub const DEFAULT_MAX_DEPTH: usize = 6;

/// Directories never descended into. Build outputs regenerate their own res
/// folders and must not surface as modules.
const SKIPPED_DIRS: &[&str] = &["build", ".gradle", ".git", ".idea", "node_modules", "target"];

/// One discovered `res` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AndroidResourceDir {
    /// Module name, the directory containing `src/main/res`.
    pub name: String,
    pub path: PathBuf,
}

/// Recoverable per-file problem collected during a scan.
#[derive(Debug, Clone)]
pub struct ScanWarning {
    pub path: String,
    pub message: String,
}

/// One locale folder of a selected resource dir. `document` is `None` when
/// the folder has no strings.xml yet (it may exist only for dimens etc.).
#[derive(Debug)]
pub struct LoadedLocale {
    pub folder_name: String,
    pub locale: String,
    pub path: PathBuf,
    pub document: Option<StringsDocument>,
    pub table: LocaleTable,
}

#[derive(Debug, Default)]
pub struct LocaleScan {
    pub locales: Vec<LoadedLocale>,
    pub warnings: Vec<ScanWarning>,
}

fn is_skipped(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| SKIPPED_DIRS.contains(&name))
            .unwrap_or(false)
}

/// Walk `project_root` looking for `*/src/main/res` directories.
///
/// Returns one entry per module, ordered by module name. Fails with
/// [`Error::NoResourceDir`] when the walk finds nothing.
pub fn find_resource_dirs(project_root: &Path, max_depth: usize) -> Result<Vec<AndroidResourceDir>> {
    let mut dirs: Vec<AndroidResourceDir> = Vec::new();

    for entry in WalkDir::new(project_root)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|e| !is_skipped(e))
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_dir() {
            continue;
        }
        let path = entry.path();
        if !ends_with_res_path(path) {
            continue;
        }
        let module_dir = path
            .ancestors()
            .nth(3)
            .unwrap_or(project_root);
        let name = module_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| project_root.display().to_string());
        debug!(event = "res_dir_found", module = %name, path = %path.display());
        dirs.push(AndroidResourceDir {
            name,
            path: path.to_path_buf(),
        });
    }

    if dirs.is_empty() {
        return Err(Error::NoResourceDir(project_root.display().to_string()).into());
    }
    dirs.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
    Ok(dirs)
}

fn ends_with_res_path(path: &Path) -> bool {
    let mut comps = path.components().rev();
    matches!(
        (comps.next(), comps.next(), comps.next()),
        (Some(res), Some(main), Some(src))
            if res.as_os_str() == "res" && main.as_os_str() == "main" && src.as_os_str() == "src"
    )
}

/// Default-selection rule for multi-module projects: a module literally
/// named `app` wins, otherwise the first discovered module.
pub fn default_resource_dir(dirs: &[AndroidResourceDir]) -> Option<&AndroidResourceDir> {
    dirs.iter()
        .find(|d| d.name.eq_ignore_ascii_case("app"))
        .or_else(|| dirs.first())
}

/// Load the locale tables of one resource directory.
///
/// Only immediate subfolders matching the `values(-xx(-rYY)?)` convention are
/// considered. A folder without strings.xml yields an empty table; a folder
/// with malformed XML is skipped and reported as a warning.
pub fn load_locale_tables(res_dir: &Path) -> Result<LocaleScan> {
    let mut scan = LocaleScan::default();

    for entry in std::fs::read_dir(res_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let folder_name = entry.file_name().to_string_lossy().into_owned();
        let Some(locale) = locmerge_locales::locale_of(&folder_name) else {
            continue;
        };

        let path = entry.path().join("strings.xml");
        if !path.exists() {
            scan.locales.push(LoadedLocale {
                table: LocaleTable::new(locale.clone(), folder_name.clone()),
                folder_name,
                locale,
                path,
                document: None,
            });
            continue;
        }

        let text = std::fs::read_to_string(&path)?;
        match parse_strings_xml(&text) {
            Ok(document) => {
                let table = document.to_table(&locale, &folder_name);
                debug!(event = "locale_loaded", folder = %folder_name, entries = table.len());
                scan.locales.push(LoadedLocale {
                    folder_name,
                    locale,
                    path,
                    document: Some(document),
                    table,
                });
            }
            Err(e) => {
                warn!(event = "locale_parse_failed", folder = %folder_name, error = %e);
                scan.warnings.push(ScanWarning {
                    path: path.display().to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    scan.locales.sort_by(|a, b| a.folder_name.cmp(&b.folder_name));
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
    fn finds_modules_and_prefers_app() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(
            &root.join("library/src/main/res/values/strings.xml"),
            "<resources/>",
        );
        write(
            &root.join("app/src/main/res/values/strings.xml"),
            "<resources/>",
        );
        // build output must not be surfaced as a module
        write(
            &root.join("app/build/intermediates/src/main/res/values/strings.xml"),
            "<resources/>",
        );

        let dirs = find_resource_dirs(root, DEFAULT_MAX_DEPTH).unwrap();
        let names: Vec<&str> = dirs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["app", "library"]);
        assert_eq!(default_resource_dir(&dirs).unwrap().name, "app");
    }

    #[test]
    fn missing_res_dir_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_resource_dirs(dir.path(), DEFAULT_MAX_DEPTH).unwrap_err();
        assert!(err.to_string().contains("no Android resource directory"));
    }

    #[test]
    fn loads_locale_folders_and_skips_others() {
        let dir = tempfile::tempdir().unwrap();
        let res = dir.path().join("res");
        write(
            &res.join("values/strings.xml"),
            "<resources>\n    <string name=\"app_name\">Foo</string>\n</resources>\n",
        );
        write(
            &res.join("values-fr/strings.xml"),
            "<resources>\n    <string name=\"app_name\">Toto</string>\n</resources>\n",
        );
        // locale folder without strings.xml: empty table, not an error
        std::fs::create_dir_all(res.join("values-de")).unwrap();
        write(&res.join("values-de/dimens.xml"), "<resources/>");
        // unrelated resource folder
        write(&res.join("drawable/icon.xml"), "<vector/>");

        let scan = load_locale_tables(&res).unwrap();
        let folders: Vec<&str> = scan
            .locales
            .iter()
            .map(|l| l.folder_name.as_str())
            .collect();
        assert_eq!(folders, ["values", "values-de", "values-fr"]);
        assert!(scan.locales[1].table.is_empty());
        assert!(scan.locales[1].document.is_none());
        assert_eq!(scan.locales[2].locale, "fr");
        assert!(scan.warnings.is_empty());
    }

    #[test]
    fn malformed_locale_is_a_warning_not_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let res = dir.path().join("res");
        write(
            &res.join("values/strings.xml"),
            "<resources>\n    <string name=\"ok\">fine</string>\n</resources>\n",
        );
        write(&res.join("values-it/strings.xml"), "<resources><string");

        let scan = load_locale_tables(&res).unwrap();
        assert_eq!(scan.locales.len(), 1);
        assert_eq!(scan.warnings.len(), 1);
        assert!(scan.warnings[0].path.contains("values-it"));
    }
}
