use serde::Deserialize;

/// Optional defaults loaded from `locmerge.toml`. CLI flags always win;
/// the CWD file wins over the user-level file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocmergeConfig {
    /// Preferred module when a project contains several res directories.
    pub module: Option<String>,
    pub replace_existing: Option<bool>,
    /// Path of a saved mapping configuration to load by default.
    pub mappings_path: Option<String>,
    pub scan: Option<ScanCfg>,
    pub merge: Option<MergeCfg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanCfg {
    /// Directory depth bound for the resource-tree walk.
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MergeCfg {
    pub backup: Option<bool>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{0}")]
    Other(String),
}

pub fn load_config() -> Result<LocmergeConfig, ConfigError> {
    // Search order: CWD/locmerge.toml, $HOME/.config/locmerge/locmerge.toml
    let mut merged = LocmergeConfig::default();
    if let Ok(p) = std::env::current_dir() {
        let path = p.join("locmerge.toml");
        if let Ok(s) = std::fs::read_to_string(&path) {
            if let Ok(cfg) = toml::from_str::<LocmergeConfig>(&s) {
                merged = merge(merged, cfg);
            }
        }
    }
    if let Some(base) = dirs::config_dir() {
        let path = base.join("locmerge").join("locmerge.toml");
        if let Ok(s) = std::fs::read_to_string(&path) {
            if let Ok(cfg) = toml::from_str::<LocmergeConfig>(&s) {
                merged = merge(merged, cfg);
            }
        }
    }
    Ok(merged)
}

fn merge(mut a: LocmergeConfig, b: LocmergeConfig) -> LocmergeConfig {
    if a.module.is_none() {
        a.module = b.module;
    }
    if a.replace_existing.is_none() {
        a.replace_existing = b.replace_existing;
    }
    if a.mappings_path.is_none() {
        a.mappings_path = b.mappings_path;
    }
    a.scan = merge_opt(a.scan, b.scan, merge_scan);
    a.merge = merge_opt(a.merge, b.merge, merge_merge);
    a
}

fn merge_opt<T: Default>(a: Option<T>, b: Option<T>, f: fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (None, Some(b)) => Some(b),
        (Some(a), None) => Some(a),
        (None, None) => None,
    }
}

fn merge_scan(mut a: ScanCfg, b: ScanCfg) -> ScanCfg {
    if a.max_depth.is_none() {
        a.max_depth = b.max_depth;
    }
    a
}

fn merge_merge(mut a: MergeCfg, b: MergeCfg) -> MergeCfg {
    if a.backup.is_none() {
        a.backup = b.backup;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let cfg: LocmergeConfig = toml::from_str(
            r#"
module = "app"
replace_existing = false

[scan]
max_depth = 8

[merge]
backup = true
"#,
        )
        .unwrap();
        assert_eq!(cfg.module.as_deref(), Some("app"));
        assert_eq!(cfg.replace_existing, Some(false));
        assert_eq!(cfg.scan.unwrap().max_depth, Some(8));
        assert_eq!(cfg.merge.unwrap().backup, Some(true));
    }

    #[test]
    fn first_layer_wins_on_merge() {
        let cwd: LocmergeConfig = toml::from_str("module = \"app\"").unwrap();
        let user: LocmergeConfig =
            toml::from_str("module = \"library\"\nreplace_existing = true").unwrap();
        let merged = merge(cwd, user);
        assert_eq!(merged.module.as_deref(), Some("app"));
        assert_eq!(merged.replace_existing, Some(true));
    }
}
