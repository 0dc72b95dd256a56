use color_eyre::eyre::{eyre, Result};
use std::path::PathBuf;

use locmerge_services::{execute_merge, generate_preview};

use super::{load_effective_sources, load_project};
use crate::ui;

#[allow(clippy::too_many_arguments)]
pub fn run_merge(
    root: PathBuf,
    module: Option<String>,
    sources: PathBuf,
    mappings: Option<PathBuf>,
    replace_existing: bool,
    dry_run: bool,
    backup: bool,
    format: &str,
    use_color: bool,
) -> Result<()> {
    let cfg = locmerge_config::load_config().unwrap_or_default();
    let backup = backup || cfg.merge.as_ref().and_then(|m| m.backup).unwrap_or(false);

    let ctx = load_project(&root, module, None)?;
    let (_, _, tables) = load_effective_sources(&sources, mappings)?;

    if dry_run {
        let previews = generate_preview(&tables, &ctx.locales, replace_existing);
        println!("DRY-RUN plan:");
        for preview in &previews {
            println!(
                "  {:<16} +{} ~{}{}",
                preview.folder_name,
                preview.add_count,
                preview.overwrite_count,
                if preview.is_new_file { "  (new file)" } else { "" }
            );
        }
        let total: usize = previews
            .iter()
            .map(|p| p.add_count + p.overwrite_count)
            .sum();
        println!("TOTAL: {total} change(s)");
        return Ok(());
    }

    let result = execute_merge(
        &ctx.selected.path,
        &tables,
        &ctx.locales,
        replace_existing,
        backup,
    );

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for status in &result.per_locale {
            ui::print_locale_status(status, use_color);
        }
    }

    if !result.success {
        let failed = result.per_locale.iter().filter(|s| !s.success).count();
        return Err(eyre!("merge failed for {failed} locale(s)"));
    }
    Ok(())
}
