use color_eyre::eyre::Result;
use std::path::PathBuf;

use locmerge_services::generate_preview;

use super::{load_effective_sources, load_project};
use crate::ui;

#[allow(clippy::too_many_arguments)]
pub fn run_preview(
    root: PathBuf,
    module: Option<String>,
    sources: PathBuf,
    mappings: Option<PathBuf>,
    replace_existing: bool,
    folder: Option<String>,
    format: &str,
    use_color: bool,
) -> Result<()> {
    let ctx = load_project(&root, module, None)?;
    let (_, _, tables) = load_effective_sources(&sources, mappings)?;

    let mut previews = generate_preview(&tables, &ctx.locales, replace_existing);
    if let Some(folder) = folder {
        previews.retain(|p| p.folder_name == folder);
    }

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&previews)?);
        return Ok(());
    }

    let total_add: usize = previews.iter().map(|p| p.add_count).sum();
    let total_overwrite: usize = previews.iter().map(|p| p.overwrite_count).sum();
    for preview in &previews {
        ui::print_preview(preview, use_color);
        println!();
    }
    println!(
        "{} locale(s) · +{} added · ~{} updated",
        previews.len(),
        total_add,
        total_overwrite
    );
    Ok(())
}
