use color_eyre::eyre::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;

use super::load_project;

pub fn run_scan(
    root: PathBuf,
    module: Option<String>,
    max_depth: Option<usize>,
    format: &str,
    use_color: bool,
) -> Result<()> {
    let ctx = load_project(&root, module, max_depth)?;

    if format == "json" {
        let modules: Vec<_> = ctx
            .dirs
            .iter()
            .map(|d| {
                serde_json::json!({
                    "name": d.name,
                    "path": d.path.display().to_string(),
                    "selected": *d == ctx.selected,
                })
            })
            .collect();
        let locales: Vec<_> = ctx
            .locales
            .iter()
            .map(|l| {
                serde_json::json!({
                    "folderName": l.folder_name,
                    "locale": l.locale,
                    "entries": l.table.len(),
                    "hasFile": l.document.is_some(),
                })
            })
            .collect();
        let warnings: Vec<_> = ctx
            .warnings
            .iter()
            .map(|w| serde_json::json!({ "path": w.path, "message": w.message }))
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "modules": modules,
                "locales": locales,
                "warnings": warnings,
            }))?
        );
        return Ok(());
    }

    println!("Modules:");
    for dir in &ctx.dirs {
        let marker = if *dir == ctx.selected { "*" } else { " " };
        println!("  {marker} {}  {}", dir.name, dir.path.display());
    }

    println!("Locales in {}:", ctx.selected.name);
    for locale in &ctx.locales {
        let note = if locale.document.is_some() {
            format!("{} entries", locale.table.len())
        } else {
            "no strings.xml".to_string()
        };
        println!("    {:<16} {note}", locale.folder_name);
    }

    for warning in &ctx.warnings {
        let msg = format!("⚠ {}: {}", warning.path, warning.message);
        if use_color {
            eprintln!("{}", msg.yellow());
        } else {
            eprintln!("{msg}");
        }
    }
    Ok(())
}
