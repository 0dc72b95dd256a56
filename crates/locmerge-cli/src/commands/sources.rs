use color_eyre::eyre::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;

use locmerge_services::sources::scan_source_dir;

pub fn run_sources(dir: PathBuf, format: &str, use_color: bool) -> Result<()> {
    let scan = scan_source_dir(&dir)?;

    if format == "json" {
        let files: Vec<_> = scan
            .files
            .iter()
            .map(|f| {
                serde_json::json!({
                    "fileName": f.file_name,
                    "entries": f.table.len(),
                    "suggestedFolder": f.suggested_folder,
                    "suggestedLocale": f.suggested_locale,
                    "confidence": f.confidence,
                })
            })
            .collect();
        let invalid: Vec<_> = scan
            .invalid
            .iter()
            .map(|w| serde_json::json!({ "path": w.path, "message": w.message }))
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(
                &serde_json::json!({ "files": files, "invalid": invalid })
            )?
        );
        return Ok(());
    }

    for file in &scan.files {
        println!(
            "{:<32} → {:<16} ({} entries, {:?})",
            file.file_name,
            file.suggested_folder,
            file.table.len(),
            file.confidence
        );
    }
    for warning in &scan.invalid {
        let msg = format!("⚠ invalid: {} — {}", warning.path, warning.message);
        if use_color {
            eprintln!("{}", msg.yellow());
        } else {
            eprintln!("{msg}");
        }
    }
    Ok(())
}
