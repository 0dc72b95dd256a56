use std::path::{Path, PathBuf};

use locmerge_core::{Error, LocaleTable};
use locmerge_domain::{LocaleStatus, MergeResult};
use locmerge_parsers_xml::{render_entry, synthesize_strings_xml};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::diff::{plan_all, LocalePlan};
use crate::scan::LoadedLocale;
use crate::util::{backup_file, write_atomic};

/// Apply the planned merge. Locales are independent: each file is serialized
/// fully in memory and written atomically; one locale failing never blocks
/// the others. Callers must serialize merge invocations per target directory
/// and re-scan afterwards — the executor does not refresh in-memory targets.
pub fn execute_merge(
    res_path: &Path,
    sources: &[LocaleTable],
    targets: &[LoadedLocale],
    replace_existing: bool,
    backup: bool,
) -> MergeResult {
    let plans = plan_all(sources, targets, replace_existing);

    let mut per_locale: Vec<LocaleStatus> = plans
        .par_iter()
        .map(|plan| apply_plan(res_path, targets, plan, backup))
        .collect();
    per_locale.sort_by(|a, b| a.folder_name.cmp(&b.folder_name));

    let success = per_locale.iter().all(|s| s.success);
    MergeResult {
        success,
        per_locale,
    }
}

fn apply_plan(
    res_path: &Path,
    targets: &[LoadedLocale],
    plan: &LocalePlan,
    backup: bool,
) -> LocaleStatus {
    if !plan.has_changes() {
        return LocaleStatus {
            locale: plan.locale.clone(),
            folder_name: plan.folder_name.clone(),
            status: "skipped".to_string(),
            success: true,
            error: None,
        };
    }

    match write_plan(res_path, targets, plan, backup) {
        Ok(status) => {
            info!(event = "locale_written", folder = %plan.folder_name, status = status);
            LocaleStatus {
                locale: plan.locale.clone(),
                folder_name: plan.folder_name.clone(),
                status: status.to_string(),
                success: true,
                error: None,
            }
        }
        Err(e) => {
            warn!(event = "locale_write_failed", folder = %plan.folder_name, error = %e);
            LocaleStatus {
                locale: plan.locale.clone(),
                folder_name: plan.folder_name.clone(),
                status: "failed".to_string(),
                success: false,
                error: Some(e.to_string()),
            }
        }
    }
}

fn write_plan(
    res_path: &Path,
    targets: &[LoadedLocale],
    plan: &LocalePlan,
    backup: bool,
) -> locmerge_core::Result<&'static str> {
    let target = targets.iter().find(|t| t.folder_name == plan.folder_name);
    let path: PathBuf = target
        .map(|t| t.path.clone())
        .unwrap_or_else(|| res_path.join(&plan.folder_name).join("strings.xml"));

    let write_err = |e: std::io::Error| Error::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    match target.and_then(|t| t.document.as_ref()) {
        None => {
            // Fresh file: a minimal well-formed document of the added entries.
            let text =
                synthesize_strings_xml(plan.adds.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            write_atomic(&path, text.as_bytes()).map_err(write_err)?;
            Ok("created")
        }
        Some(doc) => {
            let mut text = doc.text.clone();

            // Insert the appended entries before </resources> first: the
            // insertion point lies after every update span, so the spans
            // recorded against the original text stay valid.
            if !plan.adds.is_empty() {
                let close = doc.close_offset.ok_or_else(|| Error::Write {
                    path: path.display().to_string(),
                    message: "no </resources> element to append into".to_string(),
                })?;
                let line_start = text[..close].rfind('\n').map(|i| i + 1).unwrap_or(0);
                let mut block = String::new();
                let insert_at = if text[line_start..close].trim().is_empty() {
                    line_start
                } else {
                    block.push('\n');
                    close
                };
                for (key, raw) in &plan.adds {
                    block.push_str(&render_entry(&plan.indent, key, raw));
                    block.push('\n');
                }
                text.insert_str(insert_at, &block);
            }

            let mut updates: Vec<_> = plan.updates.iter().collect();
            updates.sort_by(|a, b| b.span.start.cmp(&a.span.start));
            for update in updates {
                text.replace_range(
                    update.span.clone(),
                    &render_entry("", &update.key, &update.new_raw),
                );
            }

            if backup {
                backup_file(&path).map_err(write_err)?;
            }
            write_atomic(&path, text.as_bytes()).map_err(write_err)?;
            Ok("updated")
        }
    }
}
