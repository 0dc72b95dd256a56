use locmerge_domain::{DiffLineKind, LocaleStatus, MergePreviewDetail};
use owo_colors::OwoColorize;

pub fn print_preview(preview: &MergePreviewDetail, use_color: bool) {
    let header = format!(
        "{}/strings.xml  +{} ~{}{}",
        preview.folder_name,
        preview.add_count,
        preview.overwrite_count,
        if preview.is_new_file { "  (new file)" } else { "" }
    );
    if use_color {
        println!("{}", header.bold());
    } else {
        println!("{header}");
    }

    for line in &preview.diff_lines {
        match line.kind {
            DiffLineKind::Unchanged => {
                let no = line.line_number.unwrap_or(0);
                println!("{no:>4}  {}", line.content);
            }
            DiffLineKind::UpdateOld => {
                let no = line.line_number.unwrap_or(0);
                if use_color {
                    println!("{no:>4}{} {}", "-".red(), line.content.red());
                } else {
                    println!("{no:>4}- {}", line.content);
                }
            }
            DiffLineKind::UpdateNew | DiffLineKind::Add => {
                if use_color {
                    println!("   {} {}", "+".green(), line.content.green());
                } else {
                    println!("   + {}", line.content);
                }
            }
        }
    }
}

pub fn print_locale_status(status: &LocaleStatus, use_color: bool) {
    let tag = if status.success { "✔" } else { "✖" };
    let line = match &status.error {
        Some(err) => format!("{tag} {}: {} — {err}", status.folder_name, status.status),
        None => format!("{tag} {}: {}", status.folder_name, status.status),
    };
    if !use_color {
        println!("{line}");
    } else if status.success {
        println!("{}", line.green());
    } else {
        println!("{}", line.red());
    }
}
