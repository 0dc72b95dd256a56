//! Line-level merge preview. Pure: a function of the effective source
//! tables, the loaded targets and the replace-existing flag. All I/O lives
//! in the scanners and the executor.

use std::collections::HashMap;
use std::ops::Range;

use locmerge_core::LocaleTable;
use locmerge_domain::{DiffLineKind, MergePreviewDetail, XmlDiffLine};
use locmerge_parsers_xml::{render_entry, StringsDocument, DEFAULT_INDENT};

use crate::scan::LoadedLocale;

/// One planned in-place replacement inside the original target text.
#[derive(Debug, Clone)]
pub struct EntryUpdate {
    pub key: String,
    /// Byte range of the whole original element.
    pub span: Range<usize>,
    /// Serialized replacement value (inner content).
    pub new_raw: String,
}

/// Per-locale merge plan: the rendered preview plus the byte-precise edits
/// the executor applies. Derived, never persisted.
#[derive(Debug)]
pub struct LocalePlan {
    pub folder_name: String,
    pub locale: String,
    pub is_new_file: bool,
    pub indent: String,
    pub updates: Vec<EntryUpdate>,
    /// (key, serialized value) pairs appended inside `<resources>`.
    pub adds: Vec<(String, String)>,
    pub preview: MergePreviewDetail,
}

impl LocalePlan {
    pub fn has_changes(&self) -> bool {
        !self.updates.is_empty() || !self.adds.is_empty()
    }
}

fn unchanged(content: &str, line_number: usize) -> XmlDiffLine {
    XmlDiffLine {
        kind: DiffLineKind::Unchanged,
        content: content.to_string(),
        line_number: Some(line_number),
    }
}

/// Plan the merge of one effective source table into its target locale.
pub fn plan_locale(
    source: &LocaleTable,
    target: Option<&LoadedLocale>,
    replace_existing: bool,
) -> LocalePlan {
    match target.and_then(|t| t.document.as_ref().map(|doc| (t, doc))) {
        Some((target, doc)) => plan_existing(source, target, doc, replace_existing),
        None => plan_new_file(source),
    }
}

/// No target file yet: every source entry becomes an add line. There is no
/// existing content to show, so the diff carries no unchanged lines.
fn plan_new_file(source: &LocaleTable) -> LocalePlan {
    let mut diff_lines = Vec::with_capacity(source.len());
    let mut adds = Vec::with_capacity(source.len());
    for entry in source.iter() {
        diff_lines.push(XmlDiffLine {
            kind: DiffLineKind::Add,
            content: render_entry(DEFAULT_INDENT, &entry.key, &entry.raw),
            line_number: None,
        });
        adds.push((entry.key.clone(), entry.raw.clone()));
    }
    let add_count = adds.len();
    LocalePlan {
        folder_name: source.folder_name.clone(),
        locale: source.locale.clone(),
        is_new_file: true,
        indent: DEFAULT_INDENT.to_string(),
        updates: Vec::new(),
        adds,
        preview: MergePreviewDetail {
            locale: source.locale.clone(),
            folder_name: source.folder_name.clone(),
            is_new_file: true,
            add_count,
            overwrite_count: 0,
            diff_lines,
        },
    }
}

/// Walk the target's original lines in order. Only entries the source
/// redefines with a different value become update pairs (when replacing);
/// everything else — identical values, target-only keys, comments, other
/// resource elements, the document scaffolding — is emitted verbatim.
/// Source keys absent from the target are appended after the walk, in
/// source order.
fn plan_existing(
    source: &LocaleTable,
    target: &LoadedLocale,
    doc: &StringsDocument,
    replace_existing: bool,
) -> LocalePlan {
    let lines = doc.lines();

    // First entry starting on each line; last occurrence per key. The table
    // resolves duplicate keys to the last occurrence, so only that element
    // is eligible for replacement.
    let mut start_index: HashMap<usize, usize> = HashMap::new();
    let mut last_of_key: HashMap<&str, usize> = HashMap::new();
    for (i, entry) in doc.entries.iter().enumerate() {
        start_index.entry(entry.start_line).or_insert(i);
        last_of_key.insert(entry.key.as_str(), i);
    }

    let mut diff_lines: Vec<XmlDiffLine> = Vec::with_capacity(lines.len() + source.len());
    let mut updates: Vec<EntryUpdate> = Vec::new();

    let mut line_no = 1usize;
    while line_no <= lines.len() {
        let Some(&ei) = start_index.get(&line_no) else {
            diff_lines.push(unchanged(lines[line_no - 1], line_no));
            line_no += 1;
            continue;
        };
        let entry = &doc.entries[ei];
        let is_last_occurrence = last_of_key.get(entry.key.as_str()) == Some(&ei);
        let replacement = source
            .get(&entry.key)
            .filter(|s| s.value != entry.value)
            .filter(|_| replace_existing && is_last_occurrence);

        if let Some(new_entry) = replacement {
            diff_lines.push(XmlDiffLine {
                kind: DiffLineKind::UpdateOld,
                content: doc.entry_lines(entry),
                line_number: Some(entry.start_line),
            });
            diff_lines.push(XmlDiffLine {
                kind: DiffLineKind::UpdateNew,
                content: render_entry(doc.entry_indent(entry), &entry.key, &new_entry.raw),
                line_number: None,
            });
            updates.push(EntryUpdate {
                key: entry.key.clone(),
                span: entry.span.clone(),
                new_raw: new_entry.raw.clone(),
            });
        } else {
            for l in entry.start_line..=entry.end_line {
                diff_lines.push(unchanged(lines[l - 1], l));
            }
        }
        line_no = entry.end_line + 1;
    }

    let mut adds: Vec<(String, String)> = Vec::new();
    for entry in source.iter() {
        if target.table.contains_key(&entry.key) {
            continue;
        }
        diff_lines.push(XmlDiffLine {
            kind: DiffLineKind::Add,
            content: render_entry(&doc.indent, &entry.key, &entry.raw),
            line_number: None,
        });
        adds.push((entry.key.clone(), entry.raw.clone()));
    }

    let add_count = adds.len();
    let overwrite_count = updates.len();
    LocalePlan {
        folder_name: target.folder_name.clone(),
        locale: target.locale.clone(),
        is_new_file: false,
        indent: doc.indent.clone(),
        updates,
        adds,
        preview: MergePreviewDetail {
            locale: target.locale.clone(),
            folder_name: target.folder_name.clone(),
            is_new_file: false,
            add_count,
            overwrite_count,
            diff_lines,
        },
    }
}

/// Plan every effective source table against the loaded targets, ordered by
/// folder name so output is stable regardless of scheduling.
pub fn plan_all(
    sources: &[LocaleTable],
    targets: &[LoadedLocale],
    replace_existing: bool,
) -> Vec<LocalePlan> {
    let mut plans: Vec<LocalePlan> = sources
        .iter()
        .map(|source| {
            let target = targets.iter().find(|t| t.folder_name == source.folder_name);
            plan_locale(source, target, replace_existing)
        })
        .collect();
    plans.sort_by(|a, b| a.folder_name.cmp(&b.folder_name));
    plans
}

/// The preview list handed to renderers.
pub fn generate_preview(
    sources: &[LocaleTable],
    targets: &[LoadedLocale],
    replace_existing: bool,
) -> Vec<MergePreviewDetail> {
    plan_all(sources, targets, replace_existing)
        .into_iter()
        .map(|plan| plan.preview)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use locmerge_core::ResourceEntry;
    use locmerge_parsers_xml::parse_strings_xml;

    fn table(folder: &str, locale: &str, pairs: &[(&str, &str)]) -> LocaleTable {
        let mut table = LocaleTable::new(locale, folder);
        for (k, v) in pairs {
            table.insert(ResourceEntry {
                key: (*k).to_string(),
                value: locmerge_parsers_xml::unescape_text(v),
                raw: (*v).to_string(),
            });
        }
        table
    }

    fn loaded(folder: &str, locale: &str, xml: &str) -> LoadedLocale {
        let document = parse_strings_xml(xml).unwrap();
        LoadedLocale {
            folder_name: folder.to_string(),
            locale: locale.to_string(),
            path: std::path::PathBuf::from(format!("{folder}/strings.xml")),
            table: document.to_table(locale, folder),
            document: Some(document),
        }
    }

    const TARGET: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
<resources>\n\
    <string name=\"app_name\">Foo</string>\n\
    <string name=\"greeting\">Hi</string>\n\
</resources>\n";

    fn kinds(preview: &MergePreviewDetail) -> Vec<DiffLineKind> {
        preview.diff_lines.iter().map(|l| l.kind).collect()
    }

    #[test]
    fn replace_existing_emits_update_pair_and_append() {
        let source = table(
            "values",
            "",
            &[("app_name", "Foo"), ("greeting", "Hello"), ("farewell", "Bye")],
        );
        let target = loaded("values", "", TARGET);
        let plan = plan_locale(&source, Some(&target), true);
        let p = &plan.preview;

        assert_eq!(p.add_count, 1);
        assert_eq!(p.overwrite_count, 1);
        assert!(!p.is_new_file);
        assert_eq!(
            kinds(p),
            vec![
                DiffLineKind::Unchanged, // <?xml …?>
                DiffLineKind::Unchanged, // <resources>
                DiffLineKind::Unchanged, // app_name
                DiffLineKind::UpdateOld,
                DiffLineKind::UpdateNew,
                DiffLineKind::Unchanged, // </resources>
                DiffLineKind::Add,
            ]
        );

        let old = &p.diff_lines[3];
        assert_eq!(old.content, "    <string name=\"greeting\">Hi</string>");
        assert_eq!(old.line_number, Some(4));
        let new = &p.diff_lines[4];
        assert_eq!(new.content, "    <string name=\"greeting\">Hello</string>");
        assert_eq!(new.line_number, None);
        assert_eq!(
            p.diff_lines[6].content,
            "    <string name=\"farewell\">Bye</string>"
        );
    }

    #[test]
    fn keep_existing_never_pairs() {
        let source = table(
            "values",
            "",
            &[("app_name", "Foo"), ("greeting", "Hello"), ("farewell", "Bye")],
        );
        let target = loaded("values", "", TARGET);
        let plan = plan_locale(&source, Some(&target), false);
        let p = &plan.preview;

        assert_eq!(p.add_count, 1);
        assert_eq!(p.overwrite_count, 0);
        assert!(p
            .diff_lines
            .iter()
            .all(|l| !matches!(l.kind, DiffLineKind::UpdateOld | DiffLineKind::UpdateNew)));
        // the target's value wins, verbatim
        assert!(p
            .diff_lines
            .iter()
            .any(|l| l.content.contains(">Hi<") && l.kind == DiffLineKind::Unchanged));
        assert!(plan.updates.is_empty());
    }

    #[test]
    fn absent_target_is_all_adds() {
        let source = table("values-fr", "fr", &[("a", "Un"), ("b", "Deux")]);
        let plan = plan_locale(&source, None, true);
        let p = &plan.preview;

        assert!(p.is_new_file);
        assert_eq!(p.add_count, 2);
        assert_eq!(p.overwrite_count, 0);
        assert_eq!(kinds(p), vec![DiffLineKind::Add, DiffLineKind::Add]);
        assert_eq!(p.diff_lines[0].content, "    <string name=\"a\">Un</string>");
    }

    #[test]
    fn folder_without_strings_file_is_a_new_file() {
        let source = table("values-de", "de", &[("a", "Eins")]);
        let target = LoadedLocale {
            folder_name: "values-de".to_string(),
            locale: "de".to_string(),
            path: std::path::PathBuf::from("values-de/strings.xml"),
            document: None,
            table: LocaleTable::new("de", "values-de"),
        };
        let plan = plan_locale(&source, Some(&target), true);
        assert!(plan.preview.is_new_file);
        assert_eq!(plan.preview.add_count, 1);
    }

    #[test]
    fn entity_encoding_differences_compare_equal() {
        let xml = "<resources>\n    <string name=\"duo\">Tom &amp; Jerry</string>\n</resources>\n";
        let target = loaded("values", "", xml);
        let source = table("values", "", &[("duo", "Tom &#38; Jerry")]);
        let plan = plan_locale(&source, Some(&target), true);
        assert_eq!(plan.preview.overwrite_count, 0);
        assert_eq!(plan.preview.add_count, 0);
        assert!(plan
            .preview
            .diff_lines
            .iter()
            .all(|l| l.kind == DiffLineKind::Unchanged));
    }

    #[test]
    fn no_changes_means_only_unchanged_lines() {
        let source = table("values", "", &[("app_name", "Foo")]);
        let target = loaded("values", "", TARGET);
        let plan = plan_locale(&source, Some(&target), true);
        assert_eq!(plan.preview.add_count + plan.preview.overwrite_count, 0);
        assert!(plan
            .preview
            .diff_lines
            .iter()
            .all(|l| l.kind == DiffLineKind::Unchanged));
        assert!(!plan.has_changes());
    }

    #[test]
    fn target_only_keys_keep_relative_order() {
        let xml = "<resources>\n\
    <string name=\"first\">1</string>\n\
    <string name=\"second\">2</string>\n\
    <string name=\"third\">3</string>\n\
</resources>\n";
        let target = loaded("values", "", xml);
        let source = table("values", "", &[("second", "two")]);
        let plan = plan_locale(&source, Some(&target), true);

        let unchanged_entries: Vec<&str> = plan
            .preview
            .diff_lines
            .iter()
            .filter(|l| l.kind == DiffLineKind::Unchanged && l.content.contains("<string"))
            .map(|l| l.content.as_str())
            .collect();
        assert!(unchanged_entries[0].contains("first"));
        assert!(unchanged_entries[1].contains("third"));
    }

    #[test]
    fn adds_preserve_source_order() {
        let target = loaded("values", "", TARGET);
        let source = table(
            "values",
            "",
            &[("zeta", "z"), ("alpha", "a")],
        );
        let plan = plan_locale(&source, Some(&target), true);
        let adds: Vec<&str> = plan
            .preview
            .diff_lines
            .iter()
            .filter(|l| l.kind == DiffLineKind::Add)
            .map(|l| l.content.as_str())
            .collect();
        assert_eq!(adds.len(), 2);
        assert!(adds[0].contains("zeta"));
        assert!(adds[1].contains("alpha"));
    }

    #[test]
    fn comments_and_foreign_elements_pass_through_verbatim() {
        let xml = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
<resources>\n\
    <!-- branding -->\n\
    <string name=\"app_name\">Foo</string>\n\
    <color name=\"accent\">#f00</color>\n\
</resources>\n";
        let target = loaded("values", "", xml);
        let source = table("values", "", &[("app_name", "Bar")]);
        let plan = plan_locale(&source, Some(&target), true);
        let contents: Vec<&str> = plan
            .preview
            .diff_lines
            .iter()
            .filter(|l| l.kind == DiffLineKind::Unchanged)
            .map(|l| l.content.as_str())
            .collect();
        assert!(contents.contains(&"    <!-- branding -->"));
        assert!(contents.contains(&"    <color name=\"accent\">#f00</color>"));
    }

    #[test]
    fn previews_are_sorted_by_folder() {
        let sources = vec![
            table("values-fr", "fr", &[("a", "1")]),
            table("values", "", &[("a", "1")]),
        ];
        let previews = generate_preview(&sources, &[], true);
        let folders: Vec<&str> = previews.iter().map(|p| p.folder_name.as_str()).collect();
        assert_eq!(folders, ["values", "values-fr"]);
    }
}
