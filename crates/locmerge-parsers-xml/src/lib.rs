use std::borrow::Cow;
use std::ops::Range;

use color_eyre::eyre::eyre;
use locmerge_core::{LocaleTable, ResourceEntry, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

pub const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>";
pub const DEFAULT_INDENT: &str = "    ";

/// One `<string name="…">…</string>` element located in a parsed file.
#[derive(Debug, Clone)]
pub struct ParsedEntry {
    pub key: String,
    /// Inner content with XML entities resolved; used for value comparison.
    pub value: String,
    /// Inner content exactly as serialized in the file (entities intact,
    /// nested markup such as `<b>` included).
    pub raw: String,
    /// 1-based line of the element's opening `<`.
    pub start_line: usize,
    /// 1-based line of the element's closing `>`.
    pub end_line: usize,
    /// Byte range of the whole element, opening tag through closing tag.
    pub span: Range<usize>,
}

/// A parsed `strings.xml` with enough positional detail to splice edits back
/// into the original text without disturbing anything else.
#[derive(Debug, Clone)]
pub struct StringsDocument {
    pub text: String,
    pub entries: Vec<ParsedEntry>,
    /// Indentation of the first string entry, or four spaces.
    pub indent: String,
    /// Byte offset of the `<` of `</resources>`, when present.
    pub close_offset: Option<usize>,
    line_starts: Vec<usize>,
}

/// Build the list of line start offsets (byte positions).
fn line_starts_of(text: &str) -> Vec<usize> {
    let mut starts = Vec::with_capacity(256);
    starts.push(0);
    for (i, b) in text.as_bytes().iter().enumerate() {
        if *b == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

/// Translate a byte position into a 1-based line number.
fn byte_pos_to_line(pos: usize, starts: &[usize]) -> usize {
    let idx = starts.partition_point(|&s| s <= pos);
    idx.max(1)
}

/// Resolve XML entities; malformed escapes fall back to the raw text so a
/// sloppy value never aborts a whole scan.
pub fn unescape_text(raw: &str) -> String {
    quick_xml::escape::unescape(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

/// Escape a plain-text value for embedding as element content.
pub fn escape_text(value: &str) -> String {
    quick_xml::escape::escape(value).into_owned()
}

/// Render one entry line ready for insertion into a `<resources>` document.
pub fn render_entry(indent: &str, key: &str, raw_value: &str) -> String {
    format!("{indent}<string name=\"{key}\">{raw_value}</string>")
}

/// Produce a minimal well-formed document for a locale folder that has no
/// `strings.xml` yet. `entries` are (key, serialized value) pairs.
pub fn synthesize_strings_xml<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = String::new();
    out.push_str(XML_DECL);
    out.push('\n');
    out.push_str("<resources>\n");
    for (key, raw) in entries {
        out.push_str(&render_entry(DEFAULT_INDENT, key, raw));
        out.push('\n');
    }
    out.push_str("</resources>\n");
    out
}

/// Parse `strings.xml` text. `<string>` children of the root are extracted
/// with exact byte spans and line numbers; every other node (comments, other
/// resource element types, the declaration) is left untouched in `text` and
/// treated as opaque content by the callers.
pub fn parse_strings_xml(xml: &str) -> Result<StringsDocument> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let line_starts = line_starts_of(xml);
    let mut entries: Vec<ParsedEntry> = Vec::new();
    let mut close_offset: Option<usize> = None;
    let mut depth = 0usize;

    loop {
        let pos_before = reader.buffer_position() as usize;
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if depth == 1 && e.name().as_ref() == b"string" {
                    let key = match string_key(&e) {
                        Some(k) => k,
                        None => {
                            // Unnamed <string> cannot be addressed; skip it
                            // and keep it as opaque content.
                            reader.read_to_end(e.name()).map_err(|err| {
                                eyre!("unterminated <string> element: {err}")
                            })?;
                            continue;
                        }
                    };
                    let content = reader
                        .read_to_end(e.name())
                        .map_err(|err| eyre!("unterminated <string> element: {err}"))?;
                    let elem_end = reader.buffer_position() as usize;
                    let raw = xml[content.start as usize..content.end as usize].to_string();
                    entries.push(ParsedEntry {
                        key,
                        value: unescape_text(&raw),
                        raw,
                        start_line: byte_pos_to_line(pos_before, &line_starts),
                        end_line: byte_pos_to_line(elem_end.saturating_sub(1), &line_starts),
                        span: pos_before..elem_end,
                    });
                } else {
                    depth += 1;
                }
            }
            Ok(Event::Empty(e)) => {
                if depth == 1 && e.name().as_ref() == b"string" {
                    if let Some(key) = string_key(&e) {
                        let elem_end = reader.buffer_position() as usize;
                        entries.push(ParsedEntry {
                            key,
                            value: String::new(),
                            raw: String::new(),
                            start_line: byte_pos_to_line(pos_before, &line_starts),
                            end_line: byte_pos_to_line(elem_end.saturating_sub(1), &line_starts),
                            span: pos_before..elem_end,
                        });
                    }
                }
            }
            Ok(Event::End(e)) => {
                depth = depth.saturating_sub(1);
                if depth == 0 && e.name().as_ref() == b"resources" {
                    close_offset = Some(pos_before);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(eyre!(
                    "XML parse error at byte {}: {e}",
                    reader.buffer_position()
                ))
            }
        }
    }

    let indent = detect_indent(xml, &entries, &line_starts);
    Ok(StringsDocument {
        text: xml.to_string(),
        entries,
        indent,
        close_offset,
        line_starts,
    })
}

fn string_key(e: &quick_xml::events::BytesStart<'_>) -> Option<String> {
    let attr = e.try_get_attribute("name").ok().flatten()?;
    Some(
        attr.unescape_value()
            .map(Cow::into_owned)
            .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned()),
    )
}

fn detect_indent(xml: &str, entries: &[ParsedEntry], line_starts: &[usize]) -> String {
    if let Some(first) = entries.first() {
        let line_start = line_starts[first.start_line - 1];
        let prefix = &xml[line_start..first.span.start];
        if prefix.chars().all(|c| c == ' ' || c == '\t') {
            return prefix.to_string();
        }
    }
    DEFAULT_INDENT.to_string()
}

impl StringsDocument {
    /// Physical lines of the original text, without line terminators.
    pub fn lines(&self) -> Vec<&str> {
        self.text.lines().collect()
    }

    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }

    /// 1-based line number of the line containing `</resources>`.
    pub fn close_line(&self) -> Option<usize> {
        self.close_offset
            .map(|off| byte_pos_to_line(off, &self.line_starts))
    }

    /// Verbatim text of the physical lines an entry occupies.
    pub fn entry_lines(&self, entry: &ParsedEntry) -> String {
        let lines = self.lines();
        lines[entry.start_line - 1..entry.end_line]
            .join("\n")
    }

    /// Leading whitespace of the line an entry starts on.
    pub fn entry_indent(&self, entry: &ParsedEntry) -> &str {
        let line_start = self.line_starts[entry.start_line - 1];
        &self.text[line_start..entry.span.start]
    }

    /// Collapse the parsed entries into an ordered table. A duplicate key
    /// keeps its first position and takes the last value.
    pub fn to_table(&self, locale: &str, folder_name: &str) -> LocaleTable {
        let mut table = LocaleTable::new(locale, folder_name);
        for entry in &self.entries {
            table.insert(ResourceEntry {
                key: entry.key.clone(),
                value: entry.value.clone(),
                raw: entry.raw.clone(),
            });
        }
        table
    }
}
