use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Tag of one merge-preview row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DiffLineKind {
    Unchanged,
    Add,
    UpdateOld,
    UpdateNew,
}

/// One row of the merge preview. `content` is a full serialized XML line;
/// `line_number` is the 1-based position in the original target file, present
/// for `unchanged` and `update-old` rows only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct XmlDiffLine {
    #[serde(rename = "type")]
    pub kind: DiffLineKind,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<usize>,
}

/// Per-locale preview of what a merge would change.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MergePreviewDetail {
    pub locale: String,
    pub folder_name: String,
    pub is_new_file: bool,
    pub add_count: usize,
    pub overwrite_count: usize,
    pub diff_lines: Vec<XmlDiffLine>,
}

impl MergePreviewDetail {
    pub fn has_changes(&self) -> bool {
        self.add_count > 0 || self.overwrite_count > 0
    }
}

/// User-controlled association from one source file to one target folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocaleMapping {
    pub source_file_name: String,
    pub target_folder: String,
    pub locale: String,
    pub enabled: bool,
    pub entry_count: usize,
}

/// Interchange blob for mapping import/export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MappingConfig {
    pub mappings: Vec<LocaleMapping>,
    /// RFC 3339 timestamp of the last modification.
    pub last_modified: String,
}

/// Outcome of writing one locale during a merge.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocaleStatus {
    pub locale: String,
    pub folder_name: String,
    pub status: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregated merge result. `success` is false if any locale failed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MergeResult {
    pub success: bool,
    pub per_locale: Vec<LocaleStatus>,
}

impl MergeResult {
    pub fn written(&self) -> usize {
        self.per_locale.iter().filter(|s| s.success).count()
    }
}
