//! Line-based text diff for the diff panel.
//! Produces per-line change records with statistics, and a unified patch laid out
//! like `createPatch` output (an `Index:` banner, file headers, then hunks).

use std::ops::Range;

use serde::{Deserialize, Serialize};
use similar::{ChangeTag, DiffOp, TextDiff};

use crate::config::DEFAULT_DIFF_CONTEXT;

/// Banner line between `Index:` and the file headers of a patch.
const PATCH_SEPARATOR: &str =
    "===================================================================";
const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file";

/// One line of either input, tagged with how it changed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiffLine {
    /// 1-based position in the old text; absent for insertions.
    pub old_line: Option<usize>,
    /// 1-based position in the new text; absent for deletions.
    pub new_line: Option<usize>,
    /// Line text without its terminator.
    pub content: String,
    pub change_type: DiffChangeType,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiffChangeType {
    Context,
    Addition,
    Deletion,
}

impl From<ChangeTag> for DiffChangeType {
    fn from(tag: ChangeTag) -> Self {
        match tag {
            ChangeTag::Equal => Self::Context,
            ChangeTag::Insert => Self::Addition,
            ChangeTag::Delete => Self::Deletion,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DiffResult {
    pub lines: Vec<DiffLine>,
    pub stats: DiffStats,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub additions: usize,
    pub deletions: usize,
    pub context: usize,
}

impl DiffStats {
    pub fn is_unchanged(&self) -> bool {
        self.additions == 0 && self.deletions == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffConfig {
    /// Unchanged lines kept around each hunk.
    pub context_lines: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            context_lines: DEFAULT_DIFF_CONTEXT,
        }
    }
}

/// Lists every line of both texts tagged as context, addition or deletion.
pub fn generate_diff(old_text: &str, new_text: &str) -> DiffResult {
    let diff = TextDiff::from_lines(old_text, new_text);
    let mut lines = Vec::new();
    let mut stats = DiffStats::default();

    for change in diff.iter_all_changes() {
        let change_type = DiffChangeType::from(change.tag());
        match change_type {
            DiffChangeType::Context => stats.context += 1,
            DiffChangeType::Addition => stats.additions += 1,
            DiffChangeType::Deletion => stats.deletions += 1,
        }
        let content = change.value();
        lines.push(DiffLine {
            old_line: change.old_index().map(|idx| idx + 1),
            new_line: change.new_index().map(|idx| idx + 1),
            content: content
                .strip_suffix('\n')
                .map(|line| line.strip_suffix('\r').unwrap_or(line))
                .unwrap_or(content)
                .to_string(),
            change_type,
        });
    }

    DiffResult { lines, stats }
}

/// Builds a unified patch between two arbitrary strings. Both file headers carry
/// `file_name`; identical inputs produce the headers with no hunks.
///
/// ```
/// use jsonkit_core::diff::{create_patch, DiffConfig};
/// let patch = create_patch("diff", "a\nb\n", "a\nc\n", &DiffConfig::default());
/// assert!(patch.starts_with("Index: diff\n"));
/// assert!(patch.contains("@@ -1,2 +1,2 @@\n a\n-b\n+c\n"));
/// ```
pub fn create_patch(file_name: &str, old_text: &str, new_text: &str, config: &DiffConfig) -> String {
    let diff = TextDiff::from_lines(old_text, new_text);
    let mut output = String::new();
    output.push_str(&format!("Index: {file_name}\n"));
    output.push_str(PATCH_SEPARATOR);
    output.push('\n');
    output.push_str(&format!("--- {file_name}\n"));
    output.push_str(&format!("+++ {file_name}\n"));

    let mut unified = diff.unified_diff();
    unified.context_radius(config.context_lines);
    for hunk in unified.iter_hunks() {
        output.push_str(&hunk_header(hunk.ops()));
        output.push('\n');
        for change in hunk.iter_changes() {
            let value = change.value();
            output.push_str(&change.tag().to_string());
            output.push_str(value.strip_suffix('\n').unwrap_or(value));
            output.push('\n');
            if !value.ends_with('\n') {
                output.push_str(NO_NEWLINE_MARKER);
                output.push('\n');
            }
        }
    }
    output
}

// `@@ -start,count +start,count @@`, count always present; an empty side
// reports the line before it, so an insertion into empty text is `-0,0`.
fn hunk_header(ops: &[DiffOp]) -> String {
    let (Some(first), Some(last)) = (ops.first(), ops.last()) else {
        return "@@ -0,0 +0,0 @@".to_string();
    };
    let old = first.old_range().start..last.old_range().end;
    let new = first.new_range().start..last.new_range().end;
    format!("@@ -{} +{} @@", hunk_range(old), hunk_range(new))
}

fn hunk_range(range: Range<usize>) -> String {
    let len = range.len();
    let start = if len == 0 { range.start } else { range.start + 1 };
    format!("{start},{len}")
}
