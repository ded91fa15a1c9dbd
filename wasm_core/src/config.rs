//! Tunables for the tool panels. Every field has a default matching the
//! behavior of the hosted page, so an empty config document is valid.

use serde::{Deserialize, Serialize};

use crate::diff::DiffConfig;
use crate::error::{Result, ToolError};

pub const DEFAULT_INDENT: usize = 4;
pub const MAX_INDENT: usize = 16;
pub const DEFAULT_DIFF_CONTEXT: usize = 3;
pub const DEFAULT_PASSPHRASE: &str = "secret";
pub const DEFAULT_DOWNLOAD_NAME: &str = "data.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolkitConfig {
    /// Spaces per nesting level for pretty-printed JSON and XML.
    pub indent: usize,
    pub diff_context_lines: usize,
    /// Pre-shared passphrase for the encrypt/decrypt panel.
    pub passphrase: String,
    pub download_file_name: String,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            diff_context_lines: DEFAULT_DIFF_CONTEXT,
            passphrase: DEFAULT_PASSPHRASE.to_string(),
            download_file_name: DEFAULT_DOWNLOAD_NAME.to_string(),
        }
    }
}

impl ToolkitConfig {
    /// Loads a config from JSON text. Blank input yields the defaults; missing
    /// fields fall back to their defaults individually.
    pub fn from_json(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(input)
            .map_err(|err| ToolError::validation(format!("invalid config: {err}")))?;
        check_indent(config.indent).map_err(|err| err.with_prefix("invalid config: "))?;
        Ok(config)
    }

    pub fn diff_config(&self) -> DiffConfig {
        DiffConfig {
            context_lines: self.diff_context_lines,
        }
    }
}

/// Accepts indentation widths from 1 to [`MAX_INDENT`] spaces.
pub fn check_indent(indent: usize) -> Result<usize> {
    if indent == 0 || indent > MAX_INDENT {
        return Err(ToolError::validation(format!(
            "indent must be between 1 and {MAX_INDENT}, got {indent}"
        )));
    }
    Ok(indent)
}
