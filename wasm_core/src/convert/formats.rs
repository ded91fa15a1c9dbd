//! Format conversion for the converter panel.
//!
//! Input is always JSON; output is one of the targets in [`TargetFormat`]. The
//! value is parsed once and rendered by the matching serializer, so a parse
//! failure surfaces before any target-specific work.
//!
//! # Examples
//!
//! ```rust
//! use jsonkit_core::convert::formats::{convert_json, TargetFormat};
//!
//! let yaml = convert_json(TargetFormat::Yaml, r#"{"name":"Ada"}"#, 4)?;
//! assert_eq!(yaml.trim(), "name: Ada");
//! # Ok::<(), jsonkit_core::error::ToolError>(())
//! ```
use std::fmt;
use std::str::FromStr;

use crate::convert::json_utils::{encode_json, parse_json};
use crate::convert::{tabular, xml};
use crate::error::{Result, ToolError};

pub const MSG_CHOOSE_FORMAT: &str = "Choose conversion format!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    Json,
    Yaml,
    Csv,
    Xml,
}

impl TargetFormat {
    pub const ALL: [TargetFormat; 4] = [Self::Json, Self::Yaml, Self::Csv, Self::Xml];

    /// Upper-case label used in status messages ("Converted to YAML").
    pub fn label(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
            Self::Csv => "CSV",
            Self::Xml => "XML",
        }
    }

    /// Value of the `<option>` in the format picker.
    pub fn id(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Csv => "csv",
            Self::Xml => "xml",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TargetFormat {
    type Err = ToolError;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "" => Err(ToolError::validation(MSG_CHOOSE_FORMAT)),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "csv" => Ok(Self::Csv),
            "xml" => Ok(Self::Xml),
            other => Err(ToolError::validation(format!(
                "Unsupported target format: {other}"
            ))),
        }
    }
}

/// Parses `input` as JSON and renders it in `target`. `indent` applies to the
/// JSON and XML renderings.
pub fn convert_json(target: TargetFormat, input: &str, indent: usize) -> Result<String> {
    let value = parse_json(input)?;
    match target {
        TargetFormat::Json => encode_json(&value, Some(indent)),
        TargetFormat::Yaml => {
            serde_yaml::to_string(&value).map_err(|err| ToolError::operational(err.to_string()))
        }
        TargetFormat::Csv => tabular::json_to_csv(&value),
        TargetFormat::Xml => Ok(xml::json_to_xml(&value, indent)),
    }
}
