//! The operation runner: one request in, one tri-state result out.
//!
//! Every panel action is an [`OperationRequest`]. [`Runner::run`] answers all
//! synchronous kinds; [`Runner::dispatch`] additionally awaits the network for
//! `api-call`. Results never carry presentation; a [`ResultSink`] decides where
//! the status line ends up.
//!
//! # Example
//!
//! ```rust
//! use jsonkit_core::operation::{OperationKind, OperationRequest, Runner};
//!
//! let runner = Runner::default();
//! let result = runner.run(&OperationRequest::new(OperationKind::Minify, "{ \"a\": 1 }"));
//! assert_eq!(result.output(), Some("{\"a\":1}"));
//! assert_eq!(result.message(), "JSON Minified ✔");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, warn};

use crate::api::{self, parse_selected_method, ApiRequest};
use crate::clipboard::{Clipboard, UnavailableClipboard};
use crate::config::ToolkitConfig;
use crate::convert::{convert_json, json_utils, merge, schema, TargetFormat};
use crate::crypto;
use crate::diff::create_patch;
use crate::error::{Result, ToolError};
use crate::ui::Panel;

/// File name shown in both headers of a generated patch.
pub const PATCH_NAME: &str = "diff";

pub const OPT_FORMAT: &str = "format";
pub const OPT_METHOD: &str = "method";
pub const OPT_URL: &str = "url";
pub const OPT_HEADERS: &str = "headers";
pub const OPT_BODY: &str = "body";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    Beautify,
    Minify,
    Validate,
    Clear,
    Copy,
    Diff,
    Merge,
    SchemaGenerate,
    Convert,
    Encrypt,
    Decrypt,
    ApiCall,
}

impl OperationKind {
    pub const ALL: [OperationKind; 12] = [
        Self::Beautify,
        Self::Minify,
        Self::Validate,
        Self::Clear,
        Self::Copy,
        Self::Diff,
        Self::Merge,
        Self::SchemaGenerate,
        Self::Convert,
        Self::Encrypt,
        Self::Decrypt,
        Self::ApiCall,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Beautify => "beautify",
            Self::Minify => "minify",
            Self::Validate => "validate",
            Self::Clear => "clear",
            Self::Copy => "copy",
            Self::Diff => "diff",
            Self::Merge => "merge",
            Self::SchemaGenerate => "schema-generate",
            Self::Convert => "convert",
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
            Self::ApiCall => "api-call",
        }
    }

    /// Panel whose status region reports this operation.
    pub fn panel(self) -> Panel {
        match self {
            Self::Beautify | Self::Minify | Self::Validate | Self::Clear | Self::Copy => {
                Panel::Formatter
            }
            Self::Diff => Panel::Diff,
            Self::Merge => Panel::Merge,
            Self::SchemaGenerate => Panel::Schema,
            Self::Convert => Panel::Convert,
            Self::Encrypt | Self::Decrypt => Panel::Encrypt,
            Self::ApiCall => Panel::Api,
        }
    }

    /// Only `api-call` suspends.
    pub fn is_async(self) -> bool {
        matches!(self, Self::ApiCall)
    }

    fn success_message(self) -> &'static str {
        match self {
            Self::Beautify => "JSON Beautified ✔",
            Self::Minify => "JSON Minified ✔",
            Self::Validate => "Valid JSON ✔",
            Self::Clear => "Cleared ✔",
            Self::Copy => "Copied ✔",
            Self::Diff => "Diff Generated ✔",
            Self::Merge => "Merged ✔",
            Self::SchemaGenerate => "Schema Generated ✔",
            Self::Convert => "Converted ✔",
            Self::Encrypt => "Encrypted ✔",
            Self::Decrypt => "Decrypted ✔",
            Self::ApiCall => "API call success ✔",
        }
    }

    fn error_prefix(self) -> &'static str {
        match self {
            Self::Beautify | Self::Minify => "Error: ",
            Self::Validate => "Invalid JSON: ",
            Self::Clear => "",
            Self::Copy => "Copy Error: ",
            Self::Diff => "Diff Error: ",
            Self::Merge => "Merge Error: ",
            Self::SchemaGenerate => "Schema Error: ",
            Self::Convert => "Convert Error: ",
            Self::Encrypt => "Encrypt Error: ",
            Self::Decrypt => "Decrypt Error: ",
            Self::ApiCall => "API Error: ",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OperationKind {
    type Err = ToolError;

    fn from_str(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name.trim())
            .ok_or_else(|| ToolError::validation(format!("unknown operation: {name}")))
    }
}

/// One user action: which operation, its text inputs, and named options
/// (`format`, `method`, `url`, `headers`, `body`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    pub kind: OperationKind,
    pub primary: String,
    pub secondary: Option<String>,
    pub config: BTreeMap<String, String>,
}

impl OperationRequest {
    pub fn new(kind: OperationKind, primary: impl Into<String>) -> Self {
        Self {
            kind,
            primary: primary.into(),
            secondary: None,
            config: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_secondary(mut self, text: impl Into<String>) -> Self {
        self.secondary = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: BTreeMap<String, String>) -> Self {
        self.config.extend(options);
        self
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str)
    }

    pub fn secondary(&self) -> &str {
        self.secondary.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum OperationResult {
    Success { output: String, message: String },
    ValidationError { message: String },
    OperationalError { message: String },
}

impl OperationResult {
    pub fn success(output: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Success {
            output: output.into(),
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success { message, .. }
            | Self::ValidationError { message }
            | Self::OperationalError { message } => message,
        }
    }

    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Success { output, .. } => Some(output),
            _ => None,
        }
    }

    /// Collapses back into a `Result`, dropping the success message.
    pub fn into_result(self) -> Result<String> {
        match self {
            Self::Success { output, .. } => Ok(output),
            Self::ValidationError { message } => Err(ToolError::Validation(message)),
            Self::OperationalError { message } => Err(ToolError::Operational(message)),
        }
    }
}

impl From<ToolError> for OperationResult {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::Validation(message) => Self::ValidationError { message },
            ToolError::Operational(message) => Self::OperationalError { message },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    Success,
    Error,
    Info,
}

impl StatusTone {
    pub fn color(self) -> &'static str {
        match self {
            Self::Success => "green",
            Self::Error => "red",
            Self::Info => "blue",
        }
    }
}

/// What a panel's status region shows after an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusLine {
    pub panel: Panel,
    pub message: String,
    pub tone: StatusTone,
}

impl StatusLine {
    pub fn new(kind: OperationKind, result: &OperationResult) -> Self {
        let tone = match result {
            OperationResult::Success { .. } if kind == OperationKind::Clear => StatusTone::Info,
            OperationResult::Success { .. } => StatusTone::Success,
            _ => StatusTone::Error,
        };
        Self {
            panel: kind.panel(),
            message: result.message().to_string(),
            tone,
        }
    }
}

/// Receives every result the runner produces through `run_to` / `dispatch_to`.
pub trait ResultSink {
    fn report(&mut self, kind: OperationKind, result: &OperationResult);
}

/// One status region per panel; the latest report wins.
#[derive(Debug, Default, Clone)]
pub struct StatusBoard {
    lines: BTreeMap<Panel, StatusLine>,
}

impl StatusBoard {
    pub fn get(&self, panel: Panel) -> Option<&StatusLine> {
        self.lines.get(&panel)
    }
}

impl ResultSink for StatusBoard {
    fn report(&mut self, kind: OperationKind, result: &OperationResult) {
        self.lines.insert(kind.panel(), StatusLine::new(kind, result));
    }
}

pub struct Runner<C = UnavailableClipboard> {
    config: ToolkitConfig,
    clipboard: C,
}

impl Runner {
    pub fn new(config: ToolkitConfig) -> Self {
        Self {
            config,
            clipboard: UnavailableClipboard,
        }
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new(ToolkitConfig::default())
    }
}

impl<C: Clipboard> Runner<C> {
    pub fn with_clipboard(config: ToolkitConfig, clipboard: C) -> Self {
        Self { config, clipboard }
    }

    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Runs a synchronous operation. For `api-call` only the request is checked;
    /// a valid one must go through [`Runner::dispatch`].
    pub fn run(&self, request: &OperationRequest) -> OperationResult {
        let kind = request.kind;
        debug!(%kind, "running operation");
        let result = match precondition(request) {
            Err(err) => err.into(),
            Ok(()) => settle(kind, self.execute(request), success_message(request)),
        };
        log_outcome(kind, &result);
        result
    }

    /// Runs any operation, awaiting the network for `api-call`.
    pub async fn dispatch(&self, request: &OperationRequest) -> OperationResult {
        let kind = request.kind;
        if !kind.is_async() {
            return self.run(request);
        }
        debug!(%kind, "dispatching operation");
        let prepared = match api_request(request).and_then(|api| api.prepare()) {
            Ok(prepared) => prepared,
            Err(err) => {
                let result = OperationResult::from(err);
                log_outcome(kind, &result);
                return result;
            }
        };
        let result = settle(kind, api::send(&prepared).await, success_message(request));
        log_outcome(kind, &result);
        result
    }

    pub fn run_to<S: ResultSink>(&self, request: &OperationRequest, sink: &mut S) -> OperationResult {
        let result = self.run(request);
        sink.report(request.kind, &result);
        result
    }

    pub async fn dispatch_to<S: ResultSink>(
        &self,
        request: &OperationRequest,
        sink: &mut S,
    ) -> OperationResult {
        let result = self.dispatch(request).await;
        sink.report(request.kind, &result);
        result
    }

    fn execute(&self, request: &OperationRequest) -> Result<String> {
        let text = request.primary.as_str();
        let indent = self.config.indent;
        match request.kind {
            OperationKind::Beautify => json_utils::beautify(text, indent),
            OperationKind::Minify => json_utils::minify(text),
            OperationKind::Validate => json_utils::validate(text).map(|()| text.to_string()),
            OperationKind::Clear => Ok(String::new()),
            OperationKind::Copy => self.clipboard.write_text(text).map(|()| text.to_string()),
            OperationKind::Diff => Ok(create_patch(
                PATCH_NAME,
                text,
                request.secondary(),
                &self.config.diff_config(),
            )),
            OperationKind::Merge => merge::merge_json(text, request.secondary(), indent),
            OperationKind::SchemaGenerate => schema::generate_schema(text, indent),
            OperationKind::Convert => convert_json(target_format(request)?, text, indent),
            OperationKind::Encrypt => crypto::encrypt_text(text, &self.config.passphrase),
            OperationKind::Decrypt => crypto::decrypt_text(text, &self.config.passphrase),
            OperationKind::ApiCall => Err(ToolError::operational(
                "api-call is asynchronous and must be dispatched",
            )),
        }
    }
}

// Checks whose failures are reported verbatim, without the panel's error prefix.
fn precondition(request: &OperationRequest) -> Result<()> {
    match request.kind {
        OperationKind::Convert => target_format(request).map(|_| ()),
        OperationKind::ApiCall => api_request(request)?.prepare().map(|_| ()),
        _ => Ok(()),
    }
}

fn target_format(request: &OperationRequest) -> Result<TargetFormat> {
    request.option(OPT_FORMAT).unwrap_or_default().parse()
}

/// Assembles the API tester fields: `url` falls back to the primary text and
/// `body` to the secondary text.
pub fn api_request(request: &OperationRequest) -> Result<ApiRequest> {
    Ok(ApiRequest {
        method: parse_selected_method(request.option(OPT_METHOD).unwrap_or_default())?,
        url: request
            .option(OPT_URL)
            .unwrap_or(request.primary.as_str())
            .to_string(),
        headers: request.option(OPT_HEADERS).unwrap_or_default().to_string(),
        body: request
            .option(OPT_BODY)
            .unwrap_or(request.secondary())
            .to_string(),
    })
}

fn success_message(request: &OperationRequest) -> String {
    match (request.kind, target_format(request)) {
        (OperationKind::Convert, Ok(target)) => format!("Converted to {} ✔", target.label()),
        (kind, _) => kind.success_message().to_string(),
    }
}

fn settle(kind: OperationKind, outcome: Result<String>, message: String) -> OperationResult {
    match outcome {
        Ok(output) => OperationResult::success(output, message),
        Err(err) => err.with_prefix(kind.error_prefix()).into(),
    }
}

fn log_outcome(kind: OperationKind, result: &OperationResult) {
    if result.is_success() {
        debug!(%kind, "operation succeeded");
    } else {
        warn!(%kind, message = result.message(), "operation failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::convert::json_utils::parse_json;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn run(kind: OperationKind, primary: &str) -> OperationResult {
        Runner::default().run(&OperationRequest::new(kind, primary))
    }

    #[test]
    fn beautify_reports_success_with_four_space_output() {
        let result = run(OperationKind::Beautify, r#"{"a":[1]}"#);
        assert_eq!(
            result,
            OperationResult::success("{\n    \"a\": [\n        1\n    ]\n}", "JSON Beautified ✔")
        );
    }

    #[test]
    fn beautify_of_minify_round_trips() {
        let input = r#"{ "k": { "n": [1, 2.5, "x"] }, "t": true }"#;
        let minified = run(OperationKind::Minify, input).into_result().unwrap();
        let pretty = run(OperationKind::Beautify, &minified).into_result().unwrap();
        assert_eq!(parse_json(&pretty).unwrap(), parse_json(input).unwrap());
    }

    #[test]
    fn parse_failures_are_validation_errors_with_panel_prefix() {
        let result = run(OperationKind::Beautify, "{");
        assert!(matches!(result, OperationResult::ValidationError { .. }));
        assert!(result.message().starts_with("Error: "));

        let result = run(OperationKind::Validate, "{");
        assert!(matches!(result, OperationResult::ValidationError { .. }));
        assert!(result.message().starts_with("Invalid JSON: "));
    }

    #[test]
    fn validate_success_leaves_text_untouched() {
        let result = run(OperationKind::Validate, " [1, 2] ");
        assert_eq!(result, OperationResult::success(" [1, 2] ", "Valid JSON ✔"));
    }

    #[test]
    fn clear_never_fails_and_reports_info() {
        let result = run(OperationKind::Clear, "anything {");
        assert_eq!(result.output(), Some(""));
        let line = StatusLine::new(OperationKind::Clear, &result);
        assert_eq!(line.tone, StatusTone::Info);
        assert_eq!(line.tone.color(), "blue");
        assert_eq!(line.message, "Cleared ✔");
    }

    #[test]
    fn copy_writes_to_the_clipboard() {
        let runner = Runner::with_clipboard(ToolkitConfig::default(), MemoryClipboard::default());
        let result = runner.run(&OperationRequest::new(OperationKind::Copy, "{\"a\":1}"));
        assert_eq!(result.message(), "Copied ✔");
        assert_eq!(runner.clipboard().contents().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn copy_without_clipboard_is_operational() {
        let result = run(OperationKind::Copy, "x");
        assert_eq!(
            result,
            OperationResult::OperationalError {
                message: "Copy Error: clipboard unavailable".into()
            }
        );
    }

    #[test]
    fn diff_compares_primary_against_secondary() {
        let request = OperationRequest::new(OperationKind::Diff, "a\nb\n").with_secondary("a\nc\n");
        let result = Runner::default().run(&request);
        assert_eq!(result.message(), "Diff Generated ✔");
        let patch = result.output().unwrap();
        assert!(patch.starts_with("Index: diff\n"));
        assert!(patch.contains("-b\n+c\n"));
    }

    #[test]
    fn merge_secondary_wins() {
        let request =
            OperationRequest::new(OperationKind::Merge, r#"{"a":1}"#).with_secondary(r#"{"a":2,"b":3}"#);
        let result = Runner::default().run(&request);
        assert_eq!(result.message(), "Merged ✔");
        assert_eq!(
            parse_json(result.output().unwrap()).unwrap(),
            json!({"a":2,"b":3})
        );
    }

    #[test]
    fn merge_with_missing_secondary_fails_validation() {
        let result = run(OperationKind::Merge, r#"{"a":1}"#);
        assert!(matches!(result, OperationResult::ValidationError { .. }));
        assert!(result.message().starts_with("Merge Error: "));
    }

    #[test]
    fn schema_generation_maps_top_level_types() {
        let result = run(OperationKind::SchemaGenerate, r#"{"x":1,"y":"s"}"#);
        assert_eq!(result.message(), "Schema Generated ✔");
        let schema = parse_json(result.output().unwrap()).unwrap();
        assert_eq!(
            schema["properties"],
            json!({"x":{"type":"number"},"y":{"type":"string"}})
        );
    }

    #[test]
    fn convert_requires_a_format() {
        let result = run(OperationKind::Convert, r#"{"a":1}"#);
        assert_eq!(
            result,
            OperationResult::ValidationError {
                message: "Choose conversion format!".into()
            }
        );
    }

    #[test]
    fn convert_reports_target_in_message() {
        let request =
            OperationRequest::new(OperationKind::Convert, r#"{"a":1}"#).with_option(OPT_FORMAT, "yaml");
        let result = Runner::default().run(&request);
        assert_eq!(result.message(), "Converted to YAML ✔");
        let back: serde_json::Value = serde_yaml::from_str(result.output().unwrap()).unwrap();
        assert_eq!(back, json!({"a":1}));
    }

    #[test]
    fn convert_parse_failure_is_prefixed() {
        let request = OperationRequest::new(OperationKind::Convert, "{").with_option(OPT_FORMAT, "xml");
        let result = Runner::default().run(&request);
        assert!(matches!(result, OperationResult::ValidationError { .. }));
        assert!(result.message().starts_with("Convert Error: "));
    }

    #[test]
    fn encrypt_then_decrypt_round_trips() {
        let runner = Runner::default();
        for text in ["", "plain", "{\"deep\":{\"k\":[1,2]}}", "✔ ünïcode"] {
            let sealed = runner
                .run(&OperationRequest::new(OperationKind::Encrypt, text))
                .into_result()
                .unwrap();
            let opened = runner.run(&OperationRequest::new(OperationKind::Decrypt, sealed));
            assert_eq!(opened, OperationResult::success(text, "Decrypted ✔"));
        }
    }

    #[test]
    fn decrypt_of_garbage_is_operational() {
        let result = run(OperationKind::Decrypt, "hello world");
        assert!(matches!(result, OperationResult::OperationalError { .. }));
        assert!(result.message().starts_with("Decrypt Error: "));
    }

    #[test]
    fn api_call_without_method_is_rejected_synchronously() {
        let result = run(OperationKind::ApiCall, "http://127.0.0.1:1/");
        assert_eq!(
            result,
            OperationResult::ValidationError {
                message: "Choose HTTP Method!".into()
            }
        );
    }

    #[test]
    fn api_call_checks_url_then_headers() {
        let runner = Runner::default();
        let request = OperationRequest::new(OperationKind::ApiCall, "  ").with_option(OPT_METHOD, "GET");
        assert_eq!(runner.run(&request).message(), "API URL required!");

        let request = OperationRequest::new(OperationKind::ApiCall, "http://x")
            .with_option(OPT_METHOD, "GET")
            .with_option(OPT_HEADERS, "{bad");
        assert_eq!(runner.run(&request).message(), "Headers JSON invalid!");
    }

    #[test]
    fn status_board_keeps_latest_line_per_panel() {
        let runner = Runner::default();
        let mut board = StatusBoard::default();
        runner.run_to(&OperationRequest::new(OperationKind::Validate, "{"), &mut board);
        runner.run_to(&OperationRequest::new(OperationKind::Validate, "{}"), &mut board);
        runner.run_to(&OperationRequest::new(OperationKind::Decrypt, "nope"), &mut board);

        let formatter = board.get(Panel::Formatter).unwrap();
        assert_eq!(formatter.message, "Valid JSON ✔");
        assert_eq!(formatter.tone, StatusTone::Success);
        assert_eq!(board.get(Panel::Encrypt).unwrap().tone, StatusTone::Error);
        assert!(board.get(Panel::Api).is_none());
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in OperationKind::ALL {
            assert_eq!(kind.name().parse::<OperationKind>().unwrap(), kind);
        }
        assert!("explode".parse::<OperationKind>().is_err());
    }
}
