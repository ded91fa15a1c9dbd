use std::collections::BTreeMap;

use console_error_panic_hook::set_once as set_panic_hook;
use js_sys::Promise;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

pub mod api;
pub mod clipboard;
pub mod config;
pub mod convert;
pub mod crypto;
pub mod diff;
pub mod error;
pub mod files;
pub mod operation;
pub mod ui;

use crate::api::{ApiRequest, HttpMethod};
use crate::clipboard::{BrowserClipboard, Clipboard};
use crate::config::ToolkitConfig;
use crate::convert::{json_utils, TargetFormat};
use crate::diff::DiffConfig;
use crate::error::ToolError;
use crate::operation::{
    OperationKind, OperationRequest, OperationResult, Runner, StatusLine, StatusTone, OPT_METHOD,
};
use crate::ui::{Panel, Theme, UiState};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    set_panic_hook();
    #[cfg(target_arch = "wasm32")]
    tracing_wasm::set_as_global_default();
}

fn js_error(err: ToolError) -> JsValue {
    JsValue::from_str(err.message())
}

/// Everything the page needs to render one operation: the editor output and
/// the status line with its colour and target element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    status: &'static str,
    output: Option<String>,
    message: String,
    tone: StatusTone,
    color: &'static str,
    panel: Panel,
    status_element: &'static str,
}

impl StatusReport {
    fn new(kind: OperationKind, result: &OperationResult) -> Self {
        let line = StatusLine::new(kind, result);
        Self {
            status: match result {
                OperationResult::Success { .. } => "success",
                OperationResult::ValidationError { .. } => "validationError",
                OperationResult::OperationalError { .. } => "operationalError",
            },
            output: result.output().map(str::to_string),
            message: line.message,
            tone: line.tone,
            color: line.tone.color(),
            panel: line.panel,
            status_element: line.panel.status_element(),
        }
    }
}

fn report_to_js(report: &StatusReport) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(report).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn options_from_js(options: JsValue) -> Result<BTreeMap<String, String>, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(BTreeMap::new());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|err| JsValue::from_str(&format!("invalid options: {err}")))
}

fn build_request(
    kind: &str,
    primary: String,
    secondary: Option<String>,
    options: BTreeMap<String, String>,
) -> Result<OperationRequest, ToolError> {
    let mut request = OperationRequest::new(kind.parse()?, primary).with_options(options);
    request.secondary = secondary;
    Ok(request)
}

fn run_operation_internal<C: Clipboard>(
    runner: &Runner<C>,
    request: &OperationRequest,
) -> StatusReport {
    StatusReport::new(request.kind, &runner.run(request))
}

async fn dispatch_operation_internal(config: ToolkitConfig, request: OperationRequest) -> StatusReport {
    let runner = Runner::with_clipboard(config, BrowserClipboard);
    let result = runner.dispatch(&request).await;
    StatusReport::new(request.kind, &result)
}

/// Runs one synchronous operation with the default configuration and returns a
/// status report. `options` is a plain object of string options (`format`,
/// `method`, `url`, `headers`, `body`) and may be omitted.
#[wasm_bindgen]
pub fn run_operation(
    kind: &str,
    primary: String,
    secondary: Option<String>,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    let request = build_request(kind, primary, secondary, options_from_js(options)?).map_err(js_error)?;
    let runner = Runner::with_clipboard(ToolkitConfig::default(), BrowserClipboard);
    report_to_js(&run_operation_internal(&runner, &request))
}

/// Like [`run_operation`] but also performs `api-call`.
#[wasm_bindgen]
pub async fn dispatch_operation(
    kind: String,
    primary: String,
    secondary: Option<String>,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    let request =
        build_request(&kind, primary, secondary, options_from_js(options)?).map_err(js_error)?;
    report_to_js(&dispatch_operation_internal(ToolkitConfig::default(), request).await)
}

#[wasm_bindgen]
pub fn beautify_json(input: &str, indent: Option<usize>) -> Result<String, JsValue> {
    beautify_json_internal(input, indent).map_err(js_error)
}

fn beautify_json_internal(input: &str, indent: Option<usize>) -> error::Result<String> {
    let indent = config::check_indent(indent.unwrap_or(config::DEFAULT_INDENT))?;
    json_utils::beautify(input, indent)
}

#[wasm_bindgen]
pub fn minify_json(input: &str) -> Result<String, JsValue> {
    json_utils::minify(input).map_err(js_error)
}

#[wasm_bindgen]
pub fn validate_json(input: &str) -> Result<(), JsValue> {
    json_utils::validate(input).map_err(js_error)
}

/// Unified patch of `old_text` against `new_text`, named `diff`.
#[wasm_bindgen]
pub fn diff_texts(old_text: &str, new_text: &str, context_lines: Option<usize>) -> String {
    let config = DiffConfig {
        context_lines: context_lines.unwrap_or(config::DEFAULT_DIFF_CONTEXT),
    };
    diff::create_patch(operation::PATCH_NAME, old_text, new_text, &config)
}

#[wasm_bindgen]
pub fn diff_lines(old_text: &str, new_text: &str) -> Result<JsValue, JsValue> {
    let result = diff::generate_diff(old_text, new_text);
    serde_wasm_bindgen::to_value(&result).map_err(|err| JsValue::from_str(&err.to_string()))
}

#[wasm_bindgen]
pub fn merge_json_text(left: &str, right: &str) -> Result<String, JsValue> {
    convert::merge::merge_json(left, right, config::DEFAULT_INDENT).map_err(js_error)
}

#[wasm_bindgen]
pub fn generate_schema_text(input: &str) -> Result<String, JsValue> {
    convert::schema::generate_schema(input, config::DEFAULT_INDENT).map_err(js_error)
}

#[wasm_bindgen]
pub fn convert_json_text(format: &str, input: &str) -> Result<String, JsValue> {
    let target: TargetFormat = format.parse().map_err(js_error)?;
    convert::convert_json(target, input, config::DEFAULT_INDENT).map_err(js_error)
}

#[wasm_bindgen]
pub fn encrypt_text(plaintext: &str, passphrase: Option<String>) -> Result<String, JsValue> {
    let passphrase = passphrase.unwrap_or_else(|| config::DEFAULT_PASSPHRASE.to_string());
    crypto::encrypt_text(plaintext, &passphrase).map_err(js_error)
}

#[wasm_bindgen]
pub fn decrypt_text(ciphertext: &str, passphrase: Option<String>) -> Result<String, JsValue> {
    let passphrase = passphrase.unwrap_or_else(|| config::DEFAULT_PASSPHRASE.to_string());
    crypto::decrypt_text(ciphertext, &passphrase).map_err(js_error)
}

#[wasm_bindgen]
pub fn copy_text(text: &str) -> Result<(), JsValue> {
    BrowserClipboard.write_text(text).map_err(js_error)
}

/// Sends an API tester request and resolves to the response body.
#[wasm_bindgen]
pub async fn call_api(
    method: String,
    url: String,
    headers: String,
    body: String,
) -> Result<String, JsValue> {
    let request = ApiRequest {
        method: api::parse_selected_method(&method).map_err(js_error)?,
        url,
        headers,
        body,
    };
    let prepared = request.prepare().map_err(js_error)?;
    api::send(&prepared).await.map_err(js_error)
}

#[wasm_bindgen]
pub fn download_json(text: &str, file_name: Option<String>) -> Result<JsValue, JsValue> {
    let name = file_name.unwrap_or_else(|| config::DEFAULT_DOWNLOAD_NAME.to_string());
    let payload = files::download_payload(text, &name);
    serde_wasm_bindgen::to_value(&payload).map_err(|err| JsValue::from_str(&err.to_string()))
}

#[wasm_bindgen]
pub fn read_upload_text(bytes: &[u8]) -> String {
    files::read_upload(bytes)
}

/// Page session: panel selection, theme, the picked HTTP method and the
/// configuration every operation runs with.
#[wasm_bindgen]
pub struct Workspace {
    ui: UiState,
    runner: Runner<BrowserClipboard>,
}

impl Workspace {
    fn with_config(config: ToolkitConfig) -> Self {
        Self {
            ui: UiState::default(),
            runner: Runner::with_clipboard(config, BrowserClipboard),
        }
    }

    // The method picked with `set_method` applies unless the options name one.
    fn request(
        &self,
        kind: &str,
        primary: String,
        secondary: Option<String>,
        options: BTreeMap<String, String>,
    ) -> Result<OperationRequest, ToolError> {
        let mut request = build_request(kind, primary, secondary, options)?;
        if let Some(method) = self.ui.selected_method() {
            request
                .config
                .entry(OPT_METHOD.to_string())
                .or_insert_with(|| method.as_str().to_string());
        }
        Ok(request)
    }
}

#[wasm_bindgen]
impl Workspace {
    /// `config_json` is a `ToolkitConfig` document; omitted fields keep their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<Workspace, JsValue> {
        let config = ToolkitConfig::from_json(config_json.as_deref().unwrap_or_default())
            .map_err(js_error)?;
        Ok(Self::with_config(config))
    }

    pub fn select_panel(&mut self, panel: &str) -> Result<(), JsValue> {
        self.ui.select_panel(panel.parse().map_err(js_error)?);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn active_panel(&self) -> String {
        self.ui.active_panel().id().to_string()
    }

    /// Returns `true` when the page is now dark.
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.ui.toggle_theme() == Theme::Dark
    }

    pub fn set_method(&mut self, method: &str) -> Result<(), JsValue> {
        let method: HttpMethod = method.parse().map_err(js_error)?;
        self.ui.select_method(method);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn selected_method(&self) -> Option<String> {
        self.ui.selected_method().map(|method| method.as_str().to_string())
    }

    pub fn run(
        &self,
        kind: &str,
        primary: String,
        secondary: Option<String>,
        options: JsValue,
    ) -> Result<JsValue, JsValue> {
        let request = self
            .request(kind, primary, secondary, options_from_js(options)?)
            .map_err(js_error)?;
        report_to_js(&run_operation_internal(&self.runner, &request))
    }

    /// Promise of a status report; needed for `api-call`.
    pub fn dispatch(
        &self,
        kind: &str,
        primary: String,
        secondary: Option<String>,
        options: JsValue,
    ) -> Result<Promise, JsValue> {
        let request = self
            .request(kind, primary, secondary, options_from_js(options)?)
            .map_err(js_error)?;
        let config = self.runner.config().clone();
        Ok(future_to_promise(async move {
            report_to_js(&dispatch_operation_internal(config, request).await)
        }))
    }
}
