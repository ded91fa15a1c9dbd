//! Upload and download plumbing for the formatter panel.

use serde::Serialize;

pub const JSON_MIME: &str = "application/json";

/// Bytes plus the metadata the page needs to offer them as a download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Wraps the editor text as-is; nothing is validated on download.
pub fn download_payload(text: &str, file_name: &str) -> DownloadFile {
    DownloadFile {
        file_name: file_name.to_string(),
        mime_type: JSON_MIME.to_string(),
        bytes: text.as_bytes().to_vec(),
    }
}

/// Decodes an uploaded file as UTF-8 text the way `FileReader.readAsText` does:
/// invalid sequences become U+FFFD and a leading byte-order mark is dropped.
pub fn read_upload(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes).into_owned();
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}
