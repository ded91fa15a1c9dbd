//! Ad-hoc HTTP requests for the API tester panel.
//!
//! A request is validated synchronously ([`ApiRequest::prepare`]) so that a
//! missing method, URL or malformed headers never reach the network; only a
//! [`PreparedRequest`] can be sent. On wasm32 `reqwest` goes through `fetch`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, ToolError};

pub const MSG_CHOOSE_METHOD: &str = "Choose HTTP Method!";
pub const MSG_URL_REQUIRED: &str = "API URL required!";
pub const MSG_HEADERS_INVALID: &str = "Headers JSON invalid!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] = [Self::Get, Self::Post, Self::Put, Self::Patch, Self::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Only these methods send the body field.
    pub fn carries_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ToolError;

    fn from_str(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| ToolError::validation(format!("Unsupported HTTP method: {name}")))
    }
}

/// Parses an optional method name where blank means "not selected yet".
pub fn parse_selected_method(name: &str) -> Result<Option<HttpMethod>> {
    if name.trim().is_empty() {
        return Ok(None);
    }
    name.parse().map(Some)
}

/// Raw field values of the API tester panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Option<HttpMethod>,
    pub url: String,
    /// JSON object text; blank means no headers.
    pub headers: String,
    pub body: String,
}

/// A request that passed validation and can be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ApiRequest {
    /// Checks method, then URL, then headers. The body is kept only for methods
    /// that carry one.
    pub fn prepare(&self) -> Result<PreparedRequest> {
        let method = self
            .method
            .ok_or_else(|| ToolError::validation(MSG_CHOOSE_METHOD))?;
        let url = self.url.trim();
        if url.is_empty() {
            return Err(ToolError::validation(MSG_URL_REQUIRED));
        }
        let headers = parse_headers(&self.headers)?;
        Ok(PreparedRequest {
            method,
            url: url.to_string(),
            headers,
            body: method.carries_body().then(|| self.body.clone()),
        })
    }
}

/// Parses header JSON into name/value pairs. Non-string values are sent as their
/// JSON text.
pub fn parse_headers(input: &str) -> Result<Vec<(String, String)>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) else {
        return Err(ToolError::validation(MSG_HEADERS_INVALID));
    };
    Ok(map
        .into_iter()
        .map(|(name, value)| {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (name, value)
        })
        .collect())
}

/// Sends the request and returns the response body verbatim, whatever the status code.
pub async fn send(request: &PreparedRequest) -> Result<String> {
    debug!(method = %request.method, url = %request.url, "sending api request");
    let client = reqwest::Client::new();
    let mut builder = client.request(request.method.to_reqwest(), request.url.as_str());
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if let Some(body) = &request.body {
        builder = builder.body(body.clone());
    }
    let response = builder
        .send()
        .await
        .map_err(|err| ToolError::operational(err.to_string()))?;
    debug!(status = %response.status(), "api response received");
    response
        .text()
        .await
        .map_err(|err| ToolError::operational(err.to_string()))
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod network_tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn post_sends_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/items"))
            .and(header("x-token", "abc"))
            .and(body_string("{\"name\":\"Ada\"}"))
            .respond_with(ResponseTemplate::new(201).set_body_string("created"))
            .expect(1)
            .mount(&server)
            .await;

        let prepared = ApiRequest {
            method: Some(HttpMethod::Post),
            url: format!("{}/items", server.uri()),
            headers: r#"{"x-token":"abc"}"#.into(),
            body: "{\"name\":\"Ada\"}".into(),
        }
        .prepare()
        .unwrap();
        assert_eq!(send(&prepared).await.unwrap(), "created");
    }

    #[tokio::test]
    async fn get_drops_the_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let prepared = ApiRequest {
            method: Some(HttpMethod::Get),
            url: server.uri(),
            headers: String::new(),
            body: "ignored".into(),
        }
        .prepare()
        .unwrap();
        assert_eq!(send(&prepared).await.unwrap(), "ok");

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert!(received[0].body.is_empty());
    }

    #[tokio::test]
    async fn error_statuses_still_return_the_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .mount(&server)
            .await;

        let prepared = ApiRequest {
            method: Some(HttpMethod::Delete),
            url: server.uri(),
            ..ApiRequest::default()
        }
        .prepare()
        .unwrap();
        assert_eq!(send(&prepared).await.unwrap(), "missing");
    }

    #[tokio::test]
    async fn unreachable_host_is_operational() {
        let prepared = PreparedRequest {
            method: HttpMethod::Get,
            url: "http://127.0.0.1:1/".into(),
            headers: Vec::new(),
            body: None,
        };
        let err = send(&prepared).await.unwrap_err();
        assert!(err.is_operational());
    }

    #[tokio::test]
    async fn malformed_url_is_operational() {
        let prepared = PreparedRequest {
            method: HttpMethod::Get,
            url: "not a url".into(),
            headers: Vec::new(),
            body: None,
        };
        assert!(send(&prepared).await.unwrap_err().is_operational());
    }
}
