//! Request decoration and response reporting for the viewer's "try it out"
//! calls.

use crate::config::NavConfig;
use crate::modal::{ModalContent, ModalKind};
use serde::Deserialize;
use serde_json::Value;

pub const CORS_HEADERS: &str = "N/A (blocked by CORS)";

/// Authorization to attach to an outgoing request.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestAuth {
    pub url: String,
    pub authorization: String,
}

/// `None` for the spec file itself or when there is no usable key.
pub fn decorate_request(url: &str, api_key: Option<&str>, config: &NavConfig) -> Option<RequestAuth> {
    if is_spec_file(url, config) {
        return None;
    }
    let key = api_key.map(str::trim).filter(|k| !k.is_empty())?;

    Some(RequestAuth {
        url: set_query_param(url, "access_token", key),
        authorization: format!("token {key}"),
    })
}

/// Sets `name=value` in the query string, replacing any existing `name`.
pub fn set_query_param(url: &str, name: &str, value: &str) -> String {
    let (base, fragment) = match url.split_once('#') {
        Some((b, f)) => (b, Some(f)),
        None => (url, None),
    };
    let (path, query) = match base.split_once('?') {
        Some((p, q)) => (p, q),
        None => (base, ""),
    };

    let pair = format!("{name}={}", urlencoding::encode(value));
    let mut pairs: Vec<String> = Vec::new();
    let mut replaced = false;
    for p in query.split('&').filter(|p| !p.is_empty()) {
        let key = p.split('=').next().unwrap_or("");
        if key == name {
            if !replaced {
                pairs.push(pair.clone());
                replaced = true;
            }
            continue;
        }
        pairs.push(p.to_string());
    }
    if !replaced {
        pairs.push(pair);
    }

    let mut out = format!("{path}?{}", pairs.join("&"));
    if let Some(f) = fragment {
        out.push('#');
        out.push_str(f);
    }
    out
}

fn is_spec_file(url: &str, config: &NavConfig) -> bool {
    !config.spec_file.is_empty() && url.contains(&config.spec_file)
}

/// Calls to the documented API, as opposed to the spec file or page assets.
pub fn is_api_call(url: &str, config: &NavConfig) -> bool {
    !config.api_path_marker.is_empty() && url.contains(&config.api_path_marker) && !is_spec_file(url, config)
}

pub fn http_error_hint(status: u16) -> Option<&'static str> {
    match status {
        400 => Some("The request was malformed or contains invalid parameters."),
        401 => Some("Authentication required. Enter a valid API token above."),
        403 => Some("Access forbidden. Check your token permissions."),
        404 => Some("Resource not found. Check the ID or path."),
        422 => Some("Validation error. Check field values."),
        429 => Some("Rate limit exceeded. Wait before retrying."),
        500 => Some("Server error. Try again later."),
        _ => None,
    }
}

/// Response object as the viewer hands it to its response interceptor.
///
/// The body may sit under any of `body`, `obj`, `data` or `text`.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RawResponse {
    pub url: Option<String>,
    pub status: Option<u16>,
    pub status_code: Option<u16>,
    pub status_text: Option<String>,
    pub ok: Option<bool>,
    pub body: Option<Value>,
    pub obj: Option<Value>,
    pub data: Option<Value>,
    pub text: Option<Value>,
    pub headers: Option<Value>,
    pub err: Option<Value>,
    pub error: Option<Value>,
    /// `Error.message` does not survive JSON serialization, so the binding
    /// copies it here.
    pub error_message: Option<String>,
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn present(v: &Option<Value>) -> Option<&Value> {
    v.as_ref().filter(|v| truthy(v))
}

impl RawResponse {
    pub fn status(&self) -> u16 {
        self.status
            .filter(|s| *s != 0)
            .or(self.status_code)
            .unwrap_or(0)
    }

    fn payload(&self) -> Option<&Value> {
        present(&self.body)
            .or_else(|| present(&self.obj))
            .or_else(|| present(&self.data))
            .or_else(|| present(&self.text))
    }

    fn error_text(&self) -> Option<String> {
        if let Some(m) = self.error_message.as_deref().filter(|m| !m.is_empty()) {
            return Some(m.to_string());
        }
        let err = present(&self.err).or_else(|| present(&self.error))?;
        Some(match err {
            Value::String(s) => s.clone(),
            other => other
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| other.to_string()),
        })
    }
}

fn pretty_body(body: &Value) -> String {
    match body {
        Value::String(s) => serde_json::from_str::<Value>(s)
            .ok()
            .and_then(|v| serde_json::to_string_pretty(&v).ok())
            .unwrap_or_else(|| s.clone()),
        Value::Object(_) | Value::Array(_) => {
            serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string())
        }
        other => other.to_string(),
    }
}

fn pretty_headers(headers: Option<&Value>) -> Option<String> {
    let map = headers?.as_object()?;
    if map.is_empty() {
        return None;
    }
    serde_json::to_string_pretty(map).ok()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Failure,
    Success,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemCount {
    Items(usize),
    Object,
}

impl ItemCount {
    fn of(body: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(body).ok()? {
            Value::Array(items) => Some(ItemCount::Items(items.len())),
            Value::Object(_) => Some(ItemCount::Object),
            _ => None,
        }
    }

    fn label(self) -> String {
        match self {
            ItemCount::Items(n) => format!(" ({n})"),
            ItemCount::Object => " (object)".to_string(),
        }
    }
}

/// Normalized view of one intercepted response, ready for the modal.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseReport {
    pub outcome: Outcome,
    pub url: String,
    pub status: Option<u16>,
    /// Status code, `Network Error` or `N/A`, possibly with status text.
    pub code: String,
    pub body: String,
    pub headers: String,
    pub item_count: Option<ItemCount>,
    pub hint: Option<&'static str>,
}

impl ResponseReport {
    /// `None` for the spec file and for responses that need no modal.
    pub fn from_response(raw: &RawResponse, config: &NavConfig) -> Option<Self> {
        let url = raw.url.clone().filter(|u| !u.is_empty());
        if url.as_deref().is_some_and(|u| is_spec_file(u, config)) {
            return None;
        }
        let url = url.unwrap_or_else(|| "Unknown URL".to_string());

        let status = raw.status();
        let error = raw.error_text();
        let failed = status >= 400 || raw.ok == Some(false) || error.is_some();

        if failed {
            return Some(Self::failure(raw, url, status, error));
        }

        if (200..300).contains(&status) && is_api_call(&url, config) {
            return Some(Self::success(raw, url, status));
        }
        None
    }

    /// Report for an API `fetch` that rejected before any response arrived.
    ///
    /// The browser hides the reason for a blocked request, so headers always
    /// read as blocked.
    pub fn from_fetch_error(url: &str, name: &str, message: &str, config: &NavConfig) -> Option<Self> {
        if !is_api_call(url, config) {
            return None;
        }
        let message = match (name.trim(), message.trim()) {
            ("", "") => "Network request failed".to_string(),
            ("", m) => m.to_string(),
            (n, "") => n.to_string(),
            (n, m) => format!("{n}: {m}"),
        };
        let raw = RawResponse {
            url: Some(url.to_string()),
            error_message: Some(message),
            ..RawResponse::default()
        };

        let mut report = Self::from_response(&raw, config)?;
        report.headers = CORS_HEADERS.to_string();
        Some(report)
    }

    fn failure(raw: &RawResponse, url: String, status: u16, error: Option<String>) -> Self {
        let mut code = if status > 0 {
            status.to_string()
        } else {
            "Network Error".to_string()
        };
        let mut body = raw.payload().map(pretty_body).unwrap_or_default();
        let mut numeric = status > 0;
        let mut cors = false;

        if let Some(message) = error {
            numeric = false;
            code = "Network Error".to_string();
            body = message;
            if body.contains("Failed to fetch") {
                cors = true;
                code = "N/A".to_string();
                body = "N/A".to_string();
            }
        }

        let headers = pretty_headers(raw.headers.as_ref()).unwrap_or_else(|| {
            if cors {
                CORS_HEADERS.to_string()
            } else {
                "{}".to_string()
            }
        });
        if body.is_empty() {
            body = "No response body".to_string();
        }

        Self {
            outcome: Outcome::Failure,
            url,
            status: numeric.then_some(status),
            code,
            item_count: ItemCount::of(&body),
            body,
            headers,
            hint: if numeric { http_error_hint(status) } else { None },
        }
    }

    fn success(raw: &RawResponse, url: String, status: u16) -> Self {
        let body = raw
            .payload()
            .map(pretty_body)
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| "Empty response".to_string());
        let code = match raw.status_text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => format!("{status} {text}"),
            _ => status.to_string(),
        };

        Self {
            outcome: Outcome::Success,
            url,
            status: Some(status),
            code,
            item_count: ItemCount::of(&body),
            body,
            headers: pretty_headers(raw.headers.as_ref()).unwrap_or_else(|| "{}".to_string()),
            hint: None,
        }
    }

    pub fn dedupe_key(&self) -> String {
        format!("{}{}{}", self.url, self.code, self.body)
    }

    pub fn to_modal(&self) -> ModalContent {
        let (kind, title, value_class) = match self.outcome {
            Outcome::Failure => (ModalKind::Error, "Request Failed", "modal-detail-value error-message"),
            Outcome::Success => (ModalKind::Success, "Request Successful", "modal-detail-value success-message"),
        };
        let count = self.item_count.map(ItemCount::label).unwrap_or_default();

        let mut html = String::new();
        html.push_str(&detail("Request URL", "div", "modal-detail-value", &self.url));
        html.push_str(&detail(&format!("Response Body{count}"), "pre", value_class, &self.body));
        html.push_str(&detail("Response Code", "div", value_class, &self.code));
        html.push_str(&detail("Response Headers", "pre", "modal-detail-value", &self.headers));
        if let Some(hint) = self.hint {
            html.push_str(&format!(
                r#"<div class="modal-hint"><strong>Hint:</strong> <span>{}</span></div>"#,
                escape_html(hint)
            ));
        }

        ModalContent::new(kind, title, html)
    }
}

fn detail(label: &str, tag: &str, class: &str, value: &str) -> String {
    format!(
        r#"<div class="modal-detail"><div class="modal-detail-label">{}</div><{tag} class="{class}">{}</{tag}></div>"#,
        escape_html(label),
        escape_html(value),
    )
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
