use serde::{Deserialize, Serialize};

/// Page-level tunables for the sidebar tracker and its glue.
///
/// Every field has a default, so a partial `window.DOCS_NAV` object only
/// overrides what it names.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct NavConfig {
    /// Height of the fixed page header, added to `scrollY` for the trigger line.
    pub header_offset: f64,
    /// Below this `scrollY` nothing is active and every menu is folded.
    pub top_threshold: f64,

    pub search_debounce_ms: i32,
    /// Wait for an expand/collapse animation before scrolling to content.
    pub expand_settle_ms: i32,
    /// Wait for a smooth scroll to finish before re-syncing the sidebar.
    pub scroll_settle_ms: i32,
    pub search_scroll_margin: f64,

    /// Top-level menu listing the schemas/models.
    pub schema_root_menu: String,
    /// Element id of the models/schemas root section.
    pub schema_root_key: String,

    pub sidebar_selector: String,
    pub link_selector: String,
    pub content_root_id: String,
    pub search_input_id: String,
    pub api_key_input_id: String,
    pub api_key_storage_key: String,

    /// Spinner shown until the viewer completes.
    pub loader_selector: String,
    pub models_selector: String,
    /// Class of the viewer's own wrapper; the relocated models block gets one too.
    pub viewer_wrapper_class: String,
    /// Wait for the viewer to finish rendering before relocating the models.
    pub move_schemas_delay_ms: i32,

    pub spec_file: String,
    /// Only URLs containing this marker count as API calls.
    pub api_path_marker: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            header_offset: 55.0,
            top_threshold: 200.0,
            search_debounce_ms: 400,
            expand_settle_ms: 100,
            scroll_settle_ms: 500,
            search_scroll_margin: 20.0,
            schema_root_menu: "presenters-menu".to_string(),
            schema_root_key: "models".to_string(),
            sidebar_selector: ".api-sidebar".to_string(),
            link_selector: ".sidebar-link".to_string(),
            content_root_id: "swagger-ui-content".to_string(),
            search_input_id: "SearchDocInput".to_string(),
            api_key_input_id: "apiKeyInput".to_string(),
            api_key_storage_key: "apidoc_api_key".to_string(),
            loader_selector: ".figsh_loader".to_string(),
            models_selector: ".models".to_string(),
            viewer_wrapper_class: "swagger-ui".to_string(),
            move_schemas_delay_ms: 500,
            spec_file: "swagger.json".to_string(),
            api_path_marker: "/v2/".to_string(),
        }
    }
}

impl NavConfig {
    /// Reads overrides from `window.DOCS_NAV`, falling back to defaults.
    pub fn new() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let Some(overrides) = window.get("DOCS_NAV") else {
            return Self::default();
        };
        if overrides.is_undefined() || !overrides.is_object() {
            return Self::default();
        }

        js_sys::JSON::stringify(&overrides)
            .ok()
            .and_then(|s| s.as_string())
            .and_then(|json| Self::from_json(&json).ok())
            .unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Option bag handed to the documentation viewer at boot.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViewerOptions {
    pub url: String,
    pub dom_id: String,
    pub deep_linking: bool,
    pub default_models_expand_depth: u32,
    pub default_model_expand_depth: u32,
    pub doc_expansion: String,
    pub filter: bool,
    pub show_extensions: bool,
    pub show_common_extensions: bool,
    pub display_request_duration: bool,
    pub try_it_out_enabled: bool,
    pub persist_authorization: bool,
    pub request_snippets_enabled: bool,
    pub layout: String,
}

impl ViewerOptions {
    /// `search` is `location.search`, e.g. `?url=https%3A%2F%2Fx%2Fspec.json`.
    pub fn for_location(search: &str, config: &NavConfig) -> Self {
        Self {
            url: spec_url_from_query(search).unwrap_or_else(|| config.spec_file.clone()),
            dom_id: format!("#{}", config.content_root_id),
            deep_linking: true,
            default_models_expand_depth: 1,
            default_model_expand_depth: 1,
            doc_expansion: "list".to_string(),
            filter: true,
            show_extensions: false,
            show_common_extensions: false,
            display_request_duration: true,
            try_it_out_enabled: true,
            persist_authorization: true,
            request_snippets_enabled: true,
            layout: "StandaloneLayout".to_string(),
        }
    }
}

pub fn spec_url_from_query(search: &str) -> Option<String> {
    let query = search.strip_prefix('?').unwrap_or(search);
    let raw = query
        .split('&')
        .find_map(|pair| pair.strip_prefix("url="))
        .filter(|v| !v.is_empty())?;
    urlencoding::decode(raw).ok().map(|s| s.into_owned())
}
