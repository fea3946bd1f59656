mod app;
mod components;
pub mod config;
mod dom;
pub mod filter;
pub mod interceptor;
pub mod modal;
pub mod models;
pub mod nav;
mod state;
pub mod storage;
mod util;

use crate::app::App;
use crate::config::ViewerOptions;
use crate::interceptor::{decorate_request, RawResponse, ResponseReport};
use crate::modal::ModalOptions;
use crate::models::TargetKind;
use crate::state::docs_state;
use leptos::logging::{debug_warn, log, warn};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/* ========================================================== */
/*                   Viewer boot and hooks                    */
/* ========================================================== */

/// Option bag for the documentation viewer, as a plain JS object.
#[wasm_bindgen(js_name = viewerOptions)]
pub fn viewer_options() -> JsValue {
    let state = docs_state();
    let search = web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default();
    let options = ViewerOptions::for_location(&search, &state.config);

    serde_json::to_string(&options)
        .ok()
        .and_then(|json| js_sys::JSON::parse(&json).ok())
        .unwrap_or(JsValue::UNDEFINED)
}

/// Called by the viewer once the documentation has rendered.
#[wasm_bindgen(js_name = onViewerComplete)]
pub fn on_viewer_complete() {
    let state = docs_state();
    dom::layout::hide_loader(&state.config);
    let controller = dom::install_controller(&state);
    controller.move_schemas_later();
    log!("sidebar tracking ready");
}

/// Stops the click from reaching the link itself and the page.
fn swallow(event: &JsValue) {
    if let Some(ev) = event.dyn_ref::<web_sys::Event>() {
        ev.stop_propagation();
        ev.prevent_default();
    }
}

#[wasm_bindgen(js_name = toggleSubmenu)]
pub fn toggle_submenu(event: JsValue, menu_id: String) {
    swallow(&event);
    match dom::controller() {
        Some(c) => c.toggle(&menu_id, None),
        None => debug_warn!("toggleSubmenu(`{menu_id}`) before the viewer finished"),
    }
}

#[wasm_bindgen(js_name = toggleSubmenuAndScroll)]
pub fn toggle_submenu_and_scroll(event: JsValue, menu_id: String, section_id: String) {
    swallow(&event);
    match dom::controller() {
        Some(c) => c.toggle(&menu_id, Some(&section_id)),
        None => debug_warn!("toggleSubmenuAndScroll(`{menu_id}`) before the viewer finished"),
    }
}

fn navigate(kind: TargetKind, key: &str) {
    match dom::controller() {
        Some(c) => c.navigate_to(kind, key),
        None => warn!("cannot scroll to `{key}`: viewer not ready"),
    }
}

#[wasm_bindgen(js_name = scrollToDocSection)]
pub fn scroll_to_doc_section(section_id: String) {
    navigate(TargetKind::DocSection, &section_id);
}

#[wasm_bindgen(js_name = scrollToSchema)]
pub fn scroll_to_schema(name: String) {
    navigate(TargetKind::SchemaSection, &name);
}

#[wasm_bindgen(js_name = scrollToPresenters)]
pub fn scroll_to_presenters() {
    let key = docs_state().config.schema_root_key;
    navigate(TargetKind::SectionRoot, &key);
}

/* ========================================================== */
/*                      Request glue                          */
/* ========================================================== */

fn get_string(obj: &JsValue, key: &str) -> Option<String> {
    js_sys::Reflect::get(obj, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_string())
}

/// Attaches the stored API key to an outgoing request.
#[wasm_bindgen(js_name = requestInterceptor)]
pub fn request_interceptor(request: JsValue) -> JsValue {
    let state = docs_state();
    let Some(url) = get_string(&request, "url") else {
        return request;
    };
    let key = state.api_key.get_untracked();
    let Some(auth) = decorate_request(&url, key.as_deref(), &state.config) else {
        return request;
    };

    let headers = js_sys::Reflect::get(&request, &"headers".into())
        .ok()
        .filter(|h| h.is_object())
        .unwrap_or_else(|| {
            let h: JsValue = js_sys::Object::new().into();
            let _ = js_sys::Reflect::set(&request, &"headers".into(), &h);
            h
        });
    let ok = js_sys::Reflect::set(&headers, &"Authorization".into(), &auth.authorization.into()).is_ok()
        && js_sys::Reflect::set(&request, &"url".into(), &auth.url.into()).is_ok();
    if !ok {
        warn!("could not attach API key to request");
    }
    request
}

fn raw_response(response: &JsValue) -> RawResponse {
    let mut raw = js_sys::JSON::stringify(response)
        .ok()
        .and_then(|s| s.as_string())
        .and_then(|json| serde_json::from_str::<RawResponse>(&json).ok())
        .unwrap_or_else(|| RawResponse {
            url: get_string(response, "url"),
            status: js_sys::Reflect::get(response, &"status".into())
                .ok()
                .and_then(|v| v.as_f64())
                .map(|s| s as u16),
            ..RawResponse::default()
        });

    raw.error_message = ["err", "error"].iter().find_map(|key| {
        let err = js_sys::Reflect::get(response, &JsValue::from_str(key)).ok()?;
        if err.is_undefined() || err.is_null() {
            return None;
        }
        err.as_string().or_else(|| get_string(&err, "message"))
    });
    raw
}

/// Reports failed and successful API calls in the modal.
#[wasm_bindgen(js_name = responseInterceptor)]
pub fn response_interceptor(response: JsValue) -> JsValue {
    let state = docs_state();
    let raw = raw_response(&response);
    if let Some(report) = ResponseReport::from_response(&raw, &state.config) {
        if !state.modal.show_report(&report) {
            debug_warn!("duplicate report for {} suppressed", report.url);
        }
    }
    response
}

fn report_fetch_error(url: &str, err: &JsValue) {
    let state = docs_state();
    let name = get_string(err, "name").unwrap_or_default();
    let message = get_string(err, "message")
        .or_else(|| err.as_string())
        .unwrap_or_default();
    if let Some(report) = ResponseReport::from_fetch_error(url, &name, &message, &state.config) {
        if !state.modal.show_report(&report) {
            debug_warn!("duplicate report for {url} suppressed");
        }
    }
}

/// Wraps `window.fetch` so API calls that never get a response (blocked by
/// CORS, offline) still reach the modal. The rejection is passed on.
#[wasm_bindgen(js_name = installFetchWrapper)]
pub fn install_fetch_wrapper() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let marker = JsValue::from_str("__apidocNavFetch");
    if js_sys::Reflect::get(&window, &marker).is_ok_and(|v| v.is_truthy()) {
        return;
    }
    let Some(original) = js_sys::Reflect::get(&window, &"fetch".into())
        .ok()
        .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
    else {
        warn!("window.fetch missing; network errors will not be reported");
        return;
    };

    let target: JsValue = window.clone().into();
    let wrapper = Closure::wrap(Box::new(move |input: JsValue, init: JsValue| -> JsValue {
        let url = input
            .as_string()
            .or_else(|| get_string(&input, "url"))
            .unwrap_or_default();
        let pending = match original.call2(&target, &input, &init) {
            Ok(pending) => pending,
            Err(err) => return js_sys::Promise::reject(&err).into(),
        };
        let Some(catch) = js_sys::Reflect::get(&pending, &"catch".into())
            .ok()
            .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
        else {
            return pending;
        };

        let on_error = Closure::once_into_js(move |err: JsValue| -> JsValue {
            report_fetch_error(&url, &err);
            js_sys::Promise::reject(&err).into()
        });
        catch.call1(&pending, &on_error).unwrap_or(pending)
    }) as Box<dyn FnMut(JsValue, JsValue) -> JsValue>);

    let installed = js_sys::Reflect::set(&window, &"fetch".into(), wrapper.as_ref()).is_ok();
    wrapper.forget();
    if installed {
        let _ = js_sys::Reflect::set(&window, &marker, &JsValue::TRUE);
    } else {
        warn!("could not replace window.fetch");
    }
}

/* ========================================================== */
/*                         Modal                              */
/* ========================================================== */

/// `showUniversalModal({ type, title, content, icon })`.
#[wasm_bindgen(js_name = showUniversalModal)]
pub fn show_universal_modal(options: JsValue) {
    let options = js_sys::JSON::stringify(&options)
        .ok()
        .and_then(|s| s.as_string())
        .and_then(|json| serde_json::from_str::<ModalOptions>(&json).ok())
        .unwrap_or_default();
    docs_state().modal.show(options.into_content());
}

#[wasm_bindgen(js_name = closeUniversalModal)]
pub fn close_universal_modal() {
    docs_state().modal.hide();
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::config::NavConfig;
    use crate::dom::content::DomContent;
    use crate::dom::sidebar::scan_sidebar;
    use crate::models::{MenuState, SectionKind};
    use crate::nav::ContentTree;
    use crate::storage::{load_api_key, save_api_key};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount(html: &str) -> web_sys::Element {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("document should exist");
        let host = document.create_element("div").expect("should create host");
        host.set_inner_html(html);
        document
            .body()
            .expect("body should exist")
            .append_child(&host)
            .expect("should mount host");
        host
    }

    #[wasm_bindgen_test]
    fn test_api_key_storage_roundtrip() {
        let key = "apidoc_nav_test_key";
        assert_eq!(save_api_key(key, "  tok-1 ").as_deref(), Some("tok-1"));
        assert_eq!(load_api_key(key).as_deref(), Some("tok-1"));

        assert_eq!(save_api_key(key, "   "), None);
        assert!(load_api_key(key).is_none());
    }

    #[wasm_bindgen_test]
    fn test_fetch_wrapper_installs_once() {
        let window = web_sys::window().expect("window");
        install_fetch_wrapper();
        let first = js_sys::Reflect::get(&window, &"fetch".into()).expect("fetch");
        install_fetch_wrapper();
        let second = js_sys::Reflect::get(&window, &"fetch".into()).expect("fetch");

        assert!(first.is_function());
        assert!(js_sys::Object::is(&first, &second));
    }

    #[wasm_bindgen_test]
    fn test_models_block_moves_to_end_once() {
        let cfg = NavConfig {
            content_root_id: "layout-content".to_string(),
            ..NavConfig::default()
        };
        let host = mount(
            r#"<div id="layout-content">
                 <div class="swagger-ui">
                   <section class="models" id="models"><h4>Schemas</h4></section>
                   <div class="opblock-tag-section" id="operations-tag-articles"></div>
                 </div>
                 <div id="custom-fields"></div>
               </div>"#,
        );

        assert!(dom::layout::move_schemas_to_end(&cfg));
        let content = host.query_selector("#layout-content").ok().flatten().expect("content");
        let last = content.last_element_child().expect("wrapper");
        assert_eq!(last.class_name(), "swagger-ui schemas-end");
        assert!(last.query_selector("#models").ok().flatten().is_some());

        assert!(!dom::layout::move_schemas_to_end(&cfg));
        host.remove();
    }

    #[wasm_bindgen_test]
    fn test_unfold_clicks_only_collapsed_tag_toggle() {
        let host = mount(
            r#"<div id="unfold-open"><button class="expand-operation" aria-expanded="true"></button></div>
               <div id="unfold-closed"><button class="expand-operation" aria-expanded="false"></button></div>"#,
        );
        let count = std::rc::Rc::new(std::cell::Cell::new(0));
        for id in ["unfold-open", "unfold-closed"] {
            let section = host.query_selector(&format!("#{id}")).ok().flatten().expect("section");
            let button = section.query_selector("button").ok().flatten().expect("button");
            let c = count.clone();
            let cb = Closure::wrap(Box::new(move |_ev: web_sys::Event| c.set(c.get() + 1)) as Box<dyn FnMut(_)>);
            button
                .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
                .expect("listener");
            cb.forget();
            dom::layout::unfold_section(TargetKind::TagSection, &section);
        }

        assert_eq!(count.get(), 1);
        host.remove();
    }

    #[wasm_bindgen_test]
    fn test_hide_loader_adds_hide_class() {
        let host = mount(r#"<div class="figsh_loader"></div>"#);
        dom::layout::hide_loader(&NavConfig::default());
        let loader = host.query_selector(".figsh_loader").ok().flatten().expect("loader");
        assert!(loader.class_list().contains("hide"));
        host.remove();
    }

    #[wasm_bindgen_test]
    fn test_dom_content_ignores_sidebar() {
        let host = mount(
            r#"<nav class="api-sidebar"><div id="in-sidebar" class="opblock"></div></nav>
               <div id="swagger-ui-content">
                 <div class="opblock-tag-section" id="tag-articles">
                   <h3 class="opblock-tag">Articles</h3>
                   <div class="opblock" id="operations-articles-list"></div>
                 </div>
               </div>"#,
        );

        let content = DomContent::new(&NavConfig::default()).expect("content");
        let ops = content.sections(SectionKind::Operation);
        assert!(ops.iter().all(|el| el.id() != "in-sidebar"));
        assert!(ops.iter().any(|el| el.id() == "operations-articles-list"));

        let tag = content.element_by_id("tag-articles").expect("tag section");
        assert_eq!(content.heading_text(&tag).as_deref().map(str::trim), Some("Articles"));

        host.remove();
    }

    #[wasm_bindgen_test]
    fn test_scan_sidebar_builds_menus_and_links() {
        let host = mount(
            r##"<nav class="api-sidebar">
                 <ul id="guides-menu" class="expanded">
                   <li><a class="sidebar-link" onclick="scrollToDocSection('quickstart')">Quickstart</a></li>
                   <li>
                     <div class="parent-item-wrapper">
                       <a class="sidebar-link" onclick="toggleSubmenuAndScroll(event, 'upload-menu', 'upload')">Upload</a>
                     </div>
                     <ul id="upload-menu" class="collapsed">
                       <li><a class="sidebar-link" href="#operations-Upload-createUpload">Steps</a></li>
                     </ul>
                   </li>
                 </ul>
               </nav>"##,
        );

        let scanned = scan_sidebar(&NavConfig::default()).expect("sidebar");
        assert_eq!(scanned.links.len(), 3);
        assert_eq!(scanned.elements.len(), 3);

        let upload = &scanned.links[1];
        assert_eq!(upload.controls.as_deref(), Some("upload-menu"));
        assert_eq!(upload.menu.as_deref(), Some("guides-menu"));

        let steps = &scanned.links[2];
        assert_eq!(steps.level, 3);
        assert_eq!(steps.menu.as_deref(), Some("upload-menu"));

        let guides = scanned.menus.get("guides-menu").expect("guides menu");
        assert_eq!(guides.state, MenuState::Expanded);
        let nested = scanned.menus.get("upload-menu").expect("upload menu");
        assert_eq!(nested.parent.as_deref(), Some("guides-menu"));

        host.remove();
    }
}

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    install_fetch_wrapper();
    mount_to_body(App);
}
