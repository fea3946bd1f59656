//! Page adjustments around the rendered viewer: the boot loader, the models
//! block position and unfolding collapsed targets.

use crate::config::NavConfig;
use crate::dom::filter::query_all;
use crate::models::TargetKind;
use leptos::logging::debug_warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Document, Element, HtmlElement};

const HIDE_CLASS: &str = "hide";
const MOVED_CLASS: &str = "schemas-end";

const HEADED_SECTIONS: &str = "section, .scheme-container";
const SECTION_HEADERS: &str = "h4, h3, h2, .model-title";

const TAG_TOGGLE: &str = ".expand-operation";
const MODEL_TOGGLE: &str = "button[aria-label*=\"Expand\"], button.model-toggle, .model-box-control button";
const MODEL_BOX: &str = ".model-box";
const HIGHLIGHT: &str = "#fff3cd";

/// Section titles that mark the models block when it has no class of its own.
pub fn is_models_heading(text: &str) -> bool {
    text.contains("Models") || text.contains("Schemas")
}

fn document() -> Option<Document> {
    web_sys::window()?.document()
}

pub fn hide_loader(config: &NavConfig) {
    let Some(loader) = document().and_then(|d| d.query_selector(&config.loader_selector).ok().flatten()) else {
        return;
    };
    let _ = loader.class_list().add_1(HIDE_CLASS);
}

fn find_models(viewer: &Element, config: &NavConfig) -> Option<Element> {
    if let Some(models) = viewer.query_selector(&config.models_selector).ok().flatten() {
        return Some(models);
    }
    query_all(viewer, HEADED_SECTIONS).into_iter().find(|section| {
        section
            .query_selector(SECTION_HEADERS)
            .ok()
            .flatten()
            .and_then(|h| h.text_content())
            .is_some_and(|t| is_models_heading(&t))
    })
}

/// Moves the models block to the end of the content root, inside a fresh
/// viewer wrapper so it keeps the viewer's styling. Returns whether anything
/// moved.
pub fn move_schemas_to_end(config: &NavConfig) -> bool {
    let Some(document) = document() else {
        return false;
    };
    let Some(content) = document.get_element_by_id(&config.content_root_id) else {
        return false;
    };
    let viewer = content
        .query_selector(&format!(".{}", config.viewer_wrapper_class))
        .ok()
        .flatten()
        .unwrap_or_else(|| content.clone());

    let Some(models) = find_models(&viewer, config) else {
        debug_warn!("no models block under #{}", config.content_root_id);
        return false;
    };
    if models.closest(&format!(".{MOVED_CLASS}")).ok().flatten().is_some() {
        return false;
    }

    let Ok(wrapper) = document.create_element("div") else {
        return false;
    };
    wrapper.set_class_name(&format!("{} {MOVED_CLASS}", config.viewer_wrapper_class));
    if let Some(html) = wrapper.dyn_ref::<HtmlElement>() {
        let style = html.style();
        let _ = style.set_property("padding", "20px");
        let _ = style.set_property("max-width", "100%");
    }

    wrapper.append_child(&models).is_ok() && content.append_child(&wrapper).is_ok()
}

/// Clicks the block's expand control if it reports itself collapsed.
/// Schema blocks are also flashed.
pub fn unfold_section(kind: TargetKind, el: &Element) {
    let toggle = match kind {
        TargetKind::TagSection => TAG_TOGGLE,
        TargetKind::SchemaSection => MODEL_TOGGLE,
        _ => return,
    };

    // Only an explicit "false"; a missing attribute may mean expanded.
    let collapsed = el
        .query_selector(toggle)
        .ok()
        .flatten()
        .filter(|b| b.get_attribute("aria-expanded").as_deref() == Some("false"));
    if let Some(button) = collapsed.as_ref().and_then(|b| b.dyn_ref::<HtmlElement>()) {
        button.click();
    }

    if kind == TargetKind::SchemaSection {
        let target = el
            .query_selector(MODEL_BOX)
            .ok()
            .flatten()
            .unwrap_or_else(|| el.clone());
        flash(&target);
    }
}

/// Tints the background once; the previous inline style returns after the
/// transition ends.
fn flash(el: &Element) {
    let Some(html) = el.dyn_ref::<HtmlElement>() else {
        return;
    };
    let style = html.style();
    let background = style.get_property_value("background-color").unwrap_or_default();
    let transition = style.get_property_value("transition").unwrap_or_default();

    let _ = style.set_property("transition", "background-color 0.3s ease");
    let _ = style.set_property("background-color", HIGHLIGHT);

    let reset = Closure::once_into_js(move || {
        let _ = style.set_property("background-color", &background);
        let _ = style.set_property("transition", &transition);
    });
    let opts = AddEventListenerOptions::new();
    opts.set_once(true);
    let _ = html.add_event_listener_with_callback_and_add_event_listener_options(
        "transitionend",
        reset.unchecked_ref(),
        &opts,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_models_heading_matches_either_title() {
        assert!(is_models_heading("Models"));
        assert!(is_models_heading(" Schemas (42) "));
        assert!(!is_models_heading("Articles"));
        assert!(!is_models_heading("models"));
    }
}
