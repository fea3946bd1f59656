use crate::config::NavConfig;
use crate::models::SectionKind;
use crate::nav::content::ContentTree;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Window};

/// CSS selector matching containers of `kind` in the rendered page.
pub fn section_selector(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::TagSection => ".opblock-tag-section",
        SectionKind::Operation => ".opblock",
        SectionKind::ModelBox => ".model-box",
        SectionKind::ModelsRoot => ".models-wrapper, .models, #models, section.models",
        SectionKind::DocSection => {
            "[id^=\"doc-section-\"], #documentation-sections > section, #documentation-sections > div"
        }
    }
}

/// Title selectors for a container, most specific first.
fn heading_selectors(kind: SectionKind) -> &'static [&'static str] {
    match kind {
        SectionKind::TagSection => &[".opblock-tag h3", ".opblock-tag h4", ".opblock-tag", "h3, h4"],
        SectionKind::Operation => &[".opblock-summary-description", "h3, h4, h5"],
        SectionKind::ModelBox => &[".model-title__text", ".model-title span", ".model-title"],
        SectionKind::ModelsRoot => &["h2, h3, h4", ".models-control span"],
        SectionKind::DocSection => &["h1, h2, h3, h4"],
    }
}

const KINDS: [SectionKind; 5] = [
    SectionKind::ModelBox,
    SectionKind::Operation,
    SectionKind::TagSection,
    SectionKind::ModelsRoot,
    SectionKind::DocSection,
];

const HEADINGS: &str = "h2, h3, h4, h5";

pub(crate) fn css_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Live page content, minus the sidebar.
pub struct DomContent {
    window: Window,
    document: Document,
    sidebar: Option<Element>,
}

impl DomContent {
    pub fn new(config: &NavConfig) -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        let sidebar = document.query_selector(&config.sidebar_selector).ok().flatten();
        Some(Self {
            window,
            document,
            sidebar,
        })
    }

    fn in_content(&self, el: &Element) -> bool {
        self.sidebar.as_ref().map_or(true, |s| !s.contains(Some(el.as_ref())))
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|n| n.dyn_into::<Element>().ok())
            .filter(|el| self.in_content(el))
            .collect()
    }

    fn kind_of(&self, el: &Element) -> Option<SectionKind> {
        KINDS
            .into_iter()
            .find(|k| el.matches(section_selector(*k)).unwrap_or(false))
    }
}

impl ContentTree for DomContent {
    type Element = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document
            .get_element_by_id(id)
            .filter(|el| self.in_content(el))
    }

    fn elements_with_attribute(&self, name: &str, value: &str) -> Vec<Element> {
        self.query_all(&format!("[{name}=\"{}\"]", css_string(value)))
    }

    fn sections(&self, kind: SectionKind) -> Vec<Element> {
        self.query_all(section_selector(kind))
    }

    fn heading_text(&self, section: &Element) -> Option<String> {
        let kind = self.kind_of(section)?;
        heading_selectors(kind).iter().find_map(|sel| {
            section
                .query_selector(sel)
                .ok()
                .flatten()
                .and_then(|h| h.text_content())
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
        })
    }

    fn headings(&self) -> Vec<Element> {
        self.query_all(HEADINGS)
    }

    fn text(&self, el: &Element) -> String {
        el.text_content().unwrap_or_default().trim().to_string()
    }

    fn parent(&self, el: &Element) -> Option<Element> {
        el.parent_element()
    }

    fn closest_section(&self, el: &Element, kind: SectionKind) -> Option<Element> {
        el.closest(section_selector(kind))
            .ok()
            .flatten()
            .filter(|s| self.in_content(s))
    }

    fn is_displayed(&self, el: &Element) -> bool {
        match self.window.get_computed_style(el) {
            Ok(Some(style)) => style
                .get_property_value("display")
                .map(|d| d != "none")
                .unwrap_or(true),
            _ => true,
        }
    }

    fn document_top(&self, el: &Element) -> f64 {
        el.get_bounding_client_rect().top() + self.window.scroll_y().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_string_escapes_quotes_and_backslashes() {
        assert_eq!(css_string(r#"a"b\c"#), r#"a\"b\\c"#);
    }

    #[test]
    fn test_every_kind_has_a_selector_and_headings() {
        for kind in KINDS {
            assert!(!section_selector(kind).is_empty());
            assert!(!heading_selectors(kind).is_empty());
        }
    }
}
