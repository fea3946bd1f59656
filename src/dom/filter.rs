use crate::config::NavConfig;
use crate::filter::{plan, DocSectionText, FilterPlan, FirstVisible, OperationText, TagGroupText};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, ScrollBehavior, ScrollToOptions};

const TAG_SECTIONS: &str = ".opblock-tag-section";
const OPERATIONS: &str = ".opblock";
const DOC_SECTIONS: &str = "#documentation-sections > section, #documentation-sections > div";
const MODELS: &str = ".models";
const MODEL_BOXES: &str = ".model-box, .model-container";

pub(crate) fn query_all(root: &Element, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
        .collect()
}

fn doc_query_all(document: &Document, selector: &str) -> Vec<Element> {
    document
        .document_element()
        .map(|root| query_all(&root, selector))
        .unwrap_or_default()
}

/// Text of the first element matching any of `selectors`, in order.
fn first_text(root: &Element, selectors: &[&str]) -> String {
    selectors
        .iter()
        .find_map(|sel| root.query_selector(sel).ok().flatten())
        .and_then(|el| el.text_content())
        .unwrap_or_default()
}

fn set_displayed(el: &Element, visible: bool) {
    let Some(html) = el.dyn_ref::<HtmlElement>() else {
        return;
    };
    let style = html.style();
    let _ = if visible {
        style.remove_property("display").map(|_| ())
    } else {
        style.set_property("display", "none")
    };
}

/// Filterable blocks on the page, read once per search pass.
struct FilterTargets {
    tags: Vec<(Element, Vec<Element>)>,
    docs: Vec<Element>,
}

impl FilterTargets {
    fn collect(document: &Document) -> Self {
        let tags = doc_query_all(document, TAG_SECTIONS)
            .into_iter()
            .map(|tag| {
                let ops = query_all(&tag, OPERATIONS);
                (tag, ops)
            })
            .collect();
        Self {
            tags,
            docs: doc_query_all(document, DOC_SECTIONS),
        }
    }

    fn texts(&self) -> (Vec<TagGroupText>, Vec<DocSectionText>) {
        let tags = self
            .tags
            .iter()
            .map(|(tag, ops)| TagGroupText {
                name: first_text(tag, &[".opblock-tag a", ".opblock-tag span", ".opblock-tag"]),
                operations: ops
                    .iter()
                    .map(|op| OperationText {
                        summary: first_text(op, &[".opblock-summary-description"]),
                        path: first_text(op, &[".opblock-summary-path", ".opblock-summary-path__deprecated"]),
                        method: first_text(op, &[".opblock-summary-method"]),
                        description: first_text(op, &[".opblock-description", ".markdown"]),
                    })
                    .collect(),
            })
            .collect();

        let docs = self
            .docs
            .iter()
            .map(|doc| DocSectionText {
                text: doc.text_content().unwrap_or_default(),
                headings: query_all(doc, "h1, h2, h3, h4, h5, h6")
                    .iter()
                    .filter_map(|h| h.text_content())
                    .collect(),
            })
            .collect();

        (tags, docs)
    }

    fn apply(&self, plan: &FilterPlan) {
        for ((tag, ops), vis) in self.tags.iter().zip(&plan.tags) {
            set_displayed(tag, vis.visible);
            for (op, visible) in ops.iter().zip(&vis.operations) {
                set_displayed(op, *visible);
            }
        }
        for (doc, visible) in self.docs.iter().zip(&plan.docs) {
            set_displayed(doc, *visible);
        }
    }

    fn element_for(&self, first: FirstVisible) -> Option<&Element> {
        match first {
            FirstVisible::Tag(i) => self.tags.get(i).map(|(tag, _)| tag),
            FirstVisible::Operation { tag, operation } => {
                self.tags.get(tag).and_then(|(_, ops)| ops.get(operation))
            }
        }
    }
}

/// Runs one filter pass and returns the element to bring into view: the
/// first visible result, else the content root.
pub fn run_filter(query: &str, config: &NavConfig) -> Option<Element> {
    let document = web_sys::window()?.document()?;

    let targets = FilterTargets::collect(&document);
    let (tags, docs) = targets.texts();
    let plan = plan(query, &tags, &docs);
    targets.apply(&plan);

    if let Some(models) = document.query_selector(MODELS).ok().flatten() {
        set_displayed(&models, true);
        for b in query_all(&models, MODEL_BOXES) {
            set_displayed(&b, true);
        }
    }

    plan.first_visible()
        .and_then(|f| targets.element_for(f).cloned())
        .or_else(|| document.get_element_by_id(&config.content_root_id))
}

/// Document offset of `el`, less the search scroll margin.
pub fn results_offset(el: &Element, config: &NavConfig) -> f64 {
    let scroll_y = web_sys::window()
        .and_then(|w| w.scroll_y().ok())
        .unwrap_or(0.0);
    el.get_bounding_client_rect().top() + scroll_y - config.search_scroll_margin
}

pub fn smooth_scroll_window(top: f64) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let opts = ScrollToOptions::new();
    opts.set_top(top);
    opts.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&opts);
}
