use crate::models::{NavigationLink, SectionKind, TargetKind};
use crate::nav::content::ContentTree;
use crate::nav::error::{NavError, NavResult};
use leptos::logging::debug_warn;

/// Lookup strategies, tried in `Strategy::ORDER`; the first hit wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    ExactId,
    Attribute,
    Structural,
    SemanticAncestor,
}

struct Hit<E> {
    element: E,
    candidates: usize,
}

impl<E> Hit<E> {
    fn first(mut all: Vec<E>) -> Option<Self> {
        let candidates = all.len();
        if candidates == 0 {
            return None;
        }
        Some(Self {
            element: all.swap_remove(0),
            candidates,
        })
    }
}

impl Strategy {
    pub const ORDER: [Strategy; 4] = [
        Strategy::ExactId,
        Strategy::Attribute,
        Strategy::Structural,
        Strategy::SemanticAncestor,
    ];

    /// Runs this strategy alone; `None` when it finds nothing.
    pub fn find<T: ContentTree>(self, link: &NavigationLink, tree: &T) -> Option<T::Element> {
        self.hit(link, tree).map(|h| h.element)
    }

    fn hit<T: ContentTree>(self, link: &NavigationLink, tree: &T) -> Option<Hit<T::Element>> {
        match self {
            Strategy::ExactId => {
                let id = link.kind.element_id(&link.target_key);
                tree.element_by_id(&id).map(|element| Hit {
                    element,
                    candidates: 1,
                })
            }
            Strategy::Attribute => {
                let attr = link.kind.attribute()?;
                if link.target_key.trim().is_empty() {
                    return None;
                }
                Hit::first(tree.elements_with_attribute(attr, &link.target_key))
            }
            Strategy::Structural => structural(link, tree),
            Strategy::SemanticAncestor => semantic_ancestor(link, tree),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Resolved<E> {
    pub element: E,
    pub strategy: Strategy,
    pub top: f64,
}

/// Finds the on-page element a link refers to.
///
/// Hidden targets (own display, or enclosing tag section filtered out) are
/// reported as `TargetHidden` rather than falling through to weaker
/// strategies.
pub fn resolve<T: ContentTree>(link: &NavigationLink, tree: &T) -> NavResult<Resolved<T::Element>> {
    for strategy in Strategy::ORDER {
        let Some(hit) = strategy.hit(link, tree) else {
            continue;
        };

        if hit.candidates > 1 {
            debug_warn!(
                "{}",
                NavError::ambiguous(link.kind, &link.target_key, hit.candidates)
            );
        }

        if !is_visible(tree, &hit.element) {
            return Err(NavError::target_hidden(link.kind, &link.target_key));
        }

        return Ok(Resolved {
            top: tree.document_top(&hit.element),
            element: hit.element,
            strategy,
        });
    }

    Err(NavError::target_not_found(link.kind, &link.target_key))
}

pub fn is_visible<T: ContentTree>(tree: &T, el: &T::Element) -> bool {
    if !tree.is_displayed(el) {
        return false;
    }
    tree.closest_section(el, SectionKind::TagSection)
        .map_or(true, |s| tree.is_displayed(&s))
}

/// Heading text without a trailing "(…)" such as an operation count.
fn heading_stem(lower: &str) -> &str {
    lower.split('(').next().map(str::trim).unwrap_or("")
}

fn exact_match(heading: &str, needle: &str) -> bool {
    let h = heading.trim().to_lowercase();
    let n = needle.trim().to_lowercase();
    !n.is_empty() && (h == n || heading_stem(&h) == n)
}

fn loose_match(heading: &str, needle: &str) -> bool {
    let h = heading.trim().to_lowercase();
    let n = needle.trim().to_lowercase();
    if h.is_empty() || n.is_empty() {
        return false;
    }
    let stem = heading_stem(&h);
    h.contains(&n) || (!stem.is_empty() && n.contains(stem))
}

fn mentions_models(heading: &str) -> bool {
    let h = heading.to_lowercase();
    h.contains("model") || h.contains("schema")
}

fn structural<T: ContentTree>(link: &NavigationLink, tree: &T) -> Option<Hit<T::Element>> {
    let containers = tree.sections(link.kind.container());
    if link.kind == TargetKind::SectionRoot {
        return Hit::first(containers);
    }

    let needle = link.match_text();
    let titled: Vec<(T::Element, String)> = containers
        .into_iter()
        .filter_map(|c| tree.heading_text(&c).map(|h| (c, h)))
        .collect();

    let exact: Vec<T::Element> = titled
        .iter()
        .filter(|(_, h)| exact_match(h, needle))
        .map(|(c, _)| c.clone())
        .collect();
    if !exact.is_empty() {
        return Hit::first(exact);
    }

    Hit::first(
        titled
            .into_iter()
            .filter(|(_, h)| loose_match(h, needle))
            .map(|(c, _)| c)
            .collect(),
    )
}

fn semantic_ancestor<T: ContentTree>(link: &NavigationLink, tree: &T) -> Option<Hit<T::Element>> {
    let needle = link.match_text();
    let matched: Vec<T::Element> = tree
        .headings()
        .into_iter()
        .filter(|h| {
            let text = tree.text(h);
            if link.kind == TargetKind::SectionRoot {
                mentions_models(&text)
            } else {
                loose_match(&text, needle)
            }
        })
        .collect();

    let candidates = matched.len();
    let leaf = matched.into_iter().next()?;
    let element = closest_semantic(tree, &leaf)
        .or_else(|| tree.parent(&leaf))
        .unwrap_or(leaf);

    Some(Hit {
        element,
        candidates,
    })
}

fn closest_semantic<T: ContentTree>(tree: &T, el: &T::Element) -> Option<T::Element> {
    let mut cur = Some(el.clone());
    while let Some(node) = cur {
        let is_container = SectionKind::SEMANTIC
            .iter()
            .any(|kind| tree.closest_section(&node, *kind).as_ref() == Some(&node));
        if is_container {
            return Some(node);
        }
        cur = tree.parent(&node);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::content::{ContentSnapshot, SnapshotNode};
    use crate::nav::error::NavErrorKind;

    fn tag_link(key: &str) -> NavigationLink {
        NavigationLink::new(TargetKind::TagSection, key)
    }

    #[test]
    fn test_exact_id_wins_over_other_strategies() {
        let mut t = ContentSnapshot::new();
        let by_attr = t.push(SnapshotNode::element().attr("data-tag", "articles").top(10.0));
        let by_id = t.push(SnapshotNode::section(SectionKind::TagSection).id("operations-tag-articles").top(20.0));

        let r = resolve(&tag_link("articles"), &t).expect("should resolve");
        assert_eq!(r.element, by_id);
        assert_eq!(r.strategy, Strategy::ExactId);
        assert_eq!(r.top, 20.0);
        assert_ne!(r.element, by_attr);
    }

    #[test]
    fn test_attribute_match_is_second() {
        let mut t = ContentSnapshot::new();
        let el = t.push(SnapshotNode::element().attr("data-tag", "articles"));
        let r = resolve(&tag_link("articles"), &t).expect("should resolve");
        assert_eq!((r.element, r.strategy), (el, Strategy::Attribute));
    }

    #[test]
    fn test_structural_prefers_exact_heading_then_first_substring() {
        let mut t = ContentSnapshot::new();
        let loose = t.push(SnapshotNode::section(SectionKind::ModelBox));
        t.push_child(loose, SnapshotNode::heading("ArticleComplete"));
        let exact = t.push(SnapshotNode::section(SectionKind::ModelBox));
        t.push_child(exact, SnapshotNode::heading("article"));

        let link = NavigationLink::new(TargetKind::SchemaSection, "Article");
        let r = resolve(&link, &t).expect("should resolve");
        assert_eq!((r.element, r.strategy), (exact, Strategy::Structural));

        let partial = NavigationLink::new(TargetKind::SchemaSection, "Complete");
        assert_eq!(resolve(&partial, &t).map(|r| r.element).ok(), Some(loose));
    }

    #[test]
    fn test_structural_ignores_parenthesized_count() {
        let mut t = ContentSnapshot::new();
        let tag = t.push(SnapshotNode::section(SectionKind::TagSection));
        t.push_child(tag, SnapshotNode::heading("Articles (12)"));

        let r = resolve(&tag_link("articles"), &t).expect("should resolve");
        assert_eq!(r.element, tag);

        // Link text containing the heading stem also matches.
        let r = resolve(&tag_link("public articles"), &t).expect("should resolve");
        assert_eq!(r.element, tag);
    }

    #[test]
    fn test_operation_links_match_nested_summary_by_label() {
        let mut t = ContentSnapshot::new();
        let tag = t.push(SnapshotNode::section(SectionKind::TagSection));
        let op = t.push_child(tag, SnapshotNode::section(SectionKind::Operation).top(640.0));
        let wrapper = t.push_child(op, SnapshotNode::element());
        t.push_child(wrapper, SnapshotNode::heading("Create article"));

        let link = NavigationLink::new(TargetKind::OperationSection, "articles-create")
            .with_label("create article");
        let r = resolve(&link, &t).expect("should resolve");
        assert_eq!(r.element, op);
        assert_eq!(r.top, 640.0);
    }

    #[test]
    fn test_semantic_ancestor_climbs_to_nearest_container() {
        let mut t = ContentSnapshot::new();
        let op = t.push(SnapshotNode::section(SectionKind::Operation).top(400.0));
        let summary = t.push_child(op, SnapshotNode::element());
        t.push_child(summary, SnapshotNode::heading("Initiate uploads"));

        let r = resolve(&tag_link("uploads"), &t).expect("should resolve");
        assert_eq!((r.element, r.strategy), (op, Strategy::SemanticAncestor));
    }

    #[test]
    fn test_semantic_ancestor_falls_back_to_parent() {
        let mut t = ContentSnapshot::new();
        let plain = t.push(SnapshotNode::element().top(90.0));
        t.push_child(plain, SnapshotNode::heading("Rate limits"));

        let link = NavigationLink::new(TargetKind::DocSection, "rate limits");
        let r = resolve(&link, &t).expect("should resolve");
        assert_eq!((r.element, r.strategy), (plain, Strategy::SemanticAncestor));
    }

    #[test]
    fn test_section_root_uses_models_container_or_heading() {
        let mut t = ContentSnapshot::new();
        let wrap = t.push(SnapshotNode::element());
        t.push_child(wrap, SnapshotNode::heading("Schemas"));
        let link = NavigationLink::new(TargetKind::SectionRoot, "models");
        assert_eq!(resolve(&link, &t).map(|r| r.element).ok(), Some(wrap));

        let root = t.push(SnapshotNode::section(SectionKind::ModelsRoot));
        let r = resolve(&link, &t).expect("should resolve");
        assert_eq!((r.element, r.strategy), (root, Strategy::Structural));
    }

    #[test]
    fn test_hidden_target_and_hidden_parent_section_are_rejected() {
        let mut t = ContentSnapshot::new();
        let tag = t.push(SnapshotNode::section(SectionKind::TagSection).hidden());
        t.push_child(tag, SnapshotNode::section(SectionKind::Operation).id("operations-articles-list"));
        t.push(SnapshotNode::element().id("doc-section-intro").hidden());

        let op = NavigationLink::new(TargetKind::OperationSection, "articles-list");
        let err = resolve(&op, &t).expect_err("parent section is hidden");
        assert_eq!(err.kind, NavErrorKind::TargetHidden);

        let doc = NavigationLink::new(TargetKind::DocSection, "intro");
        let err = resolve(&doc, &t).expect_err("target is hidden");
        assert_eq!(err.kind, NavErrorKind::TargetHidden);
    }

    #[test]
    fn test_missing_target_is_not_found() {
        let t = ContentSnapshot::new();
        let err = resolve(&tag_link("nothing"), &t).expect_err("empty tree");
        assert_eq!(err.kind, NavErrorKind::TargetNotFound);
    }

    #[test]
    fn test_blank_headings_never_match_everything() {
        let mut t = ContentSnapshot::new();
        let tag = t.push(SnapshotNode::section(SectionKind::TagSection));
        t.push_child(tag, SnapshotNode::heading("   "));
        assert!(resolve(&tag_link("articles"), &t).is_err());
    }
}
