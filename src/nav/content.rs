use crate::models::SectionKind;

/// Read-only view of the rendered documentation content.
///
/// The browser implementation walks the live DOM; `ContentSnapshot` is a
/// table-backed stand-in so the resolution heuristics run without one.
pub trait ContentTree {
    type Element: Clone + PartialEq;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Elements carrying `name="value"`, in document order.
    fn elements_with_attribute(&self, name: &str, value: &str) -> Vec<Self::Element>;

    /// Containers of the given kind, in document order.
    fn sections(&self, kind: SectionKind) -> Vec<Self::Element>;

    /// Heading (or model title) text of a container.
    fn heading_text(&self, section: &Self::Element) -> Option<String>;

    /// Every heading element, in document order.
    fn headings(&self) -> Vec<Self::Element>;

    fn text(&self, el: &Self::Element) -> String;

    fn parent(&self, el: &Self::Element) -> Option<Self::Element>;

    /// Nearest container of `kind`, `el` included.
    fn closest_section(&self, el: &Self::Element, kind: SectionKind) -> Option<Self::Element>;

    /// The element's own computed display is not `none`.
    fn is_displayed(&self, el: &Self::Element) -> bool;

    /// Top edge in document coordinates.
    fn document_top(&self, el: &Self::Element) -> f64;
}

#[derive(Clone, Debug)]
pub struct SnapshotNode {
    pub id: Option<String>,
    pub attributes: Vec<(String, String)>,
    pub section: Option<SectionKind>,
    pub heading: bool,
    pub text: String,
    pub displayed: bool,
    pub top: f64,
    parent: Option<usize>,
}

impl SnapshotNode {
    pub fn element() -> Self {
        Self {
            id: None,
            attributes: Vec::new(),
            section: None,
            heading: false,
            text: String::new(),
            displayed: true,
            top: 0.0,
            parent: None,
        }
    }

    pub fn section(kind: SectionKind) -> Self {
        Self {
            section: Some(kind),
            ..Self::element()
        }
    }

    pub fn heading(text: impl Into<String>) -> Self {
        Self {
            heading: true,
            text: text.into(),
            ..Self::element()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn top(mut self, top: f64) -> Self {
        self.top = top;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }
}

/// In-memory content tree. Insertion order is document order.
#[derive(Clone, Debug, Default)]
pub struct ContentSnapshot {
    nodes: Vec<SnapshotNode>,
}

impl ContentSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: SnapshotNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Appends `node` under `parent`. Unknown parents leave it at the root.
    pub fn push_child(&mut self, parent: usize, mut node: SnapshotNode) -> usize {
        if parent < self.nodes.len() {
            node.parent = Some(parent);
        }
        self.push(node)
    }

    pub fn node(&self, el: usize) -> Option<&SnapshotNode> {
        self.nodes.get(el)
    }

    pub fn set_displayed(&mut self, el: usize, displayed: bool) {
        if let Some(n) = self.nodes.get_mut(el) {
            n.displayed = displayed;
        }
    }

    pub fn set_top(&mut self, el: usize, top: f64) {
        if let Some(n) = self.nodes.get_mut(el) {
            n.top = top;
        }
    }

    fn is_descendant(&self, el: usize, ancestor: usize) -> bool {
        let mut cur = self.nodes.get(el).and_then(|n| n.parent);
        // Parent links always point backwards, so the walk is bounded.
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.nodes.get(p).and_then(|n| n.parent);
        }
        false
    }
}

impl ContentTree for ContentSnapshot {
    type Element = usize;

    fn element_by_id(&self, id: &str) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.id.as_deref() == Some(id))
    }

    fn elements_with_attribute(&self, name: &str, value: &str) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.attributes.iter().any(|(k, v)| k == name && v == value))
            .map(|(i, _)| i)
            .collect()
    }

    fn sections(&self, kind: SectionKind) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.section == Some(kind))
            .map(|(i, _)| i)
            .collect()
    }

    fn heading_text(&self, section: &usize) -> Option<String> {
        self.nodes
            .iter()
            .enumerate()
            .skip(section + 1)
            .find(|(i, n)| n.heading && self.is_descendant(*i, *section))
            .map(|(_, n)| n.text.trim().to_string())
    }

    fn headings(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.heading)
            .map(|(i, _)| i)
            .collect()
    }

    fn text(&self, el: &usize) -> String {
        let Some(own) = self.nodes.get(*el) else {
            return String::new();
        };

        let mut parts = vec![own.text.trim()];
        for (i, n) in self.nodes.iter().enumerate().skip(el + 1) {
            if self.is_descendant(i, *el) && !n.text.trim().is_empty() {
                parts.push(n.text.trim());
            }
        }
        parts.retain(|p| !p.is_empty());
        parts.join(" ")
    }

    fn parent(&self, el: &usize) -> Option<usize> {
        self.nodes.get(*el).and_then(|n| n.parent)
    }

    fn closest_section(&self, el: &usize, kind: SectionKind) -> Option<usize> {
        let mut cur = Some(*el);
        while let Some(i) = cur {
            let n = self.nodes.get(i)?;
            if n.section == Some(kind) {
                return Some(i);
            }
            cur = n.parent;
        }
        None
    }

    fn is_displayed(&self, el: &usize) -> bool {
        self.nodes.get(*el).map(|n| n.displayed).unwrap_or(false)
    }

    fn document_top(&self, el: &usize) -> f64 {
        self.nodes.get(*el).map(|n| n.top).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (ContentSnapshot, usize, usize) {
        let mut t = ContentSnapshot::new();
        let tag = t.push(SnapshotNode::section(SectionKind::TagSection).id("operations-tag-articles"));
        t.push_child(tag, SnapshotNode::heading("Articles"));
        let op = t.push_child(tag, SnapshotNode::section(SectionKind::Operation).top(300.0));
        t.push_child(op, SnapshotNode::heading("List articles"));
        (t, tag, op)
    }

    #[test]
    fn test_heading_text_uses_first_descendant_heading() {
        let (t, tag, op) = sample();
        assert_eq!(t.heading_text(&tag).as_deref(), Some("Articles"));
        assert_eq!(t.heading_text(&op).as_deref(), Some("List articles"));
    }

    #[test]
    fn test_closest_section_includes_self_and_walks_up() {
        let (t, tag, op) = sample();
        assert_eq!(t.closest_section(&op, SectionKind::Operation), Some(op));
        assert_eq!(t.closest_section(&op, SectionKind::TagSection), Some(tag));
        assert_eq!(t.closest_section(&tag, SectionKind::ModelBox), None);
    }

    #[test]
    fn test_text_joins_descendants() {
        let (t, tag, _) = sample();
        assert_eq!(t.text(&tag), "Articles List articles");
    }

    #[test]
    fn test_push_child_with_unknown_parent_stays_at_root() {
        let mut t = ContentSnapshot::new();
        let el = t.push_child(42, SnapshotNode::element());
        assert_eq!(t.parent(&el), None);
    }
}
