use crate::models::{MenuId, MenuNode, MenuState};
use crate::nav::error::{NavError, NavResult};
use std::collections::HashMap;

/// Every collapsible sidebar menu, keyed by id, in document order.
#[derive(Clone, Debug, Default)]
pub struct MenuTable {
    order: Vec<MenuId>,
    nodes: HashMap<MenuId, MenuNode>,
}

impl MenuTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: impl IntoIterator<Item = MenuNode>) -> Self {
        let mut t = Self::new();
        for n in nodes {
            t.insert(n);
        }
        t
    }

    /// Adds or replaces a node; replacing keeps its document position.
    pub fn insert(&mut self, node: MenuNode) {
        if !self.nodes.contains_key(&node.id) {
            self.order.push(node.id.clone());
        }
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn get(&self, id: &str) -> Option<&MenuNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MenuNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn state(&self, id: &str) -> Option<MenuState> {
        self.get(id).map(|n| n.state)
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.state(id).is_some_and(MenuState::is_expanded)
    }

    pub fn expanded_ids(&self) -> Vec<MenuId> {
        self.iter()
            .filter(|n| n.state.is_expanded())
            .map(|n| n.id.clone())
            .collect()
    }

    /// `id` followed by its ancestors, innermost first. Empty for unknown ids.
    pub fn ancestor_chain(&self, id: &str) -> Vec<MenuId> {
        let mut chain = Vec::new();
        let mut cur = self.get(id);
        while let Some(n) = cur {
            // A malformed parent cycle must not spin forever.
            if chain.len() > self.order.len() || chain.contains(&n.id) {
                break;
            }
            chain.push(n.id.clone());
            cur = n.parent.as_deref().and_then(|p| self.get(p));
        }
        chain
    }

    pub fn siblings(&self, id: &str) -> Vec<MenuId> {
        let Some(node) = self.get(id) else {
            return Vec::new();
        };
        self.iter()
            .filter(|n| n.id != node.id && n.parent == node.parent)
            .map(|n| n.id.clone())
            .collect()
    }

    pub fn descendants(&self, id: &str) -> Vec<MenuId> {
        self.iter()
            .filter(|n| n.id != id && self.ancestor_chain(&n.id).iter().any(|a| a == id))
            .map(|n| n.id.clone())
            .collect()
    }

    fn update(&mut self, id: &str, state: MenuState, manual_override: Option<bool>) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.state = state;
            n.manual_override = manual_override;
        }
    }

    /// Collapses `id` and its expanded descendants as a user action.
    fn collapse_by_user(&mut self, id: &str) {
        self.update(id, MenuState::Collapsed, Some(true));
        for d in self.descendants(id) {
            if self.is_expanded(&d) {
                self.update(&d, MenuState::Collapsed, Some(true));
            }
        }
    }

    /// Explicit click on a menu header. Returns the new state.
    pub fn toggle(&mut self, id: &str) -> NavResult<MenuState> {
        let Some(node) = self.get(id) else {
            return Err(NavError::menu_not_found(id));
        };

        if node.state.is_expanded() {
            self.collapse_by_user(id);
            return Ok(MenuState::Collapsed);
        }

        for s in self.siblings(id) {
            if self.is_expanded(&s) {
                self.collapse_by_user(&s);
            }
        }
        self.update(id, MenuState::Expanded, Some(false));
        Ok(MenuState::Expanded)
    }

    /// Scroll-driven expansion of the active link's menu chain.
    ///
    /// Becoming the active target clears any manual collapse on the chain.
    /// Expanded siblings of chain menus (and whatever is open below them) are
    /// force-collapsed and tagged as manual so the next tick does not flap
    /// them. Menus below the chain keep their state.
    pub fn expand_chain(&mut self, chain: &[MenuId]) {
        for s in self.chain_siblings(chain) {
            if self.is_expanded(&s) {
                self.update(&s, MenuState::Collapsed, Some(true));
            }
            for d in self.descendants(&s) {
                if self.is_expanded(&d) {
                    self.update(&d, MenuState::Collapsed, Some(true));
                }
            }
        }

        for id in chain {
            self.update(id, MenuState::Expanded, None);
        }
    }

    /// Menus sharing a parent with some chain menu, chain excluded. An empty
    /// chain stands for a top-level link, so every top-level menu counts.
    fn chain_siblings(&self, chain: &[MenuId]) -> Vec<MenuId> {
        if chain.is_empty() {
            return self
                .iter()
                .filter(|n| n.parent.is_none())
                .map(|n| n.id.clone())
                .collect();
        }

        let mut out: Vec<MenuId> = Vec::new();
        for c in chain {
            for s in self.siblings(c) {
                if !chain.contains(&s) && !out.contains(&s) {
                    out.push(s);
                }
            }
        }
        out
    }

    /// Navigation by link click: opens the chain and folds everything else.
    ///
    /// Off-chain menus the user had opened lose that flag; menus the user had
    /// closed stay marked closed.
    pub fn reveal(&mut self, chain: &[MenuId]) {
        let off_chain: Vec<MenuId> = self
            .order
            .iter()
            .filter(|id| !chain.contains(id))
            .cloned()
            .collect();
        for id in off_chain {
            if let Some(n) = self.nodes.get_mut(&id) {
                if n.manual_override == Some(false) {
                    n.manual_override = None;
                }
                n.state = MenuState::Collapsed;
            }
        }

        for id in chain {
            self.update(id, MenuState::Expanded, None);
        }
    }

    /// Top-of-page reset. Manual flags survive it.
    pub fn collapse_all(&mut self) {
        for n in self.nodes.values_mut() {
            n.state = MenuState::Collapsed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// guides > (auth > (oauth, tokens)), reference, schemas
    fn table() -> MenuTable {
        MenuTable::from_nodes([
            MenuNode::new("guides"),
            MenuNode::new("auth").child_of("guides"),
            MenuNode::new("oauth").child_of("auth"),
            MenuNode::new("tokens").child_of("auth"),
            MenuNode::new("uploads").child_of("guides"),
            MenuNode::new("reference"),
            MenuNode::new("schemas"),
        ])
    }

    fn exclusive(t: &MenuTable) -> bool {
        t.iter().all(|n| {
            !n.state.is_expanded() || t.siblings(&n.id).iter().all(|s| !t.is_expanded(s))
        })
    }

    #[test]
    fn test_ancestor_chain_innermost_first() {
        let t = table();
        assert_eq!(t.ancestor_chain("oauth"), vec!["oauth", "auth", "guides"]);
        assert_eq!(t.ancestor_chain("reference"), vec!["reference"]);
        assert!(t.ancestor_chain("missing").is_empty());
    }

    #[test]
    fn test_ancestor_chain_survives_parent_cycle() {
        let t = MenuTable::from_nodes([MenuNode::new("a").child_of("b"), MenuNode::new("b").child_of("a")]);
        assert_eq!(t.ancestor_chain("a"), vec!["a", "b"]);
    }

    #[test]
    fn test_toggle_expand_collapses_siblings_and_their_children() {
        let mut t = table();
        t.toggle("guides").expect("known menu");
        t.toggle("auth").expect("known menu");
        t.toggle("oauth").expect("known menu");
        assert!(exclusive(&t));

        assert_eq!(t.toggle("reference").ok(), Some(MenuState::Expanded));
        assert!(exclusive(&t));
        assert_eq!(t.expanded_ids(), vec!["reference"]);
        assert_eq!(t.get("reference").and_then(|n| n.manual_override), Some(false));
        for id in ["guides", "auth", "oauth"] {
            assert_eq!(t.get(id).and_then(|n| n.manual_override), Some(true), "{id}");
        }
        // Never-opened siblings are left alone.
        assert_eq!(t.get("schemas").and_then(|n| n.manual_override), None);
    }

    #[test]
    fn test_toggle_collapse_marks_manual_and_folds_descendants() {
        let mut t = table();
        t.toggle("guides").expect("known menu");
        t.toggle("uploads").expect("known menu");

        assert_eq!(t.toggle("guides").ok(), Some(MenuState::Collapsed));
        assert!(t.expanded_ids().is_empty());
        assert_eq!(t.get("guides").and_then(|n| n.manual_override), Some(true));
        assert_eq!(t.get("uploads").and_then(|n| n.manual_override), Some(true));
    }

    #[test]
    fn test_toggle_unknown_menu_is_no_op() {
        let mut t = table();
        let err = t.toggle("nope").expect_err("unknown menu");
        assert_eq!(err.kind, crate::nav::error::NavErrorKind::MenuNotFound);
        assert!(t.expanded_ids().is_empty());
    }

    #[test]
    fn test_expand_chain_clears_override_and_forces_off_chain_closed() {
        let mut t = table();
        t.toggle("reference").expect("known menu");
        t.toggle("guides").expect("known menu");
        t.toggle("guides").expect("known menu");
        assert_eq!(t.get("guides").and_then(|n| n.manual_override), Some(true));

        t.toggle("schemas").expect("known menu");
        let chain = t.ancestor_chain("tokens");
        t.expand_chain(&chain);

        assert_eq!(t.expanded_ids(), vec!["guides", "auth", "tokens"]);
        for id in ["guides", "auth", "tokens"] {
            assert_eq!(t.get(id).and_then(|n| n.manual_override), None, "{id}");
        }
        assert_eq!(t.get("schemas").and_then(|n| n.manual_override), Some(true));
        assert!(exclusive(&t));
    }

    #[test]
    fn test_expand_chain_is_idempotent() {
        let mut t = table();
        t.toggle("reference").expect("known menu");
        let chain = t.ancestor_chain("oauth");
        t.expand_chain(&chain);
        let first: Vec<MenuNode> = t.iter().cloned().collect();
        t.expand_chain(&chain);
        let second: Vec<MenuNode> = t.iter().cloned().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_expand_chain_keeps_submenu_opened_below_the_chain() {
        let mut t = table();
        t.toggle("guides").expect("known menu");
        t.toggle("auth").expect("known menu");

        t.expand_chain(&t.ancestor_chain("guides"));
        assert!(t.is_expanded("auth"));
        assert_eq!(t.get("auth").and_then(|n| n.manual_override), Some(false));
        assert_eq!(t.expanded_ids(), vec!["guides", "auth"]);
    }

    #[test]
    fn test_expand_chain_folds_nested_siblings_and_their_children() {
        let mut t = table();
        t.toggle("guides").expect("known menu");
        t.toggle("auth").expect("known menu");
        t.toggle("oauth").expect("known menu");

        t.expand_chain(&t.ancestor_chain("uploads"));
        assert_eq!(t.expanded_ids(), vec!["guides", "uploads"]);
        for id in ["auth", "oauth"] {
            assert_eq!(t.get(id).and_then(|n| n.manual_override), Some(true), "{id}");
        }
    }

    #[test]
    fn test_expand_empty_chain_folds_top_level_menus() {
        let mut t = table();
        t.toggle("reference").expect("known menu");
        t.expand_chain(&[]);
        assert!(t.expanded_ids().is_empty());
        assert_eq!(t.get("reference").and_then(|n| n.manual_override), Some(true));
    }

    #[test]
    fn test_expand_chain_leaves_collapsed_off_chain_menus_untouched() {
        let mut t = table();
        t.expand_chain(&t.ancestor_chain("uploads"));
        assert_eq!(t.get("reference").and_then(|n| n.manual_override), None);
    }

    #[test]
    fn test_reveal_keeps_manual_collapse_and_drops_manual_expand() {
        let mut t = table();
        t.toggle("reference").expect("known menu");
        t.toggle("reference").expect("known menu");
        t.toggle("schemas").expect("known menu");

        t.reveal(&t.ancestor_chain("uploads"));
        assert_eq!(t.expanded_ids(), vec!["guides", "uploads"]);
        assert_eq!(t.get("reference").and_then(|n| n.manual_override), Some(true));
        assert_eq!(t.get("schemas").and_then(|n| n.manual_override), None);
    }

    #[test]
    fn test_collapse_all_keeps_manual_flags() {
        let mut t = table();
        t.toggle("reference").expect("known menu");
        t.toggle("schemas").expect("known menu");
        t.collapse_all();
        assert!(t.expanded_ids().is_empty());
        assert_eq!(t.get("reference").and_then(|n| n.manual_override), Some(true));
        assert_eq!(t.get("schemas").and_then(|n| n.manual_override), Some(false));
    }
}
