use crate::config::NavConfig;
use crate::models::{LinkId, MenuId, MenuState, NavigationLink, TargetKind};
use crate::nav::content::ContentTree;
use crate::nav::error::{NavError, NavResult};
use crate::nav::menu::MenuTable;
use crate::nav::resolver::resolve;
use crate::nav::selector::{select_active, Candidate};
use leptos::logging::{debug_warn, warn};

/// Observable outcome of one handler call. Only changes are reported.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Clear `active` on every link, then set it on this one.
    Activate(Option<LinkId>),
    SetMenu { id: MenuId, state: MenuState },
    /// Scroll the sidebar if the link is out of its visible band.
    KeepLinkVisible(LinkId),
    /// Open a collapsed tag or schema block found at its own target.
    Unfold { kind: TargetKind, key: String },
    ScrollContent { top: f64, delay_ms: i32 },
    ScrollContentToBottom { delay_ms: i32 },
}

/// Re-derived on every scroll event; never persisted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrollState {
    pub scroll_y: f64,
    pub active: Option<LinkId>,
    /// Menus held open by the active link's chain.
    pub forced_open: Vec<MenuId>,
}

/// Sidebar link/menu tables plus the handlers that mutate them.
///
/// Every handler is a function of the current state and one event.
#[derive(Clone, Debug)]
pub struct SidebarTracker {
    links: Vec<NavigationLink>,
    menus: MenuTable,
    config: NavConfig,
    state: ScrollState,
}

impl SidebarTracker {
    pub fn new(links: Vec<NavigationLink>, menus: MenuTable, config: NavConfig) -> Self {
        let active = links.iter().position(|l| l.active);
        Self {
            links,
            menus,
            config,
            state: ScrollState {
                active,
                ..ScrollState::default()
            },
        }
    }

    pub fn links(&self) -> &[NavigationLink] {
        &self.links
    }

    pub fn menus(&self) -> &MenuTable {
        &self.menus
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    pub fn active(&self) -> Option<LinkId> {
        self.state.active
    }

    pub fn find_link(&self, kind: TargetKind, key: &str) -> Option<LinkId> {
        self.links
            .iter()
            .position(|l| l.kind == kind && l.target_key == key)
    }

    /// Resolvable, visible link targets in document order.
    pub fn candidates<T: ContentTree>(&self, tree: &T) -> Vec<Candidate> {
        self.links
            .iter()
            .enumerate()
            .filter_map(|(id, link)| match resolve(link, tree) {
                Ok(r) => Some(Candidate {
                    link: id,
                    kind: link.kind,
                    top: r.top,
                }),
                Err(e) => {
                    debug_warn!("{e}");
                    None
                }
            })
            .collect()
    }

    pub fn on_scroll<T: ContentTree>(&mut self, scroll_y: f64, tree: &T) -> Vec<Effect> {
        self.state.scroll_y = scroll_y;
        let before = self.menu_states();
        let selection = select_active(&self.candidates(tree), scroll_y, &self.config);

        let activated = if selection.at_top {
            self.menus.collapse_all();
            self.state.forced_open.clear();
            self.set_active(None)
        } else if let Some(link) = selection.active {
            let chain = self.chain_for(link, selection.in_schema_section);
            self.menus.expand_chain(&chain);
            self.state.forced_open = chain;
            self.set_active(Some(link))
        } else {
            self.state.forced_open.clear();
            self.set_active(None)
        };

        let mut effects = self.menu_changes(&before);
        let moved = !effects.is_empty() || activated.is_some();
        effects.extend(activated);
        if let (true, Some(link)) = (moved, self.state.active) {
            effects.push(Effect::KeepLinkVisible(link));
        }
        effects
    }

    /// User click on a menu header. With `section`, expanding also scrolls
    /// to that documentation section once the animation has settled.
    pub fn on_toggle<T: ContentTree>(
        &mut self,
        menu_id: &str,
        section: Option<&str>,
        tree: &T,
    ) -> NavResult<Vec<Effect>> {
        let before = self.menu_states();
        let state = self.menus.toggle(menu_id)?;
        let mut effects = self.menu_changes(&before);

        if let (MenuState::Expanded, Some(section)) = (state, section) {
            let target = NavigationLink::new(TargetKind::DocSection, section);
            match resolve(&target, tree) {
                Ok(r) => effects.push(Effect::ScrollContent {
                    top: r.top,
                    delay_ms: self.config.expand_settle_ms,
                }),
                Err(e) => warn!("{e}"),
            }
        }
        Ok(effects)
    }

    /// Direct click on a sidebar link.
    pub fn on_link_click<T: ContentTree>(&mut self, link: LinkId, tree: &T) -> NavResult<Vec<Effect>> {
        if link >= self.links.len() {
            return Err(NavError::link_not_found(&format!("index {link}")));
        }
        Ok(self.navigate(Some(link), tree))
    }

    /// Programmatic navigation (`scrollToDocSection` and friends). Without a
    /// matching link the content still scrolls.
    pub fn on_section_requested<T: ContentTree>(
        &mut self,
        kind: TargetKind,
        key: &str,
        tree: &T,
    ) -> Vec<Effect> {
        match self.find_link(kind, key) {
            Some(link) => self.navigate(Some(link), tree),
            None => {
                debug_warn!("{}", NavError::link_not_found(&format!("{kind} `{key}`")));
                self.scroll_to_target(&NavigationLink::new(kind, key), tree)
            }
        }
    }

    fn navigate<T: ContentTree>(&mut self, link: Option<LinkId>, tree: &T) -> Vec<Effect> {
        let before = self.menu_states();
        let mut activated = None;
        let mut target = None;

        if let Some(id) = link {
            let in_schema = self.links[id].kind.is_schema_family();
            let chain = self.chain_for(id, in_schema);
            self.menus.reveal(&chain);
            self.state.forced_open = chain;
            activated = self.set_active(Some(id));
            target = Some(self.links[id].clone());
        }

        let mut effects = self.menu_changes(&before);
        effects.extend(activated);
        if let Some(target) = target {
            effects.extend(self.scroll_to_target(&target, tree));
        }
        effects
    }

    /// Scroll command for a link's target. Schema targets fall back to the
    /// models root, then to the page bottom.
    fn scroll_to_target<T: ContentTree>(&self, link: &NavigationLink, tree: &T) -> Vec<Effect> {
        let delay_ms = self.config.expand_settle_ms;
        match resolve(link, tree) {
            Ok(r) => {
                let mut effects = Vec::with_capacity(2);
                if matches!(link.kind, TargetKind::TagSection | TargetKind::SchemaSection) {
                    effects.push(Effect::Unfold {
                        kind: link.kind,
                        key: link.target_key.clone(),
                    });
                }
                effects.push(Effect::ScrollContent { top: r.top, delay_ms });
                return effects;
            }
            Err(e) => warn!("{e}"),
        }

        if !link.kind.is_schema_family() {
            return Vec::new();
        }
        if link.kind == TargetKind::SchemaSection {
            let root = NavigationLink::new(TargetKind::SectionRoot, self.config.schema_root_key.as_str());
            if let Ok(r) = resolve(&root, tree) {
                return vec![Effect::ScrollContent { top: r.top, delay_ms }];
            }
        }
        vec![Effect::ScrollContentToBottom { delay_ms }]
    }

    /// Menus that must be open while `link` is active, innermost first.
    fn chain_for(&self, link: LinkId, in_schema_section: bool) -> Vec<MenuId> {
        if in_schema_section && self.menus.get(&self.config.schema_root_menu).is_some() {
            let link = &self.links[link];
            // Schema links nested below the root keep their own chain.
            if let Some(anchor) = link.anchor_menu() {
                let chain = self.menus.ancestor_chain(anchor);
                if chain.contains(&self.config.schema_root_menu) {
                    return chain;
                }
            }
            return self.menus.ancestor_chain(&self.config.schema_root_menu);
        }

        self.links
            .get(link)
            .and_then(|l| l.anchor_menu())
            .map(|m| self.menus.ancestor_chain(m))
            .unwrap_or_default()
    }

    fn set_active(&mut self, link: Option<LinkId>) -> Option<Effect> {
        let flags_match = self
            .links
            .iter()
            .enumerate()
            .all(|(i, l)| l.active == (Some(i) == link));
        if self.state.active == link && flags_match {
            return None;
        }

        for (i, l) in self.links.iter_mut().enumerate() {
            l.active = Some(i) == link;
        }
        self.state.active = link;
        Some(Effect::Activate(link))
    }

    fn menu_states(&self) -> Vec<(MenuId, MenuState)> {
        self.menus.iter().map(|n| (n.id.clone(), n.state)).collect()
    }

    fn menu_changes(&self, before: &[(MenuId, MenuState)]) -> Vec<Effect> {
        self.menus
            .iter()
            .filter(|n| {
                before
                    .iter()
                    .find(|(id, _)| id == &n.id)
                    .map_or(true, |(_, s)| *s != n.state)
            })
            .map(|n| Effect::SetMenu {
                id: n.id.clone(),
                state: n.state,
            })
            .collect()
    }
}
