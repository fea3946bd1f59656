use crate::config::NavConfig;
use crate::dom::content::DomContent;
use crate::dom::filter::{results_offset, run_filter, smooth_scroll_window};
use crate::dom::layout::{move_schemas_to_end, unfold_section};
use crate::dom::sidebar::{scan_sidebar, ScannedSidebar};
use crate::filter::normalize_query;
use crate::models::{LinkId, MenuState, NavigationLink, TargetKind};
use crate::nav::menu::MenuTable;
use crate::nav::resolver::resolve;
use crate::nav::tracker::{Effect, SidebarTracker};
use crate::nav::viewport::{sidebar_scroll_target, Band, SidebarLayout};
use crate::nav::NavResult;
use crate::state::DocsState;
use crate::storage::save_api_key;
use crate::util::TimerSlots;
use leptos::ev;
use leptos::logging::{debug_warn, warn};
use leptos::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, EventTarget, HtmlInputElement, KeyboardEvent, ScrollBehavior, ScrollToOptions};

const SEARCH_SLOT: &str = "search";
const SEARCH_SCROLL_SLOT: &str = "search-scroll";
const RESYNC_SLOT: &str = "resync";
const CONTENT_SCROLL_SLOT: &str = "content-scroll";
const SCHEMA_MOVE_SLOT: &str = "schema-move";
const TOKEN_CLASS: &str = "has-token";

/// Page-lifetime controller binding the sidebar tracker to the live DOM.
///
/// Responsibilities:
/// - scroll tracking (active link, menu chain)
/// - sidebar clicks and inline `toggleSubmenu*` / `scrollTo*` calls
/// - search filtering with debounce
/// - API key input persistence
#[derive(Clone)]
pub(crate) struct SidebarController {
    config: NavConfig,
    tracker: Arc<Mutex<SidebarTracker>>,
    dom: Rc<RefCell<Option<ScannedSidebar>>>,
    timers: TimerSlots,
    api_key: RwSignal<Option<String>>,

    /// Keeps the window scroll listener alive.
    _scroll_handle: StoredValue<Option<WindowListenerHandle>>,
}

impl SidebarController {
    pub fn new(state: &DocsState) -> Self {
        let config = state.config.clone();
        let tracker = SidebarTracker::new(Vec::new(), MenuTable::new(), config.clone());

        let s = Self {
            config,
            tracker: Arc::new(Mutex::new(tracker)),
            dom: Rc::new(RefCell::new(None)),
            timers: TimerSlots::default(),
            api_key: state.api_key,
            _scroll_handle: StoredValue::new(None),
        };

        s.rescan();
        s.start_listeners();
        s.sync_scroll();
        s
    }

    /// Rebuilds the link and menu tables from the current sidebar markup.
    pub fn rescan(&self) {
        self.timers.cancel_all();

        let Some(scanned) = scan_sidebar(&self.config) else {
            warn!("sidebar `{}` not found", self.config.sidebar_selector);
            return;
        };
        let tracker = SidebarTracker::new(scanned.links.clone(), scanned.menus.clone(), self.config.clone());
        if let Ok(mut t) = self.tracker.lock() {
            *t = tracker;
        }
        *self.dom.borrow_mut() = Some(scanned);
    }

    fn run<F>(&self, f: F)
    where
        F: FnOnce(&mut SidebarTracker, &DomContent) -> NavResult<Vec<Effect>>,
    {
        let Some(content) = DomContent::new(&self.config) else {
            return;
        };
        let result = match self.tracker.lock() {
            Ok(mut t) => f(&mut t, &content),
            Err(_) => return,
        };
        match result {
            Ok(effects) => self.apply(effects),
            Err(e) => debug_warn!("{e}"),
        }
    }

    pub fn sync_scroll(&self) {
        let scroll_y = web_sys::window()
            .and_then(|w| w.scroll_y().ok())
            .unwrap_or(0.0);
        self.run(|t, content| Ok(t.on_scroll(scroll_y, content)));
    }

    pub fn toggle(&self, menu_id: &str, section: Option<&str>) {
        self.run(|t, content| t.on_toggle(menu_id, section, content));
    }

    pub fn navigate_to(&self, kind: TargetKind, key: &str) {
        self.run(|t, content| Ok(t.on_section_requested(kind, key, content)));
    }

    fn click_link(&self, link: LinkId) {
        self.run(|t, content| t.on_link_click(link, content));
    }

    fn apply(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Activate(link) => self.mark_active(link),
                Effect::SetMenu { id, state } => set_menu_state(&id, state),
                Effect::KeepLinkVisible(link) => self.keep_link_visible(link),
                Effect::Unfold { kind, key } => self.unfold(kind, &key),
                Effect::ScrollContent { top, delay_ms } => {
                    self.timers
                        .schedule(CONTENT_SCROLL_SLOT, delay_ms, move || smooth_scroll_window(top));
                }
                Effect::ScrollContentToBottom { delay_ms } => {
                    self.timers.schedule(CONTENT_SCROLL_SLOT, delay_ms, || {
                        let bottom = web_sys::window()
                            .and_then(|w| w.document())
                            .and_then(|d| d.body())
                            .map(|b| b.scroll_height() as f64)
                            .unwrap_or(0.0);
                        smooth_scroll_window(bottom);
                    });
                }
            }
        }
    }

    fn unfold(&self, kind: TargetKind, key: &str) {
        let Some(content) = DomContent::new(&self.config) else {
            return;
        };
        match resolve(&NavigationLink::new(kind, key), &content) {
            Ok(r) => unfold_section(kind, &r.element),
            Err(e) => debug_warn!("{e}"),
        }
    }

    /// Relocates the models block once the viewer has settled, then re-syncs
    /// since every section below it moved.
    pub fn move_schemas_later(&self) {
        let s2 = self.clone();
        self.timers
            .schedule(SCHEMA_MOVE_SLOT, self.config.move_schemas_delay_ms, move || {
                if move_schemas_to_end(&s2.config) {
                    s2.sync_scroll();
                }
            });
    }

    fn mark_active(&self, link: Option<LinkId>) {
        let dom = self.dom.borrow();
        let Some(dom) = dom.as_ref() else {
            return;
        };
        for (i, el) in dom.elements.iter().enumerate() {
            let _ = if Some(i) == link {
                el.class_list().add_1("active")
            } else {
                el.class_list().remove_1("active")
            };
        }
    }

    fn keep_link_visible(&self, link: LinkId) {
        let dom = self.dom.borrow();
        let Some(dom) = dom.as_ref() else {
            return;
        };
        let Some(el) = dom.elements.get(link) else {
            return;
        };

        let link_rect = el.get_bounding_client_rect();
        let sidebar_rect = dom.sidebar.get_bounding_client_rect();
        let layout = SidebarLayout {
            link: Band {
                top: link_rect.top(),
                bottom: link_rect.bottom(),
            },
            sidebar: Band {
                top: sidebar_rect.top(),
                bottom: sidebar_rect.bottom(),
            },
            link_offset_top: el.offset_top() as f64,
            link_height: el.offset_height() as f64,
            sidebar_height: dom.sidebar.client_height() as f64,
        };

        if let Some(top) = sidebar_scroll_target(&layout) {
            let opts = ScrollToOptions::new();
            opts.set_top(top);
            opts.set_behavior(ScrollBehavior::Smooth);
            dom.sidebar.scroll_to_with_scroll_to_options(&opts);
        }
    }

    fn start_listeners(&self) {
        let s2 = self.clone();
        let scroll = window_event_listener(ev::scroll, move |_ev: web_sys::Event| {
            s2.sync_scroll();
        });
        self._scroll_handle.set_value(Some(scroll));

        self.bind_sidebar_clicks();
        self.bind_search_input();
        self.bind_api_key_input();
    }

    /// Links with an inline `onclick` are driven by the exported entry
    /// points instead.
    fn bind_sidebar_clicks(&self) {
        let Some(sidebar) = self.dom.borrow().as_ref().map(|d| d.sidebar.clone()) else {
            return;
        };

        let s2 = self.clone();
        let selector = self.config.link_selector.clone();
        let cb = Closure::wrap(Box::new(move |ev: web_sys::MouseEvent| {
            let Some(link) = ev
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|t| t.closest(&selector).ok().flatten())
            else {
                return;
            };
            if link.has_attribute("onclick") {
                return;
            }

            let id = s2.dom.borrow().as_ref().and_then(|d| {
                d.elements
                    .iter()
                    .position(|e| AsRef::<Element>::as_ref(e) == &link)
            });
            if let Some(id) = id {
                ev.prevent_default();
                s2.click_link(id);
            }
        }) as Box<dyn FnMut(_)>);

        listen(&sidebar, "click", cb);
    }

    fn bind_search_input(&self) {
        let Some(input) = input_by_id(&self.config.search_input_id) else {
            return;
        };

        let s2 = self.clone();
        let input2 = input.clone();
        let on_input = Closure::wrap(Box::new(move |_ev: web_sys::Event| {
            let query = input2.value();
            let s3 = s2.clone();
            s2.timers
                .schedule(SEARCH_SLOT, s2.config.search_debounce_ms, move || s3.run_search(&query));
        }) as Box<dyn FnMut(_)>);
        listen(&input, "input", on_input);

        let s2 = self.clone();
        let input2 = input.clone();
        let on_keydown = Closure::wrap(Box::new(move |ev: KeyboardEvent| {
            if ev.key() != "Enter" {
                return;
            }
            ev.prevent_default();
            s2.timers.cancel(SEARCH_SLOT);
            s2.run_search(&input2.value());
        }) as Box<dyn FnMut(_)>);
        listen(&input, "keydown", on_keydown);
    }

    pub fn run_search(&self, raw: &str) {
        let query = normalize_query(raw);
        let target = run_filter(&query, &self.config);
        if query.is_empty() {
            return;
        }
        let Some(target) = target else {
            return;
        };

        let s2 = self.clone();
        self.timers
            .schedule(SEARCH_SCROLL_SLOT, self.config.expand_settle_ms, move || {
                smooth_scroll_window(results_offset(&target, &s2.config));
                let s3 = s2.clone();
                s2.timers
                    .schedule(RESYNC_SLOT, s2.config.scroll_settle_ms, move || s3.sync_scroll());
            });
    }

    fn bind_api_key_input(&self) {
        let Some(input) = input_by_id(&self.config.api_key_input_id) else {
            return;
        };

        if let Some(key) = self.api_key.get_untracked() {
            input.set_value(&key);
        }
        reflect_token(&input, self.api_key.get_untracked().is_some());

        for event in ["input", "blur"] {
            let s2 = self.clone();
            let input2 = input.clone();
            let cb = Closure::wrap(Box::new(move |_ev: web_sys::Event| {
                let saved = save_api_key(&s2.config.api_key_storage_key, &input2.value());
                reflect_token(&input2, saved.is_some());
                s2.api_key.set(saved);
            }) as Box<dyn FnMut(_)>);
            listen(&input, event, cb);
        }
    }
}

/// Attaches `cb` for the page lifetime.
fn listen<T: ?Sized + wasm_bindgen::closure::WasmClosure + 'static>(target: &EventTarget, event: &str, cb: Closure<T>) {
    if target
        .add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())
        .is_err()
    {
        warn!("failed to listen for `{event}`");
    }
    cb.forget();
}

fn input_by_id(id: &str) -> Option<HtmlInputElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<HtmlInputElement>()
        .ok()
}

fn reflect_token(input: &HtmlInputElement, has_token: bool) {
    let classes = input.class_list();
    let _ = if has_token {
        classes.add_1(TOKEN_CLASS)
    } else {
        classes.remove_1(TOKEN_CLASS)
    };
}

fn set_menu_state(id: &str, state: MenuState) {
    let Some(menu) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
    else {
        debug_warn!("menu `{id}` is not in the page");
        return;
    };
    let classes = menu.class_list();
    let _ = classes.remove_2(MenuState::Collapsed.as_ref(), MenuState::Expanded.as_ref());
    let _ = classes.add_1(state.as_ref());
}

