use crate::config::NavConfig;
use crate::models::{MenuNode, MenuState, NavigationLink};
use crate::nav::markup::{classify, controlled_menu, LinkMarkup};
use crate::nav::menu::MenuTable;
use leptos::logging::debug_warn;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

const MENU_SELECTOR: &str = "ul[id]";

/// Sidebar links and menus read from the rendered markup.
pub struct ScannedSidebar {
    pub sidebar: Element,
    pub links: Vec<NavigationLink>,
    /// Parallel to `links`.
    pub elements: Vec<HtmlElement>,
    pub menus: MenuTable,
}

fn query_all(root: &Element, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
        .collect()
}

/// Nearest enclosing `ul[id]` strictly above `el`, inside the sidebar.
fn enclosing_menu(sidebar: &Element, el: &Element) -> Option<Element> {
    el.parent_element()?
        .closest(MENU_SELECTOR)
        .ok()
        .flatten()
        .filter(|m| sidebar.contains(Some(m.as_ref())))
}

fn menu_depth(sidebar: &Element, el: &Element) -> u8 {
    let mut depth = 0u8;
    let mut cur = enclosing_menu(sidebar, el);
    while let Some(menu) = cur {
        depth = depth.saturating_add(1);
        cur = enclosing_menu(sidebar, &menu);
    }
    depth
}

pub fn scan_sidebar(config: &NavConfig) -> Option<ScannedSidebar> {
    let document = web_sys::window()?.document()?;
    let sidebar = document.query_selector(&config.sidebar_selector).ok().flatten()?;

    let mut menus = MenuTable::new();
    for ul in query_all(&sidebar, MENU_SELECTOR) {
        let id = ul.id();
        if id.is_empty() {
            continue;
        }
        let mut node = MenuNode::new(id);
        if ul.class_list().contains(MenuState::Expanded.as_ref()) {
            node.state = MenuState::Expanded;
        }
        node.parent = enclosing_menu(&sidebar, &ul).map(|p| p.id());
        menus.insert(node);
    }

    let mut links = Vec::new();
    let mut elements = Vec::new();
    for el in query_all(&sidebar, &config.link_selector) {
        let href = el.get_attribute("href");
        let onclick = el.get_attribute("onclick");
        let data_tag = el.get_attribute("data-tag");
        let data_target_kind = el.get_attribute("data-target-kind");
        let data_target_key = el.get_attribute("data-target-key");
        let markup = LinkMarkup {
            href: href.as_deref(),
            onclick: onclick.as_deref(),
            data_tag: data_tag.as_deref(),
            data_target_kind: data_target_kind.as_deref(),
            data_target_key: data_target_key.as_deref(),
        };

        let Some((kind, key)) = classify(&markup, &config.schema_root_menu, &config.schema_root_key) else {
            continue;
        };
        let Ok(html) = el.clone().dyn_into::<HtmlElement>() else {
            continue;
        };

        let mut link = NavigationLink::new(kind, key)
            .with_label(el.text_content().unwrap_or_default().trim());
        link.level = menu_depth(&sidebar, &el) + 1;
        link.menu = enclosing_menu(&sidebar, &el).map(|m| m.id());
        link.controls = parent_item_menu(&el).or_else(|| onclick.as_deref().and_then(controlled_menu));
        link.active = el.class_list().contains("active");

        links.push(link);
        elements.push(html);
    }

    if links.is_empty() {
        debug_warn!("sidebar `{}` has no navigable links", config.sidebar_selector);
    }

    Some(ScannedSidebar {
        sidebar,
        links,
        elements,
        menus,
    })
}

/// Submenu headed by a `.parent-item-wrapper` link.
fn parent_item_menu(el: &Element) -> Option<String> {
    let wrapper = el.closest(".parent-item-wrapper").ok().flatten()?;
    let li = wrapper.closest("li").ok().flatten()?;
    li.query_selector(MENU_SELECTOR)
        .ok()
        .flatten()
        .map(|ul| ul.id())
        .filter(|id| !id.is_empty())
}
