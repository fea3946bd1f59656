use crate::config::NavConfig;
use crate::modal::ModalPresenter;
use crate::storage::load_api_key;
use leptos::prelude::*;
use std::cell::RefCell;

#[derive(Clone)]
pub(crate) struct DocsState {
    pub config: NavConfig,
    pub modal: ModalPresenter,

    /// Mirrors the persisted API key; updated by the key input.
    pub api_key: RwSignal<Option<String>>,
}

impl DocsState {
    pub fn new() -> Self {
        let config = NavConfig::new();
        let api_key = load_api_key(&config.api_key_storage_key);
        Self {
            config,
            modal: ModalPresenter::new(),
            api_key: RwSignal::new(api_key),
        }
    }
}

impl Default for DocsState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct DocsContext(pub DocsState);

thread_local! {
    static DOCS: RefCell<Option<DocsState>> = const { RefCell::new(None) };
}

/// Page-wide state shared with the exported entry points. Created on
/// first use.
pub(crate) fn docs_state() -> DocsState {
    DOCS.with(|slot| {
        slot.borrow_mut()
            .get_or_insert_with(DocsState::new)
            .clone()
    })
}
