//! Browser binding: live-DOM content tree, sidebar scan, filter application,
//! page layout fixes and the page controller.

pub mod content;
mod controller;
pub mod filter;
pub mod layout;
pub mod sidebar;

pub(crate) use controller::SidebarController;

use crate::state::DocsState;
use std::cell::RefCell;

thread_local! {
    static CONTROLLER: RefCell<Option<SidebarController>> = const { RefCell::new(None) };
}

/// Starts the controller once the viewer has rendered; later calls rescan.
pub(crate) fn install_controller(state: &DocsState) -> SidebarController {
    if let Some(existing) = controller() {
        existing.rescan();
        existing.sync_scroll();
        return existing;
    }

    let c = SidebarController::new(state);
    CONTROLLER.with(|slot| *slot.borrow_mut() = Some(c.clone()));
    c
}

pub(crate) fn controller() -> Option<SidebarController> {
    CONTROLLER.with(|slot| slot.borrow().clone())
}
