use icons::X;
use leptos::ev;
use leptos::prelude::*;
use leptos_ui::clx;
use tw_merge::*;

use crate::modal::{ModalContent, ModalPresenter};
use crate::state::DocsContext;

mod components {
    use super::*;
    clx! {ModalHeader, div, "modal-header flex items-center gap-3 px-6 py-4 border-b"}
    clx! {ModalTitle, h3, "modal-title text-lg leading-none font-semibold"}
}

pub use components::*;

/* ========================================================== */
/*                     ✨ FUNCTIONS ✨                        */
/* ========================================================== */

/// The single page-wide modal behind `showUniversalModal`.
///
/// Driven entirely by the `ModalPresenter` in context; the Escape key
/// listener only exists while something is shown.
#[component]
pub fn UniversalModal(#[prop(optional, into)] class: String) -> impl IntoView {
    let presenter = expect_context::<DocsContext>().0.modal;

    let key_handle: StoredValue<Option<WindowListenerHandle>> = StoredValue::new(None);

    Effect::new(move |_| {
        let visible = presenter.is_visible();
        let registered = key_handle.with_value(|h| h.is_some());

        if visible && !registered {
            let handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
                if ev.key() == "Escape" {
                    ev.prevent_default();
                    presenter.hide();
                }
            });
            key_handle.set_value(Some(handle));
        } else if !visible && registered {
            release_key_listener(key_handle);
        }
    });

    on_cleanup(move || release_key_listener(key_handle));

    let overlay_class = move || {
        let base = tw_merge!(
            "universal-modal-overlay fixed inset-0 z-100 flex items-center justify-center bg-black/50 transition-opacity duration-200",
            class.clone()
        );
        if presenter.is_visible() {
            format!("{base} visible")
        } else {
            format!("{base} hidden")
        }
    };

    let on_backdrop = move |ev: web_sys::MouseEvent| {
        // Only the overlay itself; clicks inside the dialog bubble up here too.
        if ev.target().is_some() && ev.target() == ev.current_target() {
            presenter.hide();
        }
    };

    view! {
        <div
            id="universalModal"
            data-name="UniversalModal"
            class=overlay_class
            on:click=on_backdrop
        >
            {move || presenter.current().map(|content| view! { <ModalDialog content=content presenter=presenter /> })}
        </div>
    }
}

#[component]
fn ModalDialog(content: ModalContent, presenter: ModalPresenter) -> impl IntoView {
    let header_class = format!("{} {}", "modal-header", content.kind.css_class());
    let icon = content.icon_path().to_string();

    view! {
        <div
            class="universal-modal relative bg-background border rounded-2xl shadow-lg w-full max-w-[calc(100%-2rem)] sm:max-w-2xl max-h-[85vh] flex flex-col"
            role="dialog"
            aria-modal="true"
        >
            <ModalHeader class=header_class>
                <svg class="modal-icon size-6 shrink-0" viewBox="0 0 24 24" fill="currentColor" aria-hidden="true">
                    <path d=icon />
                </svg>
                <ModalTitle>{content.title}</ModalTitle>
                <button
                    type="button"
                    class="modal-close ml-auto p-1 rounded-sm focus:ring-2 focus:ring-offset-2 focus:outline-none [&_svg:not([class*='size-'])]:size-4 focus:ring-ring"
                    aria-label="Close dialog"
                    on:click=move |_| presenter.hide()
                >
                    <span class="hidden">"Close Dialog"</span>
                    <X />
                </button>
            </ModalHeader>
            <div class="modal-body px-6 py-4 overflow-auto text-sm" inner_html=content.html />
        </div>
    }
}

fn release_key_listener(key_handle: StoredValue<Option<WindowListenerHandle>>) {
    let handle = key_handle.try_update_value(Option::take).flatten();
    if let Some(handle) = handle {
        handle.remove();
    }
}
