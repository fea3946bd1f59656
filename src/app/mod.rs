use crate::components::ui::UniversalModal;
use crate::state::{docs_state, DocsContext};
use leptos::prelude::*;

/// Host for the page modal. The documentation itself is rendered by the
/// viewer; this only contributes the overlay.
#[component]
pub fn App() -> impl IntoView {
    provide_context(DocsContext(docs_state()));

    view! { <UniversalModal /> }
}
