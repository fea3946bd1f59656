pub mod modal;

// Re-export component symbols so callers can `use crate::components::ui::UniversalModal`.
pub use modal::*;
