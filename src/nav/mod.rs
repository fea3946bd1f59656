//! Sidebar navigation core: target resolution, active link selection and the
//! menu expansion state machine. Nothing in here touches the DOM.

pub mod content;
pub mod error;
pub mod markup;
pub mod menu;
pub mod resolver;
pub mod selector;
pub mod tracker;
pub mod viewport;

pub use content::{ContentSnapshot, ContentTree, SnapshotNode};
pub use error::{NavError, NavErrorKind, NavResult};
pub use menu::MenuTable;
pub use tracker::{Effect, ScrollState, SidebarTracker};
