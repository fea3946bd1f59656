use serde::{Deserialize, Serialize};

/// Index of a sidebar link in document order.
pub type LinkId = usize;

pub type MenuId = String;

/// Which family of content a sidebar link points at.
///
/// The viewer exposes element identity differently per family, so the kind
/// decides how the target element is looked up.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TargetKind {
    OperationSection,
    DocSection,
    SchemaSection,
    TagSection,
    SectionRoot,
}

/// Structural container kinds found in the rendered content tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionKind {
    TagSection,
    Operation,
    ModelBox,
    ModelsRoot,
    DocSection,
}

impl SectionKind {
    /// Containers a matched heading may be attributed to.
    pub const SEMANTIC: [SectionKind; 4] = [
        SectionKind::TagSection,
        SectionKind::Operation,
        SectionKind::ModelBox,
        SectionKind::ModelsRoot,
    ];
}

impl TargetKind {
    /// Element id the viewer (or the injected docs) conventionally uses.
    pub fn element_id(self, key: &str) -> String {
        match self {
            TargetKind::OperationSection => format!("operations-{key}"),
            TargetKind::DocSection => format!("doc-section-{key}"),
            TargetKind::SchemaSection => format!("model-{key}"),
            TargetKind::TagSection => format!("operations-tag-{key}"),
            TargetKind::SectionRoot => key.to_string(),
        }
    }

    pub fn attribute(self) -> Option<&'static str> {
        match self {
            TargetKind::OperationSection => Some("data-operation"),
            TargetKind::DocSection => Some("data-doc-section"),
            TargetKind::SchemaSection => Some("data-name"),
            TargetKind::TagSection => Some("data-tag"),
            TargetKind::SectionRoot => None,
        }
    }

    pub fn container(self) -> SectionKind {
        match self {
            TargetKind::OperationSection => SectionKind::Operation,
            TargetKind::DocSection => SectionKind::DocSection,
            TargetKind::SchemaSection => SectionKind::ModelBox,
            TargetKind::TagSection => SectionKind::TagSection,
            TargetKind::SectionRoot => SectionKind::ModelsRoot,
        }
    }

    pub fn is_schema_family(self) -> bool {
        matches!(self, TargetKind::SchemaSection | TargetKind::SectionRoot)
    }
}

/// One clickable sidebar entry.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NavigationLink {
    pub kind: TargetKind,
    pub target_key: String,

    /// Visible link text; operation links are matched against headings by it.
    #[serde(default)]
    pub label: String,

    /// 1 = top level, 2 = submenu, 3 = nested submenu.
    pub level: u8,

    /// Innermost menu containing the link.
    #[serde(default)]
    pub menu: Option<MenuId>,

    /// Submenu headed by this link (parent-item links only).
    #[serde(default)]
    pub controls: Option<MenuId>,

    #[serde(default)]
    pub active: bool,
}

impl NavigationLink {
    pub fn new(kind: TargetKind, target_key: impl Into<String>) -> Self {
        Self {
            kind,
            target_key: target_key.into(),
            label: String::new(),
            level: 1,
            menu: None,
            controls: None,
            active: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn in_menu(mut self, menu: impl Into<MenuId>, level: u8) -> Self {
        self.menu = Some(menu.into());
        self.level = level;
        self
    }

    pub fn controlling(mut self, menu: impl Into<MenuId>) -> Self {
        self.controls = Some(menu.into());
        self
    }

    /// Menu whose ancestor chain must be open while this link is active.
    pub fn anchor_menu(&self) -> Option<&str> {
        self.controls.as_deref().or(self.menu.as_deref())
    }

    /// Text compared against headings by the text-based strategies.
    pub fn match_text(&self) -> &str {
        match self.kind {
            TargetKind::OperationSection if !self.label.trim().is_empty() => &self.label,
            _ => &self.target_key,
        }
    }
}

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MenuState {
    #[default]
    Collapsed,
    Expanded,
}

impl MenuState {
    pub fn is_expanded(self) -> bool {
        self == MenuState::Expanded
    }
}

/// One collapsible sidebar submenu.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MenuNode {
    pub id: MenuId,
    pub state: MenuState,

    /// `Some(true)`: user collapsed it. `Some(false)`: user expanded it.
    /// `None`: fully automatic.
    #[serde(default)]
    pub manual_override: Option<bool>,

    /// Enclosing menu id (non-owning).
    #[serde(default)]
    pub parent: Option<MenuId>,
}

impl MenuNode {
    pub fn new(id: impl Into<MenuId>) -> Self {
        Self {
            id: id.into(),
            state: MenuState::Collapsed,
            manual_override: None,
            parent: None,
        }
    }

    pub fn child_of(mut self, parent: impl Into<MenuId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn expanded(mut self) -> Self {
        self.state = MenuState::Expanded;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_ids_follow_viewer_conventions() {
        assert_eq!(
            TargetKind::OperationSection.element_id("articles-list"),
            "operations-articles-list"
        );
        assert_eq!(TargetKind::DocSection.element_id("upload-steps"), "doc-section-upload-steps");
        assert_eq!(TargetKind::SchemaSection.element_id("Article"), "model-Article");
        assert_eq!(TargetKind::TagSection.element_id("articles"), "operations-tag-articles");
        assert_eq!(TargetKind::SectionRoot.element_id("models"), "models");
    }

    #[test]
    fn test_operation_links_match_by_label() {
        let link = NavigationLink::new(TargetKind::OperationSection, "articles-list")
            .with_label("List articles");
        assert_eq!(link.match_text(), "List articles");

        let unlabeled = NavigationLink::new(TargetKind::OperationSection, "articles-list");
        assert_eq!(unlabeled.match_text(), "articles-list");

        let tag = NavigationLink::new(TargetKind::TagSection, "articles").with_label("Articles");
        assert_eq!(tag.match_text(), "articles");
    }

    #[test]
    fn test_anchor_menu_prefers_controlled_submenu() {
        let parent = NavigationLink::new(TargetKind::DocSection, "auth")
            .in_menu("guides", 2)
            .controlling("auth-menu");
        assert_eq!(parent.anchor_menu(), Some("auth-menu"));

        let child = NavigationLink::new(TargetKind::DocSection, "tokens").in_menu("auth-menu", 3);
        assert_eq!(child.anchor_menu(), Some("auth-menu"));
    }

    #[test]
    fn test_target_kind_serde_and_display_agree() {
        let v = serde_json::to_value(TargetKind::SchemaSection).expect("should serialize");
        assert_eq!(v, "schema-section");
        assert_eq!(TargetKind::SchemaSection.to_string(), "schema-section");
        assert_eq!("tag-section".parse::<TargetKind>().ok(), Some(TargetKind::TagSection));
    }
}
