use crate::interceptor::ResponseReport;
use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModalKind {
    Error,
    Success,
    #[default]
    Info,
    Warning,
}

impl ModalKind {
    /// Header class, e.g. `type-error`.
    pub fn css_class(self) -> String {
        format!("type-{self}")
    }

    /// SVG path drawn in the header when no custom icon is given.
    pub fn default_icon(self) -> &'static str {
        match self {
            ModalKind::Error => "M12 2C6.48 2 2 6.48 2 12s4.48 10 10 10 10-4.48 10-10S17.52 2 12 2zm1 15h-2v-2h2v2zm0-4h-2V7h2v6z",
            ModalKind::Success => "M12 2C6.48 2 2 6.48 2 12s4.48 10 10 10 10-4.48 10-10S17.52 2 12 2zm-2 15l-5-5 1.41-1.41L10 14.17l7.59-7.59L19 8l-9 9z",
            ModalKind::Info => "M12 2C6.48 2 2 6.48 2 12s4.48 10 10 10 10-4.48 10-10S17.52 2 12 2zm1 15h-2v-6h2v6zm0-8h-2V7h2v2z",
            ModalKind::Warning => "M1 21h22L12 2 1 21zm12-3h-2v-2h2v2zm0-4h-2v-4h2v4z",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModalContent {
    pub kind: ModalKind,
    pub title: String,
    /// Trusted markup for the body.
    pub html: String,
    pub icon: Option<String>,
}

impl ModalContent {
    pub fn new(kind: ModalKind, title: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            html: html.into(),
            icon: None,
        }
    }

    pub fn icon_path(&self) -> &str {
        self.icon
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| self.kind.default_icon())
    }
}

/// Option bag accepted by `showUniversalModal({ type, title, content, icon })`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ModalOptions {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub icon: Option<String>,
}

impl ModalOptions {
    /// Unknown kinds render as `info`; a missing title reads "Notice".
    pub fn into_content(self) -> ModalContent {
        let kind = self
            .kind
            .as_deref()
            .and_then(|k| k.trim().to_lowercase().parse().ok())
            .unwrap_or_default();
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| "Notice".to_string());

        ModalContent {
            kind,
            title,
            html: self.content.unwrap_or_default(),
            icon: self.icon,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModalState {
    pub current: Option<ModalContent>,
    last_report: Option<String>,
}

impl ModalState {
    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }

    pub fn show(&mut self, content: ModalContent) {
        self.current = Some(content);
    }

    /// Closing also forgets the last report, so the same failure can pop
    /// up again on the next attempt.
    pub fn hide(&mut self) -> bool {
        self.last_report = None;
        self.current.take().is_some()
    }

    /// Returns false when `report` repeats the one already on screen.
    pub fn show_report(&mut self, report: &ResponseReport) -> bool {
        let key = report.dedupe_key();
        if self.last_report.as_deref() == Some(key.as_str()) {
            return false;
        }
        self.last_report = Some(key);
        self.show(report.to_modal());
        true
    }
}

/// Shared handle over the single page modal.
#[derive(Clone, Copy)]
pub struct ModalPresenter {
    state: RwSignal<ModalState>,
}

impl ModalPresenter {
    pub fn new() -> Self {
        Self {
            state: RwSignal::new(ModalState::default()),
        }
    }

    pub fn show(&self, content: ModalContent) {
        self.state.update(|s| s.show(content));
    }

    pub fn hide(&self) {
        self.state.update(|s| {
            s.hide();
        });
    }

    pub fn show_report(&self, report: &ResponseReport) -> bool {
        let mut shown = false;
        self.state.update(|s| shown = s.show_report(report));
        shown
    }

    /// Tracked read, for views.
    pub fn current(&self) -> Option<ModalContent> {
        self.state.with(|s| s.current.clone())
    }

    pub fn is_visible(&self) -> bool {
        self.state.with(ModalState::is_visible)
    }
}

impl Default for ModalPresenter {
    fn default() -> Self {
        Self::new()
    }
}
