use crate::models::TargetKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavErrorKind {
    TargetNotFound,
    TargetHidden,
    AmbiguousMatch,
    MenuNotFound,
    LinkNotFound,
}

/// Resolution and navigation failures.
///
/// None of these are fatal: handlers turn them into "no effect this cycle".
#[derive(Clone, Debug)]
pub struct NavError {
    pub kind: NavErrorKind,
    pub message: String,
}

impl std::fmt::Display for NavError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for NavError {}

impl NavError {
    pub(crate) fn target_not_found(kind: TargetKind, key: &str) -> Self {
        Self {
            kind: NavErrorKind::TargetNotFound,
            message: format!("no {kind} target for `{key}`"),
        }
    }

    pub(crate) fn target_hidden(kind: TargetKind, key: &str) -> Self {
        Self {
            kind: NavErrorKind::TargetHidden,
            message: format!("{kind} target for `{key}` is hidden"),
        }
    }

    pub(crate) fn ambiguous(kind: TargetKind, key: &str, candidates: usize) -> Self {
        Self {
            kind: NavErrorKind::AmbiguousMatch,
            message: format!("{candidates} {kind} candidates for `{key}`, using the first"),
        }
    }

    pub(crate) fn menu_not_found(id: &str) -> Self {
        Self {
            kind: NavErrorKind::MenuNotFound,
            message: format!("menu `{id}` not found"),
        }
    }

    pub(crate) fn link_not_found(what: &str) -> Self {
        Self {
            kind: NavErrorKind::LinkNotFound,
            message: format!("no sidebar link for {what}"),
        }
    }
}

pub type NavResult<T> = Result<T, NavError>;
