use crate::models::TargetKind;

/// Attributes of a `.sidebar-link` that identify its target.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinkMarkup<'a> {
    pub href: Option<&'a str>,
    pub onclick: Option<&'a str>,
    pub data_tag: Option<&'a str>,
    pub data_target_kind: Option<&'a str>,
    pub data_target_key: Option<&'a str>,
}

/// Quoted (or bare) arguments of the first `function(...)` call in `script`.
///
/// Commas and parentheses inside quotes belong to the argument. `None` when
/// the call is never closed.
pub fn call_args(script: &str, function: &str) -> Option<Vec<String>> {
    let open = format!("{function}(");
    let start = script.find(&open)? + open.len();

    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut chars = script[start..].chars();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            match c {
                '\\' => current.extend(chars.next()),
                _ if c == q => quote = None,
                _ => current.push(c),
            }
            continue;
        }

        match c {
            '\'' | '"' => quote = Some(c),
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' if depth > 0 => {
                depth -= 1;
                current.push(c);
            }
            ')' => {
                args.push(current.trim().to_string());
                return Some(args);
            }
            ',' if depth == 0 => {
                args.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    None
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Target of a sidebar link, or `None` for pure menu headers.
pub fn classify(
    markup: &LinkMarkup<'_>,
    schema_root_menu: &str,
    schema_root_key: &str,
) -> Option<(TargetKind, String)> {
    if let (Some(kind), Some(key)) = (
        non_empty(markup.data_target_kind),
        non_empty(markup.data_target_key),
    ) {
        if let Ok(kind) = kind.parse::<TargetKind>() {
            return Some((kind, key.to_string()));
        }
    }

    if let Some(href) = non_empty(markup.href) {
        if let Some(tag) = href.strip_prefix("#operations-tag-") {
            return Some((TargetKind::TagSection, tag.to_string()));
        }
        if let Some(op) = href.strip_prefix("#operations-") {
            return Some((TargetKind::OperationSection, op.to_string()));
        }
    }

    if let Some(onclick) = non_empty(markup.onclick) {
        if let Some(args) = call_args(onclick, "scrollToDocSection") {
            if let Some(section) = args.first().filter(|s| !s.is_empty()) {
                return Some((TargetKind::DocSection, section.clone()));
            }
        }
        if let Some(args) = call_args(onclick, "toggleSubmenuAndScroll") {
            if let Some(section) = args.get(2).filter(|s| !s.is_empty()) {
                return Some((TargetKind::DocSection, section.clone()));
            }
        }
        if !schema_root_menu.is_empty() && onclick.contains(schema_root_menu) {
            return Some((TargetKind::SectionRoot, schema_root_key.to_string()));
        }
        if let Some(args) = call_args(onclick, "scrollToSchema") {
            if let Some(schema) = args.first().filter(|s| !s.is_empty()) {
                return Some((TargetKind::SchemaSection, schema.clone()));
            }
        }
    }

    match non_empty(markup.data_tag) {
        Some("schemas" | "presenters") => Some((TargetKind::SectionRoot, schema_root_key.to_string())),
        Some(tag) => Some((TargetKind::TagSection, tag.to_string())),
        None => None,
    }
}

/// Menu id toggled by an inline `toggleSubmenu`/`toggleSubmenuAndScroll` call.
pub fn controlled_menu(onclick: &str) -> Option<String> {
    call_args(onclick, "toggleSubmenu")
        .or_else(|| call_args(onclick, "toggleSubmenuAndScroll"))
        .and_then(|args| args.get(1).cloned())
        .filter(|id| !id.is_empty())
}
