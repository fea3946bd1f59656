//! API key persistence in `localStorage`.

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Trimmed key, or `None` when blank.
pub fn normalize_api_key(raw: &str) -> Option<String> {
    let key = raw.trim();
    (!key.is_empty()).then(|| key.to_string())
}

pub fn load_api_key(storage_key: &str) -> Option<String> {
    let storage = local_storage()?;
    let raw = storage.get_item(storage_key).ok().flatten()?;
    normalize_api_key(&raw)
}

/// Stores the key; blank input removes it. Returns the stored value.
pub fn save_api_key(storage_key: &str, raw: &str) -> Option<String> {
    let key = normalize_api_key(raw);
    if let Some(storage) = local_storage() {
        let _ = match key.as_deref() {
            Some(k) => storage.set_item(storage_key, k),
            None => storage.remove_item(storage_key),
        };
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_api_key() {
        assert_eq!(normalize_api_key("  abc123 \n").as_deref(), Some("abc123"));
        assert_eq!(normalize_api_key("   "), None);
        assert_eq!(normalize_api_key(""), None);
    }
}
