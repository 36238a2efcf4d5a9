//! Accessors for `_embedded` / `_links` hypermedia documents

use serde_json::Value;

/// Items embedded under `_embedded.<key>`, or an empty slice.
pub fn embedded<'a>(document: &'a Value, key: &str) -> &'a [Value] {
    document
        .get("_embedded")
        .and_then(|e| e.get(key))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// The `href` of `_links.<rel>`, if present.
pub fn link_href<'a>(document: &'a Value, rel: &str) -> Option<&'a str> {
    document
        .get("_links")
        .and_then(|l| l.get(rel))
        .and_then(|l| l.get("href"))
        .and_then(Value::as_str)
}
