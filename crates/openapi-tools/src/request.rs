//! Turning an operation's URL template plus caller arguments into a request path.

use serde_json::{Map, Value};

/// Substitute `{name}` placeholders and append a form-encoded query string.
///
/// Every occurrence of a placeholder is replaced. Placeholders without a matching argument are
/// left as they are.
#[must_use]
pub fn resolve_request_path(
    template: &str,
    path_params: Option<&Map<String, Value>>,
    query: Option<&Map<String, Value>>,
) -> String {
    let mut path = template.to_string();
    for (name, value) in path_params.into_iter().flatten() {
        path = path.replace(
            &format!("{{{name}}}"),
            &encode_uri_component(&value_to_string(value)),
        );
    }

    let pairs: Vec<(&String, String)> = query
        .into_iter()
        .flatten()
        .map(|(name, value)| (name, value_to_string(value)))
        .collect();
    if !pairs.is_empty() {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (name, value) in &pairs {
            serializer.append_pair(name, value);
        }
        path.push('?');
        path.push_str(&serializer.finish());
    }

    path
}

/// Strings as-is, everything else as compact JSON.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        _ => value.to_string(),
    }
}

fn encode_uri_component(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if is_component_safe(b) {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0F) as usize] as char);
        }
    }
    out
}

fn is_component_safe(b: u8) -> bool {
    matches!(
        b,
        b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')'
    )
}
