//! Command-line key construction and result rendering.

use std::fmt;

use lookup_core::Value;

use crate::host_map::HostValue;

/// One token is passed as a scalar key, several as a sequence.
#[must_use]
pub fn key_from_tokens(tokens: &[String]) -> Value {
    match tokens {
        [single] => Value::String(single.clone()),
        many => Value::Array(many.iter().cloned().map(Value::String).collect()),
    }
}

/// Render a host value as output lines.
///
/// Text is one line, lists are one item per line, binary content is
/// lowercase hex and handles print their description. Null prints nothing.
#[must_use]
pub fn render<R: fmt::Display>(value: &HostValue<R>) -> Vec<String> {
    match value {
        HostValue::Text(text) => vec![text.clone()],
        HostValue::Binary(bytes) => vec![hex::encode(bytes)],
        HostValue::List(items) => items.clone(),
        HostValue::Handle(handle) => vec![handle.to_string()],
        HostValue::Null => Vec::new(),
    }
}
