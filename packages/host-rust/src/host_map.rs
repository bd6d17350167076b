//! Generic keyed-lookup surface exposed to the host.
//!
//! Hosts whose dynamic-invocation layer only understands a map shape call
//! [`HostMap::get`] with the lookup key. Every other member exists so the
//! adapter satisfies that shape; they are unsupported and return fixed
//! values without touching the resolver.

use std::fmt;

use lookup_core::{Payload, Resolution, Resolver, Value};
use tracing::debug;

/// Value handed back to the host by [`HostMap::get`].
#[derive(Debug, Clone)]
pub enum HostValue<R> {
    Text(String),
    Binary(Vec<u8>),
    List(Vec<String>),
    /// A bound resolver, itself usable as a map.
    Handle(HostAdapter<R>),
    /// No value (host null).
    Null,
}

impl<R> HostValue<R> {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_handle(self) -> Option<HostAdapter<R>> {
        match self {
            Self::Handle(handle) => Some(handle),
            _ => None,
        }
    }
}

impl<R: Resolver> From<Resolution<R>> for HostValue<R> {
    fn from(resolution: Resolution<R>) -> Self {
        match resolution {
            Resolution::Value(Payload::Text(text)) => Self::Text(text),
            Resolution::Value(Payload::Binary(bytes)) => Self::Binary(bytes),
            Resolution::Value(Payload::List(items)) => Self::List(items),
            Resolution::Value(Payload::Empty) => Self::Null,
            Resolution::Bound(resolver) => Self::Handle(HostAdapter::new(resolver)),
            Resolution::Error(err) => Self::Text(err.to_string()),
        }
    }
}

/// Map-shaped surface over a resolver.
///
/// Only [`get`](HostMap::get) is meaningful. The remaining members are
/// **unsupported**: they never store anything and always return the fixed
/// value documented on each method.
pub trait HostMap {
    type Resolver;

    /// Resolve `key` and render the result for the host.
    fn get(&self, key: &Value) -> HostValue<Self::Resolver>;

    /// Unsupported. Always `0`.
    fn size(&self) -> usize;

    /// Unsupported. Always `false`.
    fn is_empty(&self) -> bool;

    /// Unsupported. Always `false`.
    fn contains_key(&self, key: &Value) -> bool;

    /// Unsupported. Always `false`.
    fn contains_value(&self, value: &Value) -> bool;

    /// Unsupported. Stores nothing; always `None`.
    fn put(&self, key: Value, value: Value) -> Option<Value>;

    /// Unsupported. Always `None`.
    fn remove(&self, key: &Value) -> Option<Value>;

    /// Unsupported. Stores nothing.
    fn put_all(&self, entries: Vec<(Value, Value)>);

    /// Unsupported. No effect.
    fn clear(&self);

    /// Unsupported. Always `None`.
    fn key_set(&self) -> Option<Vec<Value>>;

    /// Unsupported. Always `None`.
    fn values(&self) -> Option<Vec<Value>>;

    /// Unsupported. Always `None`.
    fn entry_set(&self) -> Option<Vec<(Value, Value)>>;
}

/// [`HostMap`] adapter around any [`Resolver`].
#[derive(Debug, Clone)]
pub struct HostAdapter<R> {
    resolver: R,
}

impl<R: Resolver> HostAdapter<R> {
    #[must_use]
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    #[must_use]
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    fn unsupported(member: &'static str) {
        debug!(service = R::SERVICE, member, "unsupported host map member called");
    }
}

impl<R: Resolver> HostMap for HostAdapter<R> {
    type Resolver = R;

    fn get(&self, key: &Value) -> HostValue<R> {
        self.resolver.resolve(key).into()
    }

    fn size(&self) -> usize {
        Self::unsupported("size");
        0
    }

    fn is_empty(&self) -> bool {
        Self::unsupported("is_empty");
        false
    }

    fn contains_key(&self, _key: &Value) -> bool {
        Self::unsupported("contains_key");
        false
    }

    fn contains_value(&self, _value: &Value) -> bool {
        Self::unsupported("contains_value");
        false
    }

    fn put(&self, _key: Value, _value: Value) -> Option<Value> {
        Self::unsupported("put");
        None
    }

    fn remove(&self, _key: &Value) -> Option<Value> {
        Self::unsupported("remove");
        None
    }

    fn put_all(&self, _entries: Vec<(Value, Value)>) {
        Self::unsupported("put_all");
    }

    fn clear(&self) {
        Self::unsupported("clear");
    }

    fn key_set(&self) -> Option<Vec<Value>> {
        Self::unsupported("key_set");
        None
    }

    fn values(&self) -> Option<Vec<Value>> {
        Self::unsupported("values");
        None
    }

    fn entry_set(&self) -> Option<Vec<(Value, Value)>> {
        Self::unsupported("entry_set");
        None
    }
}

impl<R: fmt::Display> fmt::Display for HostAdapter<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.resolver, f)
    }
}
