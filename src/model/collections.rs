//! Ordered keyed collections and ordered lists
//!
//! Canonical containers are only ever built from already-resolved entries.
//! An empty input never produces a container: `try_new` rejects it, and the
//! assembler turns that into an absent field.

use std::fmt;

use super::ModelError;

// =============================================================================
// Collection Kind
// =============================================================================

/// Which canonical container is being built (used in diagnostics)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    // --- keyed ---
    Schemas,
    PatternSchemas,
    Responses,
    Parameters,
    Examples,
    RequestBodies,
    Headers,
    SecuritySchemes,
    Links,
    Callbacks,
    PathItems,
    Webhooks,
    MediaTypes,
    Operations,
    Encodings,
    ServerVariables,
    // --- ordered ---
    SchemaList,
    ParameterList,
    ServerList,
    TagList,
    TagNames,
    SecurityRequirementList,
    EncodingList,
}

impl CollectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Schemas => "SchemaMap",
            Self::PatternSchemas => "PatternSchemaMap",
            Self::Responses => "ResponseMap",
            Self::Parameters => "ParameterMap",
            Self::Examples => "ExampleMap",
            Self::RequestBodies => "RequestBodyMap",
            Self::Headers => "HeaderMap",
            Self::SecuritySchemes => "SecuritySchemeMap",
            Self::Links => "LinkMap",
            Self::Callbacks => "CallbackMap",
            Self::PathItems => "PathItemMap",
            Self::Webhooks => "WebhookMap",
            Self::MediaTypes => "MediaTypeMap",
            Self::Operations => "OperationMap",
            Self::Encodings => "EncodingMap",
            Self::ServerVariables => "ServerVariableMap",
            Self::SchemaList => "SchemaList",
            Self::ParameterList => "ParameterList",
            Self::ServerList => "ServerList",
            Self::TagList => "TagList",
            Self::TagNames => "TagNameList",
            Self::SecurityRequirementList => "SecurityRequirementList",
            Self::EncodingList => "EncodingList",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// OrderedMap
// =============================================================================

/// String-keyed map that iterates in insertion order.
///
/// Re-inserting an existing key replaces the value in place and keeps the
/// key's original position.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; returns the previous value for the key
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// =============================================================================
// KeyedCollection
// =============================================================================

/// Canonical keyed collection (SchemaMap, ResponseMap, ...). Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedCollection<T> {
    kind: CollectionKind,
    entries: OrderedMap<T>,
}

impl<T> KeyedCollection<T> {
    pub fn try_new(kind: CollectionKind, entries: OrderedMap<T>) -> Result<Self, ModelError> {
        if entries.is_empty() {
            return Err(ModelError::EmptyCollection { kind });
        }
        Ok(Self { kind, entries })
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed collection; kept for API symmetry
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }
}

// =============================================================================
// OrderedList
// =============================================================================

/// Canonical ordered list (ParameterList, ServerList, ...). Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedList<T> {
    kind: CollectionKind,
    items: Vec<T>,
}

impl<T> OrderedList<T> {
    pub fn try_new(kind: CollectionKind, items: Vec<T>) -> Result<Self, ModelError> {
        if items.is_empty() {
            return Err(ModelError::EmptyCollection { kind });
        }
        Ok(Self { kind, items })
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}
