use indexmap::IndexMap;

use crate::fields::FieldDef;

/// The field-name-to-column translation table, injected into the composer.
/// Implementations resolve a report field token to its definition; matching
/// is exact and case-insensitive, never substring-based.
pub trait FieldLookup {
    fn resolve(&self, token: &str) -> Option<&FieldDef>;
}

/// In-memory lookup over a fixed field registry, keyed by stable key with a
/// fallback scan over aliases and qualified names. Registration order is
/// preserved so diagnostics stay deterministic.
#[derive(Debug, Default)]
pub struct StaticFieldLookup {
    fields: IndexMap<String, FieldDef>,
}

impl StaticFieldLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, field: FieldDef) {
        self.fields.insert(field.key.to_lowercase(), field);
    }

    pub fn with(mut self, field: FieldDef) -> Self {
        self.register(field);
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FieldLookup for StaticFieldLookup {
    fn resolve(&self, token: &str) -> Option<&FieldDef> {
        let trimmed = token.trim();
        if let Some(field) = self.fields.get(&trimmed.to_lowercase()) {
            return Some(field);
        }
        self.fields.values().find(|field| field.matches(trimmed))
    }
}
