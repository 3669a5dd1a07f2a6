use serde::{Deserialize, Serialize};

/// Marks fields whose values need domain-aware filter handling beyond the
/// plain operator templates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldSemantics {
    #[default]
    Plain,
    /// Operation kind codes. Equals filters widen over paired codes because
    /// one logical operation is recorded as two physical rows.
    OperationKind,
    /// Hierarchical group code; descendants share the code as a prefix.
    GroupCode,
}

/// One business field the translation table knows about: a stable key plus
/// every textual form a report may use to refer to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub key: String,
    pub table: String,
    pub column: String,
    /// Output name reports give this field.
    pub alias: String,
    /// Permanent columns (ids, keys) survive hidden-column pruning.
    pub is_permanent: bool,
    pub semantics: FieldSemantics,
}

impl FieldDef {
    pub fn new(key: &str, table: &str, column: &str) -> Self {
        Self {
            key: key.to_string(),
            table: table.to_string(),
            column: column.to_string(),
            alias: key.to_string(),
            is_permanent: false,
            semantics: FieldSemantics::Plain,
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = alias.to_string();
        self
    }

    pub fn permanent(mut self) -> Self {
        self.is_permanent = true;
        self
    }

    pub fn with_semantics(mut self, semantics: FieldSemantics) -> Self {
        self.semantics = semantics;
        self
    }

    pub fn qualified(&self) -> String {
        format!("{}.{}", self.table, self.column)
    }

    /// Exact, case-insensitive match against any of the field's forms: its
    /// stable key, its output alias, or its qualified name.
    pub fn matches(&self, token: &str) -> bool {
        let token = token.trim();
        token.eq_ignore_ascii_case(&self.key)
            || token.eq_ignore_ascii_case(&self.alias)
            || token.eq_ignore_ascii_case(&self.qualified())
    }
}
