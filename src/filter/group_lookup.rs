use serde::{Deserialize, Serialize};

/// Resolves hierarchical group names to code prefixes. This is the only
/// external call the composer makes; implementations typically query the
/// backing store and may block on I/O. Failures propagate as composition
/// errors, never retried here.
pub trait GroupLookup {
    /// Codes of every group whose display name contains the fragment,
    /// case-insensitive. Descendant groups share the returned code as a
    /// prefix, so one `LIKE 'code%'` test covers the whole subtree.
    fn codes_by_name(&self, fragment: &str) -> Result<Vec<String>, String>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDef {
    pub code: String,
    pub name: String,
}

/// In-memory lookup over a fixed group list.
#[derive(Debug, Default)]
pub struct StaticGroupLookup {
    groups: Vec<GroupDef>,
}

impl StaticGroupLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, code: &str, name: &str) -> Self {
        self.groups.push(GroupDef { code: code.to_string(), name: name.to_string() });
        self
    }
}

impl GroupLookup for StaticGroupLookup {
    fn codes_by_name(&self, fragment: &str) -> Result<Vec<String>, String> {
        let fragment = fragment.trim().to_lowercase();
        Ok(self
            .groups
            .iter()
            .filter(|group| group.name.to_lowercase().contains(&fragment))
            .map(|group| group.code.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::filter::{GroupLookup, StaticGroupLookup};

    fn lookup() -> StaticGroupLookup {
        StaticGroupLookup::new()
            .with("001", "Beverages")
            .with("001001", "Hot beverages")
            .with("002", "Dairy")
    }

    #[test]
    pub fn test_codes_by_name_substring() {
        let groups = lookup();

        let codes = groups.codes_by_name("beverage").expect("Failed to look up groups");

        assert_eq!(codes, vec!["001", "001001"]);
    }

    #[test]
    pub fn test_codes_by_name_no_match() {
        let groups = lookup();

        let codes = groups.codes_by_name("frozen").expect("Failed to look up groups");

        assert!(codes.is_empty());
    }
}
