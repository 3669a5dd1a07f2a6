use serde::{Deserialize, Serialize};

use crate::assemble::SortDirection;
use crate::filter::DeclaredFilter;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub size: u64,
    #[serde(default)]
    pub index: u64,
}

impl Page {
    pub fn offset(&self) -> u64 {
        self.size * self.index
    }

    /// Text of the LIMIT clause this page renders to.
    pub fn limit_text(&self) -> String {
        if self.index > 0 {
            format!("{} OFFSET {}", self.size, self.offset())
        } else {
            self.size.to_string()
        }
    }
}

/// The declarative side of one report invocation: filters, sort override,
/// page, and whether hidden-column pruning runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub filters: Vec<DeclaredFilter>,
    #[serde(default)]
    pub sort: Option<SortSpec>,
    #[serde(default)]
    pub page: Option<Page>,
    #[serde(default = "prune_by_default")]
    pub prune_hidden: bool,
}

fn prune_by_default() -> bool {
    true
}

impl Default for ReportRequest {
    fn default() -> Self {
        Self { filters: vec![], sort: None, page: None, prune_hidden: true }
    }
}

impl ReportRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: DeclaredFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn sorted_by(mut self, column: &str, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec { column: column.to_string(), direction });
        self
    }

    pub fn paged(mut self, size: u64, index: u64) -> Self {
        self.page = Some(Page { size, index });
        self
    }
}
