pub mod statement;
pub use statement::{Dialect, ParsedStatement, StatementParser};

pub mod fields;
pub use fields::{FieldDef, FieldLookup, FieldSemantics, StaticFieldLookup};

pub mod filter;
pub use filter::{BoundParameter, DeclaredFilter, FilterOperator, GroupLookup, ParamValue};

pub mod assemble;
pub use assemble::{Renderer, SortDirection};

pub mod composer;
pub use composer::{
    ComposeError, ComposedCount, ComposedReport, ReportColumn, ReportComposer, ReportRequest,
};
