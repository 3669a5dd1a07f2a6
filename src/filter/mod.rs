pub mod param_value;
pub use param_value::*;

pub mod declared_filter;
pub use declared_filter::*;

pub mod composition_context;
pub use composition_context::*;

pub mod paired_kinds;
pub use paired_kinds::*;

pub mod group_lookup;
pub use group_lookup::*;

pub mod translate;
pub use translate::*;

pub mod translate_error;
pub use translate_error::*;
