pub mod field_def;
pub use field_def::*;

pub mod field_lookup;
pub use field_lookup::*;
