pub mod sort;
pub use sort::*;

pub mod renderer;
pub use renderer::*;
