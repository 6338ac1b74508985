mod formatters;
mod table;

pub use formatters::*;
pub use table::*;
