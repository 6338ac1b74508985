mod controller;
mod validation;

pub use controller::*;
pub use validation::*;
