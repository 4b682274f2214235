mod agent;
mod field;

pub use agent::*;
pub use field::*;
