// Domain value objects
pub mod log_level;

pub use log_level::*;
