// Backend Application Layer

pub mod commands;
pub mod error;
pub mod metrics;
pub mod ops;
pub mod queries;
pub mod state;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::AppError;
pub use metrics::Metrics;
pub use ops::Journal;
pub use state::AppState;
