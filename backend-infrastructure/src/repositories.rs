// Persistence adapters

pub mod config_files;
pub mod sqlite_repo;

pub use config_files::*;
pub use sqlite_repo::*;
