// Domain entities: persisted rows, request/response shapes and runtime settings

pub mod auth;
pub mod blog;
pub mod config;
pub mod log_message;
pub mod minecraft;
pub mod playtime;
pub mod proxmox;
pub mod public_ip;

pub use auth::*;
pub use blog::*;
pub use config::*;
pub use log_message::*;
pub use minecraft::*;
pub use playtime::*;
pub use proxmox::*;
pub use public_ip::*;
