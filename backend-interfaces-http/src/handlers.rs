pub mod auth_handlers;
pub mod blog_handlers;
pub mod ip_handlers;
pub mod log_handlers;
pub mod minecraft_handlers;
pub mod ops_handlers;
pub mod proxmox_handlers;

pub use auth_handlers::*;
pub use blog_handlers::*;
pub use ip_handlers::*;
pub use log_handlers::*;
pub use minecraft_handlers::*;
pub use ops_handlers::*;
pub use proxmox_handlers::*;
