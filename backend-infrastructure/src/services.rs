pub mod background_jobs;
pub mod cloudflare_service;
pub mod jwt_service;
pub mod proxmox_service;
pub mod public_ip_service;
pub mod rcon_client;

pub use background_jobs::*;
pub use cloudflare_service::*;
pub use jwt_service::*;
pub use proxmox_service::*;
pub use public_ip_service::*;
pub use rcon_client::*;
