pub mod blog_queries;
pub mod log_queries;
pub mod minecraft_queries;
pub mod playtime_queries;
pub mod proxmox_queries;
pub mod public_ip_queries;
