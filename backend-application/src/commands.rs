pub mod auth_commands;
pub mod blog_commands;
pub mod minecraft_commands;
pub mod playtime_commands;
pub mod public_ip_commands;
