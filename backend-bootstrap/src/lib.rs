pub mod context;
pub mod lifecycle;

pub use lifecycle::{build_router_with_layers, run_standalone};

pub async fn run(config_path: &str) -> anyhow::Result<()> {
    run_standalone(config_path).await
}
