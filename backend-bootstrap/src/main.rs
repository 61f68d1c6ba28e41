use anyhow::Result;
use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "site-backend")]
#[command(about = "Personal site backend server", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long, env = "SITE_CONFIG", default_value = backend_infrastructure::DEFAULT_CONFIG_PATH)]
    config: String,

    /// Directory for daily rolling log files; stdout only when unset
    #[arg(long, env = "SITE_LOG_DIR")]
    log_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads SITE_* defaults.
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let (file_layer, _guard) = match &args.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "site-backend.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .with(file_layer)
        .init();

    backend_bootstrap::run(&args.config).await
}
