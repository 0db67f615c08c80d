use anyhow::Result;
use dotenv::dotenv;
use taskdue::commands::Cli;
use taskdue::libs::messages::macros::is_debug_mode;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv().ok();

    if is_debug_mode() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("taskdue=debug")))
            .with_target(false)
            .init();
    }

    Cli::menu().await
}
