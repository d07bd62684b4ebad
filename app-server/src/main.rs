use clap::Parser;
use raglite_app_server::ServerArgs;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    let args = ServerArgs::parse();

    let filter = if args.verbose {
        "raglite=debug,tower_http=debug"
    } else {
        "raglite=info,tower_http=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    if let Err(e) = raglite_app_server::run(args.into_config()).await {
        tracing::error!("{e:#}");
        return Err(e);
    }
    Ok(())
}
