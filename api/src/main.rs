use crop_yield_api::config::Config;
use crop_yield_api::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crop_yield_api=info,tower_http=info".into()),
        )
        .init();

    let config = Config::load();
    server::run(config).await
}
