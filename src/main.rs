use takas::config::Config;
use takas::engine::Engine;
use takas::error::Error;
use takas::server::serve;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("takas=info")),
        )
        .init();

    let config = Config::from_env()?;
    let engine = Engine::from_config(&config).await?;

    serve(engine, config.addr).await
}
