use microblog::{App, Config, Server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> microblog::Result<()> {
    // RUST_LOG overrides the default `info` level.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;
    let addr = config.bind;
    let app = App::new(config).await?;

    Server::bind(addr).serve(microblog::router(app)).await
}
