use chauffeur::config::Config;
use chauffeur::engine::Engine;
use chauffeur::server::serve;

#[tokio::main]
async fn main() -> Result<(), chauffeur::error::Error> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let engine = Engine::from_config(&config);

    serve(engine, config.addr()).await
}
