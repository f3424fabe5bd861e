use bazaar_server::utils::logger::init_logger;
use bazaar_server::{AppState, Config};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    init_logger(&config.environment);

    tracing::info!("Starting bazaar-server (env: {})", config.environment);

    let http_port = config.http_port;
    let state = AppState::new(config).await?;
    let app = bazaar_server::api::create_router(state);

    let addr = format!("0.0.0.0:{http_port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("bazaar-server listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
