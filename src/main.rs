use line_echo::config::Config;
use line_echo::line::LineClient;
use line_echo::server::{app, AppState};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let addr = format!("0.0.0.0:{}", config.port);
    let client = Arc::new(LineClient::new(&config));
    let state = Arc::new(AppState { config, client });

    info!("Starting LINE echo bot on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    info!("Listening on {}", addr);

    axum::serve(listener, app(state)).await.unwrap();
}
