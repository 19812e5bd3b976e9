use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tradejournal::{api, config::Config, db::init_db, HttpRateSource, RateBook, Repository};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let port = config.port;

    let pool = match init_db(&config.database_path).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    let repo = Arc::new(Repository::new(pool));
    let rates = Arc::new(RateBook::new(config.fx_fallback_usd_idr));

    // Periodic exchange-rate refresh. The first tick fires immediately.
    let source = HttpRateSource::new(config.fx_api_url.clone());
    let refresh_rates = rates.clone();
    let refresh_every = Duration::from_secs(config.fx_refresh_secs);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(refresh_every);
        loop {
            interval.tick().await;
            refresh_rates.refresh(&source).await;
        }
    });

    let app = api::create_router(api::AppState::new(repo, rates));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
