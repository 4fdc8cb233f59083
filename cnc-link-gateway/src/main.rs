//! CNC Link Gateway - owns one FOCAS handle and serves it over HTTP.

use std::env;
use std::sync::Arc;

use cnc_link_gateway::{build_router, logging, AppState, CncLink, Config, FocasLibrary};
use tokio::net::TcpListener;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle --version / -V
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("cnc-link-gateway {}", VERSION);
        return Ok(());
    }

    // Load configuration
    let config = Config::load().map_err(|e| {
        format!(
            "Failed to load configuration: {}. \
             Check config.toml or the CNCLINK__SECTION__KEY environment variables.",
            e
        )
    })?;

    logging::init(&config.logging.level);
    tracing::info!("Starting cnc-link-gateway {}", VERSION);

    // The library is loaded on the first driver call, so a missing file
    // surfaces as a failed connect rather than a startup error.
    let driver = Arc::new(FocasLibrary::new(&config.focas.library_path));
    tracing::info!("FOCAS library: {}", driver.path().display());

    let link = CncLink::new(driver, config.focas.link_settings());
    let state = Arc::new(AppState::new(config.clone(), link));

    let app = build_router(state);

    // Start server
    let addr = format!("{}:{}", config.api.host, config.api.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
