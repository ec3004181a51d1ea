mod error;
mod handlers;
mod models;
mod services;
mod utils;

use actix_web::{middleware::Logger, web, App, HttpServer};
use std::io;
use std::sync::Arc;

use services::github::{GitHubClient, GraphQlClient};
use utils::{config::Config, http_client::create_http_client};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file FIRST before anything else
    dotenv::dotenv().ok();

    // Initialize logger with default level if RUST_LOG not set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=================================================");
    println!("🚀 GitHub Profile Backend Server");
    println!("=================================================");

    let config = Config::from_env().map_err(|e| {
        log::error!("Failed to load configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;
    let host = config.host.clone();
    let port = config.port;

    println!("📝 Configuration loaded:");
    println!("   - Host: {}", host);
    println!("   - Port: {}", port);
    println!("   - GitHub GraphQL: {}", config.github_graphql_url);
    println!(
        "   - CORS origin: {}",
        config.allowed_origin.as_deref().unwrap_or("*")
    );
    println!(
        "   - Log level: {}",
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    );

    let http = create_http_client().map_err(|e| {
        log::error!("Failed to create HTTP client: {}", e);
        io::Error::new(io::ErrorKind::Other, e)
    })?;
    let github: Arc<dyn GraphQlClient> = Arc::new(GitHubClient::new(
        http,
        config.github_graphql_url.clone(),
        config.github_token.clone(),
    ));
    let github = web::Data::from(github);

    println!("🌐 Starting HTTP server at http://{}:{}", host, port);
    println!("📍 Available endpoints:");
    for path in [
        "/api/contributions?login&from&to",
        "/api/contributions/grid?login&year",
        "/api/contributions/heatmap.{svg|png}?login&year",
        "/api/activity-mix?login&from&to",
        "/api/activity-contribs?login&from&to",
        "/api/pinned?login[&first]",
        "/api/profile?login",
        "/api/profile-counts?login",
    ] {
        println!("   - GET  http://{}:{}{}", host, port, path);
    }
    println!("=================================================");

    log::info!("Server started at http://{}:{}", host, port);

    HttpServer::new(move || {
        let cors = handlers::cors(config.allowed_origin.as_deref());

        App::new()
            .app_data(github.clone())
            .wrap(Logger::default())
            .wrap(cors) // CORS must be wrapped AFTER Logger to ensure headers are added to all responses
            .configure(handlers::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
