//! Congregation Management Backend
//!
//! A GraphQL API over usuarios, miembros, and notificaciones, persisted in a
//! managed MongoDB instance.

mod config;
mod db;
mod errors;
mod graphql;
mod models;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::{MongoStore, Repository};
use graphql::{build_schema, graphiql, graphql_handler, ApiSchema};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Congregation Management Backend");
    tracing::info!("Database name: {}", config.db_name);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Connect to the document store
    let database = db::init_database(&config.mongodb_uri, &config.db_name).await?;
    let repo = Repository::new(Arc::new(MongoStore::new(database)));

    // Build schema and router
    let schema = build_schema(repo);
    let app = create_router(schema);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("GraphQL endpoint at http://{}/graphql", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router.
pub fn create_router(schema: ApiSchema) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(schema)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
