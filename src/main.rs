//! Librarium Server - Library Catalog System
//!
//! A Rust web server for browsing and managing a small library catalog.

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use librarium_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("librarium_server={},tower_http=debug", config.logging.level).into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Librarium Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository);

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Catalog routes; create routes come before the id-parameterized ones
    let catalog = Router::new()
        // Home
        .route("/", get(api::catalog::index))
        // Books
        .route("/book/create", get(api::books::create_book_form))
        .route("/book/create", post(api::books::create_book))
        .route("/book/:id/delete", get(api::books::delete_book_form))
        .route("/book/:id/delete", post(api::books::delete_book))
        .route("/book/:id/update", get(api::books::update_book_form))
        .route("/book/:id/update", post(api::books::update_book))
        .route("/book/:id", get(api::books::get_book))
        .route("/books", get(api::books::list_books))
        // Authors
        .route("/author/create", get(api::authors::create_author_form))
        .route("/author/create", post(api::authors::create_author))
        .route("/author/:id/delete", get(api::authors::delete_author_form))
        .route("/author/:id/delete", post(api::authors::delete_author))
        .route("/author/:id/update", get(api::authors::update_author_form))
        .route("/author/:id/update", post(api::authors::update_author))
        .route("/author/:id", get(api::authors::get_author))
        .route("/authors", get(api::authors::list_authors))
        // Genres
        .route("/genre/create", get(api::genres::create_genre_form))
        .route("/genre/create", post(api::genres::create_genre))
        .route("/genre/:id/delete", get(api::genres::delete_genre_form))
        .route("/genre/:id/delete", post(api::genres::delete_genre))
        .route("/genre/:id/update", get(api::genres::update_genre_form))
        .route("/genre/:id/update", post(api::genres::update_genre))
        .route("/genre/:id", get(api::genres::get_genre))
        .route("/genres", get(api::genres::list_genres))
        // Book instances
        .route(
            "/bookinstance/create",
            get(api::book_instances::create_book_instance_form),
        )
        .route(
            "/bookinstance/create",
            post(api::book_instances::create_book_instance),
        )
        .route(
            "/bookinstance/:id/delete",
            get(api::book_instances::delete_book_instance_form),
        )
        .route(
            "/bookinstance/:id/delete",
            post(api::book_instances::delete_book_instance),
        )
        .route(
            "/bookinstance/:id/update",
            get(api::book_instances::update_book_instance_form),
        )
        .route(
            "/bookinstance/:id/update",
            post(api::book_instances::update_book_instance),
        )
        .route("/bookinstance/:id", get(api::book_instances::get_book_instance))
        .route("/bookinstances", get(api::book_instances::list_book_instances))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        .with_state(state)
        .nest("/catalog", catalog)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
