// src/main.rs
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{
    middleware::{Compress, DefaultHeaders, Logger},
    web, App, HttpServer,
};
use anyhow::Context;
use sqlx::{migrate::MigrateDatabase, sqlite::SqliteConnectOptions, Sqlite, SqlitePool};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod donation_handlers;
mod donation_query;
mod error;
mod handlers;
mod models;
mod store;
mod user_handlers;
mod volunteer_handlers;

use config::{load_config, Config};

use donation_handlers::{
    create_donation_request, delete_donation_request, get_donation_request,
    get_donation_requests, update_donation_request,
};
use user_handlers::{create_user, get_user_by_email, get_users};
use volunteer_handlers::{create_volunteer, get_volunteers};

pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Config,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (this calls load_env_file internally)
    let config = load_config()?;

    setup_logging(&config)?;
    config.print_startup_info();

    // Setup database
    setup_database(&config.database.url).await?;
    let pool = create_database_pool(&config.database).await?;
    db::run_migrations(&pool).await?;

    let app_state = Arc::new(AppState {
        db_pool: pool.clone(),
        config: config.clone(),
    });

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    log::info!("Starting server at http://{}", bind_address);

    let workers = config.server.workers;
    let keep_alive = config.server.keep_alive;

    let mut server = HttpServer::new(move || {
        let cors = setup_cors(&config.security.allowed_origins);
        let security_headers = setup_security_headers(&config.security);

        App::new()
            .wrap(cors)
            .wrap(security_headers)
            .wrap(Logger::default())
            .wrap(Compress::default())
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().limit(config.security.max_request_size))
            .route("/", web::get().to(handlers::index))
            .route("/health", web::get().to(handlers::health))
            .service(
                web::scope("/users")
                    .route("", web::get().to(get_users))
                    .route("", web::post().to(create_user))
                    .route("/{email}", web::get().to(get_user_by_email)),
            )
            .service(
                web::scope("/volunteers")
                    .route("", web::get().to(get_volunteers))
                    .route("", web::post().to(create_volunteer)),
            )
            .service(
                web::scope("/donation-requests")
                    .route("", web::get().to(get_donation_requests))
                    .route("", web::post().to(create_donation_request))
                    .route("/{id}", web::get().to(get_donation_request))
                    .route("/{id}", web::patch().to(update_donation_request))
                    .route("/{id}", web::delete().to(delete_donation_request)),
            )
    })
    .keep_alive(Duration::from_secs(keep_alive));

    if let Some(workers) = workers {
        server = server.workers(workers);
    }

    server
        .bind(&bind_address)?
        .run()
        .await
        .context("Server failed to run")?;

    Ok(())
}

// ==================== HELPER FUNCTIONS ====================

fn setup_cors(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .supports_credentials()
        .max_age(3600);

    if allowed_origins.contains(&"*".to_string()) {
        log::warn!("Using wildcard CORS (*)");
        cors = Cors::default()
            .allow_any_origin()
            .allow_any_header()
            .allow_any_method();
    } else {
        for origin in allowed_origins {
            if origin.is_empty() {
                continue;
            }
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

fn setup_security_headers(config: &config::SecurityConfig) -> DefaultHeaders {
    let mut headers = DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("Referrer-Policy", "strict-origin-when-cross-origin"));

    if config.require_https {
        headers = headers.add((
            "Strict-Transport-Security",
            "max-age=31536000; includeSubDomains",
        ));
    }

    headers
}

fn setup_logging(config: &Config) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.logging.level.as_str()));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(())
}

async fn setup_database(database_url: &str) -> anyhow::Result<()> {
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        log::info!("Creating database: {}", database_url);
        Sqlite::create_database(database_url).await?;
    }
    Ok(())
}

async fn create_database_pool(
    db_config: &config::DatabaseConfig,
) -> anyhow::Result<SqlitePool> {
    let filename = db_config
        .url
        .strip_prefix("sqlite:")
        .unwrap_or(&db_config.url);

    let options = SqliteConnectOptions::new()
        .filename(filename)
        .create_if_missing(true);

    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(db_config.max_connections)
        .min_connections(db_config.min_connections)
        .acquire_timeout(Duration::from_secs(db_config.connect_timeout))
        .connect_with(options)
        .await?;

    Ok(pool)
}
