use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod error;
mod geocode;
mod jwt;
mod middleware;
mod models;
mod repositories;
mod routes;
mod state;
mod validation;

use common::database;
use sqlx::migrate::Migrator;

use crate::geocode::{Geocoder, GeocoderConfig};
use crate::jwt::{JwtConfig, JwtService};
use crate::repositories::{PlaceRepository, UserRepository};
use crate::routes::upload::UploadConfig;
use crate::state::AppState;

static MIGRATOR: Migrator = sqlx::migrate!();

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting places service");

    // Initialize database connection pool
    let db_config = database::DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool, &MIGRATOR).await?;

    // Initialize JWT service
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config);

    // Initialize geocoding client
    let geocoder_config = GeocoderConfig::from_env()?;
    let geocoder = Geocoder::new(&geocoder_config)?;

    let upload_config = UploadConfig::from_env()?;

    let user_repository = UserRepository::new(pool.clone());
    let place_repository = PlaceRepository::new(pool.clone());

    let app_state = AppState {
        db_pool: pool,
        jwt_service,
        geocoder,
        user_repository,
        place_repository,
        upload_config,
    };

    info!("Places service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);
    let address = format!("0.0.0.0:{}", port);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Places service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
