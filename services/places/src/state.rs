//! Application state shared across handlers

use sqlx::PgPool;

use crate::geocode::Geocoder;
use crate::jwt::JwtService;
use crate::repositories::{PlaceRepository, UserRepository};
use crate::routes::upload::UploadConfig;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: JwtService,
    pub geocoder: Geocoder,
    pub user_repository: UserRepository,
    pub place_repository: PlaceRepository,
    pub upload_config: UploadConfig,
}

#[cfg(test)]
impl AppState {
    /// Build a state around the given pool for router tests
    pub fn for_tests(pool: PgPool) -> Self {
        use crate::geocode::GeocoderConfig;
        use crate::jwt::JwtConfig;

        let jwt_service = JwtService::new(JwtConfig {
            secret: "test-secret".to_string(),
            token_expiry: 3600,
        });

        // Points at a closed port; tests never geocode
        let geocoder = Geocoder::new(&GeocoderConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 1,
        })
        .expect("failed to build geocoder");

        let upload_config = UploadConfig {
            upload_dir: std::path::PathBuf::from("uploads"),
            public_base_url: "http://localhost:5000".to_string(),
        };

        AppState {
            db_pool: pool.clone(),
            jwt_service,
            geocoder,
            user_repository: UserRepository::new(pool.clone()),
            place_repository: PlaceRepository::new(pool),
            upload_config,
        }
    }
}
