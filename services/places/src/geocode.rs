//! Geocoding client
//!
//! Resolves a street address to a coordinate through a Nominatim-compatible
//! search endpoint. The call carries an explicit timeout so a slow provider
//! cannot hang place creation; no result, a non-success status, a parse
//! failure, and a timeout all surface as one failure mode. No retries.

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;
use tracing::error;

use crate::models::Coordinates;

const USER_AGENT: &str = "places-app/1.0";

/// Geocoder configuration
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Base URL of the Nominatim-compatible service
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl GeocoderConfig {
    /// Create a new GeocoderConfig from environment variables
    ///
    /// # Environment Variables
    /// - `GEOCODER_BASE_URL`: Search endpoint base URL (default: Nominatim)
    /// - `GEOCODER_TIMEOUT_SECONDS`: Request timeout in seconds (default: 10)
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("GEOCODER_BASE_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string());

        let timeout_seconds = std::env::var("GEOCODER_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        Ok(GeocoderConfig {
            base_url,
            timeout_seconds,
        })
    }
}

/// One entry of a Nominatim search response; coordinates arrive as strings
#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
}

/// Geocoding client
#[derive(Clone)]
pub struct Geocoder {
    client: reqwest::Client,
    base_url: String,
}

impl Geocoder {
    /// Create a new geocoding client
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Geocoder {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve an address to a coordinate
    pub async fn resolve(&self, address: &str) -> Result<Coordinates> {
        let url = format!("{}/search", self.base_url);
        let results: Vec<SearchResult> = self
            .client
            .get(&url)
            .query(&[("format", "json"), ("q", address), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| {
                error!("Geocoding response parse error: {}", e);
                anyhow::anyhow!("Could not get location for the specified address")
            })?;

        first_coordinates(results)
    }
}

/// Pull the coordinate out of a search response
fn first_coordinates(results: Vec<SearchResult>) -> Result<Coordinates> {
    let first = results
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("Could not find location for the specified address"))?;

    let lat = first
        .lat
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid latitude in geocoding response"))?;
    let lng = first
        .lon
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid longitude in geocoding response"))?;

    Ok(Coordinates { lat, lng })
}
