//! Place model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Geographic coordinate resolved from an address
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Place entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub address: String,
    pub location: Coordinates,
    pub image_url: String,
    /// Owning user id, immutable after creation
    pub creator: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for inserting a place, coordinates already resolved
#[derive(Debug, Clone)]
pub struct NewPlace {
    pub title: String,
    pub description: String,
    pub address: String,
    pub location: Coordinates,
    pub image_url: String,
    pub creator: Uuid,
}

/// Request for place creation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaceRequest {
    pub title: String,
    pub description: String,
    pub address: String,
    #[serde(default)]
    pub image_url: String,
}

/// Request for place update
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePlaceRequest {
    pub title: String,
    pub description: String,
}

/// Response wrapper for a single place
#[derive(Debug, Clone, Serialize)]
pub struct PlaceResponse {
    pub place: Place,
}

/// Response wrapper for place listings
#[derive(Debug, Clone, Serialize)]
pub struct PlacesResponse {
    pub places: Vec<Place>,
}
