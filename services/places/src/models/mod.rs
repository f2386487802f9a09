//! Places service models

pub mod place;
pub mod user;

// Re-export for convenience
pub use place::{
    Coordinates, CreatePlaceRequest, NewPlace, Place, PlaceResponse, PlacesResponse,
    UpdatePlaceRequest,
};
pub use user::{
    AuthResponse, LoginRequest, NewUser, SignupRequest, User, UserResponse, UsersResponse,
};
