//! Repositories for database operations
//!
//! The place repository is the only code path that writes `places.creator`,
//! a user's `place_ids`, or deletes a place row.

pub mod place;
pub mod user;

pub use place::PlaceRepository;
pub use user::UserRepository;
