//! Partner catalogue, access applications and partner suggestions for a
//! resource library program.

pub mod accounts;
pub mod applications;
pub mod authorizations;
pub mod config;
pub mod error;
pub mod messages;
pub mod resources;
pub mod router;
pub mod stats;
pub mod store;
pub mod telemetry;

pub use router::{library_router, LibraryState};
