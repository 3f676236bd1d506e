//! Web layer for the fuel route planner.
//!
//! Serves the map page and the JSON planning endpoint.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
