//! HTTP API over the search and load services

mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use handlers::{FilterParams, InfoResponse, LoadDataResponse, SearchParams};
pub use routes::router;
pub use state::AppState;
