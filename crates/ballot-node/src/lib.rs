pub mod api;
pub mod config;
mod error;

pub use api::{router, AppState};
pub use config::{Args, Candidate};
pub use error::ApiError;
