//! BuckTrax prediction engine
//!
//! Converts geotagged trail-camera events and a weighted map of property
//! features into time-segmented sighting predictions, ranked movement
//! corridors and synthesized travel routes.

pub mod batch;
pub mod config;
pub mod distance;
pub mod error;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
