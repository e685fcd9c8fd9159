//! Shared types and models for the BuckTrax movement-prediction platform
//!
//! This crate contains the domain vocabulary shared between the prediction
//! engine and the collaborators that persist or render its results.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
