//! Domain models for the BuckTrax platform

mod classification;
mod corridor;
mod feature;
mod prediction;
mod route;
mod season;
mod sighting;

pub use classification::*;
pub use corridor::*;
pub use feature::*;
pub use prediction::*;
pub use route::*;
pub use season::*;
pub use sighting::*;
