//! Prediction engine services for the BuckTrax platform

pub mod corridor;
pub mod feature_weight;
pub mod prediction;
pub mod route;
pub mod season;
pub mod sighting;
pub mod time_segment;

pub use corridor::CorridorMiner;
pub use feature_weight::FeatureWeightService;
pub use prediction::{PredictionRequest, PredictionService};
pub use route::RouteSynthesizer;
pub use season::SeasonService;
pub use sighting::SightingAggregator;
pub use time_segment::TimeSegmentPredictor;
