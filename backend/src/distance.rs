//! Great-circle distance and feature geometry helpers

use geo::{Centroid, Contains, Distance, Haversine, LineString, Point, Polygon};
use shared::{FeatureGeometry, GpsCoordinates};

fn to_point(coordinates: &GpsCoordinates) -> Point<f64> {
    Point::new(coordinates.longitude, coordinates.latitude)
}

fn to_polygon(ring: &[GpsCoordinates]) -> Polygon<f64> {
    let exterior: LineString<f64> = ring
        .iter()
        .map(|c| (c.longitude, c.latitude))
        .collect::<Vec<_>>()
        .into();
    Polygon::new(exterior, vec![])
}

/// Haversine distance between two points in meters
pub fn haversine_meters(a: &GpsCoordinates, b: &GpsCoordinates) -> f64 {
    Haversine::distance(to_point(a), to_point(b))
}

/// Representative point of a feature: the point itself or the polygon centroid
pub fn feature_anchor(geometry: &FeatureGeometry) -> Option<GpsCoordinates> {
    match geometry {
        FeatureGeometry::Point { coordinates } => Some(*coordinates),
        FeatureGeometry::Polygon { ring } => {
            if ring.len() < 3 {
                return ring.first().copied();
            }
            to_polygon(ring)
                .centroid()
                .map(|p| GpsCoordinates::new(p.y(), p.x()))
        }
    }
}

/// Distance in meters from a location to a feature.
///
/// Locations inside a polygon feature are at distance zero.
pub fn distance_to_feature(location: &GpsCoordinates, geometry: &FeatureGeometry) -> Option<f64> {
    if let FeatureGeometry::Polygon { ring } = geometry {
        if ring.len() >= 3 && to_polygon(ring).contains(&to_point(location)) {
            return Some(0.0);
        }
    }
    feature_anchor(geometry).map(|anchor| haversine_meters(location, &anchor))
}
