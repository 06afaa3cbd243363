use crate::geo::LatLon;
use serde::{Deserialize, Serialize};

/// One record from the FAA Digital Obstacle File.
#[derive(Clone, Debug, Builder, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: String,
    pub city: String,
    pub lat: f64,
    pub lon: f64,
    pub agl: u32,
}

impl Obstacle {
    pub fn latlon(&self) -> LatLon {
        LatLon::new(self.lat, self.lon)
    }
}

/// Thresholds for one generation pass.
#[derive(Clone, Copy, Debug)]
pub struct FilterCriteria {
    pub center: LatLon,
    pub max_distance_nm: f64,
    pub min_agl: u32,
}

/// Obstacles above the AGL floor (strict) and within the search radius
/// (inclusive), in input order.
pub fn filter_obstacles<'a>(
    obstacles: &'a [Obstacle],
    criteria: &FilterCriteria,
) -> Vec<&'a Obstacle> {
    obstacles
        .iter()
        .filter(|o| {
            o.agl > criteria.min_agl
                && criteria.center.distance_nm(o.latlon()) <= criteria.max_distance_nm
        })
        .collect()
}
