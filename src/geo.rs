use lazy_static::lazy_static;
use regex::Regex;
use std::f64::consts::PI;

/// Mean earth radius in nautical miles, for distance thresholds.
pub const EARTH_RADIUS_NM: f64 = 3440.065;
/// Mean earth radius in statute miles, for the ring radius conversion.
pub const EARTH_RADIUS_SM: f64 = 3958.8;
/// Segments used to approximate a circle as a polygon (one vertex per 10 degrees).
pub const RING_SEGMENTS: usize = 36;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatLon(f64, f64);

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        LatLon(lat, lon)
    }

    pub fn lat(self) -> f64 {
        self.0
    }

    pub fn lon(self) -> f64 {
        self.1
    }

    //Ex: 46 55 59.00N  096 48 57.00W
    pub fn from_dof(lat: &str, lon: &str) -> Option<Self> {
        fn to_dd(d: f64, m: f64, s: f64) -> f64 {
            d + m / 60.0 + s / 3600.0
        }

        lazy_static! {
            static ref DMS_REGEX: Regex = Regex::new(r"(\d+)\s+(\d+)\s+(\d+\.?\d*)([NSEW])").unwrap();
        }

        fn parse_dms(x: &str) -> Option<f64> {
            DMS_REGEX.captures(x).and_then(|cap| {
                let (d, m, s, dir) = (&cap[1], &cap[2], &cap[3], &cap[4]);
                let (d, m, s) = (d.parse().ok()?, m.parse().ok()?, s.parse().ok()?);
                let mut dd = to_dd(d, m, s);
                if dir == "S" || dir == "W" {
                    dd = -dd;
                }
                Some(dd)
            })
        }

        match (parse_dms(lat), parse_dms(lon)) {
            (Some(lat), Some(lon)) => Some(LatLon(lat, lon)),
            _ => None,
        }
    }

    /// Great-circle distance in nautical miles (haversine).
    pub fn distance_nm(self, other: LatLon) -> f64 {
        let d_lat = (other.0 - self.0).to_radians();
        let d_lon = (other.1 - self.1).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.0.to_radians().cos() * other.0.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_NM * c
    }

    /// Destination point at `bearing` radians (0 = north, clockwise) and
    /// angular distance `d_rad` radians from this point.
    ///
    /// Longitude is left unnormalized past +/-180 so rings spanning the
    /// antimeridian stay contiguous; Google Earth accepts unwrapped values.
    pub fn destination(self, bearing: f64, d_rad: f64) -> LatLon {
        let lat = self.0.to_radians();
        let lon = self.1.to_radians();
        let new_lat = (lat.sin() * d_rad.cos() + lat.cos() * d_rad.sin() * bearing.cos()).asin();
        let new_lon = lon
            + (bearing.sin() * d_rad.sin() * lat.cos()).atan2(d_rad.cos() - lat.sin() * new_lat.sin());
        LatLon(new_lat.to_degrees(), new_lon.to_degrees())
    }
}

/// Boundary of a circle of `radius_sm` statute miles around `center`.
///
/// Returns RING_SEGMENTS + 1 points; the final step reuses bearing 0 rather
/// than 360 degrees, so the closing point is identical to the first.
pub fn circle_points(center: LatLon, radius_sm: f64) -> Vec<LatLon> {
    let d_rad = radius_sm / EARTH_RADIUS_SM;
    (0..=RING_SEGMENTS)
        .map(|i| {
            let step = if i == RING_SEGMENTS { 0 } else { i };
            let bearing = step as f64 / RING_SEGMENTS as f64 * 2.0 * PI;
            center.destination(bearing, d_rad)
        })
        .collect()
}
