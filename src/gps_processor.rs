use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Point {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance in km on a sphere of radius 6371 km.
    pub fn haversine_distance_km(&self, other: &Point) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

impl From<Point> for geo_types::Point<f64> {
    fn from(point: Point) -> Self {
        geo_types::Point::new(point.longitude, point.latitude)
    }
}

/// A single reading delivered by a position source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "accuracy")]
    pub accuracy_m: f64,
    pub timestamp_ms: i64,
}

impl Fix {
    pub fn point(&self) -> Point {
        Point::new(self.latitude, self.longitude)
    }
}

/// Turns a stream of fixes into speeds, one fix at a time.
pub struct VelocityEstimator {
    last_fix: Option<Fix>,
}

impl VelocityEstimator {
    pub fn new() -> Self {
        VelocityEstimator { last_fix: None }
    }

    pub fn last_fix(&self) -> Option<&Fix> {
        self.last_fix.as_ref()
    }

    pub fn reset(&mut self) {
        self.last_fix = None;
    }

    /// Speed in km/h between the previous fix and `curr_fix`. Returns `None`
    /// for the first fix since there is nothing to measure against.
    pub fn estimate(&mut self, curr_fix: &Fix) -> Option<f64> {
        let velocity = self.last_fix.as_ref().map(|last_fix| {
            let time_diff_in_sec = (curr_fix.timestamp_ms - last_fix.timestamp_ms) as f64 / 1000.;
            if time_diff_in_sec <= 0. {
                // NOTE: duplicated or out of order timestamps. Dividing would
                // give inf/NaN or a negative speed, so we report 0 instead.
                debug!(
                    "[gps_processor] non-positive time diff: {}s, velocity clamped to 0",
                    time_diff_in_sec
                );
                0.
            } else {
                let distance_km = last_fix.point().haversine_distance_km(&curr_fix.point());
                distance_km / time_diff_in_sec * 3600.
            }
        });
        self.last_fix = Some(curr_fix.clone());
        velocity
    }
}
