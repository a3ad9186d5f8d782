//! Reference-vehicle durations for the saving analysis.

use er_core::GeoPoint;
use er_spatial::{DurationLookup, DurationSource};

/// Straight-line distance at a constant speed.
///
/// Stands in for a live routing service when none is configured.
pub struct StraightLineSource {
    metres_per_sec: f64,
}

impl StraightLineSource {
    pub fn new(speed_kmh: f64) -> Self {
        Self { metres_per_sec: speed_kmh / 3.6 }
    }
}

impl DurationSource for StraightLineSource {
    fn lookup(&mut self, from: GeoPoint, to: GeoPoint) -> DurationLookup {
        if !(self.metres_per_sec.is_finite() && self.metres_per_sec > 0.0) {
            return DurationLookup::Unavailable;
        }
        DurationLookup::Seconds(from.distance_m(to) / self.metres_per_sec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_is_distance_over_speed() {
        let mut src = StraightLineSource::new(36.0);
        let a = GeoPoint::new(126.90, 37.50);
        let b = GeoPoint::new(126.90, 37.51);
        let DurationLookup::Seconds(d) = src.lookup(a, b) else { panic!("unavailable") };
        // 36 km/h = 10 m/s.
        assert!((d - a.distance_m(b) / 10.0).abs() < 1e-9);
        assert!(d > 100.0 && d < 120.0, "{d}");
    }

    #[test]
    fn zero_speed_is_unavailable() {
        let mut src = StraightLineSource::new(0.0);
        let p = GeoPoint::new(126.9, 37.5);
        assert_eq!(src.lookup(p, p), DurationLookup::Unavailable);
    }
}
