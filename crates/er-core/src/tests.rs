//! Unit tests for er-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinel() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert!(!EdgeId::INVALID.is_valid());
        assert!(EdgeId(0).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId#7");
    }
}

#[cfg(test)]
mod geo {
    use crate::GeoPoint;

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(126.95, 37.55);
        assert!(p.distance_m(p) < 1e-6);
    }

    #[test]
    fn one_degree_latitude() {
        let a = GeoPoint::new(126.9, 37.0);
        let b = GeoPoint::new(126.9, 38.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }
}

#[cfg(test)]
mod config {
    use crate::{ScoringMode, TrialConfig};

    #[test]
    fn defaults_match_calibration() {
        let c = TrialConfig::default();
        assert_eq!(c.num_trials, 50);
        assert_eq!(c.seed, 42);
        assert_eq!(c.max_time_diff, 60.0);
        assert_eq!(c.weight_factor, 0.692);
        assert_eq!(c.alpha, 0.7);
        assert_eq!(c.mode, ScoringMode::TravelTime);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_alpha_out_of_range() {
        let c = TrialConfig { alpha: 1.5, ..TrialConfig::default() };
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_weight_factor() {
        let c = TrialConfig { weight_factor: 0.0, ..TrialConfig::default() };
        assert!(c.validate().is_err());
    }

    #[test]
    fn unbounded_time_window_is_allowed() {
        let c = TrialConfig { max_time_diff: f64::INFINITY, ..TrialConfig::default() };
        assert!(c.validate().is_ok());
    }
}

#[cfg(test)]
mod rng {
    use crate::TrialRng;

    #[test]
    fn same_seed_same_sequence() {
        let goals = ["a", "b", "c", "d", "e"];
        let mut r1 = TrialRng::new(42);
        let mut r2 = TrialRng::new(42);
        let s1: Vec<_> = (0..20).map(|_| *r1.choose(&goals).unwrap()).collect();
        let s2: Vec<_> = (0..20).map(|_| *r2.choose(&goals).unwrap()).collect();
        assert_eq!(s1, s2);
    }

    #[test]
    fn choose_from_empty_is_none() {
        let mut r = TrialRng::new(1);
        let empty: [u32; 0] = [];
        assert!(r.choose(&empty).is_none());
    }
}
