//! Great-circle proximity filtering
//!
//! Distances use the Haversine formula on a sphere of radius
//! [`EARTH_RADIUS_KM`]. A candidate is inside the search area when its
//! distance is `<=` the radius.
//!
//! Results keep the order of the input candidates. They are **not** sorted
//! by distance.

use super::charger::ChargerRecord;
use crate::shared::errors::{DomainError, DomainResult};

/// Mean Earth radius
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Radius used when the caller does not pass one
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// A validated query location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> DomainResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::InvalidQuery(
                "latitude must be a number within [-90, 90]".into(),
            ));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidQuery(
                "longitude must be a number within [-180, 180]".into(),
            ));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse raw query-string values.
    pub fn parse(latitude: Option<&str>, longitude: Option<&str>) -> DomainResult<Self> {
        let latitude = parse_number("latitude", latitude)?;
        let longitude = parse_number("longitude", longitude)?;
        Self::new(latitude, longitude)
    }
}

/// Haversine distance in kilometres between two `(lat, lon)` pairs in degrees.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1 for near-antipodal points.
    let a = a.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Outcome of [`ProximityFilter::within`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProximityMatches {
    /// Candidates inside the radius, in input order
    pub records: Vec<ChargerRecord>,
    /// Candidates dropped because their coordinates were not finite
    pub skipped: usize,
}

/// Search area: a centre point and a radius in kilometres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityFilter {
    origin: GeoPoint,
    radius_km: f64,
}

impl ProximityFilter {
    /// `radius_km` falls back to [`DEFAULT_RADIUS_KM`]. A negative radius is
    /// accepted and matches nothing.
    pub fn new(origin: GeoPoint, radius_km: Option<f64>) -> DomainResult<Self> {
        let radius_km = radius_km.unwrap_or(DEFAULT_RADIUS_KM);
        if !radius_km.is_finite() {
            return Err(DomainError::InvalidQuery(
                "radius must be a finite number".into(),
            ));
        }
        Ok(Self { origin, radius_km })
    }

    /// Build from raw query-string values. An absent or blank radius uses
    /// `default_radius_km`.
    pub fn from_query(
        latitude: Option<&str>,
        longitude: Option<&str>,
        radius: Option<&str>,
        default_radius_km: f64,
    ) -> DomainResult<Self> {
        let origin = GeoPoint::parse(latitude, longitude)?;
        let radius_km = match radius.map(str::trim).filter(|r| !r.is_empty()) {
            Some(raw) => parse_number("radius", Some(raw))?,
            None => default_radius_km,
        };
        Self::new(origin, Some(radius_km))
    }

    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Distance from the origin, or `None` when the record's coordinates
    /// are not finite.
    pub fn distance_to(&self, record: &ChargerRecord) -> Option<f64> {
        if !record.has_finite_coordinates() {
            return None;
        }
        Some(haversine_km(
            (self.origin.latitude, self.origin.longitude),
            (record.latitude, record.longitude),
        ))
    }

    pub fn contains(&self, record: &ChargerRecord) -> bool {
        self.distance_to(record)
            .is_some_and(|distance| distance <= self.radius_km)
    }

    pub fn within<I>(&self, candidates: I) -> ProximityMatches
    where
        I: IntoIterator<Item = ChargerRecord>,
    {
        let mut matches = ProximityMatches::default();
        for candidate in candidates {
            match self.distance_to(&candidate) {
                None => matches.skipped += 1,
                Some(distance) if distance <= self.radius_km => matches.records.push(candidate),
                Some(_) => {}
            }
        }
        matches
    }
}

/// Free-function form: validate the query point and radius, then filter.
pub fn within<I>(
    query_lat: f64,
    query_lon: f64,
    radius_km: f64,
    candidates: I,
) -> DomainResult<ProximityMatches>
where
    I: IntoIterator<Item = ChargerRecord>,
{
    let filter = ProximityFilter::new(GeoPoint::new(query_lat, query_lon)?, Some(radius_km))?;
    Ok(filter.within(candidates))
}

fn parse_number(name: &str, raw: Option<&str>) -> DomainResult<f64> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| DomainError::InvalidQuery(format!("{} is required", name)))?;
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DomainError::InvalidQuery(format!("{} must be a finite number", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::charger::{ChargerStatus, NewCharger};

    fn charger_at(name: &str, latitude: f64, longitude: f64) -> ChargerRecord {
        ChargerRecord::new(
            "owner",
            NewCharger {
                name: name.into(),
                location: None,
                latitude,
                longitude,
                status: ChargerStatus::Active,
                power_output_kw: None,
                connector_type: None,
                owner_id: None,
            },
        )
    }

    fn names(matches: &ProximityMatches) -> Vec<&str> {
        matches.records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn one_degree_of_longitude_on_equator() {
        let d = haversine_km((0.0, 0.0), (0.0, 1.0));
        assert!((d - 111.19).abs() < 0.01, "got {}", d);
    }

    #[test]
    fn equator_scenario_includes_near_and_excludes_far() {
        let candidates = vec![charger_at("A", 0.0, 0.05), charger_at("B", 0.0, 1.0)];
        let matches = within(0.0, 0.0, 10.0, candidates).unwrap();
        assert_eq!(names(&matches), vec!["A"]);
        assert_eq!(matches.skipped, 0);

        let d_a = haversine_km((0.0, 0.0), (0.0, 0.05));
        assert!((d_a - 5.56).abs() < 0.01, "got {}", d_a);
    }

    #[test]
    fn query_point_itself_is_always_included() {
        for radius in [0.0, 0.001, 10.0, 20_000.0] {
            for (lat, lon) in [(0.0, 0.0), (41.31, 69.24), (-89.9, 179.9), (90.0, -180.0)] {
                let matches = within(lat, lon, radius, vec![charger_at("self", lat, lon)]).unwrap();
                assert_eq!(matches.records.len(), 1, "({}, {}) r={}", lat, lon, radius);
            }
        }
    }

    #[test]
    fn near_antipodal_candidate_has_a_finite_distance() {
        let d = haversine_km((-87.5, 0.0), (87.5, 180.0));
        assert!(d.is_finite(), "got {}", d);
        assert!(d <= 20_100.0, "got {}", d);

        let matches = within(-87.5, 0.0, 20_100.0, vec![charger_at("far", 87.5, 180.0)]).unwrap();
        assert_eq!(names(&matches), vec!["far"]);
        assert_eq!(matches.skipped, 0);
    }

    #[test]
    fn exact_antipodes_are_half_the_circumference() {
        for (from, to) in [((0.0, 0.0), (0.0, 180.0)), ((45.0, 30.0), (-45.0, -150.0))] {
            let d = haversine_km(from, to);
            assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6, "got {}", d);
        }
    }

    #[test]
    fn boundary_distance_is_inclusive() {
        let origin = GeoPoint::new(48.8566, 2.3522).unwrap();
        let candidate = charger_at("edge", 48.9, 2.4);
        let exact = ProximityFilter::new(origin, Some(0.0))
            .unwrap()
            .distance_to(&candidate)
            .unwrap();

        let at_edge = ProximityFilter::new(origin, Some(exact)).unwrap();
        assert!(at_edge.contains(&candidate));

        let just_short = ProximityFilter::new(origin, Some(exact * (1.0 - 1e-9))).unwrap();
        assert!(!just_short.contains(&candidate));
    }

    #[test]
    fn zero_radius_keeps_only_exact_point() {
        let candidates = vec![
            charger_at("here", 10.0, 20.0),
            charger_at("close", 10.0, 20.000_001),
            charger_at("also-here", 10.0, 20.0),
        ];
        let matches = within(10.0, 20.0, 0.0, candidates).unwrap();
        assert_eq!(names(&matches), vec!["here", "also-here"]);
    }

    #[test]
    fn negative_radius_matches_nothing() {
        let matches = within(10.0, 20.0, -1.0, vec![charger_at("here", 10.0, 20.0)]).unwrap();
        assert!(matches.records.is_empty());
    }

    #[test]
    fn non_finite_candidates_are_skipped_and_counted() {
        let candidates = vec![
            charger_at("nan", f64::NAN, 0.0),
            charger_at("ok", 0.0, 0.01),
            charger_at("inf", 0.0, f64::INFINITY),
        ];
        let matches = within(0.0, 0.0, 10.0, candidates).unwrap();
        assert_eq!(names(&matches), vec!["ok"]);
        assert_eq!(matches.skipped, 2);
    }

    #[test]
    fn results_keep_input_order() {
        let candidates = vec![
            charger_at("far", 0.0, 0.08),
            charger_at("near", 0.0, 0.01),
            charger_at("mid", 0.0, 0.04),
        ];
        let matches = within(0.0, 0.0, 10.0, candidates).unwrap();
        assert_eq!(names(&matches), vec!["far", "near", "mid"]);
    }

    #[test]
    fn non_numeric_query_is_invalid_not_empty() {
        let err = ProximityFilter::from_query(Some("abc"), Some("69.2"), None, DEFAULT_RADIUS_KM)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidQuery(_)));

        let err = ProximityFilter::from_query(Some("41.3"), Some("east"), None, DEFAULT_RADIUS_KM)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidQuery(_)));

        // A valid query with nothing nearby is a success with no records.
        let filter =
            ProximityFilter::from_query(Some("41.3"), Some("69.2"), None, DEFAULT_RADIUS_KM)
                .unwrap();
        assert!(filter.within(Vec::new()).records.is_empty());
    }

    #[test]
    fn missing_or_non_finite_query_values_are_invalid() {
        for (lat, lon) in [
            (None, Some("1")),
            (Some("1"), None),
            (Some(""), Some("1")),
            (Some("NaN"), Some("1")),
            (Some("1"), Some("inf")),
            (Some("91"), Some("1")),
            (Some("1"), Some("-181")),
        ] {
            assert!(
                matches!(
                    GeoPoint::parse(lat, lon),
                    Err(DomainError::InvalidQuery(_))
                ),
                "{:?}/{:?}",
                lat,
                lon
            );
        }
    }

    #[test]
    fn radius_defaults_and_rejects_garbage() {
        let filter = ProximityFilter::from_query(Some("0"), Some("0"), None, 10.0).unwrap();
        assert_eq!(filter.radius_km(), 10.0);

        let filter = ProximityFilter::from_query(Some("0"), Some("0"), Some(" "), 7.5).unwrap();
        assert_eq!(filter.radius_km(), 7.5);

        let filter = ProximityFilter::from_query(Some("0"), Some("0"), Some("2.5"), 10.0).unwrap();
        assert_eq!(filter.radius_km(), 2.5);

        assert!(matches!(
            ProximityFilter::from_query(Some("0"), Some("0"), Some("far"), 10.0),
            Err(DomainError::InvalidQuery(_))
        ));
    }
}
