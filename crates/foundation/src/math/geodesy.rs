use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine distance (meters).
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_000.0;

/// Geodetic coordinates in degrees.
///
/// Range checks are the caller's job: latitude is expected in [-90, 90] and
/// longitude in [-180, 180].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Routing services and GeoJSON order coordinates as `[lng, lat]`.
    pub fn from_lng_lat(pair: [f64; 2]) -> Self {
        Self::new(pair[1], pair[0])
    }

    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Linear interpolation in degree space (not along the great circle).
    pub fn lerp(self, other: GeoPoint, t: f64) -> GeoPoint {
        GeoPoint::new(
            self.lat + (other.lat - self.lat) * t,
            self.lng + (other.lng - self.lng) * t,
        )
    }
}

/// Great-circle distance between two points (haversine, meters).
pub fn distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let sin_dphi = (d_phi / 2.0).sin();
    let sin_dlambda = (d_lambda / 2.0).sin();
    let h = sin_dphi * sin_dphi + phi1.cos() * phi2.cos() * sin_dlambda * sin_dlambda;

    // Rounding can push h a hair past 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);
    2.0 * EARTH_MEAN_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Initial bearing (forward azimuth) from `a` to `b`, in degrees [0, 360).
pub fn bearing_deg(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    normalize_deg(y.atan2(x).to_degrees())
}

/// Wraps an angle into [0, 360).
pub fn normalize_deg(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::{EARTH_MEAN_RADIUS_M, GeoPoint, bearing_deg, distance_m, normalize_deg};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn distance_to_self_is_zero() {
        for p in [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(52.52, 13.405),
            GeoPoint::new(-33.86, 151.21),
            GeoPoint::new(89.9, -179.9),
        ] {
            assert_eq!(distance_m(p, p), 0.0);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let berlin = GeoPoint::new(52.52, 13.405);
        let paris = GeoPoint::new(48.8566, 2.3522);
        assert_eq!(distance_m(berlin, paris), distance_m(paris, berlin));
        // Roughly 878 km.
        assert_close(distance_m(berlin, paris), 877_500.0, 2_000.0);
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let d = distance_m(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
        assert_close(d, 111_195.0, 1.0);
    }

    #[test]
    fn antipodal_points_are_half_circumference() {
        let d = distance_m(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 180.0));
        assert_close(d, std::f64::consts::PI * EARTH_MEAN_RADIUS_M, 1e-3);
    }

    #[test]
    fn cardinal_bearings() {
        let origin = GeoPoint::new(0.0, 0.0);
        assert_close(bearing_deg(origin, GeoPoint::new(1.0, 0.0)), 0.0, 1e-9);
        assert_close(bearing_deg(origin, GeoPoint::new(0.0, 1.0)), 90.0, 1e-9);
        assert_close(bearing_deg(origin, GeoPoint::new(-1.0, 0.0)), 180.0, 1e-9);
        assert_close(bearing_deg(origin, GeoPoint::new(0.0, -1.0)), 270.0, 1e-9);
    }

    #[test]
    fn normalize_wraps_into_range() {
        assert_eq!(normalize_deg(-90.0), 270.0);
        assert_eq!(normalize_deg(360.0), 0.0);
        assert_eq!(normalize_deg(725.0), 5.0);
        let tiny = normalize_deg(-1e-15);
        assert!((0.0..360.0).contains(&tiny));
    }

    #[test]
    fn lng_lat_order_round_trips() {
        let p = GeoPoint::from_lng_lat([13.405, 52.52]);
        assert_eq!(p, GeoPoint::new(52.52, 13.405));
        assert_eq!(p.to_lng_lat(), [13.405, 52.52]);
    }

    #[test]
    fn serializes_as_lat_lng_object() {
        let json = serde_json::to_string(&GeoPoint::new(1.5, -2.25)).unwrap();
        assert_eq!(json, r#"{"lat":1.5,"lng":-2.25}"#);
    }
}
