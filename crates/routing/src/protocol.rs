//! Wire types for the OSRM `route/v1` HTTP API with GeoJSON geometries.
//!
//! Only the fields the drive animation needs are modelled; unknown fields
//! (legs, waypoints, weights) are ignored by serde.

use foundation::math::{GeoPoint, Path};
use serde::{Deserialize, Serialize};

use crate::provider::RouteError;

/// Public OSRM demo server.
pub const DEFAULT_ROUTER_URL: &str = "https://router.project-osrm.org";

/// Builds the driving route URL for `from` -> `to`.
///
/// OSRM takes coordinates as `lng,lat` pairs separated by `;`.
pub fn route_url(base_url: &str, from: GeoPoint, to: GeoPoint) -> String {
    format!(
        "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson",
        base_url.trim_end_matches('/'),
        from.lng,
        from.lat,
        to.lng,
        to.lat
    )
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    /// `"Ok"` on success; OSRM error codes (`NoRoute`, `InvalidQuery`, ...)
    /// otherwise. Some proxies omit it entirely.
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<RouteCandidate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteCandidate {
    pub geometry: LineGeometry,
    /// Road distance in meters, as reported by the service.
    #[serde(default)]
    pub distance: Option<f64>,
    /// Expected travel time in seconds, as reported by the service.
    #[serde(default)]
    pub duration: Option<f64>,
}

/// GeoJSON `LineString` geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineGeometry {
    #[serde(default)]
    pub coordinates: Vec<[f64; 2]>,
}

/// A usable road route extracted from a response.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadRoute {
    pub path: Path,
    pub distance_m: Option<f64>,
    pub duration_s: Option<f64>,
}

impl RouteResponse {
    pub fn from_json_str(s: &str) -> Result<Self, RouteError> {
        serde_json::from_str(s).map_err(|e| RouteError::Malformed(e.to_string()))
    }

    /// First candidate with at least two coordinates, enough to drive along.
    pub fn into_road_route(self) -> Result<RoadRoute, RouteError> {
        if let Some(code) = self.code.as_deref() {
            if !code.eq_ignore_ascii_case("ok") {
                let detail = match self.message {
                    Some(msg) => format!("{code}: {msg}"),
                    None => code.to_string(),
                };
                return Err(RouteError::Service(detail));
            }
        }

        let candidate = self
            .routes
            .into_iter()
            .find(|r| r.geometry.coordinates.len() >= 2)
            .ok_or(RouteError::Empty)?;

        let path = candidate
            .geometry
            .coordinates
            .iter()
            .map(|pair| GeoPoint::from_lng_lat(*pair))
            .collect();

        Ok(RoadRoute {
            path,
            distance_m: candidate.distance,
            duration_s: candidate.duration,
        })
    }
}
