use foundation::math::{GeoPoint, Path};
use tracing::{info, warn};

use crate::provider::{RouteError, RouteProvider};

/// Where a planned path came from.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteSource {
    Road,
    /// The routing service was unavailable; the path is `[from, to]`.
    StraightLine(RouteError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    pub from: GeoPoint,
    pub to: GeoPoint,
    pub path: Path,
    pub source: RouteSource,
    /// Service-reported road distance when available, else the path length.
    pub distance_m: f64,
    pub duration_s: Option<f64>,
}

impl RoutePlan {
    pub fn straight_line(from: GeoPoint, to: GeoPoint, reason: RouteError) -> Self {
        let path = Path::straight_line(from, to);
        let distance_m = path.length_m();
        Self {
            from,
            to,
            path,
            source: RouteSource::StraightLine(reason),
            distance_m,
            duration_s: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, RouteSource::StraightLine(_))
    }
}

/// Asks `provider` for a road route, falling back to a straight line on any
/// failure. Never retries.
pub async fn plan_route<P>(provider: &P, from: GeoPoint, to: GeoPoint) -> RoutePlan
where
    P: RouteProvider + ?Sized,
{
    let result = match provider.route(from, to).await {
        Ok(response) => response.into_road_route(),
        Err(err) => Err(err),
    };

    match result {
        Ok(road) => {
            let distance_m = road.distance_m.unwrap_or_else(|| road.path.length_m());
            info!(
                provider = provider.name(),
                points = road.path.len(),
                distance_m,
                "road route planned"
            );
            RoutePlan {
                from,
                to,
                path: road.path,
                source: RouteSource::Road,
                distance_m,
                duration_s: road.duration_s,
            }
        }
        Err(err) => {
            warn!(provider = provider.name(), "{err}; using a straight line");
            RoutePlan::straight_line(from, to, err)
        }
    }
}

/// Identifies one route request within a session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouteTicket(u64);

impl RouteTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Generation counter that lets only the newest route request land.
///
/// Lookups can resolve out of order; a response is applied only if its ticket
/// is still the latest one issued.
#[derive(Debug, Default)]
pub struct RouteEpoch {
    latest: u64,
}

impl RouteEpoch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> RouteTicket {
        self.latest += 1;
        RouteTicket(self.latest)
    }

    /// Makes every outstanding ticket stale.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub fn is_current(&self, ticket: RouteTicket) -> bool {
        ticket.0 == self.latest
    }
}
