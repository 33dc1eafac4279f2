use foundation::bounds::GeoBounds;
use foundation::math::{GeoPoint, Path};
use session::{CameraFollow, Endpoint, MapView};
use tracing::{debug, info, trace};

/// A map that exists only in the log. Keeps the last car pose so the host
/// can report where the drive ended.
#[derive(Debug, Default)]
pub struct TracingMap {
    car: Option<GeoPoint>,
    heading_deg: Option<f64>,
    track_points: usize,
    moves: u64,
}

impl TracingMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn car(&self) -> Option<GeoPoint> {
        self.car
    }

    pub fn heading_deg(&self) -> Option<f64> {
        self.heading_deg
    }

    pub fn track_points(&self) -> usize {
        self.track_points
    }

    /// Number of `place_car` calls so far.
    pub fn moves(&self) -> u64 {
        self.moves
    }
}

impl MapView for TracingMap {
    fn show_endpoint(&mut self, endpoint: Endpoint, point: GeoPoint) {
        info!(
            endpoint = endpoint.as_str(),
            lat = point.lat,
            lng = point.lng,
            "marker"
        );
    }

    fn clear_endpoint(&mut self, endpoint: Endpoint) {
        debug!(endpoint = endpoint.as_str(), "marker removed");
    }

    fn draw_track(&mut self, path: &Path) {
        self.track_points = path.len();
        info!(points = path.len(), length_m = path.length_m(), "track");
    }

    fn clear_track(&mut self) {
        self.track_points = 0;
        debug!("track removed");
    }

    fn place_car(&mut self, point: GeoPoint, heading_deg: Option<f64>) {
        self.car = Some(point);
        self.heading_deg = heading_deg;
        self.moves += 1;
        trace!(lat = point.lat, lng = point.lng, heading = ?heading_deg, "car");
    }

    fn remove_car(&mut self) {
        self.car = None;
        self.heading_deg = None;
        debug!("car removed");
    }

    fn fit_bounds(&mut self, bounds: GeoBounds) {
        debug!(
            south = bounds.south,
            west = bounds.west,
            north = bounds.north,
            east = bounds.east,
            "fit bounds"
        );
    }

    fn follow(&mut self, camera: CameraFollow) {
        trace!(
            lat = camera.center.lat,
            lng = camera.center.lng,
            bearing = ?camera.bearing_deg,
            pitch = ?camera.pitch_deg,
            "camera"
        );
    }
}
