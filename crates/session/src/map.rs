use foundation::bounds::GeoBounds;
use foundation::math::{GeoPoint, Path};
use serde::{Deserialize, Serialize};

/// Which end of the drive a marker or click refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    pub fn as_str(self) -> &'static str {
        match self {
            Endpoint::Start => "start",
            Endpoint::End => "end",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" | "from" | "origin" => Some(Endpoint::Start),
            "end" | "to" | "destination" => Some(Endpoint::End),
            _ => None,
        }
    }
}

/// The basemap library rendering the widget.
///
/// Both variants draw the same markers and track; they differ in what the
/// camera can do.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapBackend {
    /// Raster tiles, north-up only: the camera can pan but not rotate or tilt.
    Leaflet,
    /// Vector tiles with bearing and pitch.
    #[default]
    MapLibre,
}

impl MapBackend {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "leaflet" => Some(MapBackend::Leaflet),
            "maplibre" | "maplibre-gl" | "mapbox" => Some(MapBackend::MapLibre),
            _ => None,
        }
    }

    pub fn supports_rotation(self) -> bool {
        matches!(self, MapBackend::MapLibre)
    }
}

/// Camera request issued while the car moves.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct CameraFollow {
    pub center: GeoPoint,
    /// None on backends that stay north-up.
    pub bearing_deg: Option<f64>,
    pub pitch_deg: Option<f64>,
}

impl CameraFollow {
    pub fn for_backend(
        backend: MapBackend,
        center: GeoPoint,
        heading_deg: Option<f64>,
        pitch_deg: f64,
    ) -> Self {
        if backend.supports_rotation() {
            CameraFollow {
                center,
                bearing_deg: heading_deg,
                pitch_deg: Some(pitch_deg),
            }
        } else {
            CameraFollow {
                center,
                bearing_deg: None,
                pitch_deg: None,
            }
        }
    }
}

/// The map-rendering collaborator. The session decides what to show; the
/// implementation decides how.
pub trait MapView {
    fn show_endpoint(&mut self, endpoint: Endpoint, point: GeoPoint);
    fn clear_endpoint(&mut self, endpoint: Endpoint);
    fn draw_track(&mut self, path: &Path);
    fn clear_track(&mut self);
    /// `heading_deg` is a compass bearing for rotating the car glyph.
    fn place_car(&mut self, point: GeoPoint, heading_deg: Option<f64>);
    fn remove_car(&mut self);
    fn fit_bounds(&mut self, bounds: GeoBounds);
    fn follow(&mut self, camera: CameraFollow);
}

/// Map that draws nothing, for headless sessions.
#[derive(Debug, Default, Copy, Clone)]
pub struct NullMap;

impl MapView for NullMap {
    fn show_endpoint(&mut self, _endpoint: Endpoint, _point: GeoPoint) {}
    fn clear_endpoint(&mut self, _endpoint: Endpoint) {}
    fn draw_track(&mut self, _path: &Path) {}
    fn clear_track(&mut self) {}
    fn place_car(&mut self, _point: GeoPoint, _heading_deg: Option<f64>) {}
    fn remove_car(&mut self) {}
    fn fit_bounds(&mut self, _bounds: GeoBounds) {}
    fn follow(&mut self, _camera: CameraFollow) {}
}

#[cfg(test)]
pub(crate) mod recording {
    use super::{CameraFollow, Endpoint, MapView};
    use foundation::bounds::GeoBounds;
    use foundation::math::{GeoPoint, Path};

    #[derive(Debug, Clone, PartialEq)]
    pub enum MapCall {
        ShowEndpoint(Endpoint, GeoPoint),
        ClearEndpoint(Endpoint),
        DrawTrack(usize),
        ClearTrack,
        PlaceCar(GeoPoint, Option<f64>),
        RemoveCar,
        FitBounds(GeoBounds),
        Follow(CameraFollow),
    }

    #[derive(Debug, Default)]
    pub struct RecordingMap {
        pub calls: Vec<MapCall>,
    }

    impl RecordingMap {
        pub fn last_car(&self) -> Option<(GeoPoint, Option<f64>)> {
            self.calls.iter().rev().find_map(|c| match c {
                MapCall::PlaceCar(p, h) => Some((*p, *h)),
                _ => None,
            })
        }

        pub fn last_follow(&self) -> Option<CameraFollow> {
            self.calls.iter().rev().find_map(|c| match c {
                MapCall::Follow(cam) => Some(*cam),
                _ => None,
            })
        }
    }

    impl MapView for RecordingMap {
        fn show_endpoint(&mut self, endpoint: Endpoint, point: GeoPoint) {
            self.calls.push(MapCall::ShowEndpoint(endpoint, point));
        }
        fn clear_endpoint(&mut self, endpoint: Endpoint) {
            self.calls.push(MapCall::ClearEndpoint(endpoint));
        }
        fn draw_track(&mut self, path: &Path) {
            self.calls.push(MapCall::DrawTrack(path.len()));
        }
        fn clear_track(&mut self) {
            self.calls.push(MapCall::ClearTrack);
        }
        fn place_car(&mut self, point: GeoPoint, heading_deg: Option<f64>) {
            self.calls.push(MapCall::PlaceCar(point, heading_deg));
        }
        fn remove_car(&mut self) {
            self.calls.push(MapCall::RemoveCar);
        }
        fn fit_bounds(&mut self, bounds: GeoBounds) {
            self.calls.push(MapCall::FitBounds(bounds));
        }
        fn follow(&mut self, camera: CameraFollow) {
            self.calls.push(MapCall::Follow(camera));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CameraFollow, Endpoint, MapBackend};
    use foundation::math::GeoPoint;

    #[test]
    fn parses_backend_names() {
        assert_eq!(MapBackend::parse("Leaflet"), Some(MapBackend::Leaflet));
        assert_eq!(MapBackend::parse("maplibre-gl"), Some(MapBackend::MapLibre));
        assert_eq!(MapBackend::parse("openlayers"), None);
    }

    #[test]
    fn parses_endpoint_names() {
        assert_eq!(Endpoint::parse("destination"), Some(Endpoint::End));
        assert_eq!(Endpoint::parse(" START "), Some(Endpoint::Start));
        assert_eq!(Endpoint::parse("middle"), None);
    }

    #[test]
    fn leaflet_follow_only_pans() {
        let center = GeoPoint::new(1.0, 2.0);
        let cam = CameraFollow::for_backend(MapBackend::Leaflet, center, Some(45.0), 60.0);
        assert_eq!(cam.bearing_deg, None);
        assert_eq!(cam.pitch_deg, None);

        let cam = CameraFollow::for_backend(MapBackend::MapLibre, center, Some(45.0), 60.0);
        assert_eq!(cam.bearing_deg, Some(45.0));
        assert_eq!(cam.pitch_deg, Some(60.0));
    }
}
