//! Bridge from the session's map calls to a JS adapter object.
//!
//! The host page wraps its basemap library (Leaflet or MapLibre) in a plain
//! object with camelCase methods. Methods the adapter doesn't define are
//! skipped, so a minimal adapter only needs `placeCar`.
//!
//! Calls are queued while the session state is borrowed and replayed once it
//! is released, so adapter methods may call back into any export.

use foundation::bounds::GeoBounds;
use foundation::math::{GeoPoint, Path};
use session::{CameraFollow, Endpoint, MapView};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub enum MapCommand {
    ShowEndpoint(Endpoint, GeoPoint),
    ClearEndpoint(Endpoint),
    DrawTrack(Vec<GeoPoint>),
    ClearTrack,
    PlaceCar(GeoPoint, Option<f64>),
    RemoveCar,
    FitBounds(GeoBounds),
    Follow(CameraFollow),
}

impl MapCommand {
    fn method(&self) -> &'static str {
        match self {
            MapCommand::ShowEndpoint(..) => "showEndpoint",
            MapCommand::ClearEndpoint(_) => "clearEndpoint",
            MapCommand::DrawTrack(_) => "drawTrack",
            MapCommand::ClearTrack => "clearTrack",
            MapCommand::PlaceCar(..) => "placeCar",
            MapCommand::RemoveCar => "removeCar",
            MapCommand::FitBounds(_) => "fitBounds",
            MapCommand::Follow(_) => "follow",
        }
    }

    fn args(&self) -> Vec<JsValue> {
        match self {
            MapCommand::ShowEndpoint(endpoint, point) => vec![
                JsValue::from_str(endpoint.as_str()),
                JsValue::from_f64(point.lat),
                JsValue::from_f64(point.lng),
            ],
            MapCommand::ClearEndpoint(endpoint) => vec![JsValue::from_str(endpoint.as_str())],
            MapCommand::DrawTrack(points) => vec![points_to_js(points)],
            MapCommand::ClearTrack | MapCommand::RemoveCar => Vec::new(),
            MapCommand::PlaceCar(point, heading) => vec![
                JsValue::from_f64(point.lat),
                JsValue::from_f64(point.lng),
                opt_f64(*heading),
            ],
            MapCommand::FitBounds(bounds) => vec![
                JsValue::from_f64(bounds.south),
                JsValue::from_f64(bounds.west),
                JsValue::from_f64(bounds.north),
                JsValue::from_f64(bounds.east),
            ],
            MapCommand::Follow(camera) => vec![
                JsValue::from_f64(camera.center.lat),
                JsValue::from_f64(camera.center.lng),
                opt_f64(camera.bearing_deg),
                opt_f64(camera.pitch_deg),
            ],
        }
    }
}

#[derive(Debug, Default)]
pub struct JsMap {
    adapter: Option<JsValue>,
    pending: Vec<MapCommand>,
}

impl JsMap {
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, adapter: JsValue) {
        self.adapter = Some(adapter);
    }

    pub fn is_attached(&self) -> bool {
        self.adapter.is_some()
    }

    pub fn pending(&self) -> &[MapCommand] {
        &self.pending
    }

    /// Takes the queued calls. Without an adapter they are dropped.
    pub fn take_batch(&mut self) -> Option<MapBatch> {
        let commands = std::mem::take(&mut self.pending);
        let adapter = self.adapter.clone()?;
        if commands.is_empty() {
            return None;
        }
        Some(MapBatch { adapter, commands })
    }
}

/// Calls detached from the session state, ready to run against the adapter.
pub struct MapBatch {
    adapter: JsValue,
    commands: Vec<MapCommand>,
}

impl MapBatch {
    pub fn replay(self) {
        for command in &self.commands {
            let method = command.method();
            if let Err(err) = call_method(&self.adapter, method, &command.args()) {
                web_sys::console::warn_1(&JsValue::from_str(&format!(
                    "map adapter {method} failed: {err:?}"
                )));
            }
        }
    }
}

fn call_method(target: &JsValue, method: &str, args: &[JsValue]) -> Result<(), JsValue> {
    let func = js_sys::Reflect::get(target, &JsValue::from_str(method))?;
    let Some(func) = func.dyn_ref::<js_sys::Function>() else {
        return Ok(());
    };
    let arr = js_sys::Array::new();
    for arg in args {
        arr.push(arg);
    }
    func.apply(target, &arr)?;
    Ok(())
}

fn opt_f64(v: Option<f64>) -> JsValue {
    v.map(JsValue::from_f64).unwrap_or(JsValue::NULL)
}

/// `[[lat, lng], ...]`, the order both Leaflet polylines and our adapters use.
fn points_to_js(points: &[GeoPoint]) -> JsValue {
    let out = js_sys::Array::new();
    for p in points {
        let pair = js_sys::Array::new();
        pair.push(&JsValue::from_f64(p.lat));
        pair.push(&JsValue::from_f64(p.lng));
        out.push(&pair);
    }
    out.into()
}

impl MapView for JsMap {
    fn show_endpoint(&mut self, endpoint: Endpoint, point: GeoPoint) {
        self.pending.push(MapCommand::ShowEndpoint(endpoint, point));
    }

    fn clear_endpoint(&mut self, endpoint: Endpoint) {
        self.pending.push(MapCommand::ClearEndpoint(endpoint));
    }

    fn draw_track(&mut self, path: &Path) {
        self.pending.push(MapCommand::DrawTrack(path.points().to_vec()));
    }

    fn clear_track(&mut self) {
        self.pending.push(MapCommand::ClearTrack);
    }

    fn place_car(&mut self, point: GeoPoint, heading_deg: Option<f64>) {
        // Only the latest pose matters once replayed.
        self.pending
            .retain(|c| !matches!(c, MapCommand::PlaceCar(..) | MapCommand::Follow(_)));
        self.pending.push(MapCommand::PlaceCar(point, heading_deg));
    }

    fn remove_car(&mut self) {
        self.pending.push(MapCommand::RemoveCar);
    }

    fn fit_bounds(&mut self, bounds: GeoBounds) {
        self.pending.push(MapCommand::FitBounds(bounds));
    }

    fn follow(&mut self, camera: CameraFollow) {
        self.pending.push(MapCommand::Follow(camera));
    }
}
