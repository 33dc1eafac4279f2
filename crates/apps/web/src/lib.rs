use std::cell::RefCell;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use foundation::math::GeoPoint;
use foundation::time::Time;
use routing::plan_route;
use runtime::{CancelToken, Event};
use session::{DriveSession, Endpoint, MapBackend, RouteRequest, SessionConfig};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

mod fetch;
mod js_map;

use fetch::FetchRouteProvider;
use js_map::JsMap;

// Guard to prevent double-initialization of global state (relevant during hot reload).
static INITIALIZED: AtomicBool = AtomicBool::new(false);
static PANIC_HOOK_SET: OnceLock<()> = OnceLock::new();

struct WebState {
    session: DriveSession,
    map: JsMap,
    /// Token of the frame loop currently driven by requestAnimationFrame.
    loop_token: Option<CancelToken>,
    raf_id: Option<i32>,
    /// Host callback receiving a state snapshot after every change.
    on_update: Option<js_sys::Function>,
}

thread_local! {
    static STATE: RefCell<WebState> = RefCell::new(WebState {
        session: DriveSession::default(),
        map: JsMap::detached(),
        loop_token: None,
        raf_id: None,
        on_update: None,
    });

    // One persistent callback reused for every frame request.
    static FRAME_CALLBACK: RefCell<Option<Closure<dyn FnMut(f64)>>> = const { RefCell::new(None) };
}

/// Safe TLS access helper that returns a default on teardown instead of panicking.
fn with_state<F, R>(f: F) -> R
where
    F: FnOnce(&RefCell<WebState>) -> R,
    R: Default,
{
    STATE.try_with(f).unwrap_or_default()
}

fn init_panic_hook() {
    PANIC_HOOK_SET.get_or_init(console_error_panic_hook::set_once);
}

/// Milliseconds on the `performance.now()` timeline, falling back to the wall
/// clock where the Performance API is missing.
fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

fn event_line(event: &Event) -> String {
    format!("[drive frame {}] {}", event.frame_index, event.kind)
}

fn flush_events(session: &mut DriveSession) {
    for event in session.drain_events() {
        web_sys::console::log_1(&JsValue::from_str(&event_line(&event)));
    }
}

/// Replays queued map calls against the adapter once the state borrow is
/// released.
fn flush_map() {
    if let Some(batch) = with_state(|state| state.borrow_mut().map.take_batch()) {
        batch.replay();
    }
}

/// Flushes the map, then hands the latest snapshot to the host's update
/// callback. Both run outside of any state borrow so they may call back into
/// us.
fn notify_host() {
    flush_map();
    let (callback, json) = with_state(|state| {
        let s = state.borrow();
        let json = serde_json::to_string(&s.session.snapshot()).unwrap_or_default();
        (s.on_update.clone(), json)
    });
    let Some(callback) = callback else {
        return;
    };
    let payload = js_sys::JSON::parse(&json).unwrap_or(JsValue::NULL);
    if let Err(err) = callback.call1(&JsValue::NULL, &payload) {
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "update callback failed: {err:?}"
        )));
    }
}

fn request_frame() -> Result<i32, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    FRAME_CALLBACK.with(|cell| {
        let mut slot = cell.borrow_mut();
        let callback =
            slot.get_or_insert_with(|| Closure::<dyn FnMut(f64)>::new(on_animation_frame));
        window.request_animation_frame(callback.as_ref().unchecked_ref())
    })
}

fn schedule_frame() -> Result<(), JsValue> {
    let id = request_frame()?;
    with_state(|state| {
        state.borrow_mut().raf_id = Some(id);
    });
    Ok(())
}

fn cancel_frame() {
    let pending = with_state(|state| {
        let mut s = state.borrow_mut();
        s.loop_token = None;
        s.raf_id.take()
    });
    if let (Some(id), Some(window)) = (pending, web_sys::window()) {
        let _ = window.cancel_animation_frame(id);
    }
}

fn on_animation_frame(_timestamp_ms: f64) {
    let now = Time::from_millis(now_ms());
    let keep_going = with_state(|state| {
        let mut s = state.borrow_mut();
        s.raf_id = None;
        let live = s.loop_token.as_ref().is_some_and(|t| !t.is_cancelled());
        if !live {
            return false;
        }
        let WebState { session, map, .. } = &mut *s;
        let more = session.on_frame(now, map);
        flush_events(session);
        more
    });

    if keep_going {
        if let Err(err) = schedule_frame() {
            web_sys::console::error_1(&JsValue::from_str(&format!(
                "failed to schedule frame: {err:?}"
            )));
        }
    } else {
        cancel_frame();
    }
    notify_host();
}

fn spawn_route_lookup(request: RouteRequest) {
    let base_url = with_state(|state| state.borrow().session.config().routing_base_url.clone());
    spawn_local(async move {
        let provider = FetchRouteProvider::new(base_url);
        let plan = plan_route(&provider, request.from, request.to).await;
        if plan.is_fallback() {
            web_sys::console::warn_1(&JsValue::from_str(
                "routing unavailable, falling back to a straight line",
            ));
        }
        with_state(|state| {
            let mut s = state.borrow_mut();
            let WebState { session, map, .. } = &mut *s;
            session.apply_route(request.ticket, plan, map);
            flush_events(session);
        });
        notify_host();
    });
}

fn parse_endpoint(which: &str) -> Result<Endpoint, JsValue> {
    Endpoint::parse(which)
        .ok_or_else(|| JsValue::from_str(&format!("unknown endpoint: {which}")))
}

#[wasm_bindgen(start)]
pub fn init() -> Result<(), JsValue> {
    // Avoid double-initialization (can happen during hot-reload edge cases).
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    init_panic_hook();
    Ok(())
}

/// Applies a (partial) JSON config. The route survives; a new default
/// duration takes effect unless a session is under way.
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    let config = SessionConfig::from_json_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    with_state(|state| {
        let mut s = state.borrow_mut();
        s.session.set_config(config);
        flush_events(&mut s.session);
    });
    notify_host();
    Ok(())
}

/// Selects the camera behaviour for the basemap in use (`leaflet` or `maplibre`).
#[wasm_bindgen]
pub fn set_map_backend(name: &str) -> Result<(), JsValue> {
    let backend = MapBackend::parse(name)
        .ok_or_else(|| JsValue::from_str(&format!("unknown map backend: {name}")))?;
    with_state(|state| {
        let mut s = state.borrow_mut();
        let config = SessionConfig {
            backend,
            ..s.session.config().clone()
        };
        s.session.set_config(config);
    });
    Ok(())
}

/// Registers the JS object that draws markers, the track and the camera.
#[wasm_bindgen]
pub fn attach_map(adapter: JsValue) -> Result<(), JsValue> {
    if !adapter.is_object() {
        return Err(JsValue::from_str("map adapter must be an object"));
    }
    with_state(|state| state.borrow_mut().map.attach(adapter));
    Ok(())
}

#[wasm_bindgen]
pub fn on_update(callback: js_sys::Function) {
    with_state(|state| state.borrow_mut().on_update = Some(callback));
    notify_host();
}

/// Arms `start` or `end` for the next map click.
#[wasm_bindgen]
pub fn begin_pick(which: &str) -> Result<(), JsValue> {
    let endpoint = parse_endpoint(which)?;
    with_state(|state| state.borrow_mut().session.begin_pick(endpoint));
    notify_host();
    Ok(())
}

#[wasm_bindgen]
pub fn cancel_pick() {
    with_state(|state| state.borrow_mut().session.cancel_pick());
    notify_host();
}

/// Forward map clicks here. Ignored unless a pick is armed.
#[wasm_bindgen]
pub fn map_click(lat: f64, lng: f64) {
    let request = with_state(|state| {
        let mut s = state.borrow_mut();
        let WebState { session, map, .. } = &mut *s;
        session.map_clicked(GeoPoint::new(lat, lng), map)
    });
    if let Some(request) = request {
        spawn_route_lookup(request);
    }
    notify_host();
}

#[wasm_bindgen]
pub fn set_endpoint(which: &str, lat: f64, lng: f64) -> Result<(), JsValue> {
    let endpoint = parse_endpoint(which)?;
    let request = with_state(|state| {
        let mut s = state.borrow_mut();
        let WebState { session, map, .. } = &mut *s;
        session.set_endpoint(endpoint, GeoPoint::new(lat, lng), map)
    });
    if let Some(request) = request {
        spawn_route_lookup(request);
    }
    notify_host();
    Ok(())
}

/// Looks the route up again for the current endpoints.
#[wasm_bindgen]
pub fn replan() -> bool {
    let request = with_state(|state| state.borrow_mut().session.request_route());
    let issued = request.is_some();
    if let Some(request) = request {
        spawn_route_lookup(request);
    }
    notify_host();
    issued
}

#[wasm_bindgen]
pub fn clear_route() {
    cancel_frame();
    with_state(|state| {
        let mut s = state.borrow_mut();
        let WebState { session, map, .. } = &mut *s;
        session.clear(map);
        flush_events(session);
    });
    notify_host();
}

/// Returns false (and keeps the old value) for non-positive or non-numeric input.
#[wasm_bindgen]
pub fn set_duration_minutes(minutes: f64) -> bool {
    let applied = with_state(|state| {
        let mut s = state.borrow_mut();
        let ok = s.session.set_duration_min(minutes);
        flush_events(&mut s.session);
        ok
    });
    notify_host();
    applied
}

#[wasm_bindgen]
pub fn start_drive() -> Result<(), JsValue> {
    let now = Time::from_millis(now_ms());
    let started = with_state(|state| {
        let mut s = state.borrow_mut();
        let token = s.session.start(now);
        flush_events(&mut s.session);
        let started = token.is_some();
        if started {
            s.loop_token = token;
        }
        started
    });
    if started {
        schedule_frame()?;
    }
    notify_host();
    Ok(())
}

#[wasm_bindgen]
pub fn pause_drive() {
    let paused = with_state(|state| {
        let mut s = state.borrow_mut();
        let paused = s.session.pause();
        flush_events(&mut s.session);
        paused
    });
    if paused {
        cancel_frame();
    }
    notify_host();
}

/// Start/pause button behaviour.
#[wasm_bindgen]
pub fn toggle_drive() -> Result<(), JsValue> {
    let running = with_state(|state| state.borrow().session.clock().is_running());
    if running {
        pause_drive();
        Ok(())
    } else {
        start_drive()
    }
}

#[wasm_bindgen]
pub fn reset_drive() {
    cancel_frame();
    with_state(|state| {
        let mut s = state.borrow_mut();
        let WebState { session, map, .. } = &mut *s;
        session.reset(map);
        flush_events(session);
    });
    notify_host();
}

/// Stops the frame loop before the widget is unmounted.
#[wasm_bindgen]
pub fn dispose() {
    with_state(|state| {
        state.borrow_mut().session.pause();
    });
    cancel_frame();
}

#[wasm_bindgen]
pub fn get_state() -> Result<JsValue, JsValue> {
    let snapshot = with_state(|state| Some(state.borrow().session.snapshot()))
        .ok_or_else(|| JsValue::from_str("session state unavailable"))?;
    let json = serde_json::to_string(&snapshot).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&json)
}

#[wasm_bindgen]
pub fn get_countdown() -> String {
    with_state(|state| state.borrow().session.countdown())
}

#[wasm_bindgen]
pub fn get_status() -> String {
    with_state(|state| state.borrow().session.status().to_string())
}

#[wasm_bindgen]
pub fn is_map_attached() -> bool {
    with_state(|state| state.borrow().map.is_attached())
}

#[cfg(test)]
mod tests {
    use super::event_line;
    use runtime::{Event, SessionEvent};

    #[test]
    fn event_lines_carry_frame_index() {
        let line = event_line(&Event {
            frame_index: 42,
            kind: SessionEvent::Arrived,
        });
        assert_eq!(line, "[drive frame 42] arrived");
    }
}
