use std::fmt;

use foundation::math::{GeoPoint, Path};
use foundation::time::Time;
use routing::{RouteEpoch, RoutePlan, RouteSource, RouteTicket};
use runtime::{CancelToken, ClockState, Event, EventBus, FrameLoop, SessionClock, SessionEvent, Tick};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::countdown::format_countdown;
use crate::map::{CameraFollow, Endpoint, MapView};

/// A route lookup the host should perform and hand back via
/// [`DriveSession::apply_route`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RouteRequest {
    pub ticket: RouteTicket,
    pub from: GeoPoint,
    pub to: GeoPoint,
}

/// What the status line says.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    ChooseEndpoints,
    Picking(Endpoint),
    Planning,
    RouteReady { distance_m: f64 },
    StraightLine,
    Driving,
    Paused,
    Arrived,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::ChooseEndpoints => write!(f, "Set a start and a destination, then press start"),
            Status::Picking(Endpoint::Start) => write!(f, "Click the map to set your starting point"),
            Status::Picking(Endpoint::End) => write!(f, "Click the map to set your destination"),
            Status::Planning => write!(f, "Finding a route..."),
            Status::RouteReady { distance_m } => {
                write!(f, "Route ready: {:.1} km", distance_m / 1000.0)
            }
            Status::StraightLine => {
                write!(f, "Routing unavailable, using a straight line instead")
            }
            Status::Driving => write!(f, "Driving. Stay focused"),
            Status::Paused => write!(f, "Paused"),
            Status::Arrived => write!(f, "You have arrived"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct RouteInfo {
    distance_m: f64,
    fallback: bool,
}

/// Everything a host needs to render labels and buttons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: ClockState,
    pub progress: f64,
    pub elapsed_s: f64,
    pub remaining_s: f64,
    pub duration_min: f64,
    pub countdown: String,
    pub status: String,
    pub picking: Option<Endpoint>,
    pub start: Option<GeoPoint>,
    pub end: Option<GeoPoint>,
    pub planning: bool,
    pub route_points: usize,
    pub route_distance_m: Option<f64>,
    pub route_fallback: Option<bool>,
}

/// The widget's whole mutable state: endpoints, the current path, the
/// countdown clock and its frame loop.
#[derive(Debug)]
pub struct DriveSession {
    config: SessionConfig,
    picking: Option<Endpoint>,
    start: Option<GeoPoint>,
    end: Option<GeoPoint>,
    path: Path,
    route: Option<RouteInfo>,
    pending: Option<RouteTicket>,
    epoch: RouteEpoch,
    clock: SessionClock,
    frames: FrameLoop,
    events: EventBus,
    status: Status,
}

impl Default for DriveSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl DriveSession {
    pub fn new(config: SessionConfig) -> Self {
        let clock = SessionClock::new(config.default_duration_min);
        Self {
            config,
            picking: None,
            start: None,
            end: None,
            path: Path::default(),
            route: None,
            pending: None,
            epoch: RouteEpoch::new(),
            clock,
            frames: FrameLoop::new(),
            events: EventBus::new(),
            status: Status::ChooseEndpoints,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Replaces the config and keeps the route. A changed default duration
    /// is applied only while the clock is idle.
    pub fn set_config(&mut self, config: SessionConfig) {
        let duration_changed = config.default_duration_min != self.config.default_duration_min;
        self.config = config;
        if duration_changed && self.clock.state() == ClockState::Idle {
            self.set_duration_min(self.config.default_duration_min);
        }
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn endpoint(&self, endpoint: Endpoint) -> Option<GeoPoint> {
        match endpoint {
            Endpoint::Start => self.start,
            Endpoint::End => self.end,
        }
    }

    pub fn picking(&self) -> Option<Endpoint> {
        self.picking
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_frame_loop_armed(&self) -> bool {
        self.frames.is_armed()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    /// The next map click will place `endpoint`.
    pub fn begin_pick(&mut self, endpoint: Endpoint) {
        self.picking = Some(endpoint);
        self.status = Status::Picking(endpoint);
    }

    pub fn cancel_pick(&mut self) {
        if self.picking.take().is_some() {
            self.status = self.resting_status();
        }
    }

    /// Routes a map click to the endpoint being picked, if any.
    pub fn map_clicked(&mut self, point: GeoPoint, map: &mut dyn MapView) -> Option<RouteRequest> {
        let endpoint = self.picking.take()?;
        self.set_endpoint(endpoint, point, map)
    }

    /// Places an endpoint. Once both are known a route request is issued;
    /// until then the other endpoint is armed for picking.
    pub fn set_endpoint(
        &mut self,
        endpoint: Endpoint,
        point: GeoPoint,
        map: &mut dyn MapView,
    ) -> Option<RouteRequest> {
        match endpoint {
            Endpoint::Start => self.start = Some(point),
            Endpoint::End => self.end = Some(point),
        }
        map.show_endpoint(endpoint, point);
        debug!(endpoint = endpoint.as_str(), lat = point.lat, lng = point.lng, "endpoint set");

        if self.start.is_none() {
            self.begin_pick(Endpoint::Start);
            return None;
        }
        if self.end.is_none() {
            self.begin_pick(Endpoint::End);
            return None;
        }
        self.request_route()
    }

    /// Issues a fresh route request for the current endpoints. Any request
    /// still in flight becomes stale.
    pub fn request_route(&mut self) -> Option<RouteRequest> {
        let (from, to) = (self.start?, self.end?);
        let ticket = self.epoch.next();
        self.pending = Some(ticket);
        if self.clock.state() == ClockState::Idle {
            self.status = Status::Planning;
        }
        self.events.emit(
            self.frames.frame_index(),
            SessionEvent::RouteRequested { ticket: ticket.id() },
        );
        Some(RouteRequest { ticket, from, to })
    }

    /// Installs a planned route unless a newer request superseded it.
    ///
    /// The clock is left alone: a route that lands mid-drive moves the car to
    /// the same fraction of the new path.
    pub fn apply_route(
        &mut self,
        ticket: RouteTicket,
        plan: RoutePlan,
        map: &mut dyn MapView,
    ) -> bool {
        if !self.epoch.is_current(ticket) {
            debug!(ticket = ticket.id(), "dropping stale route");
            self.events.emit(
                self.frames.frame_index(),
                SessionEvent::StaleRouteDropped { ticket: ticket.id() },
            );
            return false;
        }

        let fallback = plan.is_fallback();
        self.pending = None;
        self.path = plan.path;
        self.route = Some(RouteInfo {
            distance_m: plan.distance_m,
            fallback,
        });

        map.draw_track(&self.path);
        if let Some(bounds) = self.path.bounds() {
            map.fit_bounds(bounds);
        }
        self.place_car(map, false);

        self.events.emit(
            self.frames.frame_index(),
            SessionEvent::RouteReady {
                points: self.path.len(),
                length_m: plan.distance_m,
                fallback,
            },
        );
        if let RouteSource::StraightLine(reason) = &plan.source {
            info!("straight-line fallback: {reason}");
        }

        // Paused, arrived and driving sessions keep their status.
        self.status = self.resting_status();
        true
    }

    /// Forgets endpoints and route, and stops the clock.
    pub fn clear(&mut self, map: &mut dyn MapView) {
        self.start = None;
        self.end = None;
        self.picking = None;
        self.path = Path::default();
        self.route = None;
        self.pending = None;
        self.epoch.invalidate();
        self.clock.reset();
        self.frames.cancel();

        map.clear_endpoint(Endpoint::Start);
        map.clear_endpoint(Endpoint::End);
        map.clear_track();
        map.remove_car();

        self.status = Status::ChooseEndpoints;
        self.events.emit(self.frames.frame_index(), SessionEvent::Cleared);
    }

    /// Invalid input is ignored and the previous duration kept.
    pub fn set_duration_min(&mut self, minutes: f64) -> bool {
        match self.clock.set_duration_min(minutes) {
            Ok(applied) => {
                self.events.emit(
                    self.frames.frame_index(),
                    SessionEvent::DurationChanged { minutes: applied },
                );
                true
            }
            Err(err) => {
                debug!("{err}; keeping {} min", self.clock.duration_min());
                false
            }
        }
    }

    /// Starts or resumes the countdown. Returns the token for the frame loop
    /// the host must now drive, or None if nothing changed.
    pub fn start(&mut self, now: Time) -> Option<CancelToken> {
        let resuming = self.clock.state() == ClockState::Paused;
        if !self.clock.start(now) {
            return None;
        }
        let token = self.frames.arm();
        self.status = Status::Driving;
        let event = if resuming {
            SessionEvent::Resumed
        } else {
            SessionEvent::Started
        };
        self.events.emit(self.frames.frame_index(), event);
        Some(token)
    }

    pub fn pause(&mut self) -> bool {
        if !self.clock.pause() {
            return false;
        }
        self.frames.cancel();
        self.status = Status::Paused;
        self.events.emit(self.frames.frame_index(), SessionEvent::Paused);
        true
    }

    /// Back to Idle with the car at the start of the route.
    pub fn reset(&mut self, map: &mut dyn MapView) {
        self.clock.reset();
        self.frames.cancel();
        self.place_car(map, false);
        self.status = self.resting_status();
        self.events.emit(self.frames.frame_index(), SessionEvent::Reset);
    }

    /// Advances the session by one display frame and returns whether the host
    /// should schedule another.
    pub fn on_frame(&mut self, now: Time, map: &mut dyn MapView) -> bool {
        if !self.frames.is_armed() {
            return false;
        }
        let frame = self.frames.advance(now);

        match self.clock.tick(now) {
            Tick::Stopped => {
                self.frames.cancel();
                false
            }
            Tick::Continue => {
                self.place_car(map, true);
                true
            }
            Tick::Arrived => {
                self.place_car(map, true);
                self.frames.cancel();
                self.status = Status::Arrived;
                self.events.emit(frame.index, SessionEvent::Arrived);
                info!(frames = frame.index + 1, "arrived");
                false
            }
        }
    }

    pub fn countdown(&self) -> String {
        format_countdown(self.clock.remaining_s())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.clock.state(),
            progress: self.clock.progress(),
            elapsed_s: self.clock.elapsed_s(),
            remaining_s: self.clock.remaining_s(),
            duration_min: self.clock.duration_min(),
            countdown: self.countdown(),
            status: self.status.to_string(),
            picking: self.picking,
            start: self.start,
            end: self.end,
            planning: self.pending.is_some(),
            route_points: self.path.len(),
            route_distance_m: self.route.as_ref().map(|r| r.distance_m),
            route_fallback: self.route.as_ref().map(|r| r.fallback),
        }
    }

    fn place_car(&mut self, map: &mut dyn MapView, follow: bool) {
        let progress = self.clock.progress();
        let Some(position) = self.path.position_at(progress) else {
            return;
        };
        let heading = self.path.heading_at(progress);
        map.place_car(position, heading);

        if follow && self.config.follow_car {
            map.follow(CameraFollow::for_backend(
                self.config.backend,
                position,
                heading,
                self.config.follow_pitch_deg,
            ));
        }
    }

    fn resting_status(&self) -> Status {
        match (&self.route, self.clock.state()) {
            (_, ClockState::Paused) => Status::Paused,
            (_, ClockState::Arrived) => Status::Arrived,
            (_, ClockState::Running) => Status::Driving,
            (Some(route), ClockState::Idle) if route.fallback => Status::StraightLine,
            (Some(route), ClockState::Idle) => Status::RouteReady {
                distance_m: route.distance_m,
            },
            (None, ClockState::Idle) if self.pending.is_some() => Status::Planning,
            (None, ClockState::Idle) => Status::ChooseEndpoints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DriveSession, Status};
    use crate::config::SessionConfig;
    use crate::map::recording::{MapCall, RecordingMap};
    use crate::map::{Endpoint, MapBackend};
    use foundation::math::{GeoPoint, Path};
    use foundation::time::Time;
    use pretty_assertions::assert_eq;
    use routing::{
        LocalBoxFuture, RouteError, RoutePlan, RouteProvider, RouteResponse, RouteSource,
        plan_route,
    };
    use runtime::{ClockState, SessionEvent};

    const MIN: f64 = 60.0;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn from() -> GeoPoint {
        GeoPoint::new(0.0, 0.0)
    }

    fn to() -> GeoPoint {
        GeoPoint::new(0.0, 1.0)
    }

    fn road_plan() -> RoutePlan {
        let path = Path::new(vec![from(), GeoPoint::new(0.0, 0.5), to()]);
        RoutePlan {
            from: from(),
            to: to(),
            distance_m: path.length_m(),
            path,
            source: RouteSource::Road,
            duration_s: None,
        }
    }

    fn session_with_route(map: &mut RecordingMap) -> DriveSession {
        let mut s = DriveSession::default();
        s.set_endpoint(Endpoint::Start, from(), map);
        let req = s.set_endpoint(Endpoint::End, to(), map).unwrap();
        assert!(s.apply_route(req.ticket, road_plan(), map));
        s
    }

    struct FailingProvider;

    impl RouteProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn route(
            &self,
            _from: GeoPoint,
            _to: GeoPoint,
        ) -> LocalBoxFuture<'_, Result<RouteResponse, RouteError>> {
            Box::pin(async { Err(RouteError::Http(500)) })
        }
    }

    #[test]
    fn clicks_fill_endpoints_in_order() {
        let mut map = RecordingMap::default();
        let mut s = DriveSession::default();

        assert_eq!(s.map_clicked(from(), &mut map), None);
        assert_eq!(s.endpoint(Endpoint::Start), None);

        s.begin_pick(Endpoint::Start);
        assert_eq!(s.status(), &Status::Picking(Endpoint::Start));
        assert_eq!(s.map_clicked(from(), &mut map), None);
        assert_eq!(s.picking(), Some(Endpoint::End));

        let req = s.map_clicked(to(), &mut map).unwrap();
        assert_eq!((req.from, req.to), (from(), to()));
        assert_eq!(s.status(), &Status::Planning);
        assert!(s.snapshot().planning);
        assert_eq!(
            map.calls,
            vec![
                MapCall::ShowEndpoint(Endpoint::Start, from()),
                MapCall::ShowEndpoint(Endpoint::End, to()),
            ]
        );
    }

    #[test]
    fn applying_a_route_draws_and_places_car() {
        let mut map = RecordingMap::default();
        let s = session_with_route(&mut map);

        assert!(map.calls.contains(&MapCall::DrawTrack(3)));
        assert!(map.calls.iter().any(|c| matches!(c, MapCall::FitBounds(_))));
        let (car, heading) = map.last_car().unwrap();
        assert_eq!(car, from());
        assert_close(heading.unwrap(), 90.0, 1e-9);
        match s.status() {
            Status::RouteReady { distance_m } => assert_close(*distance_m, 111_195.0, 1.0),
            other => panic!("unexpected status {other:?}"),
        }
    }

    #[test]
    fn stale_route_is_dropped() {
        let mut map = RecordingMap::default();
        let mut s = DriveSession::default();
        s.set_endpoint(Endpoint::Start, from(), &mut map);
        let old = s.set_endpoint(Endpoint::End, to(), &mut map).unwrap();
        let new = s
            .set_endpoint(Endpoint::End, GeoPoint::new(1.0, 1.0), &mut map)
            .unwrap();

        // The newer lookup resolves first, then the old one limps in.
        let newer_plan = RoutePlan::straight_line(from(), GeoPoint::new(1.0, 1.0), RouteError::Empty);
        assert!(s.apply_route(new.ticket, newer_plan.clone(), &mut map));
        assert!(!s.apply_route(old.ticket, road_plan(), &mut map));
        assert_eq!(s.path(), &newer_plan.path);

        let dropped = s
            .drain_events()
            .into_iter()
            .any(|e| e.kind == SessionEvent::StaleRouteDropped { ticket: old.ticket.id() });
        assert!(dropped);
    }

    #[tokio::test]
    async fn http_failure_falls_back_with_notice() {
        let mut map = RecordingMap::default();
        let mut s = DriveSession::default();
        s.set_endpoint(Endpoint::Start, from(), &mut map);
        let req = s.set_endpoint(Endpoint::End, to(), &mut map).unwrap();

        let plan = plan_route(&FailingProvider, req.from, req.to).await;
        assert!(s.apply_route(req.ticket, plan, &mut map));

        assert_eq!(s.path(), &Path::straight_line(from(), to()));
        assert_eq!(s.status(), &Status::StraightLine);
        let snap = s.snapshot();
        assert_eq!(snap.route_fallback, Some(true));
        assert!(snap.status.contains("straight line"));
    }

    #[test]
    fn drives_to_arrival() {
        let mut map = RecordingMap::default();
        let mut s = session_with_route(&mut map);

        assert!(s.start(Time(0.0)).is_some());
        assert!(s.on_frame(Time(0.0), &mut map));
        assert!(s.on_frame(Time(12.5 * MIN), &mut map));

        let (mid, heading) = map.last_car().unwrap();
        assert_close(mid.lng, 0.5, 1e-9);
        assert_close(heading.unwrap(), 90.0, 1e-9);
        assert_eq!(s.countdown(), "12:30");

        assert!(!s.on_frame(Time(25.0 * MIN), &mut map));
        assert_eq!(s.clock().state(), ClockState::Arrived);
        assert_eq!(s.clock().progress(), 1.0);
        assert_eq!(map.last_car().unwrap().0, to());
        assert_eq!(s.status(), &Status::Arrived);
        assert_eq!(s.countdown(), "00:00");
        assert!(!s.is_frame_loop_armed());

        let arrivals = s
            .drain_events()
            .into_iter()
            .filter(|e| e.kind == SessionEvent::Arrived)
            .count();
        assert_eq!(arrivals, 1);

        // No more frames after arrival.
        assert!(!s.on_frame(Time(30.0 * MIN), &mut map));
    }

    #[test]
    fn pause_stops_the_loop_and_resume_continues() {
        let mut map = RecordingMap::default();
        let mut s = session_with_route(&mut map);

        let token = s.start(Time(0.0)).unwrap();
        s.on_frame(Time(10.0 * MIN), &mut map);
        assert!(s.pause());
        assert!(token.is_cancelled());
        assert!(!s.on_frame(Time(15.0 * MIN), &mut map));
        assert_eq!(s.clock().elapsed_s(), 10.0 * MIN);
        assert_eq!(s.status(), &Status::Paused);

        let token = s.start(Time(20.0 * MIN)).unwrap();
        assert!(!token.is_cancelled());
        assert!(s.on_frame(Time(21.0 * MIN), &mut map));
        assert_eq!(s.clock().elapsed_s(), 11.0 * MIN);

        let kinds: Vec<_> = s.drain_events().into_iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&SessionEvent::Started));
        assert!(kinds.contains(&SessionEvent::Paused));
        assert!(kinds.contains(&SessionEvent::Resumed));
    }

    #[test]
    fn timer_runs_without_a_route() {
        let mut map = RecordingMap::default();
        let mut s = DriveSession::default();
        s.set_duration_min(1.0);
        s.start(Time(0.0)).unwrap();
        assert!(s.on_frame(Time(30.0), &mut map));
        assert!(!s.on_frame(Time(60.0), &mut map));
        assert_eq!(s.clock().state(), ClockState::Arrived);
        assert!(map.calls.is_empty());
    }

    #[test]
    fn invalid_duration_keeps_previous_value() {
        let mut s = DriveSession::default();
        assert!(s.set_duration_min(45.0));
        assert!(!s.set_duration_min(-1.0));
        assert!(!s.set_duration_min(f64::NAN));
        assert_eq!(s.snapshot().duration_min, 45.0);
        assert_eq!(s.countdown(), "45:00");
    }

    #[test]
    fn configured_default_duration_applies_while_idle() {
        let mut s = DriveSession::default();
        s.set_config(SessionConfig::from_json_str(r#"{"default_duration_min":40}"#).unwrap());
        assert_eq!(s.clock().duration_min(), 40.0);
        assert_eq!(s.countdown(), "40:00");

        s.start(Time(0.0)).unwrap();
        s.set_config(SessionConfig {
            default_duration_min: 10.0,
            ..SessionConfig::default()
        });
        assert_eq!(s.clock().duration_min(), 40.0);
    }

    #[test]
    fn unrelated_config_change_keeps_chosen_duration() {
        let mut s = DriveSession::default();
        assert!(s.set_duration_min(45.0));
        s.set_config(SessionConfig {
            backend: MapBackend::Leaflet,
            ..s.config().clone()
        });
        assert_eq!(s.clock().duration_min(), 45.0);
    }

    #[test]
    fn replan_while_paused_keeps_paused_status() {
        let mut map = RecordingMap::default();
        let mut s = session_with_route(&mut map);
        s.start(Time(0.0)).unwrap();
        s.on_frame(Time(MIN), &mut map);
        assert!(s.pause());

        let req = s.request_route().unwrap();
        assert!(s.apply_route(req.ticket, road_plan(), &mut map));
        assert_eq!(s.clock().state(), ClockState::Paused);
        assert_eq!(s.status(), &Status::Paused);
        assert_eq!(s.snapshot().status, "Paused");
    }

    #[test]
    fn replan_after_arrival_keeps_arrived_status() {
        let mut map = RecordingMap::default();
        let mut s = session_with_route(&mut map);
        s.set_duration_min(1.0);
        s.start(Time(0.0)).unwrap();
        assert!(!s.on_frame(Time(MIN), &mut map));

        let req = s.request_route().unwrap();
        assert!(s.apply_route(req.ticket, road_plan(), &mut map));
        assert_eq!(s.status(), &Status::Arrived);
    }

    #[test]
    fn reset_puts_car_back_at_start() {
        let mut map = RecordingMap::default();
        let mut s = session_with_route(&mut map);
        s.start(Time(0.0));
        s.on_frame(Time(20.0 * MIN), &mut map);
        s.reset(&mut map);

        assert_eq!(s.clock().state(), ClockState::Idle);
        assert_eq!(map.last_car().unwrap().0, from());
        assert!(matches!(s.status(), Status::RouteReady { .. }));
        assert!(!s.is_frame_loop_armed());
    }

    #[test]
    fn clear_forgets_everything() {
        let mut map = RecordingMap::default();
        let mut s = session_with_route(&mut map);
        s.start(Time(0.0));
        s.clear(&mut map);

        assert!(s.path().is_empty());
        assert_eq!(s.endpoint(Endpoint::Start), None);
        assert_eq!(s.clock().state(), ClockState::Idle);
        assert_eq!(s.status(), &Status::ChooseEndpoints);
        assert!(map.calls.ends_with(&[
            MapCall::ClearEndpoint(Endpoint::Start),
            MapCall::ClearEndpoint(Endpoint::End),
            MapCall::ClearTrack,
            MapCall::RemoveCar,
        ]));
    }

    #[test]
    fn camera_follow_depends_on_backend() {
        let mut map = RecordingMap::default();
        let mut s = session_with_route(&mut map);
        s.start(Time(0.0));
        s.on_frame(Time(MIN), &mut map);
        let cam = map.last_follow().unwrap();
        assert!(cam.bearing_deg.is_some());
        assert_eq!(cam.pitch_deg, Some(60.0));

        let mut map = RecordingMap::default();
        let mut s = DriveSession::new(SessionConfig {
            backend: MapBackend::Leaflet,
            ..SessionConfig::default()
        });
        s.set_endpoint(Endpoint::Start, from(), &mut map);
        let req = s.set_endpoint(Endpoint::End, to(), &mut map).unwrap();
        s.apply_route(req.ticket, road_plan(), &mut map);
        s.start(Time(0.0));
        s.on_frame(Time(MIN), &mut map);
        let cam = map.last_follow().unwrap();
        assert_eq!(cam.bearing_deg, None);
        assert_eq!(cam.pitch_deg, None);
    }

    #[test]
    fn snapshot_serializes_for_hosts() {
        let s = DriveSession::default();
        let json = serde_json::to_value(s.snapshot()).unwrap();
        assert_eq!(json["state"], "idle");
        assert_eq!(json["countdown"], "25:00");
        assert_eq!(json["route_points"], 0);
    }
}
