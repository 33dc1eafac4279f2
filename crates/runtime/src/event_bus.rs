use std::fmt;

/// Something a session did that hosts may want to log or show.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Started,
    Resumed,
    Paused,
    Arrived,
    Reset,
    Cleared,
    DurationChanged { minutes: f64 },
    RouteRequested { ticket: u64 },
    RouteReady { points: usize, length_m: f64, fallback: bool },
    StaleRouteDropped { ticket: u64 },
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::Started => write!(f, "session started"),
            SessionEvent::Resumed => write!(f, "session resumed"),
            SessionEvent::Paused => write!(f, "session paused"),
            SessionEvent::Arrived => write!(f, "arrived"),
            SessionEvent::Reset => write!(f, "session reset"),
            SessionEvent::Cleared => write!(f, "route cleared"),
            SessionEvent::DurationChanged { minutes } => {
                write!(f, "duration set to {minutes} min")
            }
            SessionEvent::RouteRequested { ticket } => write!(f, "route #{ticket} requested"),
            SessionEvent::RouteReady {
                points,
                length_m,
                fallback,
            } => {
                let kind = if *fallback { "straight line" } else { "road route" };
                write!(
                    f,
                    "{kind} ready: {points} points, {:.1} km",
                    length_m / 1000.0
                )
            }
            SessionEvent::StaleRouteDropped { ticket } => {
                write!(f, "dropped stale route #{ticket}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub frame_index: u64,
    pub kind: SessionEvent,
}

/// Append-only record of session events, drained by the host.
#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, frame_index: u64, kind: SessionEvent) {
        self.events.push(Event { frame_index, kind });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
