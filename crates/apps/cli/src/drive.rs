use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use foundation::math::GeoPoint;
use routing::plan_route;
use runtime::{ClockState, ScaledClock, TimeSource};
use session::{DriveSession, Endpoint, MapBackend, SessionConfig, SessionSnapshot};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::provider::ReqwestRouteProvider;
use crate::trace_map::TracingMap;

/// Roughly one display refresh.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone)]
pub struct DriveOptions {
    pub from: GeoPoint,
    pub to: GeoPoint,
    pub minutes: f64,
    pub speedup: f64,
    pub router_url: String,
    pub timeout: Duration,
    pub backend: MapBackend,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DriveOutcome {
    Arrived,
    Interrupted,
}

#[derive(Debug, Clone)]
pub struct DriveReport {
    pub outcome: DriveOutcome,
    pub snapshot: SessionSnapshot,
    /// Where the car was last drawn.
    pub car: Option<GeoPoint>,
    pub frames: u64,
}

fn log_events(session: &mut DriveSession) {
    for event in session.drain_events() {
        info!(frame = event.frame_index, "{}", event.kind);
    }
}

/// Resolves when `signal` fires. If the signal handler could not be
/// installed the drive keeps running until arrival instead of stopping.
pub async fn shutdown_on<F, E>(signal: F)
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    if let Err(err) = signal.await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}

/// Plans the route, then drives the session until arrival or `shutdown`
/// resolves, whichever comes first.
pub async fn run_drive<F>(opts: DriveOptions, shutdown: F) -> Result<DriveReport, String>
where
    F: Future<Output = ()>,
{
    let provider = ReqwestRouteProvider::new(opts.router_url.clone(), opts.timeout)
        .map_err(|e| format!("failed to build http client: {e}"))?;

    let config = SessionConfig {
        routing_base_url: opts.router_url,
        backend: opts.backend,
        ..SessionConfig::default()
    };
    let mut session = DriveSession::new(config);
    if !session.set_duration_min(opts.minutes) {
        return Err(format!("invalid duration: {} minutes", opts.minutes));
    }

    let mut map = TracingMap::new();
    session.set_endpoint(Endpoint::Start, opts.from, &mut map);
    let request = session
        .set_endpoint(Endpoint::End, opts.to, &mut map)
        .ok_or_else(|| "no route request issued".to_string())?;

    let plan = plan_route(&provider, request.from, request.to).await;
    session.apply_route(request.ticket, plan, &mut map);
    log_events(&mut session);
    info!("{}", session.status());

    let clock = ScaledClock::new(opts.speedup);
    let token = session
        .start(clock.now())
        .ok_or_else(|| "session did not start".to_string())?;
    log_events(&mut session);
    info!(
        minutes = session.clock().duration_min(),
        speedup = clock.speedup(),
        "{}",
        session.status()
    );

    let mut interval = tokio::time::interval(FRAME_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut frames = 0u64;
    let mut label = session.countdown();
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                session.pause();
                log_events(&mut session);
                break;
            }
            _ = interval.tick() => {
                if token.is_cancelled() {
                    break;
                }
                frames += 1;
                let more = session.on_frame(clock.now(), &mut map);
                log_events(&mut session);

                let next = session.countdown();
                if next != label {
                    debug!(progress = session.clock().progress(), "{next}");
                    label = next;
                }
                if !more {
                    break;
                }
            }
        }
    }

    let outcome = if session.clock().state() == ClockState::Arrived {
        DriveOutcome::Arrived
    } else {
        DriveOutcome::Interrupted
    };
    info!("{}", session.status());

    Ok(DriveReport {
        outcome,
        snapshot: session.snapshot(),
        car: map.car(),
        frames,
    })
}

#[cfg(test)]
mod tests {
    use super::shutdown_on;
    use std::time::Duration;

    #[tokio::test]
    async fn shutdown_fires_with_the_signal() {
        let fired = tokio::time::timeout(
            Duration::from_millis(200),
            shutdown_on(async { Ok::<(), std::io::Error>(()) }),
        )
        .await;
        assert!(fired.is_ok());
    }

    #[tokio::test]
    async fn broken_signal_never_shuts_down() {
        let fired = tokio::time::timeout(
            Duration::from_millis(50),
            shutdown_on(async { Err::<(), _>(std::io::Error::other("no signal handler")) }),
        )
        .await;
        assert!(fired.is_err());
    }
}
