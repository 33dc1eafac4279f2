use std::env;
use std::time::Duration;

use clap::Parser;
use foundation::math::GeoPoint;
use routing::DEFAULT_ROUTER_URL;
use runtime::DEFAULT_DURATION_MIN;
use session::MapBackend;

use crate::drive::DriveOptions;

#[derive(Parser, Debug)]
#[command(author, version, about = "Drive a virtual car along a route while a focus timer runs")]
pub struct Args {
    /// Starting point: lat,lng
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub from: GeoPoint,

    /// Destination: lat,lng
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub to: GeoPoint,

    /// Session length in minutes (default: FOCUS_DRIVE_MINUTES or 25)
    #[arg(long)]
    pub minutes: Option<f64>,

    /// Run the clock this many times faster than real time (default: FOCUS_DRIVE_SPEEDUP or 1)
    #[arg(long)]
    pub speedup: Option<f64>,

    /// OSRM-compatible routing service (default: FOCUS_DRIVE_ROUTER_URL or the public demo server)
    #[arg(long)]
    pub router_url: Option<String>,

    /// Routing request timeout in seconds (default: FOCUS_DRIVE_TIMEOUT_S or 10)
    #[arg(long)]
    pub timeout_s: Option<u64>,

    /// Camera behaviour to simulate: leaflet or maplibre
    #[arg(long, value_parser = parse_backend, default_value = "maplibre")]
    pub backend: MapBackend,

    /// Print the final session snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Fills unset flags from the environment, then from built-in defaults.
    pub fn into_options(self) -> DriveOptions {
        DriveOptions {
            from: self.from,
            to: self.to,
            minutes: self
                .minutes
                .unwrap_or_else(|| env_var_f64("FOCUS_DRIVE_MINUTES", DEFAULT_DURATION_MIN)),
            speedup: self
                .speedup
                .unwrap_or_else(|| env_var_f64("FOCUS_DRIVE_SPEEDUP", 1.0)),
            router_url: self.router_url.unwrap_or_else(|| {
                env::var("FOCUS_DRIVE_ROUTER_URL").unwrap_or_else(|_| DEFAULT_ROUTER_URL.to_string())
            }),
            timeout: Duration::from_secs(
                self.timeout_s
                    .unwrap_or_else(|| env_var_u64("FOCUS_DRIVE_TIMEOUT_S", 10)),
            ),
            backend: self.backend,
        }
    }
}

/// Parses `lat,lng` in decimal degrees.
pub fn parse_point(s: &str) -> Result<GeoPoint, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected lat,lng, got {s:?}"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude {lat:?}"))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude {lng:?}"))?;
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude {lat} outside [-90, 90]"));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(format!("longitude {lng} outside [-180, 180]"));
    }
    Ok(GeoPoint::new(lat, lng))
}

fn parse_backend(s: &str) -> Result<MapBackend, String> {
    MapBackend::parse(s).ok_or_else(|| format!("unknown map backend {s:?}"))
}

fn env_var_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_var_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::{parse_point, Args};
    use clap::Parser;
    use session::MapBackend;

    #[test]
    fn parses_points() {
        let p = parse_point("52.52, 13.405").unwrap();
        assert_eq!(p.lat, 52.52);
        assert_eq!(p.lng, 13.405);
        assert!(parse_point("-33.9,-70.6").is_ok());
    }

    #[test]
    fn rejects_bad_points() {
        assert!(parse_point("52.52").is_err());
        assert!(parse_point("north,13").is_err());
        assert!(parse_point("91,0").is_err());
        assert!(parse_point("0,181").is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "focus-drive",
            "--from",
            "0,0",
            "--to",
            "0,1",
            "--minutes",
            "5",
            "--speedup",
            "30",
            "--router-url",
            "http://localhost:5000",
            "--timeout-s",
            "2",
            "--backend",
            "leaflet",
        ])
        .unwrap();
        let opts = args.into_options();
        assert_eq!(opts.minutes, 5.0);
        assert_eq!(opts.speedup, 30.0);
        assert_eq!(opts.router_url, "http://localhost:5000");
        assert_eq!(opts.timeout.as_secs(), 2);
        assert_eq!(opts.backend, MapBackend::Leaflet);
    }

    #[test]
    fn endpoints_are_required() {
        assert!(Args::try_parse_from(["focus-drive", "--from", "0,0"]).is_err());
    }
}
