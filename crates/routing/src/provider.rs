use std::future::Future;
use std::pin::Pin;

use foundation::math::GeoPoint;

use crate::protocol::RouteResponse;

/// Why a road route could not be used.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteError {
    /// The request never produced a response (network, CORS, DNS, timeout).
    Transport(String),
    /// The service answered with a non-success HTTP status.
    Http(u16),
    /// The body was not the JSON we expected.
    Malformed(String),
    /// The service answered but reported an error code.
    Service(String),
    /// No candidate route carried any coordinates.
    Empty,
}

impl std::fmt::Display for RouteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteError::Transport(msg) => write!(f, "routing request failed: {msg}"),
            RouteError::Http(status) => write!(f, "routing service returned HTTP {status}"),
            RouteError::Malformed(msg) => write!(f, "routing response malformed: {msg}"),
            RouteError::Service(msg) => write!(f, "routing service error: {msg}"),
            RouteError::Empty => write!(f, "routing service returned no route"),
        }
    }
}

impl std::error::Error for RouteError {}

/// Boxed future without a `Send` bound, so browser fetches can implement the
/// provider too.
pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// An external routing service.
pub trait RouteProvider {
    /// Short label for logs (`"osrm"`, `"fake"`, ...).
    fn name(&self) -> &str;

    /// Looks up a driving route between two points.
    ///
    /// Implementations map transport failures and non-success statuses to
    /// [`RouteError`]; they never retry.
    fn route(
        &self,
        from: GeoPoint,
        to: GeoPoint,
    ) -> LocalBoxFuture<'_, Result<RouteResponse, RouteError>>;
}

#[cfg(test)]
mod tests {
    use super::RouteError;

    #[test]
    fn errors_render_their_cause() {
        assert_eq!(
            RouteError::Http(500).to_string(),
            "routing service returned HTTP 500"
        );
        assert_eq!(
            RouteError::Empty.to_string(),
            "routing service returned no route"
        );
    }
}
