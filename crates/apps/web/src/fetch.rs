use foundation::math::GeoPoint;
use gloo_net::http::Request;
use routing::{LocalBoxFuture, RouteError, RouteProvider, RouteResponse, route_url};

/// OSRM lookups through the browser's `fetch`.
#[derive(Debug, Clone)]
pub struct FetchRouteProvider {
    base_url: String,
}

impl FetchRouteProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl RouteProvider for FetchRouteProvider {
    fn name(&self) -> &str {
        "osrm-fetch"
    }

    fn route(
        &self,
        from: GeoPoint,
        to: GeoPoint,
    ) -> LocalBoxFuture<'_, Result<RouteResponse, RouteError>> {
        let url = route_url(&self.base_url, from, to);
        Box::pin(async move {
            let resp = Request::get(&url)
                .send()
                .await
                .map_err(|e| RouteError::Transport(e.to_string()))?;

            if !resp.ok() {
                return Err(RouteError::Http(resp.status()));
            }

            let text = resp
                .text()
                .await
                .map_err(|e| RouteError::Transport(e.to_string()))?;
            RouteResponse::from_json_str(&text)
        })
    }
}
