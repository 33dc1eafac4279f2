use std::time::Duration;

use foundation::math::GeoPoint;
use reqwest::Client;
use routing::{route_url, LocalBoxFuture, RouteError, RouteProvider, RouteResponse};

/// OSRM lookups over `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestRouteProvider {
    client: Client,
    base_url: String,
}

impl ReqwestRouteProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl RouteProvider for ReqwestRouteProvider {
    fn name(&self) -> &str {
        "osrm-reqwest"
    }

    fn route(
        &self,
        from: GeoPoint,
        to: GeoPoint,
    ) -> LocalBoxFuture<'_, Result<RouteResponse, RouteError>> {
        let url = route_url(&self.base_url, from, to);
        Box::pin(async move {
            let resp = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| RouteError::Transport(e.to_string()))?;

            let status = resp.status();
            if !status.is_success() {
                return Err(RouteError::Http(status.as_u16()));
            }

            let text = resp
                .text()
                .await
                .map_err(|e| RouteError::Transport(e.to_string()))?;
            RouteResponse::from_json_str(&text)
        })
    }
}
