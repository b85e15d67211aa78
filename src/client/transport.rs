use std::time::Duration;

use async_trait::async_trait;

use crate::entities::{RouteRequest, RouteResponse};
use crate::error::{http_status_error, Error};

/// One attempt at the route-calculation endpoint.
#[async_trait]
pub trait RouteTransport {
    async fn calculate_route(&self, request: &RouteRequest) -> Result<RouteResponse, Error>;
}

pub type DynTransport = Box<dyn RouteTransport + Send + Sync>;

/// JSON over HTTP to the same-origin `/api/calculate-route` endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: String, timeout: Option<Duration>) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }
}

#[async_trait]
impl RouteTransport for HttpTransport {
    #[tracing::instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn calculate_route(&self, request: &RouteRequest) -> Result<RouteResponse, Error> {
        let res = self.client.post(&self.endpoint).json(request).send().await?;

        let status_code = res.status().as_u16();

        if !res.status().is_success() {
            return Err(http_status_error(status_code));
        }

        let bytes = res.bytes().await?;
        let data: RouteResponse = serde_json::from_slice(&bytes)?;

        Ok(data)
    }
}
