use std::env;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::error::{config_error, Error};

const API_KEY_PLACEHOLDER: &str = "your_google_maps_api_key_here";

#[derive(Clone, Debug)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub google_maps_api_base: String,
    pub google_maps_api_key: Option<String>,
    pub route_endpoint: String,
    pub backend_url: String,
    pub route_timeout: Option<Duration>,
}

impl Config {
    /// Reads the process environment. Call `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = match lookup("HOST") {
            Some(value) => value.parse().map_err(|_| config_error("HOST"))?,
            None => IpAddr::from([127, 0, 0, 1]),
        };

        let port = match lookup("PORT") {
            Some(value) => value.parse().map_err(|_| config_error("PORT"))?,
            None => 3000,
        };

        let route_timeout = match lookup("ROUTE_TIMEOUT_SECS") {
            Some(value) => Some(Duration::from_secs(
                value.parse().map_err(|_| config_error("ROUTE_TIMEOUT_SECS"))?,
            )),
            None => None,
        };

        let google_maps_api_key = lookup("GOOGLE_MAPS_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty() && key != API_KEY_PLACEHOLDER);

        Ok(Self {
            host,
            port,
            google_maps_api_base: lookup("GOOGLE_MAPS_API_BASE")
                .unwrap_or_else(|| "maps.googleapis.com".into()),
            google_maps_api_key,
            route_endpoint: lookup("ROUTE_ENDPOINT")
                .unwrap_or_else(|| format!("http://127.0.0.1:{}/api/calculate-route", port)),
            backend_url: lookup("BACKEND_URL").unwrap_or_else(|| "http://localhost:3000".into()),
            route_timeout,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[test]
fn defaults_without_environment() {
    let config = Config::from_lookup(|_| None).unwrap();

    assert_eq!(config.addr(), SocketAddr::from(([127, 0, 0, 1], 3000)));
    assert_eq!(config.google_maps_api_base, "maps.googleapis.com");
    assert!(config.google_maps_api_key.is_none());
    assert_eq!(
        config.route_endpoint,
        "http://127.0.0.1:3000/api/calculate-route"
    );
    assert!(config.route_timeout.is_none());
}

#[test]
fn placeholder_api_key_is_treated_as_missing() {
    let config = Config::from_lookup(|name| match name {
        "GOOGLE_MAPS_API_KEY" => Some(API_KEY_PLACEHOLDER.into()),
        _ => None,
    })
    .unwrap();
    assert!(config.google_maps_api_key.is_none());

    let config = Config::from_lookup(|name| match name {
        "GOOGLE_MAPS_API_KEY" => Some("abc123".into()),
        "PORT" => Some("8080".into()),
        "ROUTE_TIMEOUT_SECS" => Some("10".into()),
        _ => None,
    })
    .unwrap();
    assert_eq!(config.google_maps_api_key.as_deref(), Some("abc123"));
    assert_eq!(config.port, 8080);
    assert_eq!(config.route_timeout, Some(Duration::from_secs(10)));
}

#[test]
fn malformed_port_is_rejected() {
    let result = Config::from_lookup(|name| match name {
        "PORT" => Some("not-a-port".into()),
        _ => None,
    });

    assert_eq!(result.unwrap_err().code, crate::error::ENV_VAR_ERROR);
}
