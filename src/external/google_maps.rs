use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    error::{http_status_error, provider_error, Error},
    external::{Directions, DirectionsProvider},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Measure {
    value: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Leg {
    distance: Measure,
    duration: Measure,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct Polyline {
    #[serde(default)]
    points: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct DirectionsRoute {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    overview_polyline: Option<Polyline>,
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
    error_message: Option<String>,
}

impl Response {
    fn into_directions(self) -> Result<Directions, Error> {
        if self.status != "OK" {
            return Err(provider_error(&self.status, self.error_message.as_deref()));
        }

        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| provider_error(&self.status, Some("no routes returned")))?;

        Ok(Directions {
            distance_meters: route.legs.iter().map(|leg| leg.distance.value).sum(),
            duration_seconds: route.legs.iter().map(|leg| leg.duration.value).sum(),
            summary: route.summary,
            polyline: route.overview_polyline.unwrap_or_default().points,
        })
    }
}

pub struct GoogleMaps {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl GoogleMaps {
    pub fn new(api_base: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
            api_key,
        }
    }

    // a bare host means https
    fn directions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');

        if base.contains("://") {
            format!("{}/maps/api/directions/json", base)
        } else {
            format!("https://{}/maps/api/directions/json", base)
        }
    }
}

#[async_trait]
impl DirectionsProvider for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn find_directions(
        &self,
        origin: &str,
        destination: &str,
        waypoints: &[String],
    ) -> Result<Directions, Error> {
        let mut request = self
            .client
            .get(self.directions_url())
            .query(&[("origin", origin)])
            .query(&[("destination", destination)]);

        if !waypoints.is_empty() {
            request = request.query(&[("waypoints", waypoints.join("|"))]);
        }

        let res = request
            .query(&[
                ("mode", "driving"),
                ("traffic_model", "best_guess"),
                ("departure_time", "now"),
            ])
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if status_code != 200 {
            return Err(http_status_error(status_code));
        }

        let data: Response = res.json().await?;

        tracing::info!(status = %data.status, "directions response");

        data.into_directions()
    }
}

#[test]
fn legs_are_summed() {
    let body = r#"{
        "status": "OK",
        "routes": [{
            "summary": "I-678 S",
            "overview_polyline": { "points": "a~l~Fjk~uOwHJy@P" },
            "legs": [
                { "distance": { "value": 12000 }, "duration": { "value": 1200 } },
                { "distance": { "value": 7795 }, "duration": { "value": 900 } }
            ]
        }]
    }"#;

    let directions = serde_json::from_str::<Response>(body)
        .unwrap()
        .into_directions()
        .unwrap();

    assert_eq!(directions.distance_meters, 19795.0);
    assert_eq!(directions.duration_seconds, 2100.0);
    assert_eq!(directions.summary, "I-678 S");
    assert_eq!(directions.polyline, "a~l~Fjk~uOwHJy@P");
}

#[test]
fn non_ok_status_is_a_provider_error() {
    let body = r#"{"status": "REQUEST_DENIED", "routes": [], "error_message": "The provided API key is invalid."}"#;

    let err = serde_json::from_str::<Response>(body)
        .unwrap()
        .into_directions()
        .unwrap_err();

    assert_eq!(err.code, crate::error::UPSTREAM_ERROR);
    assert_eq!(
        err.message,
        "Google Maps API Error: REQUEST_DENIED - The provided API key is invalid."
    );

    let body = r#"{"status": "OK", "routes": []}"#;
    assert!(serde_json::from_str::<Response>(body)
        .unwrap()
        .into_directions()
        .is_err());
}

#[test]
fn bare_host_defaults_to_https() {
    let maps = GoogleMaps::new("maps.googleapis.com".into(), "k".into());
    assert_eq!(
        maps.directions_url(),
        "https://maps.googleapis.com/maps/api/directions/json"
    );

    let maps = GoogleMaps::new("http://127.0.0.1:8080/".into(), "k".into());
    assert_eq!(
        maps.directions_url(),
        "http://127.0.0.1:8080/maps/api/directions/json"
    );
}

#[test]
fn connect_failure_does_not_leak_the_key() {
    let maps = GoogleMaps::new("127.0.0.1:1".into(), "SECRET-MAPS-KEY".into());

    let err = tokio_test::block_on(maps.find_directions("JFK Airport", "Manhattan Hotel", &[]))
        .unwrap_err();

    assert_eq!(err.code, crate::error::TRANSPORT_ERROR);
    assert!(!err.message.contains("SECRET-MAPS-KEY"));
    assert!(!err.message.contains("key="));
}
