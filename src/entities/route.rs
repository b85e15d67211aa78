use serde::{Deserialize, Serialize};

use crate::entities::Location;
use crate::error::{decode_error, Error};

pub const METERS_PER_MILE: f64 = 1609.34;

/// Rounds to one decimal place.
pub fn round_miles(miles: f64) -> f64 {
    (miles * 10.0).round() / 10.0
}

pub fn round_minutes(minutes: f64) -> u32 {
    minutes.round().max(0.0) as u32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    Live,
    Fallback,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteEstimate {
    pub distance_miles: f64,
    pub duration_minutes: u32,
    pub summary: String,
    pub source: SourceTag,
    pub polyline: String,
    pub waypoints: Vec<Location>,
}

impl RouteEstimate {
    pub fn is_fallback(&self) -> bool {
        self.source == SourceTag::Fallback
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Success,
    Fallback,
}

impl From<RouteStatus> for SourceTag {
    fn from(status: RouteStatus) -> Self {
        match status {
            RouteStatus::Success => SourceTag::Live,
            RouteStatus::Fallback => SourceTag::Fallback,
        }
    }
}

/// Body of the route-calculation endpoint, both for live and degraded answers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub distance: f64,
    pub duration: u32,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub polyline: String,
    #[serde(default)]
    pub waypoints: Vec<Location>,
    pub status: RouteStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RouteResponse {
    pub fn success(estimate: RouteEstimate) -> Self {
        Self {
            distance: estimate.distance_miles,
            duration: estimate.duration_minutes,
            summary: estimate.summary,
            polyline: estimate.polyline,
            waypoints: estimate.waypoints,
            status: RouteStatus::Success,
            error: None,
        }
    }

    pub fn degraded(estimate: RouteEstimate, error: String) -> Self {
        Self {
            distance: estimate.distance_miles,
            duration: estimate.duration_minutes,
            summary: estimate.summary,
            polyline: estimate.polyline,
            waypoints: estimate.waypoints,
            status: RouteStatus::Fallback,
            error: Some(error),
        }
    }

    /// Checks the numbers and re-applies the rounding contract.
    pub fn into_estimate(self) -> Result<RouteEstimate, Error> {
        if !self.distance.is_finite() || self.distance < 0.0 {
            return Err(decode_error(format!("distance {}", self.distance)));
        }

        Ok(RouteEstimate {
            distance_miles: round_miles(self.distance),
            duration_minutes: self.duration,
            summary: self.summary,
            source: self.status.into(),
            polyline: self.polyline,
            waypoints: self.waypoints,
        })
    }
}

#[test]
fn rounding_contract() {
    assert_eq!(round_miles(12.345), 12.3);
    assert_eq!(round_miles(7.96), 8.0);
    assert_eq!(round_minutes(34.5), 35);
    assert_eq!(round_minutes(-0.2), 0);
}

#[test]
fn degraded_response_keeps_error_and_maps_to_fallback() {
    let body = r#"{
        "distance": 20.0,
        "duration": 60,
        "summary": "Estimated route (API unavailable)",
        "polyline": "",
        "waypoints": [],
        "status": "fallback",
        "error": "Google Maps API key not configured"
    }"#;

    let response: RouteResponse = serde_json::from_str(body).unwrap();
    assert_eq!(
        response.error.as_deref(),
        Some("Google Maps API key not configured")
    );

    let estimate = response.into_estimate().unwrap();
    assert_eq!(estimate.source, SourceTag::Fallback);
    assert_eq!(estimate.summary, "Estimated route (API unavailable)");
}

#[test]
fn success_response_omits_error_field() {
    let estimate = RouteEstimate {
        distance_miles: 12.3,
        duration_minutes: 35,
        summary: "I-678 S".into(),
        source: SourceTag::Live,
        polyline: "abc".into(),
        waypoints: vec!["JFK".into(), "Manhattan".into()],
    };

    let value = serde_json::to_value(RouteResponse::success(estimate)).unwrap();
    assert_eq!(value["status"], "success");
    assert_eq!(value["duration"], 35);
    assert!(value.get("error").is_none());
}

#[test]
fn unknown_status_or_negative_distance_is_rejected() {
    let body = r#"{"distance": 3.0, "duration": 9, "status": "error"}"#;
    assert!(serde_json::from_str::<RouteResponse>(body).is_err());

    let body = r#"{"distance": -3.0, "duration": 9, "status": "success"}"#;
    let response: RouteResponse = serde_json::from_str(body).unwrap();
    assert!(response.into_estimate().is_err());
}
