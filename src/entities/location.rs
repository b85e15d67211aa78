use serde::{Deserialize, Serialize};

use crate::error::{missing_location_error, Error};

/// Free-text address as typed by the customer.
pub type Location = String;

pub fn is_blank(location: &str) -> bool {
    location.trim().is_empty()
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub pickup: Location,
    pub dropoff: Location,
    #[serde(default)]
    pub stops: Vec<Location>,
}

impl RouteRequest {
    pub fn new(pickup: impl Into<Location>, dropoff: impl Into<Location>) -> Self {
        Self {
            pickup: pickup.into(),
            dropoff: dropoff.into(),
            stops: vec![],
        }
    }

    pub fn with_stops<I, S>(mut self, stops: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Location>,
    {
        self.stops = stops.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if is_blank(&self.pickup) || is_blank(&self.dropoff) {
            return Err(missing_location_error());
        }

        Ok(())
    }

    /// Stops in the order the customer entered them, blanks removed.
    pub fn filled_stops(&self) -> Vec<Location> {
        self.stops
            .iter()
            .filter(|stop| !is_blank(stop))
            .cloned()
            .collect()
    }

    /// Pickup, filled stops, dropoff.
    pub fn waypoints(&self) -> Vec<Location> {
        let mut waypoints = Vec::with_capacity(self.stops.len() + 2);
        waypoints.push(self.pickup.clone());
        waypoints.extend(self.filled_stops());
        waypoints.push(self.dropoff.clone());
        waypoints
    }

    /// Copy with blank stops dropped, as sent to the route endpoint.
    pub fn normalized(&self) -> Self {
        Self {
            pickup: self.pickup.clone(),
            dropoff: self.dropoff.clone(),
            stops: self.filled_stops(),
        }
    }
}

#[test]
fn blank_stops_are_filtered_in_order() {
    let request = RouteRequest::new("JFK Airport", "Manhattan Hotel").with_stops([
        "Queens Mall",
        "  ",
        "",
        "Brooklyn Bridge",
    ]);

    assert_eq!(request.filled_stops(), vec!["Queens Mall", "Brooklyn Bridge"]);
    assert_eq!(
        request.waypoints(),
        vec!["JFK Airport", "Queens Mall", "Brooklyn Bridge", "Manhattan Hotel"]
    );
    assert_eq!(request.normalized().stops.len(), 2);
}

#[test]
fn blank_pickup_or_dropoff_is_invalid() {
    assert!(RouteRequest::new("  ", "Manhattan").validate().unwrap_err().is_invalid_input());
    assert!(RouteRequest::new("JFK", "").validate().unwrap_err().is_invalid_input());
    assert!(RouteRequest::new("JFK", "Manhattan").validate().is_ok());
}

#[test]
fn stops_default_when_absent_from_json() {
    let request: RouteRequest =
        serde_json::from_str(r#"{"pickup":"JFK","dropoff":"Manhattan"}"#).unwrap();

    assert!(request.stops.is_empty());
}
