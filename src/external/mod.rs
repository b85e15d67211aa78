pub mod google_maps;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Raw provider totals over every leg of the route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Directions {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub summary: String,
    pub polyline: String,
}

#[async_trait]
pub trait DirectionsProvider {
    async fn find_directions(
        &self,
        origin: &str,
        destination: &str,
        waypoints: &[String],
    ) -> Result<Directions, Error>;
}

pub type DynProvider = Box<dyn DirectionsProvider + Send + Sync>;
