use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::entities::Quote;
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    vehicle_id: String,
    distance: f64,
    duration: f64,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateParams>,
) -> Result<Json<Quote>, Error> {
    let quote = api.create_quote(&params.vehicle_id, params.distance, params.duration)?;

    Ok(quote.into())
}
