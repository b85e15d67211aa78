use axum::extract::{Extension, Json};

use crate::entities::VehicleTier;
use crate::server::DynAPI;

pub async fn list(Extension(api): Extension<DynAPI>) -> Json<Vec<VehicleTier>> {
    api.list_vehicles().into()
}
