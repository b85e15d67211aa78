pub mod quotes;
pub mod routes;
pub mod vehicles;

use axum::extract::Json;
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
