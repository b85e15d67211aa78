use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt::{self, Debug, Display};

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

pub const ENV_VAR_ERROR: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const UPSTREAM_ERROR: i32 = 4;
pub const UNEXPECTED_ERROR: i32 = 5;
pub const DECODE_ERROR: i32 = 6;
pub const INVALID_INPUT_ERROR: i32 = 101;
pub const PRICING_INPUT_ERROR: i32 = 102;
pub const BACKEND_ERROR: i32 = 103;

impl Error {
    pub fn is_invalid_input(&self) -> bool {
        self.code == INVALID_INPUT_ERROR
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        decode_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: INVALID_INPUT_ERROR,
        message: "invalid input".into(),
    }
}

pub fn missing_location_error() -> Error {
    Error {
        code: INVALID_INPUT_ERROR,
        message: "Please enter both pickup and dropoff locations".into(),
    }
}

pub fn pricing_input_error(field: &str) -> Error {
    Error {
        code: PRICING_INPUT_ERROR,
        message: format!("invalid pricing input: {}", field),
    }
}

pub fn backend_error(message: String) -> Error {
    Error {
        code: BACKEND_ERROR,
        message,
    }
}

pub fn config_error(name: &str) -> Error {
    Error {
        code: ENV_VAR_ERROR,
        message: format!("invalid value for {}", name),
    }
}

/// The request URL is dropped: provider URLs carry the API key as a query parameter.
pub fn reqwest_error(err: reqwest::Error) -> Error {
    Error {
        code: TRANSPORT_ERROR,
        message: format!("reqwest error: {}", err.without_url()),
    }
}

pub fn http_status_error(status: u16) -> Error {
    Error {
        code: TRANSPORT_ERROR,
        message: format!("HTTP error! status: {}", status),
    }
}

pub fn provider_error(status: &str, detail: Option<&str>) -> Error {
    Error {
        code: UPSTREAM_ERROR,
        message: format!(
            "Google Maps API Error: {} - {}",
            status,
            detail.unwrap_or("Unknown error")
        ),
    }
}

pub fn unexpected_error() -> Error {
    Error {
        code: UNEXPECTED_ERROR,
        message: "unexpected error".into(),
    }
}

pub fn decode_error<T: Debug>(err: T) -> Error {
    Error {
        code: DECODE_ERROR,
        message: format!("decode error: {:?}", err),
    }
}

#[test]
fn client_errors_render_message() {
    let response = pricing_input_error("distance").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = provider_error("REQUEST_DENIED", None).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = backend_error("Booking not found".into()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn error_codes_by_kind() {
    assert!(missing_location_error().is_invalid_input());
    assert!(invalid_input_error().is_invalid_input());
    assert_eq!(http_status_error(502).code, TRANSPORT_ERROR);
    assert_eq!(decode_error("eof").code, DECODE_ERROR);
    assert_eq!(http_status_error(404).message, "HTTP error! status: 404");
}
