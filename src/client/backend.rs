use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::auth::{AuthResponse, Registration, Session, User};
use crate::config::Config;
use crate::entities::{Booking, BookingDto, NewBooking};
use crate::error::{backend_error, Error};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub client_secret: String,
}

/// Client for the booking and payment backend.
///
/// Every request carries the session's current bearer token, so signing in through
/// one clone of the session authenticates all clients sharing it.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

// Non-2xx bodies usually carry `{"message": ...}`; anything unreadable is reported
// as a network error.
fn error_message(status: u16, body: &[u8]) -> String {
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => value
            .get("message")
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .map(String::from)
            .unwrap_or_else(|| format!("HTTP error! status: {}", status)),
        Err(_) => "Network error".into(),
    }
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, session: Session) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn from_config(config: &Config, session: Session) -> Self {
        Self::new(config.backend_url.clone(), session)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let req = self
            .http
            .request(method, format!("{}{}", self.base_url, endpoint));

        match self.session.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, Error> {
        let res = req.send().await?;
        let status = res.status();
        let bytes = res.bytes().await?;

        if !status.is_success() {
            let message = error_message(status.as_u16(), &bytes);
            tracing::warn!(status = status.as_u16(), %message, "backend request failed");
            return Err(backend_error(message));
        }

        if bytes.is_empty() {
            return Ok(serde_json::from_value(Value::Null)?);
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, Error> {
        let req = self
            .request(Method::POST, "/api/auth/login")
            .json(&json!({ "email": email, "password": password }));
        let auth: AuthResponse = self.send(req).await?;

        self.session.sign_in(auth.user.clone(), auth.token);

        Ok(auth.user)
    }

    #[tracing::instrument(skip_all, fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<User, Error> {
        let req = self
            .request(Method::POST, "/api/auth/register")
            .json(registration);
        let auth: AuthResponse = self.send(req).await?;

        self.session.sign_in(auth.user.clone(), auth.token);

        Ok(auth.user)
    }

    /// The local session is cleared even when the backend call fails.
    #[tracing::instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), Error> {
        let result: Result<Value, Error> =
            self.send(self.request(Method::POST, "/api/auth/logout")).await;

        self.session.sign_out();

        result.map(|_| ())
    }

    pub async fn profile(&self) -> Result<User, Error> {
        self.send(self.request(Method::GET, "/api/auth/profile"))
            .await
    }

    pub async fn update_profile(&self, changes: &Value) -> Result<User, Error> {
        let req = self
            .request(Method::PUT, "/api/auth/profile")
            .json(changes);

        self.send(req).await
    }

    pub async fn user_by_email(&self, email: &str) -> Result<User, Error> {
        let req = self
            .request(Method::GET, "/api/users")
            .query(&[("email", email)]);

        self.send(req).await
    }

    #[tracing::instrument(skip_all)]
    pub async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, Error> {
        let req = self.request(Method::POST, "/api/bookings").json(booking);
        let dto: BookingDto = self.send(req).await?;

        Ok(dto.into())
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_bookings(&self, user_id: Option<&str>) -> Result<Vec<Booking>, Error> {
        let mut req = self.request(Method::GET, "/api/bookings");
        if let Some(user_id) = user_id {
            req = req.query(&[("userId", user_id)]);
        }

        let dtos: Vec<BookingDto> = self.send(req).await?;

        Ok(dtos.into_iter().map(Booking::from).collect())
    }

    pub async fn get_booking(&self, id: &str) -> Result<Booking, Error> {
        let dto: BookingDto = self
            .send(self.request(Method::GET, &format!("/api/bookings/{}", id)))
            .await?;

        Ok(dto.into())
    }

    pub async fn update_booking(&self, id: &str, changes: &Value) -> Result<Booking, Error> {
        let req = self
            .request(Method::PUT, &format!("/api/bookings/{}", id))
            .json(changes);
        let dto: BookingDto = self.send(req).await?;

        Ok(dto.into())
    }

    pub async fn rate_booking(
        &self,
        id: &str,
        rating: u8,
        review: Option<&str>,
    ) -> Result<Booking, Error> {
        self.update_booking(id, &json!({ "rating": rating, "review": review }))
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn cancel_booking(&self, id: &str, reason: Option<&str>) -> Result<Booking, Error> {
        let req = self
            .request(Method::POST, &format!("/api/bookings/{}/cancel", id))
            .json(&json!({ "reason": reason }));
        let dto: BookingDto = self.send(req).await?;

        Ok(dto.into())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_booking(&self, id: &str) -> Result<(), Error> {
        let _: Value = self
            .send(self.request(Method::DELETE, &format!("/api/bookings/{}", id)))
            .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn create_payment_intent(
        &self,
        amount: f64,
        booking_id: &str,
    ) -> Result<PaymentIntent, Error> {
        let req = self
            .request(Method::POST, "/api/payments/create-intent")
            .json(&json!({ "amount": amount, "bookingId": booking_id }));

        self.send(req).await
    }

    pub async fn confirm_payment(
        &self,
        payment_intent_id: &str,
        payment_method_id: &str,
    ) -> Result<Value, Error> {
        let req = self
            .request(Method::POST, "/api/payments/confirm")
            .json(&json!({
                "paymentIntentId": payment_intent_id,
                "paymentMethodId": payment_method_id,
            }));

        self.send(req).await
    }

    pub async fn payment_history(&self) -> Result<Vec<Value>, Error> {
        self.send(self.request(Method::GET, "/api/payments/history"))
            .await
    }

    pub async fn driver_trips(&self) -> Result<Vec<Booking>, Error> {
        let dtos: Vec<BookingDto> = self
            .send(self.request(Method::GET, "/api/driver/trips"))
            .await?;

        Ok(dtos.into_iter().map(Booking::from).collect())
    }

    pub async fn update_driver_status(&self, status: &str) -> Result<Value, Error> {
        let req = self
            .request(Method::PUT, "/api/driver/status")
            .json(&json!({ "status": status }));

        self.send(req).await
    }

    pub async fn driver_earnings(&self) -> Result<Value, Error> {
        self.send(self.request(Method::GET, "/api/driver/earnings"))
            .await
    }

    /// True when the backend answers its health check with a 2xx.
    pub async fn is_reachable(&self) -> bool {
        match self.request(Method::GET, "/api/health").send().await {
            Ok(res) => res.status().is_success(),
            Err(err) => {
                tracing::warn!(error = %err, "backend unreachable");
                false
            }
        }
    }
}

#[test]
fn error_messages_follow_the_body() {
    assert_eq!(
        error_message(401, br#"{"message": "Invalid credentials"}"#),
        "Invalid credentials"
    );
    assert_eq!(error_message(500, br#"{"error": "boom"}"#), "HTTP error! status: 500");
    assert_eq!(error_message(502, b"<html>Bad gateway</html>"), "Network error");
}

#[test]
fn base_url_trailing_slash_is_dropped() {
    let client = BackendClient::new("http://localhost:3000/", Session::anonymous());

    assert_eq!(client.base_url, "http://localhost:3000");
    assert!(!client.session().is_authenticated());
}

#[test]
fn base_url_comes_from_config() {
    let config = Config::from_lookup(|name| match name {
        "BACKEND_URL" => Some("https://api.example.com/".into()),
        _ => None,
    })
    .unwrap();

    let client = BackendClient::from_config(&config, Session::with_token("tok"));

    assert_eq!(client.base_url, "https://api.example.com");
    assert!(client.session().is_authenticated());
}
