use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::entities::{Location, PricingResult, RouteEstimate, RouteRequest, VehicleTier};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Unknown or missing statuses read as confirmed, which is how the backend reports
    /// freshly created bookings.
    pub fn parse(status: Option<&str>) -> Self {
        match status.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("pending") => Self::Pending,
            Some("in_progress") | Some("in-progress") => Self::InProgress,
            Some("completed") => Self::Completed,
            Some("cancelled") | Some("canceled") => Self::Cancelled,
            _ => Self::Confirmed,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::Pending => "pending".into(),
            Self::Confirmed => "confirmed".into(),
            Self::InProgress => "in_progress".into(),
            Self::Completed => "completed".into(),
            Self::Cancelled => "cancelled".into(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub distance: f64,
    pub duration: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssignedVehicle {
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub plate: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriverInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub vehicle: Option<AssignedVehicle>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub pickup: Location,
    pub dropoff: Location,
    pub stops: Vec<Location>,
    pub date: String,
    pub time: String,
    pub vehicle_id: String,
    pub passengers: u32,
    pub notes: String,
    pub status: BookingStatus,
    pub total: f64,
    pub route: RouteSummary,
    pub driver: Option<DriverInfo>,
    pub rating: Option<u8>,
    pub review: Option<String>,
    pub created_at: String,
}

impl Booking {
    pub fn can_cancel(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }

    pub fn can_rate(&self) -> bool {
        self.status == BookingStatus::Completed && self.rating.is_none()
    }

    pub fn can_delete(&self) -> bool {
        matches!(
            self.status,
            BookingStatus::Confirmed | BookingStatus::Cancelled
        )
    }
}

pub fn filter_by_status(bookings: &[Booking], status: BookingStatus) -> Vec<&Booking> {
    bookings.iter().filter(|b| b.status == status).collect()
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PricingDto {
    pub total: Option<f64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RouteDto {
    pub distance: Option<f64>,
    pub duration: Option<f64>,
}

/// Booking as the backend returns it. Field names vary between backend versions, so
/// everything is optional and resolved in `From<BookingDto> for Booking`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDto {
    pub id: Option<String>,
    pub pickup: Option<String>,
    pub pickup_address: Option<String>,
    pub dropoff: Option<String>,
    pub dropoff_address: Option<String>,
    pub stops: Option<Vec<String>>,
    pub date: Option<String>,
    pub scheduled_date: Option<String>,
    pub time: Option<String>,
    pub scheduled_time: Option<String>,
    pub vehicle_id: Option<String>,
    pub vehicle_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_whole")]
    pub passengers: Option<u32>,
    #[serde(default, deserialize_with = "lenient_whole")]
    pub passenger_count: Option<u32>,
    pub notes: Option<String>,
    pub special_notes: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total_amount: Option<f64>,
    pub pricing: Option<PricingDto>,
    pub route: Option<RouteDto>,
    pub driver: Option<DriverInfo>,
    #[serde(default, deserialize_with = "lenient_whole")]
    pub rating: Option<u8>,
    pub review: Option<String>,
    pub created_at: Option<String>,
}

// Numbers sometimes arrive as strings. Anything that is not a whole number in range
// reads as missing instead of failing the whole booking.
fn lenient_whole<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let whole = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };

    Ok(whole.and_then(|n| T::try_from(n).ok()))
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };

    Ok(amount.filter(|a: &f64| a.is_finite()))
}

// Empty strings count as missing, like the zero passenger count below.
fn first_filled(candidates: [Option<String>; 3]) -> Option<String> {
    candidates.into_iter().flatten().find(|s| !s.is_empty())
}

impl From<BookingDto> for Booking {
    fn from(dto: BookingDto) -> Self {
        let created_at = dto.created_at.filter(|s| !s.is_empty());

        // pickup <- pickup | pickupAddress, dropoff likewise
        let pickup = first_filled([dto.pickup, dto.pickup_address, None]).unwrap_or_default();
        let dropoff = first_filled([dto.dropoff, dto.dropoff_address, None]).unwrap_or_default();

        // date <- date | scheduledDate | createdAt
        let date = first_filled([dto.date, dto.scheduled_date, created_at.clone()])
            .unwrap_or_default();
        let time = first_filled([dto.time, dto.scheduled_time, None]).unwrap_or_default();
        let vehicle_id =
            first_filled([dto.vehicle_id, dto.vehicle_type, None]).unwrap_or_default();
        let notes = first_filled([dto.notes, dto.special_notes, None]).unwrap_or_default();

        let passengers = [dto.passengers, dto.passenger_count]
            .into_iter()
            .flatten()
            .find(|&n| n > 0)
            .unwrap_or(1);

        // totalAmount takes precedence even when it is zero
        let total = dto
            .total_amount
            .or_else(|| dto.pricing.and_then(|p| p.total))
            .unwrap_or(0.0);

        let route = dto
            .route
            .map(|r| RouteSummary {
                distance: r.distance.unwrap_or(0.0),
                duration: r.duration.unwrap_or(0.0),
            })
            .unwrap_or_default();

        Self {
            id: dto.id.unwrap_or_default(),
            pickup,
            dropoff,
            stops: dto.stops.unwrap_or_default(),
            date,
            time,
            vehicle_id,
            passengers,
            notes,
            status: BookingStatus::parse(dto.status.as_deref()),
            total,
            route,
            driver: dto.driver,
            rating: dto.rating,
            review: dto.review,
            created_at: created_at.unwrap_or_else(|| Utc::now().to_rfc3339()),
        }
    }
}

/// Payload for creating a booking on the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub pickup_address: Location,
    pub dropoff_address: Location,
    pub stops: Vec<Location>,
    pub scheduled_date: String,
    pub scheduled_time: String,
    pub passenger_count: u32,
    pub vehicle_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_notes: Option<String>,
    pub total_amount: f64,
    pub route: RouteSummary,
}

impl NewBooking {
    pub fn new(
        request: &RouteRequest,
        estimate: &RouteEstimate,
        vehicle: &VehicleTier,
        pricing: &PricingResult,
        scheduled_date: String,
        scheduled_time: String,
        passenger_count: u32,
        notes: Option<String>,
    ) -> Self {
        Self {
            pickup_address: request.pickup.clone(),
            dropoff_address: request.dropoff.clone(),
            stops: request.filled_stops(),
            scheduled_date,
            scheduled_time,
            passenger_count,
            vehicle_type: vehicle.id.clone(),
            special_notes: notes.filter(|n| !n.trim().is_empty()),
            total_amount: pricing.total,
            route: RouteSummary {
                distance: estimate.distance_miles,
                duration: estimate.duration_minutes as f64,
            },
        }
    }
}

#[test]
fn dto_prefers_primary_fields_then_aliases() {
    let dto: BookingDto = serde_json::from_value(serde_json::json!({
        "id": "b-1",
        "pickupAddress": "JFK Airport",
        "dropoff": "Manhattan Hotel",
        "dropoffAddress": "ignored",
        "scheduledDate": "2024-06-01",
        "scheduledTime": "09:30",
        "vehicleType": "2",
        "passengerCount": 4,
        "specialNotes": "child seat",
        "status": "in_progress",
        "pricing": { "total": 310.5 },
        "route": { "distance": 18.2 },
        "createdAt": "2024-05-01T10:00:00Z"
    }))
    .unwrap();

    let booking = Booking::from(dto);

    assert_eq!(booking.pickup, "JFK Airport");
    assert_eq!(booking.dropoff, "Manhattan Hotel");
    assert_eq!(booking.date, "2024-06-01");
    assert_eq!(booking.time, "09:30");
    assert_eq!(booking.vehicle_id, "2");
    assert_eq!(booking.passengers, 4);
    assert_eq!(booking.notes, "child seat");
    assert_eq!(booking.status, BookingStatus::InProgress);
    assert_eq!(booking.total, 310.5);
    assert_eq!(booking.route.distance, 18.2);
    assert_eq!(booking.route.duration, 0.0);
    assert!(booking.stops.is_empty());
}

#[test]
fn dto_fallbacks_for_missing_fields() {
    let dto: BookingDto = serde_json::from_value(serde_json::json!({
        "id": "b-2",
        "pickup": "",
        "pickupAddress": "Union Station",
        "passengers": 0,
        "totalAmount": 0.0,
        "pricing": { "total": 99.0 },
        "createdAt": "2024-05-01T10:00:00Z"
    }))
    .unwrap();

    let booking = Booking::from(dto);

    assert_eq!(booking.pickup, "Union Station");
    assert_eq!(booking.date, "2024-05-01T10:00:00Z");
    assert_eq!(booking.time, "");
    assert_eq!(booking.passengers, 1);
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.total, 0.0);
    assert_eq!(booking.created_at, "2024-05-01T10:00:00Z");
}

#[test]
fn malformed_numbers_fall_back_per_field() {
    let dtos: Vec<BookingDto> = serde_json::from_value(serde_json::json!([
        { "id": "b-1", "passengers": "2", "totalAmount": "254.40", "rating": 4.5 },
        { "id": "b-2", "passengers": -1, "passengerCount": 3.0, "rating": "5" },
        { "id": "b-3", "passengers": "many", "rating": 300, "totalAmount": null }
    ]))
    .unwrap();

    let bookings: Vec<Booking> = dtos.into_iter().map(Booking::from).collect();

    assert_eq!(bookings[0].passengers, 2);
    assert_eq!(bookings[0].total, 254.4);
    assert_eq!(bookings[0].rating, None);

    assert_eq!(bookings[1].passengers, 1);
    assert_eq!(bookings[1].rating, Some(5));

    assert_eq!(bookings[2].passengers, 1);
    assert_eq!(bookings[2].rating, None);
    assert_eq!(bookings[2].total, 0.0);
}

#[test]
fn actions_follow_status() {
    let mut booking = Booking::from(BookingDto::default());
    assert!(!booking.created_at.is_empty());
    assert!(booking.can_cancel() && booking.can_delete() && !booking.can_rate());

    booking.status = BookingStatus::Completed;
    assert!(!booking.can_cancel() && !booking.can_delete() && booking.can_rate());

    booking.rating = Some(5);
    assert!(!booking.can_rate());

    booking.status = BookingStatus::Cancelled;
    assert!(booking.can_delete());
}

#[test]
fn status_filter() {
    let statuses = ["completed", "confirmed", "cancelled", "completed"];
    let bookings: Vec<Booking> = statuses
        .iter()
        .map(|s| {
            Booking::from(BookingDto {
                status: Some((*s).into()),
                ..BookingDto::default()
            })
        })
        .collect();

    assert_eq!(filter_by_status(&bookings, BookingStatus::Completed).len(), 2);
    assert_eq!(filter_by_status(&bookings, BookingStatus::InProgress).len(), 0);
    assert_eq!(BookingStatus::parse(Some("in-progress")).label(), "In Progress");
}
