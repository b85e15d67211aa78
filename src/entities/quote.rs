use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingTable {
    pub base_fare: f64,
    pub per_mile: f64,
    pub per_minute: f64,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self {
            base_fare: 50.0,
            per_mile: 3.0,
            per_minute: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub base_fare: f64,
    pub distance_cost: f64,
    pub time_cost: f64,
    pub vehicle_rate: f64,
    pub total: f64,
}

impl PricingResult {
    /// Line items formatted for display, in the order they are shown to the customer.
    pub fn breakdown(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Base fare", format_money(self.base_fare)),
            ("Distance", format_money(self.distance_cost)),
            ("Time", format_money(self.time_cost)),
            ("Vehicle", format_money(self.vehicle_rate)),
            ("Total", format_money(self.total)),
        ]
    }
}

pub fn format_money(amount: f64) -> String {
    format!("${:.2}", amount)
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quote {
    pub token: Uuid,
    pub vehicle_id: String,
    pub distance_miles: f64,
    pub duration_minutes: u32,
    pub pricing: PricingResult,
}

impl Quote {
    pub fn new(
        vehicle_id: String,
        distance_miles: f64,
        duration_minutes: u32,
        pricing: PricingResult,
    ) -> Self {
        Self {
            token: Uuid::new_v4(),
            vehicle_id,
            distance_miles,
            duration_minutes,
            pricing,
        }
    }
}

#[test]
fn money_is_shown_with_two_decimals() {
    assert_eq!(format_money(254.4), "$254.40");
    assert_eq!(format_money(36.900000000000006), "$36.90");
    assert_eq!(format_money(0.0), "$0.00");
}
