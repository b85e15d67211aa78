use super::Engine;

use crate::{
    api::QuoteAPI,
    entities::{find_vehicle, fleet, Quote, VehicleTier},
    error::{invalid_input_error, Error},
};

impl QuoteAPI for Engine {
    fn list_vehicles(&self) -> Vec<VehicleTier> {
        fleet()
    }

    #[tracing::instrument(skip(self))]
    fn create_quote(
        &self,
        vehicle_id: &str,
        distance_miles: f64,
        duration_minutes: f64,
    ) -> Result<Quote, Error> {
        let vehicle = find_vehicle(vehicle_id).ok_or_else(invalid_input_error)?;
        let pricing = self
            .pricing
            .price(distance_miles, duration_minutes, &vehicle)?;

        Ok(Quote::new(
            vehicle.id,
            distance_miles,
            duration_minutes.round() as u32,
            pricing,
        ))
    }
}

#[test]
fn quote_for_known_vehicle() {
    use crate::engine::fallback::FixedFraction;

    let engine = Engine::new(None, Box::new(FixedFraction(0.5)));
    let quote = engine.create_quote("2", 10.0, 30.0).unwrap();

    assert_eq!(quote.pricing.total, 50.0 + 30.0 + 15.0 + 200.0);
    assert_eq!(quote.duration_minutes, 30);
    assert_eq!(engine.list_vehicles().len(), 3);
}

#[test]
fn quote_rejects_unknown_vehicle_and_bad_numbers() {
    use crate::engine::fallback::FixedFraction;

    let engine = Engine::new(None, Box::new(FixedFraction(0.5)));

    assert!(engine
        .create_quote("limo", 10.0, 30.0)
        .unwrap_err()
        .is_invalid_input());
    assert_eq!(
        engine.create_quote("1", -2.0, 30.0).unwrap_err().code,
        crate::error::PRICING_INPUT_ERROR
    );
}
