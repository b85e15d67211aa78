use crate::entities::{PricingResult, PricingTable, RouteEstimate, VehicleTier};
use crate::error::{pricing_input_error, Error};

fn checked(value: f64, field: &str) -> Result<f64, Error> {
    if !value.is_finite() || value < 0.0 {
        return Err(pricing_input_error(field));
    }

    Ok(value)
}

impl PricingTable {
    /// Price of a trip of `distance_miles` and `duration_minutes` in `vehicle`.
    ///
    /// Always computed from scratch; the total is the plain sum of the four line items.
    pub fn price(
        &self,
        distance_miles: f64,
        duration_minutes: f64,
        vehicle: &VehicleTier,
    ) -> Result<PricingResult, Error> {
        let distance_miles = checked(distance_miles, "distance")?;
        let duration_minutes = checked(duration_minutes, "duration")?;
        let vehicle_rate = checked(vehicle.flat_rate, "vehicle rate")?;
        let base_fare = checked(self.base_fare, "base fare")?;

        let distance_cost = distance_miles * checked(self.per_mile, "per mile")?;
        let time_cost = duration_minutes * checked(self.per_minute, "per minute")?;

        Ok(PricingResult {
            base_fare,
            distance_cost,
            time_cost,
            vehicle_rate,
            total: base_fare + distance_cost + time_cost + vehicle_rate,
        })
    }

    pub fn price_estimate(
        &self,
        estimate: &RouteEstimate,
        vehicle: &VehicleTier,
    ) -> Result<PricingResult, Error> {
        self.price(
            estimate.distance_miles,
            estimate.duration_minutes as f64,
            vehicle,
        )
    }

    /// Splits a stored booking total back into line items, attributing whatever the
    /// route does not explain to the vehicle.
    pub fn recover(
        &self,
        total: f64,
        distance_miles: f64,
        duration_minutes: f64,
    ) -> Result<PricingResult, Error> {
        let total = checked(total, "total")?;
        let distance_cost = checked(distance_miles, "distance")? * self.per_mile;
        let time_cost = checked(duration_minutes, "duration")? * self.per_minute;

        Ok(PricingResult {
            base_fare: self.base_fare,
            distance_cost,
            time_cost,
            vehicle_rate: total - self.base_fare - distance_cost - time_cost,
            total,
        })
    }
}

#[cfg(test)]
fn sedan() -> VehicleTier {
    crate::entities::find_vehicle("1").unwrap()
}

#[test]
fn live_route_price() {
    let result = PricingTable::default().price(12.3, 35.0, &sedan()).unwrap();

    assert!((result.total - 254.4).abs() < 1e-9);
    assert_eq!(result.time_cost, 17.5);
    assert_eq!(result.vehicle_rate, 150.0);
    assert_eq!(
        result.total,
        result.base_fare + result.distance_cost + result.time_cost + result.vehicle_rate
    );
    assert_eq!(result.breakdown()[4].1, "$254.40");
}

#[test]
fn repeated_pricing_is_bit_identical() {
    let table = PricingTable::default();
    let a = table.price(17.9, 61.0, &sedan()).unwrap();
    let b = table.price(17.9, 61.0, &sedan()).unwrap();

    assert_eq!(a.total.to_bits(), b.total.to_bits());
}

#[test]
fn total_is_monotonic_in_distance_and_duration() {
    let table = PricingTable::default();
    let vehicle = sedan();

    let mut previous = 0.0;
    for step in 0..50 {
        let total = table.price(step as f64 * 0.7, 30.0, &vehicle).unwrap().total;
        assert!(total >= previous);
        previous = total;
    }

    let mut previous = 0.0;
    for minutes in 0..120 {
        let total = table.price(10.0, minutes as f64, &vehicle).unwrap().total;
        assert!(total >= previous);
        previous = total;
    }
}

#[test]
fn invalid_numbers_are_rejected() {
    let table = PricingTable::default();

    let err = table.price(-1.0, 10.0, &sedan()).unwrap_err();
    assert_eq!(err.code, crate::error::PRICING_INPUT_ERROR);
    assert!(table.price(1.0, f64::NAN, &sedan()).is_err());
    assert!(table.price(f64::INFINITY, 1.0, &sedan()).is_err());
}

#[test]
fn recover_vehicle_rate_from_booking_total() {
    let table = PricingTable::default();
    let result = table.recover(254.4, 12.3, 35.0).unwrap();

    assert!((result.vehicle_rate - 150.0).abs() < 1e-9);
    assert_eq!(result.total, 254.4);
}
