//! Route estimates that need no directions provider.
//!
//! Two tiers: [`estimate`] guesses each leg from the address text and draws a
//! distance from a range picked by that guess, [`last_resort`] only looks at the
//! number of stops and is fully deterministic.

use std::ops::Range;

use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::entities::{round_miles, round_minutes, Location, RouteEstimate, SourceTag};

const ROAD_OVERHEAD: f64 = 1.4;
const MINUTES_PER_MILE: f64 = 3.2;
const MINUTES_PER_STOP: f64 = 3.0;

const LAST_RESORT_BASE_MILES: f64 = 8.0;
const LAST_RESORT_MILES_PER_STOP: f64 = 3.0;
const LAST_RESORT_MINUTES_PER_MILE: f64 = 2.8;

/// Source of leg distances. Production code samples uniformly, tests can pin values.
pub trait DistanceSampler {
    /// Returns a value in `range` (start inclusive, end exclusive).
    fn sample(&mut self, range: Range<f64>) -> f64;
}

#[derive(Debug)]
pub struct RandomSampler<R>(pub R);

impl<R: Rng> DistanceSampler for RandomSampler<R> {
    fn sample(&mut self, range: Range<f64>) -> f64 {
        Uniform::new(range.start, range.end).sample(&mut self.0)
    }
}

pub type DynSampler = Box<dyn DistanceSampler + Send>;

pub fn entropy_sampler() -> DynSampler {
    use rand::{rngs::StdRng, SeedableRng};

    Box::new(RandomSampler(StdRng::from_entropy()))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Leg {
    SameArea,
    CrossTown,
    City,
}

impl Leg {
    pub fn classify(from: &str, to: &str) -> Self {
        let from = from.to_lowercase();
        let to = to.to_lowercase();

        if same_area(&from, &to) {
            return Leg::SameArea;
        }

        let cross_town = (from.contains("north") && to.contains("south"))
            || (from.contains("east") && to.contains("west"))
            || (from.contains("downtown") && (to.contains("suburb") || to.contains("airport")));

        if cross_town {
            Leg::CrossTown
        } else {
            Leg::City
        }
    }

    /// Miles, before road overhead.
    pub fn range(&self) -> Range<f64> {
        match self {
            Leg::SameArea => 1.0..4.0,
            Leg::CrossTown => 8.0..23.0,
            Leg::City => 3.0..13.0,
        }
    }
}

// One address contains the other's leading word. A leading space makes that word
// empty, which matches everything.
fn same_area(a: &str, b: &str) -> bool {
    let first_word = |s: &str| s.split(' ').next().unwrap_or("").to_string();

    a.contains(first_word(b).as_str()) || b.contains(first_word(a).as_str())
}

/// Heuristic estimate over `waypoints` (pickup, stops, dropoff).
///
/// The summary names the number of stops and ends with `reason` in parentheses.
pub fn estimate(
    sampler: &mut dyn DistanceSampler,
    waypoints: &[Location],
    reason: &str,
) -> RouteEstimate {
    let stop_count = waypoints.len().saturating_sub(2);

    let straight_line: f64 = waypoints
        .windows(2)
        .map(|pair| sampler.sample(Leg::classify(&pair[0], &pair[1]).range()))
        .sum();

    let distance_miles = round_miles(straight_line * ROAD_OVERHEAD);
    let duration = distance_miles * MINUTES_PER_MILE + stop_count as f64 * MINUTES_PER_STOP;

    RouteEstimate {
        distance_miles,
        duration_minutes: round_minutes(duration),
        summary: format!("Estimated route with {} stops ({})", stop_count, reason),
        source: SourceTag::Fallback,
        polyline: String::new(),
        waypoints: waypoints.to_vec(),
    }
}

/// Estimate from the stop count alone, for when not even the addresses are known.
pub fn last_resort(stop_count: usize) -> RouteEstimate {
    let distance_miles = LAST_RESORT_BASE_MILES + LAST_RESORT_MILES_PER_STOP * stop_count as f64;

    RouteEstimate {
        distance_miles,
        duration_minutes: round_minutes(distance_miles * LAST_RESORT_MINUTES_PER_MILE),
        summary: "Estimated route (API unavailable)".into(),
        source: SourceTag::Fallback,
        polyline: String::new(),
        waypoints: vec![],
    }
}

#[cfg(test)]
pub(crate) struct FixedFraction(pub f64);

#[cfg(test)]
impl DistanceSampler for FixedFraction {
    fn sample(&mut self, range: Range<f64>) -> f64 {
        range.start + (range.end - range.start) * self.0
    }
}

#[cfg(test)]
fn waypoints(names: &[&str]) -> Vec<Location> {
    names.iter().map(|&n| n.to_string()).collect()
}

#[test]
fn classifies_legs_from_address_text() {
    assert_eq!(
        Leg::classify("Main Street 12", "main street 40"),
        Leg::SameArea
    );
    assert_eq!(
        Leg::classify("North Station", "South Beach"),
        Leg::CrossTown
    );
    assert_eq!(
        Leg::classify("Downtown Plaza", "JFK Airport"),
        Leg::CrossTown
    );
    assert_eq!(
        Leg::classify("JFK Airport Terminal 4", "Manhattan Hotel"),
        Leg::City
    );
    assert_eq!(Leg::classify(" Hotel", "Pier 17"), Leg::SameArea);
}

#[test]
fn estimate_at_range_bounds() {
    let route = waypoints(&["JFK Airport Terminal 4", "Manhattan Hotel"]);

    // lowest draw: 3 miles * 1.4
    let low = estimate(&mut FixedFraction(0.0), &route, "network error");
    assert_eq!(low.distance_miles, 4.2);
    assert_eq!(low.duration_minutes, 13);

    let high = estimate(&mut FixedFraction(0.999), &route, "network error");
    assert!(high.distance_miles <= 18.2);
    assert_eq!(
        high.duration_minutes,
        round_minutes(high.distance_miles * 3.2)
    );
    assert_eq!(high.summary, "Estimated route with 0 stops (network error)");
    assert_eq!(high.source, SourceTag::Fallback);
}

#[test]
fn random_estimates_stay_in_bounds() {
    use rand::{rngs::StdRng, SeedableRng};

    let mut sampler = RandomSampler(StdRng::seed_from_u64(7));
    let route = waypoints(&["North End", "Union Square", "South Boston"]);

    for _ in 0..200 {
        let e = estimate(&mut sampler, &route, "API unavailable");
        // two legs, each in [1, 23) miles, times road overhead
        assert!(e.distance_miles >= 2.8 && e.distance_miles <= 64.4);
        assert_eq!(round_miles(e.distance_miles), e.distance_miles);
        assert_eq!(
            e.duration_minutes,
            round_minutes(e.distance_miles * 3.2 + 3.0)
        );
        assert!(e.summary.contains("1 stops"));
    }
}

#[test]
fn adding_a_stop_never_shortens_the_trip() {
    let direct = waypoints(&["Logan Airport", "Harvard Square"]);
    let with_stop = waypoints(&["Logan Airport", "Fenway Park", "Harvard Square"]);

    for fraction in [0.0, 0.25, 0.5, 0.75, 0.99] {
        let a = estimate(&mut FixedFraction(fraction), &direct, "network error");
        let b = estimate(&mut FixedFraction(fraction), &with_stop, "network error");

        assert!(b.duration_minutes >= a.duration_minutes + 3);
        assert_eq!(b.waypoints.len(), 3);
    }
}

#[test]
fn last_resort_is_deterministic() {
    let none = last_resort(0);
    assert_eq!(none.distance_miles, 8.0);
    assert_eq!(none.duration_minutes, 22);

    let two = last_resort(2);
    assert_eq!(two.distance_miles, 14.0);
    assert_eq!(two.duration_minutes, 39);
    assert_eq!(two.summary, "Estimated route (API unavailable)");
    assert!(two.is_fallback());
}
