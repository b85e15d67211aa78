use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleTier {
    pub id: String,
    pub name: String,
    pub description: String,
    pub capacity: u32,
    pub flat_rate: f64,
    pub features: Vec<String>,
}

impl VehicleTier {
    fn new(
        id: &str,
        name: &str,
        description: &str,
        capacity: u32,
        flat_rate: f64,
        features: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            capacity,
            flat_rate,
            features: features.iter().map(|&f| f.into()).collect(),
        }
    }

    pub fn seats(&self, passengers: u32) -> bool {
        passengers > 0 && passengers <= self.capacity
    }
}

/// The bookable vehicle classes.
pub fn fleet() -> Vec<VehicleTier> {
    vec![
        VehicleTier::new(
            "1",
            "Luxury Sedan",
            "Mercedes-Benz S-Class or similar",
            3,
            150.0,
            &["Leather seats", "Climate control", "Wi-Fi", "Water bottles"],
        ),
        VehicleTier::new(
            "2",
            "Premium SUV",
            "Cadillac Escalade or similar",
            6,
            200.0,
            &[
                "Extra space",
                "Premium sound",
                "Privacy partition",
                "Refreshments",
            ],
        ),
        VehicleTier::new(
            "3",
            "Executive Van",
            "Mercedes Sprinter or similar",
            12,
            300.0,
            &[
                "Group seating",
                "Conference setup",
                "Entertainment system",
                "Catering space",
            ],
        ),
    ]
}

pub fn find_vehicle(id: &str) -> Option<VehicleTier> {
    fleet().into_iter().find(|v| v.id == id)
}

#[test]
fn fleet_has_three_tiers() {
    let fleet = fleet();

    assert_eq!(fleet.len(), 3);
    assert!(fleet.iter().all(|v| v.capacity > 0 && v.flat_rate >= 0.0));
    assert_eq!(find_vehicle("2").unwrap().name, "Premium SUV");
    assert!(find_vehicle("4").is_none());
}

#[test]
fn capacity_check() {
    let van = find_vehicle("3").unwrap();

    assert!(van.seats(12));
    assert!(!van.seats(13));
    assert!(!van.seats(0));
}
