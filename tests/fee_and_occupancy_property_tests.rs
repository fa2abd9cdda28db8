//! Property-based tests for fee computation and spot occupancy

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use parking_facility::domain::spot::{ParkingSpot, SpotId};
use parking_facility::domain::tariff::{billable_hours, FeeSchedule, BASE_HOURS};
use parking_facility::{ParkingError, Vehicle, VehicleClass};

fn class_strategy() -> impl Strategy<Value = VehicleClass> {
    prop_oneof![
        Just(VehicleClass::TwoWheeler),
        Just(VehicleClass::LightMotorVehicle),
        Just(VehicleClass::HeavyMotorVehicle),
        Just(VehicleClass::ElectricVehicle),
    ]
}

proptest! {
    /// Fee never decreases as the stay gets longer.
    #[test]
    fn prop_fee_is_monotonic_in_duration(
        class in class_strategy(),
        a in 0i64..=7 * 24 * 60,
        b in 0i64..=7 * 24 * 60,
    ) {
        let (short, long) = if a <= b { (a, b) } else { (b, a) };
        let entry = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let schedule = FeeSchedule;

        let short_fee = schedule.fee(class, billable_hours(entry, entry + Duration::minutes(short)));
        let long_fee = schedule.fee(class, billable_hours(entry, entry + Duration::minutes(long)));

        prop_assert!(short_fee <= long_fee);
    }

    /// Anything up to the base period costs exactly the base fee.
    #[test]
    fn prop_fee_is_flat_within_base_period(
        class in class_strategy(),
        minutes in 0i64..=BASE_HOURS * 60,
    ) {
        let entry = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let hours = billable_hours(entry, entry + Duration::minutes(minutes));
        let schedule = FeeSchedule;

        prop_assert_eq!(schedule.fee(class, hours), schedule.rate(class).base);
    }

    /// Occupy, release and occupy again always succeed on one spot, and the
    /// occupancy flag tracks the stored vehicle throughout.
    #[test]
    fn prop_occupancy_round_trip(
        class in class_strategy(),
        rounds in 1usize..20,
        reg in "[A-Z]{2}[0-9]{2}[A-Z]{2}[0-9]{4}",
    ) {
        let spot = Arc::new(ParkingSpot::new(SpotId::new(1), class));

        for round in 0..rounds {
            let vehicle = Vehicle::new(class, format!("{}{}", reg, round));
            prop_assert!(spot.occupy(&vehicle).is_ok());
            prop_assert!(spot.is_occupied());
            prop_assert_eq!(spot.parked_vehicle(), Some(vehicle.clone()));

            let second = Vehicle::new(class, "OTHER1");
            let is_occupied_err = matches!(spot.occupy(&second), Err(ParkingError::AlreadyOccupied { .. }));
            prop_assert!(is_occupied_err);

            let released = spot.release();
            prop_assert_eq!(released.ok(), Some(vehicle));
            prop_assert!(!spot.is_occupied());
            prop_assert!(spot.parked_vehicle().is_none());
        }

        let is_empty_err = matches!(spot.release(), Err(ParkingError::AlreadyEmpty { .. }));
        prop_assert!(is_empty_err);
    }
}
