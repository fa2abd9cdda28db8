//! Fixed parking fee schedule

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::vehicle::VehicleClass;

/// Hours covered by the base fee
pub const BASE_HOURS: i64 = 4;

const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

/// Rate for one vehicle class, in whole currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRate {
    /// Flat fee for the first [`BASE_HOURS`] hours
    pub base: i64,
    /// Charge per hour beyond [`BASE_HOURS`]
    pub per_hour: i64,
}

/// Hard-coded fee table. Not configurable.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeeSchedule;

impl FeeSchedule {
    pub fn rate(&self, class: VehicleClass) -> FeeRate {
        match class {
            VehicleClass::TwoWheeler => FeeRate {
                base: 40,
                per_hour: 20,
            },
            VehicleClass::HeavyMotorVehicle => FeeRate {
                base: 120,
                per_hour: 70,
            },
            VehicleClass::ElectricVehicle => FeeRate {
                base: 100,
                per_hour: 50,
            },
            VehicleClass::LightMotorVehicle => FeeRate {
                base: 80,
                per_hour: 30,
            },
        }
    }

    /// Fee for `hours` whole hours parked
    pub fn fee(&self, class: VehicleClass, hours: i64) -> i64 {
        self.quote(class, hours).total
    }

    /// Fee with its components
    pub fn quote(&self, class: VehicleClass, hours: i64) -> FeeBreakdown {
        let rate = self.rate(class);
        let hours = hours.max(0);
        let extra_hours = (hours - BASE_HOURS).max(0);
        let extra_charge = extra_hours * rate.per_hour;

        FeeBreakdown {
            class,
            hours,
            base: rate.base,
            extra_hours,
            extra_charge,
            total: rate.base + extra_charge,
        }
    }
}

/// Parked duration in whole hours, rounded half-up.
///
/// An exit earlier than the entry (clock skew) counts as zero hours.
pub fn billable_hours(entry: DateTime<Utc>, exit: DateTime<Utc>) -> i64 {
    let millis = (exit - entry).num_milliseconds().max(0);
    (millis + MILLIS_PER_HOUR / 2) / MILLIS_PER_HOUR
}

/// Components of a computed parking fee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub class: VehicleClass,
    /// Billable hours after rounding
    pub hours: i64,
    pub base: i64,
    pub extra_hours: i64,
    pub extra_charge: i64,
    pub total: i64,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn base_fee_covers_first_four_hours() {
        let s = FeeSchedule;
        for hours in 0..=4 {
            assert_eq!(s.fee(VehicleClass::LightMotorVehicle, hours), 80);
            assert_eq!(s.fee(VehicleClass::TwoWheeler, hours), 40);
        }
    }

    #[test]
    fn six_hours_per_class() {
        let s = FeeSchedule;
        assert_eq!(s.fee(VehicleClass::LightMotorVehicle, 6), 140);
        assert_eq!(s.fee(VehicleClass::TwoWheeler, 6), 80);
        assert_eq!(s.fee(VehicleClass::HeavyMotorVehicle, 6), 260);
        assert_eq!(s.fee(VehicleClass::ElectricVehicle, 6), 200);
    }

    #[test]
    fn quote_breakdown() {
        let q = FeeSchedule.quote(VehicleClass::HeavyMotorVehicle, 7);
        assert_eq!(q.base, 120);
        assert_eq!(q.extra_hours, 3);
        assert_eq!(q.extra_charge, 210);
        assert_eq!(q.total, 330);
    }

    #[test]
    fn negative_hours_bill_as_zero() {
        let q = FeeSchedule.quote(VehicleClass::ElectricVehicle, -3);
        assert_eq!(q.hours, 0);
        assert_eq!(q.total, 100);
    }

    #[test]
    fn billable_hours_rounds_half_up() {
        let entry = t0();
        assert_eq!(billable_hours(entry, entry), 0);
        assert_eq!(billable_hours(entry, entry + Duration::minutes(29)), 0);
        assert_eq!(billable_hours(entry, entry + Duration::minutes(30)), 1);
        assert_eq!(billable_hours(entry, entry + Duration::minutes(269)), 4);
        assert_eq!(billable_hours(entry, entry + Duration::minutes(270)), 5);
        assert_eq!(billable_hours(entry, entry + Duration::hours(6)), 6);
    }

    #[test]
    fn billable_hours_clamps_skew() {
        let entry = t0();
        assert_eq!(billable_hours(entry, entry - Duration::hours(2)), 0);
    }
}
