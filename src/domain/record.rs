//! Parking record domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One occupancy episode linking a vehicle to a slot over a time interval.
///
/// State machine: created active and unpaid; `close()` flips `is_active` to
/// false exactly once and fixes the billed duration; `mark_paid()` flips
/// `is_paid` to true exactly once. Neither flag ever transitions back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingRecord {
    /// Unique record ID
    pub id: String,
    pub slot_id: String,
    pub vehicle_id: String,
    /// Operator who parked the vehicle (always the vehicle's owner)
    pub operator_id: String,
    pub entry_time: DateTime<Utc>,
    /// Set once, when the record is closed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<DateTime<Utc>>,
    /// Billed duration in whole hours, rounded up. Set once, at close.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<i64>,
    pub is_active: bool,
    pub is_paid: bool,
}

impl ParkingRecord {
    pub fn new(
        slot_id: impl Into<String>,
        vehicle_id: impl Into<String>,
        operator_id: impl Into<String>,
        entry_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            slot_id: slot_id.into(),
            vehicle_id: vehicle_id.into(),
            operator_id: operator_id.into(),
            entry_time,
            exit_time: None,
            duration_hours: None,
            is_active: true,
            is_paid: false,
        }
    }

    /// Close the occupancy episode. Irreversible.
    pub fn close(&mut self, exit_time: DateTime<Utc>, duration_hours: i64) {
        self.exit_time = Some(exit_time);
        self.duration_hours = Some(duration_hours);
        self.is_active = false;
    }

    /// Mark the record settled. Irreversible.
    pub fn mark_paid(&mut self) {
        self.is_paid = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_sets_exit_and_duration() {
        let t0 = Utc::now();
        let mut record = ParkingRecord::new("slot-1", "car-1", "op-1", t0);
        assert!(record.is_active);
        assert!(!record.is_paid);

        let exit = t0 + chrono::Duration::hours(2);
        record.close(exit, 2);

        assert!(!record.is_active);
        assert_eq!(record.exit_time, Some(exit));
        assert_eq!(record.duration_hours, Some(2));
    }
}
