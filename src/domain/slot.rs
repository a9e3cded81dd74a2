//! Parking slot domain entity

use serde::{Deserialize, Serialize};

/// Slot occupancy status.
///
/// The stored status is redundant with the active-record lookup; the two are
/// kept consistent by a single update path: only the occupancy engine and
/// slot provisioning ever write it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Occupied,
    Reserved,
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Occupied => write!(f, "occupied"),
            Self::Reserved => write!(f, "reserved"),
        }
    }
}

/// A physical parking space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    /// Unique slot ID
    pub id: String,
    /// Human-readable slot number, e.g. `A1-003`
    pub slot_number: String,
    /// Zone tag, e.g. `A`
    pub zone: String,
    /// Level within the zone
    pub level: u32,
    /// Sequence number within (zone, level). Never reused.
    pub sequence: u32,
    pub status: SlotStatus,
}

impl Slot {
    pub fn new(zone: impl Into<String>, level: u32, sequence: u32) -> Self {
        let zone = zone.into();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            slot_number: format!("{}{}-{:03}", zone, level, sequence),
            zone,
            level,
            sequence,
            status: SlotStatus::Available,
        }
    }

    /// Location tag shown in listings, e.g. `Zone A, Level 1`
    pub fn location(&self) -> String {
        format!("Zone {}, Level {}", self.zone, self.level)
    }

    pub fn is_available(&self) -> bool {
        self.status == SlotStatus::Available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_number_format() {
        let slot = Slot::new("A", 1, 7);
        assert_eq!(slot.slot_number, "A1-007");
        assert_eq!(slot.location(), "Zone A, Level 1");
        assert!(slot.is_available());
    }
}
