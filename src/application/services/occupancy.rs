//! Slot-occupancy state machine
//!
//! Owns every slot status transition: a slot becomes occupied only when an
//! active record is created for it, and available only when that record is
//! closed. Nothing else writes slot status, which keeps the stored field and
//! the active-record lookup in agreement.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::billing::billable_hours;
use crate::domain::{
    Actor, DomainError, DomainResult, ParkingRecord, Slot, SlotStatus,
};
use crate::infrastructure::Store;

pub struct OccupancyService {
    store: Arc<dyn Store>,
}

impl OccupancyService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Park a vehicle in a slot, opening a new parking record.
    ///
    /// Operators may only park vehicles they own. An admin may assign on
    /// behalf of the owner; the record's operator is always the vehicle's
    /// owner, never the admin.
    pub async fn assign_vehicle(
        &self,
        actor: &Actor,
        slot_id: &str,
        vehicle_id: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<ParkingRecord> {
        let slot = self
            .store
            .get_slot(slot_id)
            .await?
            .ok_or_else(|| DomainError::not_found("slot", slot_id))?;

        // A reserved slot has no active record but is not assignable either.
        if slot.status == SlotStatus::Reserved {
            return Err(DomainError::SlotUnavailable(slot.slot_number));
        }

        if self
            .store
            .get_active_record_for_slot(slot_id)
            .await?
            .is_some()
        {
            return Err(DomainError::SlotUnavailable(slot.slot_number));
        }

        let vehicle = self
            .store
            .get_vehicle(vehicle_id)
            .await?
            .ok_or_else(|| DomainError::not_found("vehicle", vehicle_id))?;

        if !actor.can_access(&vehicle.operator_id) {
            return Err(DomainError::Forbidden(format!(
                "vehicle {} belongs to another operator",
                vehicle.plate_number
            )));
        }

        if self
            .store
            .get_active_record_for_vehicle(vehicle_id)
            .await?
            .is_some()
        {
            return Err(DomainError::VehicleAlreadyParked(vehicle.plate_number));
        }

        let record = ParkingRecord::new(slot_id, vehicle_id, &vehicle.operator_id, now);
        self.store.save_record(record.clone()).await?;
        self.store
            .update_slot_status(slot_id, SlotStatus::Occupied)
            .await?;

        info!(
            slot = %slot.slot_number,
            plate = %vehicle.plate_number,
            operator = %vehicle.operator_id,
            "vehicle assigned to slot"
        );

        Ok(record)
    }

    /// Close an active parking record and free its slot.
    ///
    /// Fixes the billed duration (whole hours, rounded up, minimum 1). The
    /// slot is immediately assignable again even though the record may still
    /// be unpaid.
    pub async fn release_slot(
        &self,
        actor: &Actor,
        record_id: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<ParkingRecord> {
        let mut record = self
            .store
            .get_record(record_id)
            .await?
            .ok_or_else(|| DomainError::not_found("parking record", record_id))?;

        if !actor.can_access(&record.operator_id) {
            return Err(DomainError::Forbidden(
                "parking record belongs to another operator".to_string(),
            ));
        }

        if !record.is_active {
            return Err(DomainError::RecordNotActive(record.id));
        }

        let duration = billable_hours(record.entry_time, now);
        record.close(now, duration);
        self.store.update_record(record.clone()).await?;
        self.store
            .update_slot_status(&record.slot_id, SlotStatus::Available)
            .await?;

        info!(
            record = %record.id,
            hours = duration,
            "slot released"
        );

        Ok(record)
    }

    /// Slot IDs whose stored status disagrees with the active-record lookup.
    /// Empty on a healthy store; exercised by the invariant tests.
    pub async fn inconsistent_slots(&self) -> DomainResult<Vec<String>> {
        let mut out = Vec::new();
        for slot in self.store.list_slots().await? {
            let has_active = self
                .store
                .get_active_record_for_slot(&slot.id)
                .await?
                .is_some();
            let consistent = match slot.status {
                SlotStatus::Occupied => has_active,
                SlotStatus::Available | SlotStatus::Reserved => !has_active,
            };
            if !consistent {
                out.push(slot.id);
            }
        }
        Ok(out)
    }

    pub async fn get_slot(&self, id: &str) -> DomainResult<Slot> {
        self.store
            .get_slot(id)
            .await?
            .ok_or_else(|| DomainError::not_found("slot", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Vehicle;
    use crate::infrastructure::MemoryStore;

    async fn setup() -> (Arc<MemoryStore>, OccupancyService, Slot, Vehicle, Actor) {
        let store = Arc::new(MemoryStore::new());
        let service = OccupancyService::new(store.clone());

        let slot = Slot::new("A", 1, 1);
        store.save_slot(slot.clone()).await.unwrap();

        let vehicle = Vehicle::new("RAB 123 C", "Jean Bosco", "+250788111222", "op-1");
        store.save_vehicle(vehicle.clone()).await.unwrap();

        (store, service, slot, vehicle, Actor::operator("op-1"))
    }

    #[tokio::test]
    async fn assign_marks_slot_occupied() {
        let (store, service, slot, vehicle, actor) = setup().await;
        let t0 = Utc::now();

        let record = service
            .assign_vehicle(&actor, &slot.id, &vehicle.id, t0)
            .await
            .unwrap();

        assert!(record.is_active);
        assert!(!record.is_paid);
        assert_eq!(record.entry_time, t0);
        assert_eq!(record.operator_id, "op-1");

        let slot = store.get_slot(&slot.id).await.unwrap().unwrap();
        assert_eq!(slot.status, SlotStatus::Occupied);
    }

    #[tokio::test]
    async fn occupied_slot_refuses_second_vehicle() {
        let (store, service, slot, vehicle, actor) = setup().await;
        service
            .assign_vehicle(&actor, &slot.id, &vehicle.id, Utc::now())
            .await
            .unwrap();

        let other = Vehicle::new("RAC 456 D", "Alice", "+250788333444", "op-1");
        store.save_vehicle(other.clone()).await.unwrap();

        let err = service
            .assign_vehicle(&actor, &slot.id, &other.id, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SlotUnavailable(_)));

        // No record was created for the refused assignment
        assert!(store
            .get_active_record_for_vehicle(&other.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn parked_vehicle_refuses_second_slot() {
        let (store, service, slot, vehicle, actor) = setup().await;
        service
            .assign_vehicle(&actor, &slot.id, &vehicle.id, Utc::now())
            .await
            .unwrap();

        let other_slot = Slot::new("A", 1, 2);
        store.save_slot(other_slot.clone()).await.unwrap();

        let err = service
            .assign_vehicle(&actor, &other_slot.id, &vehicle.id, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::VehicleAlreadyParked(_)));
    }

    #[tokio::test]
    async fn reserved_slot_is_not_assignable() {
        let (store, service, slot, vehicle, actor) = setup().await;
        store
            .update_slot_status(&slot.id, SlotStatus::Reserved)
            .await
            .unwrap();

        let err = service
            .assign_vehicle(&actor, &slot.id, &vehicle.id, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SlotUnavailable(_)));
    }

    #[tokio::test]
    async fn operator_cannot_park_foreign_vehicle() {
        let (_, service, slot, vehicle, _) = setup().await;
        let stranger = Actor::operator("op-2");

        let err = service
            .assign_vehicle(&stranger, &slot.id, &vehicle.id, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn admin_assigns_on_behalf_of_owner() {
        let (_, service, slot, vehicle, _) = setup().await;
        let admin = Actor::admin("admin-1");

        let record = service
            .assign_vehicle(&admin, &slot.id, &vehicle.id, Utc::now())
            .await
            .unwrap();
        // Record is attributed to the vehicle's owner, not the admin
        assert_eq!(record.operator_id, "op-1");
    }

    #[tokio::test]
    async fn release_rounds_duration_up() {
        let (store, service, slot, vehicle, actor) = setup().await;
        let t0 = Utc::now();
        let record = service
            .assign_vehicle(&actor, &slot.id, &vehicle.id, t0)
            .await
            .unwrap();

        let exit = t0 + chrono::Duration::hours(2) + chrono::Duration::minutes(15);
        let released = service.release_slot(&actor, &record.id, exit).await.unwrap();

        assert!(!released.is_active);
        assert_eq!(released.duration_hours, Some(3));
        assert_eq!(released.exit_time, Some(exit));

        let slot = store.get_slot(&slot.id).await.unwrap().unwrap();
        assert_eq!(slot.status, SlotStatus::Available);
    }

    #[tokio::test]
    async fn release_is_irreversible() {
        let (_, service, slot, vehicle, actor) = setup().await;
        let record = service
            .assign_vehicle(&actor, &slot.id, &vehicle.id, Utc::now())
            .await
            .unwrap();
        service
            .release_slot(&actor, &record.id, Utc::now())
            .await
            .unwrap();

        let err = service
            .release_slot(&actor, &record.id, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::RecordNotActive(_)));
    }

    #[tokio::test]
    async fn released_slot_is_immediately_assignable() {
        let (store, service, slot, vehicle, actor) = setup().await;
        let record = service
            .assign_vehicle(&actor, &slot.id, &vehicle.id, Utc::now())
            .await
            .unwrap();
        service
            .release_slot(&actor, &record.id, Utc::now())
            .await
            .unwrap();

        let other = Vehicle::new("RAC 456 D", "Alice", "+250788333444", "op-1");
        store.save_vehicle(other.clone()).await.unwrap();
        service
            .assign_vehicle(&actor, &slot.id, &other.id, Utc::now())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn stored_status_matches_derived_lookup() {
        let (store, service, slot, vehicle, actor) = setup().await;
        let extra = Slot::new("B", 2, 1);
        store.save_slot(extra.clone()).await.unwrap();

        assert!(service.inconsistent_slots().await.unwrap().is_empty());

        let record = service
            .assign_vehicle(&actor, &slot.id, &vehicle.id, Utc::now())
            .await
            .unwrap();
        assert!(service.inconsistent_slots().await.unwrap().is_empty());

        service
            .release_slot(&actor, &record.id, Utc::now())
            .await
            .unwrap();
        assert!(service.inconsistent_slots().await.unwrap().is_empty());

        // Divergence injected outside the engine's single update path is
        // detected.
        store
            .update_slot_status(&extra.id, SlotStatus::Occupied)
            .await
            .unwrap();
        assert_eq!(service.inconsistent_slots().await.unwrap(), vec![extra.id]);
    }
}
