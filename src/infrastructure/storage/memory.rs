//! In-memory store for tests and ephemeral runs

use async_trait::async_trait;
use dashmap::DashMap;

use super::Store;
use crate::domain::{
    DomainError, DomainResult, ParkingRecord, Payment, Slot, SlotStatus, User, Vehicle,
};

/// In-memory store backed by one map per collection
#[derive(Default)]
pub struct MemoryStore {
    slots: DashMap<String, Slot>,
    vehicles: DashMap<String, Vehicle>,
    records: DashMap<String, ParkingRecord>,
    payments: DashMap<String, Payment>,
    users: DashMap<String, User>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn save_slot(&self, slot: Slot) -> DomainResult<()> {
        if self.slots.contains_key(&slot.id) {
            return Err(DomainError::Conflict(format!("slot {}", slot.id)));
        }
        self.slots.insert(slot.id.clone(), slot);
        Ok(())
    }

    async fn get_slot(&self, id: &str) -> DomainResult<Option<Slot>> {
        Ok(self.slots.get(id).map(|s| s.clone()))
    }

    async fn list_slots(&self) -> DomainResult<Vec<Slot>> {
        let mut slots: Vec<Slot> = self.slots.iter().map(|e| e.value().clone()).collect();
        slots.sort_by(|a, b| a.slot_number.cmp(&b.slot_number));
        Ok(slots)
    }

    async fn update_slot_status(&self, id: &str, status: SlotStatus) -> DomainResult<()> {
        if let Some(mut slot) = self.slots.get_mut(id) {
            slot.status = status;
            Ok(())
        } else {
            Err(DomainError::not_found("slot", id))
        }
    }

    async fn save_vehicle(&self, vehicle: Vehicle) -> DomainResult<()> {
        self.vehicles.insert(vehicle.id.clone(), vehicle);
        Ok(())
    }

    async fn get_vehicle(&self, id: &str) -> DomainResult<Option<Vehicle>> {
        Ok(self.vehicles.get(id).map(|v| v.clone()))
    }

    async fn update_vehicle(&self, vehicle: Vehicle) -> DomainResult<()> {
        if !self.vehicles.contains_key(&vehicle.id) {
            return Err(DomainError::not_found("vehicle", vehicle.id));
        }
        self.vehicles.insert(vehicle.id.clone(), vehicle);
        Ok(())
    }

    async fn delete_vehicle(&self, id: &str) -> DomainResult<()> {
        self.vehicles
            .remove(id)
            .ok_or_else(|| DomainError::not_found("vehicle", id))?;
        Ok(())
    }

    async fn list_vehicles(&self) -> DomainResult<Vec<Vehicle>> {
        Ok(self.vehicles.iter().map(|e| e.value().clone()).collect())
    }

    async fn list_vehicles_for_operator(&self, operator_id: &str) -> DomainResult<Vec<Vehicle>> {
        Ok(self
            .vehicles
            .iter()
            .filter(|v| v.operator_id == operator_id)
            .map(|v| v.clone())
            .collect())
    }

    async fn save_record(&self, record: ParkingRecord) -> DomainResult<()> {
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    async fn get_record(&self, id: &str) -> DomainResult<Option<ParkingRecord>> {
        Ok(self.records.get(id).map(|r| r.clone()))
    }

    async fn update_record(&self, record: ParkingRecord) -> DomainResult<()> {
        if !self.records.contains_key(&record.id) {
            return Err(DomainError::not_found("parking record", record.id));
        }
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    async fn get_active_record_for_slot(
        &self,
        slot_id: &str,
    ) -> DomainResult<Option<ParkingRecord>> {
        Ok(self
            .records
            .iter()
            .find(|r| r.slot_id == slot_id && r.is_active)
            .map(|r| r.clone()))
    }

    async fn get_active_record_for_vehicle(
        &self,
        vehicle_id: &str,
    ) -> DomainResult<Option<ParkingRecord>> {
        Ok(self
            .records
            .iter()
            .find(|r| r.vehicle_id == vehicle_id && r.is_active)
            .map(|r| r.clone()))
    }

    async fn list_records(&self) -> DomainResult<Vec<ParkingRecord>> {
        Ok(self.records.iter().map(|e| e.value().clone()).collect())
    }

    async fn list_records_for_operator(
        &self,
        operator_id: &str,
    ) -> DomainResult<Vec<ParkingRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.operator_id == operator_id)
            .map(|r| r.clone())
            .collect())
    }

    async fn save_payment(&self, payment: Payment) -> DomainResult<()> {
        self.payments.insert(payment.id.clone(), payment);
        Ok(())
    }

    async fn get_payment(&self, id: &str) -> DomainResult<Option<Payment>> {
        Ok(self.payments.get(id).map(|p| p.clone()))
    }

    async fn get_payment_for_record(&self, record_id: &str) -> DomainResult<Option<Payment>> {
        Ok(self
            .payments
            .iter()
            .find(|p| p.record_id == record_id)
            .map(|p| p.clone()))
    }

    async fn list_payments(&self) -> DomainResult<Vec<Payment>> {
        Ok(self.payments.iter().map(|e| e.value().clone()).collect())
    }

    async fn list_payments_for_operator(&self, operator_id: &str) -> DomainResult<Vec<Payment>> {
        Ok(self
            .payments
            .iter()
            .filter(|p| p.operator_id == operator_id)
            .map(|p| p.clone())
            .collect())
    }

    async fn save_user(&self, user: User) -> DomainResult<()> {
        if self
            .users
            .iter()
            .any(|u| u.username == user.username && u.id != user.id)
        {
            return Err(DomainError::Conflict(format!("username {}", user.username)));
        }
        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn get_user(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn find_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.clone()))
    }

    async fn update_user(&self, user: User) -> DomainResult<()> {
        if !self.users.contains_key(&user.id) {
            return Err(DomainError::not_found("user", user.id));
        }
        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn list_users(&self) -> DomainResult<Vec<User>> {
        Ok(self.users.iter().map(|e| e.value().clone()).collect())
    }

    async fn count_users(&self) -> DomainResult<u64> {
        Ok(self.users.len() as u64)
    }
}
