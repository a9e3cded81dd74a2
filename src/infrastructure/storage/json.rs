//! JSON file store
//!
//! Persists the five collections as whole JSON documents, one file per
//! collection, mirroring the original deployment's key-value layout. Every
//! write serialises and overwrites the affected collection as a unit; there
//! is no schema versioning and no merge. If two processes share a data
//! directory, the last writer wins.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

use super::Store;
use crate::domain::{
    DomainError, DomainResult, ParkingRecord, Payment, Slot, SlotStatus, User, Vehicle,
};

const SLOTS_FILE: &str = "parking_slots.json";
const VEHICLES_FILE: &str = "parking_vehicles.json";
const RECORDS_FILE: &str = "parking_records.json";
const PAYMENTS_FILE: &str = "parking_payments.json";
const USERS_FILE: &str = "parking_users.json";

#[derive(Default)]
struct Collections {
    slots: Vec<Slot>,
    vehicles: Vec<Vehicle>,
    records: Vec<ParkingRecord>,
    payments: Vec<Payment>,
    users: Vec<User>,
}

/// File-backed store. All methods take the collection lock for the duration
/// of their read-modify-write, so in-process callers never observe a partial
/// update.
pub struct JsonStore {
    dir: PathBuf,
    collections: Mutex<Collections>,
}

impl JsonStore {
    /// Open (or initialise) a store in `dir`, loading any existing files.
    pub async fn open(dir: impl AsRef<Path>) -> DomainResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| DomainError::Storage(format!("create {}: {}", dir.display(), e)))?;

        let collections = Collections {
            slots: load_collection(&dir.join(SLOTS_FILE)).await?,
            vehicles: load_collection(&dir.join(VEHICLES_FILE)).await?,
            records: load_collection(&dir.join(RECORDS_FILE)).await?,
            payments: load_collection(&dir.join(PAYMENTS_FILE)).await?,
            users: load_collection(&dir.join(USERS_FILE)).await?,
        };

        info!(
            dir = %dir.display(),
            slots = collections.slots.len(),
            vehicles = collections.vehicles.len(),
            records = collections.records.len(),
            payments = collections.payments.len(),
            users = collections.users.len(),
            "JSON store opened"
        );

        Ok(Self {
            dir,
            collections: Mutex::new(collections),
        })
    }

    async fn persist<T: Serialize>(&self, file: &str, items: &[T]) -> DomainResult<()> {
        let path = self.dir.join(file);
        let data = serde_json::to_vec_pretty(items)
            .map_err(|e| DomainError::Storage(format!("serialize {}: {}", file, e)))?;
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| DomainError::Storage(format!("write {}: {}", path.display(), e)))
    }
}

async fn load_collection<T: DeserializeOwned>(path: &Path) -> DomainResult<Vec<T>> {
    match tokio::fs::read(path).await {
        Ok(data) => serde_json::from_slice(&data)
            .map_err(|e| DomainError::Storage(format!("parse {}: {}", path.display(), e))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(DomainError::Storage(format!(
            "read {}: {}",
            path.display(),
            e
        ))),
    }
}

#[async_trait]
impl Store for JsonStore {
    async fn save_slot(&self, slot: Slot) -> DomainResult<()> {
        let mut c = self.collections.lock().await;
        if c.slots.iter().any(|s| s.id == slot.id) {
            return Err(DomainError::Conflict(format!("slot {}", slot.id)));
        }
        c.slots.push(slot);
        self.persist(SLOTS_FILE, &c.slots).await
    }

    async fn get_slot(&self, id: &str) -> DomainResult<Option<Slot>> {
        let c = self.collections.lock().await;
        Ok(c.slots.iter().find(|s| s.id == id).cloned())
    }

    async fn list_slots(&self) -> DomainResult<Vec<Slot>> {
        let c = self.collections.lock().await;
        let mut slots = c.slots.clone();
        slots.sort_by(|a, b| a.slot_number.cmp(&b.slot_number));
        Ok(slots)
    }

    async fn update_slot_status(&self, id: &str, status: SlotStatus) -> DomainResult<()> {
        let mut c = self.collections.lock().await;
        let slot = c
            .slots
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| DomainError::not_found("slot", id))?;
        slot.status = status;
        self.persist(SLOTS_FILE, &c.slots).await
    }

    async fn save_vehicle(&self, vehicle: Vehicle) -> DomainResult<()> {
        let mut c = self.collections.lock().await;
        c.vehicles.push(vehicle);
        self.persist(VEHICLES_FILE, &c.vehicles).await
    }

    async fn get_vehicle(&self, id: &str) -> DomainResult<Option<Vehicle>> {
        let c = self.collections.lock().await;
        Ok(c.vehicles.iter().find(|v| v.id == id).cloned())
    }

    async fn update_vehicle(&self, vehicle: Vehicle) -> DomainResult<()> {
        let mut c = self.collections.lock().await;
        let existing = c
            .vehicles
            .iter_mut()
            .find(|v| v.id == vehicle.id)
            .ok_or_else(|| DomainError::not_found("vehicle", vehicle.id.clone()))?;
        *existing = vehicle;
        self.persist(VEHICLES_FILE, &c.vehicles).await
    }

    async fn delete_vehicle(&self, id: &str) -> DomainResult<()> {
        let mut c = self.collections.lock().await;
        let before = c.vehicles.len();
        c.vehicles.retain(|v| v.id != id);
        if c.vehicles.len() == before {
            return Err(DomainError::not_found("vehicle", id));
        }
        self.persist(VEHICLES_FILE, &c.vehicles).await
    }

    async fn list_vehicles(&self) -> DomainResult<Vec<Vehicle>> {
        let c = self.collections.lock().await;
        Ok(c.vehicles.clone())
    }

    async fn list_vehicles_for_operator(&self, operator_id: &str) -> DomainResult<Vec<Vehicle>> {
        let c = self.collections.lock().await;
        Ok(c.vehicles
            .iter()
            .filter(|v| v.operator_id == operator_id)
            .cloned()
            .collect())
    }

    async fn save_record(&self, record: ParkingRecord) -> DomainResult<()> {
        let mut c = self.collections.lock().await;
        c.records.push(record);
        self.persist(RECORDS_FILE, &c.records).await
    }

    async fn get_record(&self, id: &str) -> DomainResult<Option<ParkingRecord>> {
        let c = self.collections.lock().await;
        Ok(c.records.iter().find(|r| r.id == id).cloned())
    }

    async fn update_record(&self, record: ParkingRecord) -> DomainResult<()> {
        let mut c = self.collections.lock().await;
        let existing = c
            .records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| DomainError::not_found("parking record", record.id.clone()))?;
        *existing = record;
        self.persist(RECORDS_FILE, &c.records).await
    }

    async fn get_active_record_for_slot(
        &self,
        slot_id: &str,
    ) -> DomainResult<Option<ParkingRecord>> {
        let c = self.collections.lock().await;
        Ok(c.records
            .iter()
            .find(|r| r.slot_id == slot_id && r.is_active)
            .cloned())
    }

    async fn get_active_record_for_vehicle(
        &self,
        vehicle_id: &str,
    ) -> DomainResult<Option<ParkingRecord>> {
        let c = self.collections.lock().await;
        Ok(c.records
            .iter()
            .find(|r| r.vehicle_id == vehicle_id && r.is_active)
            .cloned())
    }

    async fn list_records(&self) -> DomainResult<Vec<ParkingRecord>> {
        let c = self.collections.lock().await;
        Ok(c.records.clone())
    }

    async fn list_records_for_operator(
        &self,
        operator_id: &str,
    ) -> DomainResult<Vec<ParkingRecord>> {
        let c = self.collections.lock().await;
        Ok(c.records
            .iter()
            .filter(|r| r.operator_id == operator_id)
            .cloned()
            .collect())
    }

    async fn save_payment(&self, payment: Payment) -> DomainResult<()> {
        let mut c = self.collections.lock().await;
        c.payments.push(payment);
        self.persist(PAYMENTS_FILE, &c.payments).await
    }

    async fn get_payment(&self, id: &str) -> DomainResult<Option<Payment>> {
        let c = self.collections.lock().await;
        Ok(c.payments.iter().find(|p| p.id == id).cloned())
    }

    async fn get_payment_for_record(&self, record_id: &str) -> DomainResult<Option<Payment>> {
        let c = self.collections.lock().await;
        Ok(c.payments.iter().find(|p| p.record_id == record_id).cloned())
    }

    async fn list_payments(&self) -> DomainResult<Vec<Payment>> {
        let c = self.collections.lock().await;
        Ok(c.payments.clone())
    }

    async fn list_payments_for_operator(&self, operator_id: &str) -> DomainResult<Vec<Payment>> {
        let c = self.collections.lock().await;
        Ok(c.payments
            .iter()
            .filter(|p| p.operator_id == operator_id)
            .cloned()
            .collect())
    }

    async fn save_user(&self, user: User) -> DomainResult<()> {
        let mut c = self.collections.lock().await;
        if c.users
            .iter()
            .any(|u| u.username == user.username && u.id != user.id)
        {
            return Err(DomainError::Conflict(format!("username {}", user.username)));
        }
        c.users.push(user);
        self.persist(USERS_FILE, &c.users).await
    }

    async fn get_user(&self, id: &str) -> DomainResult<Option<User>> {
        let c = self.collections.lock().await;
        Ok(c.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let c = self.collections.lock().await;
        Ok(c.users.iter().find(|u| u.username == username).cloned())
    }

    async fn update_user(&self, user: User) -> DomainResult<()> {
        let mut c = self.collections.lock().await;
        let existing = c
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| DomainError::not_found("user", user.id.clone()))?;
        *existing = user;
        self.persist(USERS_FILE, &c.users).await
    }

    async fn list_users(&self) -> DomainResult<Vec<User>> {
        let c = self.collections.lock().await;
        Ok(c.users.clone())
    }

    async fn count_users(&self) -> DomainResult<u64> {
        let c = self.collections.lock().await;
        Ok(c.users.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[tokio::test]
    async fn collections_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = JsonStore::open(dir.path()).await.unwrap();
            store.save_slot(Slot::new("A", 1, 1)).await.unwrap();
            store
                .save_vehicle(Vehicle::new("RAB 123 C", "Jean", "+250788111222", "op-1"))
                .await
                .unwrap();
        }

        let store = JsonStore::open(dir.path()).await.unwrap();
        assert_eq!(store.list_slots().await.unwrap().len(), 1);
        assert_eq!(store.list_vehicles().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn record_update_rewrites_whole_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).await.unwrap();

        let mut record = ParkingRecord::new("slot-1", "car-1", "op-1", Utc::now());
        store.save_record(record.clone()).await.unwrap();

        record.close(Utc::now(), 2);
        store.update_record(record.clone()).await.unwrap();

        let reloaded = store.get_record(&record.id).await.unwrap().unwrap();
        assert!(!reloaded.is_active);
        assert_eq!(reloaded.duration_hours, Some(2));
    }

    // Two stores over the same directory do not merge: each rewrites the
    // collection it loaded. Accepted limitation of the storage model.
    #[tokio::test]
    async fn last_writer_wins_between_stores() {
        let dir = tempfile::tempdir().unwrap();

        let first = JsonStore::open(dir.path()).await.unwrap();
        let second = JsonStore::open(dir.path()).await.unwrap();

        first.save_slot(Slot::new("A", 1, 1)).await.unwrap();
        second.save_slot(Slot::new("B", 1, 1)).await.unwrap();

        let reopened = JsonStore::open(dir.path()).await.unwrap();
        let slots = reopened.list_slots().await.unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].zone, "B");
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).await.unwrap();

        let user = User {
            id: "u1".into(),
            username: "marie".into(),
            email: "marie@example.com".into(),
            full_name: "Marie U".into(),
            phone_number: "+250788000001".into(),
            role: crate::domain::Role::Operator,
            password_hash: "x".into(),
            created_at: Utc::now(),
            last_login_at: None,
        };
        store.save_user(user.clone()).await.unwrap();

        let dup = User {
            id: "u2".into(),
            ..user
        };
        assert!(matches!(
            store.save_user(dup).await,
            Err(DomainError::Conflict(_))
        ));
    }
}
