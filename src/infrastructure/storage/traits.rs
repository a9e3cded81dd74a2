//! Store trait definitions

use async_trait::async_trait;

use crate::domain::{DomainResult, ParkingRecord, Payment, Slot, SlotStatus, User, Vehicle};

/// Entity store for the five persisted collections.
///
/// Each collection is small enough to read and rewrite as a whole; there are
/// no partial transactions. Implementations must make every method an atomic
/// read-modify-write from the caller's point of view within this process.
#[async_trait]
pub trait Store: Send + Sync {
    // Slot operations
    async fn save_slot(&self, slot: Slot) -> DomainResult<()>;
    async fn get_slot(&self, id: &str) -> DomainResult<Option<Slot>>;
    async fn list_slots(&self) -> DomainResult<Vec<Slot>>;
    async fn update_slot_status(&self, id: &str, status: SlotStatus) -> DomainResult<()>;

    // Vehicle operations
    async fn save_vehicle(&self, vehicle: Vehicle) -> DomainResult<()>;
    async fn get_vehicle(&self, id: &str) -> DomainResult<Option<Vehicle>>;
    async fn update_vehicle(&self, vehicle: Vehicle) -> DomainResult<()>;
    async fn delete_vehicle(&self, id: &str) -> DomainResult<()>;
    async fn list_vehicles(&self) -> DomainResult<Vec<Vehicle>>;
    async fn list_vehicles_for_operator(&self, operator_id: &str) -> DomainResult<Vec<Vehicle>>;

    // Parking record operations
    async fn save_record(&self, record: ParkingRecord) -> DomainResult<()>;
    async fn get_record(&self, id: &str) -> DomainResult<Option<ParkingRecord>>;
    async fn update_record(&self, record: ParkingRecord) -> DomainResult<()>;
    async fn get_active_record_for_slot(&self, slot_id: &str)
        -> DomainResult<Option<ParkingRecord>>;
    async fn get_active_record_for_vehicle(
        &self,
        vehicle_id: &str,
    ) -> DomainResult<Option<ParkingRecord>>;
    async fn list_records(&self) -> DomainResult<Vec<ParkingRecord>>;
    async fn list_records_for_operator(&self, operator_id: &str)
        -> DomainResult<Vec<ParkingRecord>>;

    // Payment operations
    async fn save_payment(&self, payment: Payment) -> DomainResult<()>;
    async fn get_payment(&self, id: &str) -> DomainResult<Option<Payment>>;
    async fn get_payment_for_record(&self, record_id: &str) -> DomainResult<Option<Payment>>;
    async fn list_payments(&self) -> DomainResult<Vec<Payment>>;
    async fn list_payments_for_operator(&self, operator_id: &str) -> DomainResult<Vec<Payment>>;

    // User operations
    async fn save_user(&self, user: User) -> DomainResult<()>;
    async fn get_user(&self, id: &str) -> DomainResult<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn update_user(&self, user: User) -> DomainResult<()>;
    async fn list_users(&self) -> DomainResult<Vec<User>>;
    async fn count_users(&self) -> DomainResult<u64>;
}
