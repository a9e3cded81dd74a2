//! Billing: live quotes, settled charges, payment recording
//!
//! Amounts follow the flat hourly rate from `[billing]` config: owed amount
//! is always billed-hours × rate, no proration or discounts. The primary
//! operator flow is pay-to-release (`pay_and_release`); standalone
//! `record_payment` settles records that were released first.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::occupancy::OccupancyService;
use crate::config::BillingConfig;
use crate::domain::{
    Actor, DomainError, DomainResult, ParkingRecord, Payment, PaymentMethod,
};
use crate::infrastructure::Store;

/// Whole billable hours between entry and exit: rounded up, minimum 1.
pub fn billable_hours(entry: DateTime<Utc>, exit: DateTime<Utc>) -> i64 {
    let seconds = (exit - entry).num_seconds();
    if seconds <= 0 {
        return 1;
    }
    ((seconds + 3599) / 3600).max(1)
}

/// A quoted or settled charge
#[derive(Debug, Clone, Serialize)]
pub struct Charge {
    pub duration_hours: i64,
    pub amount: i64,
    pub currency: String,
}

pub struct BillingService {
    store: Arc<dyn Store>,
    occupancy: Arc<OccupancyService>,
    config: BillingConfig,
}

impl BillingService {
    pub fn new(
        store: Arc<dyn Store>,
        occupancy: Arc<OccupancyService>,
        config: BillingConfig,
    ) -> Self {
        Self {
            store,
            occupancy,
            config,
        }
    }

    pub fn hourly_rate(&self) -> i64 {
        self.config.hourly_rate
    }

    /// Charge for a record: the settled figures for a closed record, a live
    /// quote relative to `now` for an active one. Nothing is persisted.
    pub fn quote(&self, record: &ParkingRecord, now: DateTime<Utc>) -> Charge {
        let duration_hours = record
            .duration_hours
            .unwrap_or_else(|| billable_hours(record.entry_time, now));
        Charge {
            duration_hours,
            amount: duration_hours * self.config.hourly_rate,
            currency: self.config.currency.clone(),
        }
    }

    /// Settle a closed, unpaid record.
    ///
    /// Idempotence: a second call for the same record fails with
    /// `AlreadyPaid` and creates no duplicate payment.
    pub async fn record_payment(
        &self,
        actor: &Actor,
        record_id: &str,
        method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> DomainResult<Payment> {
        let record = self
            .store
            .get_record(record_id)
            .await?
            .ok_or_else(|| DomainError::not_found("parking record", record_id))?;

        if !actor.can_access(&record.operator_id) {
            return Err(DomainError::Forbidden(
                "parking record belongs to another operator".to_string(),
            ));
        }

        if record.is_active {
            return Err(DomainError::RecordStillActive(record.id));
        }

        self.settle(record, method, now).await
    }

    /// Pay-to-release: close an active record and settle it in one step, so
    /// a paid record can never be left occupying a slot.
    pub async fn pay_and_release(
        &self,
        actor: &Actor,
        record_id: &str,
        method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> DomainResult<(ParkingRecord, Payment)> {
        let record = self
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

        let released = self.occupancy.release_slot(actor, record_id, now).await?;
        let payment = self.settle(released.clone(), method, now).await?;

        let mut record = released;
        record.mark_paid();

        Ok((record, payment))
    }

    async fn settle(
        &self,
        mut record: ParkingRecord,
        method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> DomainResult<Payment> {
        if record.is_paid {
            return Err(DomainError::AlreadyPaid(record.id));
        }
        // An existing payment for the record blocks a duplicate even if the
        // paid flag diverged.
        if self
            .store
            .get_payment_for_record(&record.id)
            .await?
            .is_some()
        {
            return Err(DomainError::AlreadyPaid(record.id));
        }

        let duration = record.duration_hours.ok_or_else(|| {
            DomainError::Validation(format!("record {} has no billed duration", record.id))
        })?;

        let amount = duration * self.config.hourly_rate;
        let payment = Payment::completed(
            &record.id,
            &record.operator_id,
            amount,
            &self.config.currency,
            method,
            now,
        );

        self.store.save_payment(payment.clone()).await?;
        record.mark_paid();
        self.store.update_record(record.clone()).await?;

        info!(
            record = %record.id,
            amount,
            currency = %self.config.currency,
            method = %method,
            "payment recorded"
        );

        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Slot, Vehicle};
    use crate::infrastructure::MemoryStore;

    fn services(store: Arc<MemoryStore>) -> (Arc<OccupancyService>, BillingService) {
        let occupancy = Arc::new(OccupancyService::new(store.clone()));
        let billing = BillingService::new(store, occupancy.clone(), BillingConfig::default());
        (occupancy, billing)
    }

    async fn parked_record(
        store: &Arc<MemoryStore>,
        occupancy: &OccupancyService,
        actor: &Actor,
        t0: DateTime<Utc>,
    ) -> ParkingRecord {
        let slot = Slot::new("A", 1, 1);
        store.save_slot(slot.clone()).await.unwrap();
        let vehicle = Vehicle::new("RAB 123 C", "Jean Bosco", "+250788111222", "op-1");
        store.save_vehicle(vehicle.clone()).await.unwrap();
        occupancy
            .assign_vehicle(actor, &slot.id, &vehicle.id, t0)
            .await
            .unwrap()
    }

    #[test]
    fn billable_hours_round_up_with_minimum_one() {
        let t0 = Utc::now();
        let h = |mins: i64| billable_hours(t0, t0 + chrono::Duration::minutes(mins));

        assert_eq!(h(0), 1);
        assert_eq!(h(1), 1);
        assert_eq!(h(59), 1);
        assert_eq!(h(60), 1);
        assert_eq!(h(61), 2);
        assert_eq!(h(135), 3);
        assert_eq!(h(24 * 60), 24);
    }

    #[test]
    fn billable_hours_are_monotonic() {
        let t0 = Utc::now();
        let mut last = 0;
        for mins in (0..600).step_by(7) {
            let h = billable_hours(t0, t0 + chrono::Duration::minutes(mins));
            assert!(h >= last);
            assert!(h >= 1);
            last = h;
        }
    }

    #[tokio::test]
    async fn quote_uses_settled_duration_for_closed_records() {
        let store = Arc::new(MemoryStore::new());
        let (occupancy, billing) = services(store.clone());
        let actor = Actor::operator("op-1");
        let t0 = Utc::now();

        let record = parked_record(&store, &occupancy, &actor, t0).await;

        // Live quote grows with elapsed time
        let q1 = billing.quote(&record, t0 + chrono::Duration::minutes(30));
        let q2 = billing.quote(&record, t0 + chrono::Duration::minutes(90));
        assert_eq!(q1.duration_hours, 1);
        assert_eq!(q2.duration_hours, 2);
        assert_eq!(q2.amount, 1000);

        // Settled quote no longer depends on `now`
        let closed = occupancy
            .release_slot(&actor, &record.id, t0 + chrono::Duration::hours(2))
            .await
            .unwrap();
        let q3 = billing.quote(&closed, t0 + chrono::Duration::hours(50));
        assert_eq!(q3.duration_hours, 2);
        assert_eq!(q3.amount, 1000);
    }

    #[tokio::test]
    async fn payment_settles_released_record() {
        let store = Arc::new(MemoryStore::new());
        let (occupancy, billing) = services(store.clone());
        let actor = Actor::operator("op-1");
        let t0 = Utc::now();

        let record = parked_record(&store, &occupancy, &actor, t0).await;
        occupancy
            .release_slot(&actor, &record.id, t0 + chrono::Duration::minutes(135))
            .await
            .unwrap();

        let payment = billing
            .record_payment(&actor, &record.id, PaymentMethod::Mobile, Utc::now())
            .await
            .unwrap();

        // 2h15m rounds to 3 hours at the default 500/h rate
        assert_eq!(payment.amount_paid, 1500);
        assert_eq!(payment.currency, "RWF");
        assert_eq!(payment.status, crate::domain::PaymentStatus::Completed);

        let record = store.get_record(&record.id).await.unwrap().unwrap();
        assert!(record.is_paid);
    }

    #[tokio::test]
    async fn second_payment_fails_and_creates_no_duplicate() {
        let store = Arc::new(MemoryStore::new());
        let (occupancy, billing) = services(store.clone());
        let actor = Actor::operator("op-1");
        let t0 = Utc::now();

        let record = parked_record(&store, &occupancy, &actor, t0).await;
        occupancy
            .release_slot(&actor, &record.id, t0 + chrono::Duration::hours(1))
            .await
            .unwrap();
        billing
            .record_payment(&actor, &record.id, PaymentMethod::Cash, Utc::now())
            .await
            .unwrap();

        let err = billing
            .record_payment(&actor, &record.id, PaymentMethod::Card, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyPaid(_)));
        assert_eq!(store.list_payments().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn active_record_cannot_be_paid_without_release() {
        let store = Arc::new(MemoryStore::new());
        let (occupancy, billing) = services(store.clone());
        let actor = Actor::operator("op-1");

        let record = parked_record(&store, &occupancy, &actor, Utc::now()).await;
        let err = billing
            .record_payment(&actor, &record.id, PaymentMethod::Cash, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::RecordStillActive(_)));
    }

    #[tokio::test]
    async fn pay_and_release_frees_slot_and_settles() {
        let store = Arc::new(MemoryStore::new());
        let (occupancy, billing) = services(store.clone());
        let actor = Actor::operator("op-1");
        let t0 = Utc::now();

        let record = parked_record(&store, &occupancy, &actor, t0).await;
        let (closed, payment) = billing
            .pay_and_release(
                &actor,
                &record.id,
                PaymentMethod::Mobile,
                t0 + chrono::Duration::minutes(135),
            )
            .await
            .unwrap();

        assert!(!closed.is_active);
        assert!(closed.is_paid);
        assert_eq!(closed.duration_hours, Some(3));
        assert_eq!(payment.amount_paid, 1500);

        let slot = store.get_slot(&record.slot_id).await.unwrap().unwrap();
        assert_eq!(slot.status, crate::domain::SlotStatus::Available);

        // The fused flow is also idempotence-safe
        let err = billing
            .pay_and_release(&actor, &record.id, PaymentMethod::Cash, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::RecordNotActive(_)));
        assert_eq!(store.list_payments().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn operator_cannot_pay_foreign_record() {
        let store = Arc::new(MemoryStore::new());
        let (occupancy, billing) = services(store.clone());
        let owner = Actor::operator("op-1");
        let t0 = Utc::now();

        let record = parked_record(&store, &occupancy, &owner, t0).await;
        occupancy
            .release_slot(&owner, &record.id, t0 + chrono::Duration::hours(1))
            .await
            .unwrap();

        let stranger = Actor::operator("op-2");
        let err = billing
            .record_payment(&stranger, &record.id, PaymentMethod::Cash, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }
}
