//! Daily reports, receipts and per-operator aggregates
//!
//! All figures are derived on demand from the payment and record
//! collections; nothing here is stored. Day boundaries are UTC calendar
//! days.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Actor, DomainError, DomainResult, Payment};
use crate::infrastructure::Store;

/// Aggregate figures for one calendar day
#[derive(Debug, Clone, Serialize)]
pub struct DailyStats {
    pub total_revenue: i64,
    pub total_transactions: u64,
    pub total_parking_activities: u64,
    /// Mean billed duration over the day's records, in hours
    pub average_parking_hours: f64,
    /// Payment count per method name
    pub payment_methods: BTreeMap<String, u64>,
}

/// Exportable daily report: stats plus the day's payments
#[derive(Debug, Clone, Serialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub stats: DailyStats,
    pub payments: Vec<Payment>,
}

/// Exportable receipt for one payment
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub payment_id: String,
    pub plate_number: String,
    pub driver_name: String,
    pub amount: i64,
    pub currency: String,
    pub payment_date: chrono::DateTime<chrono::Utc>,
    pub method: String,
    pub duration_hours: i64,
}

/// Per-operator aggregate view
#[derive(Debug, Clone, Serialize)]
pub struct OperatorSummary {
    pub operator_id: String,
    /// Sum of all completed payment amounts
    pub total_spent: i64,
    pub payment_count: u64,
    pub vehicle_count: u64,
    pub currently_parked: u64,
}

/// Deterministic export name for a daily report
pub fn report_file_name(date: NaiveDate) -> String {
    format!("parking-report-{}.json", date)
}

/// Deterministic export name for a receipt
pub fn receipt_file_name(payment_id: &str) -> String {
    format!("receipt-{}.json", payment_id)
}

pub struct ReportService {
    store: Arc<dyn Store>,
}

impl ReportService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Aggregate report for one day. Admin only.
    pub async fn daily_report(&self, actor: &Actor, date: NaiveDate) -> DomainResult<DailyReport> {
        if !actor.is_admin() {
            return Err(DomainError::Forbidden(
                "only admins view daily reports".to_string(),
            ));
        }

        let day_payments: Vec<Payment> = self
            .store
            .list_payments()
            .await?
            .into_iter()
            .filter(|p| p.payment_date.date_naive() == date)
            .collect();

        let day_records: Vec<_> = self
            .store
            .list_records()
            .await?
            .into_iter()
            .filter(|r| r.entry_time.date_naive() == date)
            .collect();

        let billed: Vec<i64> = day_records.iter().filter_map(|r| r.duration_hours).collect();
        let average_parking_hours = if billed.is_empty() {
            0.0
        } else {
            let mean = billed.iter().sum::<i64>() as f64 / billed.len() as f64;
            (mean * 100.0).round() / 100.0
        };

        let mut payment_methods = BTreeMap::new();
        for payment in &day_payments {
            *payment_methods.entry(payment.method.to_string()).or_insert(0) += 1;
        }

        Ok(DailyReport {
            date,
            stats: DailyStats {
                total_revenue: day_payments.iter().map(|p| p.amount_paid).sum(),
                total_transactions: day_payments.len() as u64,
                total_parking_activities: day_records.len() as u64,
                average_parking_hours,
                payment_methods,
            },
            payments: day_payments,
        })
    }

    /// Receipt for one payment, joined with its record and vehicle.
    /// Operators only see their own.
    pub async fn receipt(&self, actor: &Actor, payment_id: &str) -> DomainResult<Receipt> {
        let payment = self
            .store
            .get_payment(payment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("payment", payment_id))?;

        if !actor.can_access(&payment.operator_id) {
            return Err(DomainError::Forbidden(
                "payment belongs to another operator".to_string(),
            ));
        }

        let record = self
            .store
            .get_record(&payment.record_id)
            .await?
            .ok_or_else(|| DomainError::not_found("parking record", &payment.record_id))?;
        let vehicle = self
            .store
            .get_vehicle(&record.vehicle_id)
            .await?
            .ok_or_else(|| DomainError::not_found("vehicle", &record.vehicle_id))?;

        Ok(Receipt {
            payment_id: payment.id,
            plate_number: vehicle.plate_number,
            driver_name: vehicle.driver_name,
            amount: payment.amount_paid,
            currency: payment.currency,
            payment_date: payment.payment_date,
            method: payment.method.to_string(),
            duration_hours: record.duration_hours.unwrap_or(0),
        })
    }

    /// Aggregates for one operator. The operator themselves or an admin.
    pub async fn operator_summary(
        &self,
        actor: &Actor,
        operator_id: &str,
    ) -> DomainResult<OperatorSummary> {
        if !actor.can_access(operator_id) {
            return Err(DomainError::Forbidden(
                "summary belongs to another operator".to_string(),
            ));
        }

        let payments = self.store.list_payments_for_operator(operator_id).await?;
        let vehicles = self.store.list_vehicles_for_operator(operator_id).await?;
        let records = self.store.list_records_for_operator(operator_id).await?;

        Ok(OperatorSummary {
            operator_id: operator_id.to_string(),
            total_spent: payments.iter().map(|p| p.amount_paid).sum(),
            payment_count: payments.len() as u64,
            vehicle_count: vehicles.len() as u64,
            currently_parked: records.iter().filter(|r| r.is_active).count() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::{ParkingRecord, PaymentMethod, Vehicle};
    use crate::infrastructure::MemoryStore;

    fn payment_at(
        ts: chrono::DateTime<Utc>,
        operator: &str,
        amount: i64,
        method: PaymentMethod,
    ) -> Payment {
        Payment::completed("rec-x", operator, amount, "RWF", method, ts)
    }

    #[tokio::test]
    async fn daily_report_filters_by_day_and_aggregates() {
        let store = Arc::new(MemoryStore::new());
        let service = ReportService::new(store.clone());

        let day = Utc.with_ymd_and_hms(2026, 8, 29, 10, 0, 0).unwrap();
        let other_day = Utc.with_ymd_and_hms(2026, 8, 30, 10, 0, 0).unwrap();

        store
            .save_payment(payment_at(day, "op-1", 1500, PaymentMethod::Mobile))
            .await
            .unwrap();
        store
            .save_payment(payment_at(day, "op-2", 500, PaymentMethod::Cash))
            .await
            .unwrap();
        store
            .save_payment(payment_at(other_day, "op-1", 9000, PaymentMethod::Card))
            .await
            .unwrap();

        let mut record = ParkingRecord::new("slot-1", "car-1", "op-1", day);
        record.close(day + chrono::Duration::hours(3), 3);
        store.save_record(record).await.unwrap();

        let report = service
            .daily_report(&Actor::admin("a"), day.date_naive())
            .await
            .unwrap();

        assert_eq!(report.stats.total_revenue, 2000);
        assert_eq!(report.stats.total_transactions, 2);
        assert_eq!(report.stats.total_parking_activities, 1);
        assert_eq!(report.stats.average_parking_hours, 3.0);
        assert_eq!(report.stats.payment_methods.get("mobile"), Some(&1));
        assert_eq!(report.stats.payment_methods.get("cash"), Some(&1));
        assert_eq!(report.payments.len(), 2);
    }

    #[tokio::test]
    async fn daily_report_is_admin_only() {
        let store = Arc::new(MemoryStore::new());
        let service = ReportService::new(store);

        let err = service
            .daily_report(&Actor::operator("op-1"), Utc::now().date_naive())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn receipt_joins_record_and_vehicle() {
        let store = Arc::new(MemoryStore::new());
        let service = ReportService::new(store.clone());

        let vehicle = Vehicle::new("RAB 123 C", "Jean Bosco", "+250788111222", "op-1");
        store.save_vehicle(vehicle.clone()).await.unwrap();

        let t0 = Utc::now();
        let mut record = ParkingRecord::new("slot-1", &vehicle.id, "op-1", t0);
        record.close(t0 + chrono::Duration::hours(3), 3);
        record.mark_paid();
        store.save_record(record.clone()).await.unwrap();

        let payment =
            Payment::completed(&record.id, "op-1", 1500, "RWF", PaymentMethod::Mobile, t0);
        store.save_payment(payment.clone()).await.unwrap();

        let receipt = service
            .receipt(&Actor::operator("op-1"), &payment.id)
            .await
            .unwrap();
        assert_eq!(receipt.plate_number, "RAB 123 C");
        assert_eq!(receipt.driver_name, "Jean Bosco");
        assert_eq!(receipt.amount, 1500);
        assert_eq!(receipt.duration_hours, 3);

        // Another operator cannot pull it
        let err = service
            .receipt(&Actor::operator("op-2"), &payment.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn operator_total_spent_equals_payment_sum() {
        let store = Arc::new(MemoryStore::new());
        let service = ReportService::new(store.clone());
        let t0 = Utc::now();

        for amount in [500, 1500, 1000] {
            store
                .save_payment(payment_at(t0, "op-1", amount, PaymentMethod::Cash))
                .await
                .unwrap();
        }
        store
            .save_payment(payment_at(t0, "op-2", 7000, PaymentMethod::Card))
            .await
            .unwrap();

        let summary = service
            .operator_summary(&Actor::operator("op-1"), "op-1")
            .await
            .unwrap();
        assert_eq!(summary.total_spent, 3000);
        assert_eq!(summary.payment_count, 3);
    }

    #[test]
    fn export_names_are_deterministic() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        assert_eq!(report_file_name(date), "parking-report-2026-08-30.json");
        assert_eq!(receipt_file_name("pay-1"), "receipt-pay-1.json");
    }
}
