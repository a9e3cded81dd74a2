//! Report and receipt DTOs

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::{DailyReport, DailyStats, OperatorSummary, Receipt};

use super::payment::PaymentDto;

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyStatsDto {
    pub total_revenue: i64,
    pub total_transactions: u64,
    pub total_parking_activities: u64,
    pub average_parking_hours: f64,
    /// Payment count keyed by method name
    pub payment_methods: BTreeMap<String, u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyReportDto {
    pub date: NaiveDate,
    pub stats: DailyStatsDto,
    pub payments: Vec<PaymentDto>,
}

impl DailyReportDto {
    pub fn from_domain(report: DailyReport) -> Self {
        let DailyStats {
            total_revenue,
            total_transactions,
            total_parking_activities,
            average_parking_hours,
            payment_methods,
        } = report.stats;
        Self {
            date: report.date,
            stats: DailyStatsDto {
                total_revenue,
                total_transactions,
                total_parking_activities,
                average_parking_hours,
                payment_methods,
            },
            payments: report
                .payments
                .into_iter()
                .map(PaymentDto::from_domain)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "payment_id": "5e6f7a8b-9c0d-1e2f-3a4b-5c6d7e8f9a0b",
    "plate_number": "RAB 123 C",
    "driver_name": "Jean Bosco",
    "amount": 1500,
    "currency": "RWF",
    "payment_date": "2026-08-30T10:16:00Z",
    "method": "mobile",
    "duration_hours": 3
}))]
pub struct ReceiptDto {
    pub payment_id: String,
    pub plate_number: String,
    pub driver_name: String,
    pub amount: i64,
    pub currency: String,
    pub payment_date: DateTime<Utc>,
    pub method: String,
    pub duration_hours: i64,
}

impl ReceiptDto {
    pub fn from_domain(receipt: Receipt) -> Self {
        Self {
            payment_id: receipt.payment_id,
            plate_number: receipt.plate_number,
            driver_name: receipt.driver_name,
            amount: receipt.amount,
            currency: receipt.currency,
            payment_date: receipt.payment_date,
            method: receipt.method,
            duration_hours: receipt.duration_hours,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OperatorSummaryDto {
    pub operator_id: String,
    pub total_spent: i64,
    pub payment_count: u64,
    pub vehicle_count: u64,
    pub currently_parked: u64,
}

impl OperatorSummaryDto {
    pub fn from_domain(summary: OperatorSummary) -> Self {
        Self {
            operator_id: summary.operator_id,
            total_spent: summary.total_spent,
            payment_count: summary.payment_count,
            vehicle_count: summary.vehicle_count,
            currently_parked: summary.currently_parked,
        }
    }
}
