//! Payment DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Payment;

/// A settled payment for one closed parking record
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": "5e6f7a8b-9c0d-1e2f-3a4b-5c6d7e8f9a0b",
    "record_id": "0a1b2c3d-4e5f-6a7b-8c9d-0e1f2a3b4c5d",
    "operator_id": "7c8d9e0f-1a2b-3c4d-5e6f-7a8b9c0d1e2f",
    "amount_paid": 1500,
    "currency": "RWF",
    "payment_date": "2026-08-30T10:16:00Z",
    "method": "mobile",
    "status": "completed"
}))]
pub struct PaymentDto {
    pub id: String,
    pub record_id: String,
    pub operator_id: String,
    /// Amount in whole currency units
    pub amount_paid: i64,
    pub currency: String,
    pub payment_date: DateTime<Utc>,
    /// `cash`, `card` or `mobile`
    pub method: String,
    /// `pending`, `completed` or `cancelled`
    pub status: String,
}

impl PaymentDto {
    pub fn from_domain(payment: Payment) -> Self {
        Self {
            id: payment.id,
            record_id: payment.record_id,
            operator_id: payment.operator_id,
            amount_paid: payment.amount_paid,
            currency: payment.currency,
            payment_date: payment.payment_date,
            method: payment.method.to_string(),
            status: payment.status.to_string(),
        }
    }
}

/// Settle a closed, unpaid record
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "record_id": "0a1b2c3d-4e5f-6a7b-8c9d-0e1f2a3b4c5d",
    "method": "mobile"
}))]
pub struct RecordPaymentRequest {
    pub record_id: String,
    /// `cash`, `card` or `mobile`
    pub method: String,
}

/// Pay an active record and release its slot in one step
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({ "method": "mobile" }))]
pub struct PayAndReleaseRequest {
    /// `cash`, `card` or `mobile`
    pub method: String,
}
