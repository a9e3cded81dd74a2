//! Payment domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a payment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Mobile,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "cash"),
            Self::Card => write!(f, "card"),
            Self::Mobile => write!(f, "mobile"),
        }
    }
}

impl PaymentMethod {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cash" => Some(Self::Cash),
            "card" => Some(Self::Card),
            "mobile" => Some(Self::Mobile),
            _ => None,
        }
    }
}

/// Payment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Cancelled,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A settlement of the amount owed for one closed parking record.
/// Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique payment ID
    pub id: String,
    /// The parking record this payment settles
    pub record_id: String,
    /// Operator who paid
    pub operator_id: String,
    /// Amount in whole currency units
    pub amount_paid: i64,
    /// ISO 4217 currency code
    pub currency: String,
    pub payment_date: DateTime<Utc>,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
}

impl Payment {
    pub fn completed(
        record_id: impl Into<String>,
        operator_id: impl Into<String>,
        amount_paid: i64,
        currency: impl Into<String>,
        method: PaymentMethod,
        payment_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            record_id: record_id.into(),
            operator_id: operator_id.into(),
            amount_paid,
            currency: currency.into(),
            payment_date,
            method,
            status: PaymentStatus::Completed,
        }
    }
}
