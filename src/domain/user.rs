//! User domain entity and the actor passed to engine calls

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User role. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Operator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Operator => "operator",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "operator" => Some(Self::Operator),
            _ => None,
        }
    }
}

/// An account: the singleton admin seeded at first run, or an operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub phone_number: String,
    pub role: Role,
    /// bcrypt hash, never the plaintext password
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// The authenticated caller of an engine operation.
///
/// Passed explicitly to every service call instead of living in ambient
/// session state, so the engine is a function of (store, operation, actor).
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Admin,
        }
    }

    pub fn operator(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Operator,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether this actor may see or act on entities owned by `operator_id`
    pub fn can_access(&self, operator_id: &str) -> bool {
        self.is_admin() || self.id == operator_id
    }
}
