//! Identity and access control
//!
//! Credentials are a username lookup plus bcrypt verification. The original
//! deployment kept plaintext passwords, which is deliberately not carried
//! over. Roles are fixed at registration: self-registration always yields an
//! operator; the singleton admin is seeded from config at first run.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::config::AdminConfig;
use crate::domain::{Actor, DomainError, DomainResult, Role, User};
use crate::infrastructure::Store;

/// Profile fields for a new operator account
#[derive(Debug, Clone)]
pub struct NewOperator {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
    pub phone_number: String,
}

pub struct IdentityService {
    store: Arc<dyn Store>,
}

impl IdentityService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create the singleton admin if the user collection is empty.
    pub async fn seed_admin(&self, config: &AdminConfig) -> DomainResult<()> {
        if self.store.count_users().await? > 0 {
            return Ok(());
        }

        let password_hash = hash_password(&config.password)
            .map_err(|e| DomainError::Storage(format!("hash admin password: {}", e)))?;

        let admin = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: config.username.clone(),
            email: config.email.clone(),
            full_name: config.full_name.clone(),
            phone_number: config.phone_number.clone(),
            role: Role::Admin,
            password_hash,
            created_at: Utc::now(),
            last_login_at: None,
        };
        self.store.save_user(admin).await?;

        info!(username = %config.username, "default admin created");
        warn!("change the seeded admin password immediately");
        Ok(())
    }

    /// Exact-match username lookup plus bcrypt verification. Updates
    /// last_login_at on success.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> DomainResult<User> {
        let Some(mut user) = self.store.find_user_by_username(username).await? else {
            return Err(DomainError::Unauthorized("invalid credentials".to_string()));
        };

        if !verify_password(password, &user.password_hash).unwrap_or(false) {
            return Err(DomainError::Unauthorized("invalid credentials".to_string()));
        }

        user.last_login_at = Some(Utc::now());
        self.store.update_user(user.clone()).await?;
        Ok(user)
    }

    /// Register a new operator. Role is always operator and immutable.
    pub async fn register_operator(&self, request: NewOperator) -> DomainResult<User> {
        if request.username.trim().is_empty() {
            return Err(DomainError::Validation("username is required".to_string()));
        }
        if request.password.len() < 8 {
            return Err(DomainError::Validation(
                "password must be at least 8 characters".to_string(),
            ));
        }
        if self
            .store
            .find_user_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!(
                "username {}",
                request.username
            )));
        }

        let password_hash = hash_password(&request.password)
            .map_err(|e| DomainError::Storage(format!("hash password: {}", e)))?;

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: request.username,
            email: request.email,
            full_name: request.full_name,
            phone_number: request.phone_number,
            role: Role::Operator,
            password_hash,
            created_at: Utc::now(),
            last_login_at: None,
        };
        self.store.save_user(user.clone()).await?;

        info!(username = %user.username, "operator registered");
        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> DomainResult<User> {
        self.store
            .get_user(id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", id))
    }

    /// All operator accounts. Admin only.
    pub async fn list_operators(&self, actor: &Actor) -> DomainResult<Vec<User>> {
        if !actor.is_admin() {
            return Err(DomainError::Forbidden(
                "only admins list operators".to_string(),
            ));
        }
        Ok(self
            .store
            .list_users()
            .await?
            .into_iter()
            .filter(|u| u.role == Role::Operator)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryStore;

    fn new_operator(username: &str) -> NewOperator {
        NewOperator {
            username: username.to_string(),
            password: "secure_password_123".to_string(),
            email: format!("{}@example.com", username),
            full_name: "Test Operator".to_string(),
            phone_number: "+250788000001".to_string(),
        }
    }

    #[tokio::test]
    async fn admin_is_seeded_once() {
        let store = Arc::new(MemoryStore::new());
        let service = IdentityService::new(store.clone());
        let config = AdminConfig::default();

        service.seed_admin(&config).await.unwrap();
        service.seed_admin(&config).await.unwrap();

        assert_eq!(store.count_users().await.unwrap(), 1);
        let admin = store.find_user_by_username("admin").await.unwrap().unwrap();
        assert_eq!(admin.role, Role::Admin);
        // Password is stored hashed, never plaintext
        assert_ne!(admin.password_hash, config.password);
    }

    #[tokio::test]
    async fn login_succeeds_with_correct_password_only() {
        let store = Arc::new(MemoryStore::new());
        let service = IdentityService::new(store);
        service.register_operator(new_operator("marie")).await.unwrap();

        let user = service
            .verify_credentials("marie", "secure_password_123")
            .await
            .unwrap();
        assert_eq!(user.role, Role::Operator);
        assert!(user.last_login_at.is_some());

        assert!(matches!(
            service.verify_credentials("marie", "wrong").await,
            Err(DomainError::Unauthorized(_))
        ));
        assert!(matches!(
            service.verify_credentials("nobody", "whatever").await,
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn duplicate_usernames_are_rejected() {
        let store = Arc::new(MemoryStore::new());
        let service = IdentityService::new(store);

        service.register_operator(new_operator("marie")).await.unwrap();
        assert!(matches!(
            service.register_operator(new_operator("marie")).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn short_passwords_are_rejected() {
        let store = Arc::new(MemoryStore::new());
        let service = IdentityService::new(store);

        let mut request = new_operator("marie");
        request.password = "short".to_string();
        assert!(matches!(
            service.register_operator(request).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn only_admins_list_operators() {
        let store = Arc::new(MemoryStore::new());
        let service = IdentityService::new(store);
        service.seed_admin(&AdminConfig::default()).await.unwrap();
        service.register_operator(new_operator("marie")).await.unwrap();

        let operators = service
            .list_operators(&Actor::admin("any"))
            .await
            .unwrap();
        assert_eq!(operators.len(), 1);
        assert_eq!(operators[0].username, "marie");

        assert!(matches!(
            service.list_operators(&Actor::operator("op-1")).await,
            Err(DomainError::Forbidden(_))
        ));
    }
}
