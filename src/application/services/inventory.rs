//! Slot inventory provisioning (admin only)

use std::sync::Arc;

use tracing::info;

use crate::domain::{Actor, DomainError, DomainResult, Slot};
use crate::infrastructure::Store;

/// Upper bound per provisioning call; keeps a typo from flooding the store.
const MAX_SLOTS_PER_CALL: u32 = 200;

pub struct InventoryService {
    store: Arc<dyn Store>,
}

impl InventoryService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create `count` slots in (zone, level), numbered sequentially after the
    /// highest existing sequence in that pair. Sequence numbers are never
    /// reused and gaps are never filled. Slots start available and are never
    /// deleted.
    pub async fn provision_slots(
        &self,
        actor: &Actor,
        zone: &str,
        level: u32,
        count: u32,
    ) -> DomainResult<Vec<Slot>> {
        if !actor.is_admin() {
            return Err(DomainError::Forbidden(
                "only admins provision slots".to_string(),
            ));
        }

        let zone = zone.trim().to_uppercase();
        if zone.is_empty() || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::Validation(format!(
                "zone must be alphabetic, got {:?}",
                zone
            )));
        }
        if count == 0 || count > MAX_SLOTS_PER_CALL {
            return Err(DomainError::Validation(format!(
                "count must be between 1 and {}",
                MAX_SLOTS_PER_CALL
            )));
        }

        let next = self
            .store
            .list_slots()
            .await?
            .iter()
            .filter(|s| s.zone == zone && s.level == level)
            .map(|s| s.sequence)
            .max()
            .unwrap_or(0)
            + 1;

        let mut created = Vec::with_capacity(count as usize);
        for sequence in next..next + count {
            let slot = Slot::new(zone.clone(), level, sequence);
            self.store.save_slot(slot.clone()).await?;
            created.push(slot);
        }

        info!(
            zone = %zone,
            level,
            count,
            first = %created[0].slot_number,
            "slots provisioned"
        );

        Ok(created)
    }

    pub async fn list_slots(&self) -> DomainResult<Vec<Slot>> {
        self.store.list_slots().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryStore;

    #[tokio::test]
    async fn numbering_is_sequential_per_zone_and_level() {
        let store = Arc::new(MemoryStore::new());
        let service = InventoryService::new(store);
        let admin = Actor::admin("admin-1");

        let first = service.provision_slots(&admin, "A", 1, 3).await.unwrap();
        let numbers: Vec<_> = first.iter().map(|s| s.slot_number.as_str()).collect();
        assert_eq!(numbers, ["A1-001", "A1-002", "A1-003"]);

        // Continues from the highest in the same (zone, level)
        let more = service.provision_slots(&admin, "a", 1, 2).await.unwrap();
        let numbers: Vec<_> = more.iter().map(|s| s.slot_number.as_str()).collect();
        assert_eq!(numbers, ["A1-004", "A1-005"]);

        // Other (zone, level) pairs have their own sequence
        let other = service.provision_slots(&admin, "A", 2, 1).await.unwrap();
        assert_eq!(other[0].slot_number, "A2-001");
        let b = service.provision_slots(&admin, "B", 1, 1).await.unwrap();
        assert_eq!(b[0].slot_number, "B1-001");
    }

    #[tokio::test]
    async fn operators_cannot_provision() {
        let store = Arc::new(MemoryStore::new());
        let service = InventoryService::new(store);

        let err = service
            .provision_slots(&Actor::operator("op-1"), "A", 1, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn rejects_bad_zone_and_count() {
        let store = Arc::new(MemoryStore::new());
        let service = InventoryService::new(store);
        let admin = Actor::admin("admin-1");

        assert!(matches!(
            service.provision_slots(&admin, "", 1, 1).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.provision_slots(&admin, "A1", 1, 1).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.provision_slots(&admin, "A", 1, 0).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.provision_slots(&admin, "A", 1, 1000).await,
            Err(DomainError::Validation(_))
        ));
    }
}
