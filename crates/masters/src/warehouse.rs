use serde::{Deserialize, Serialize};

use gudang_core::{DomainError, DomainResult, Entity, LifecycleStatus, WarehouseId};

/// Master entity: Warehouse (a physical stock location).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    id: WarehouseId,
    code: String,
    name: String,
    location: Option<String>,
    status: LifecycleStatus,
}

impl Warehouse {
    pub fn new(
        id: WarehouseId,
        code: impl Into<String>,
        name: impl Into<String>,
        location: Option<String>,
    ) -> DomainResult<Self> {
        let code = code.into();
        let name = name.into();
        if code.trim().is_empty() {
            return Err(DomainError::conflict("warehouse code cannot be empty"));
        }
        if name.trim().is_empty() {
            return Err(DomainError::conflict("warehouse name cannot be empty"));
        }
        Ok(Self {
            id,
            code,
            name,
            location,
            status: LifecycleStatus::Active,
        })
    }

    pub fn id_typed(&self) -> WarehouseId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn status(&self) -> LifecycleStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Archive this warehouse. Callers must first check the referential
    /// guard (no live stock); this only performs the lifecycle transition.
    pub fn archive(&mut self) -> DomainResult<()> {
        if self.status == LifecycleStatus::Archived {
            return Err(DomainError::conflict(format!(
                "warehouse {} is already archived",
                self.id
            )));
        }
        self.status = LifecycleStatus::Archived;
        Ok(())
    }

    pub fn activate(&mut self) {
        self.status = LifecycleStatus::Active;
    }
}

impl Entity for Warehouse {
    type Id = WarehouseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_code() {
        let err = Warehouse::new(WarehouseId::new(1), "  ", "Gudang Pusat", None).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn archive_is_not_repeatable() {
        let mut wh =
            Warehouse::new(WarehouseId::new(1), "WH-01", "Gudang Pusat", None).unwrap();
        wh.archive().unwrap();
        assert!(!wh.is_active());
        assert!(wh.archive().is_err());
    }
}
