use serde::{Deserialize, Serialize};

use gudang_core::{CustomerId, DomainError, DomainResult, LifecycleStatus, SupplierId};

/// Contact information for a trading party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Master entity: a trading party (supplier or customer), generic over its
/// identifier so supplier and customer ids stay distinct types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party<Id> {
    id: Id,
    name: String,
    contact: ContactInfo,
    status: LifecycleStatus,
}

/// A party we purchase from.
pub type Supplier = Party<SupplierId>;

/// A party we sell to.
pub type Customer = Party<CustomerId>;

impl<Id: Copy> Party<Id> {
    pub fn new(id: Id, name: impl Into<String>, contact: ContactInfo) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::conflict("party name cannot be empty"));
        }
        Ok(Self {
            id,
            name,
            contact,
            status: LifecycleStatus::Active,
        })
    }

    pub fn id_typed(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn status(&self) -> LifecycleStatus {
        self.status
    }

    /// Whether this party may participate in new transactions.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn archive(&mut self) -> DomainResult<()>
    where
        Id: core::fmt::Display,
    {
        if self.status == LifecycleStatus::Archived {
            return Err(DomainError::conflict(format!(
                "party {} is already archived",
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
