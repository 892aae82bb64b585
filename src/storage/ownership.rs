// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enforcement for member access.
//!
//! Every read or mutation of a single member passes through
//! [`OwnershipEnforcer::verify_manager`] before the row is returned or touched.

use crate::models::Member;

use super::{StorageError, StorageResult};

/// A stored resource scoped to one manager.
pub trait OwnedResource {
    fn resource_id(&self) -> u64;

    /// Subject of the manager that owns the resource.
    fn manager_id(&self) -> &str;
}

pub trait OwnershipEnforcer {
    /// # Errors
    /// Returns `StorageError::PermissionDenied` if `manager_id` does not own
    /// the resource.
    fn verify_manager(&self, manager_id: &str) -> StorageResult<()>;
}

impl<T: OwnedResource> OwnershipEnforcer for T {
    fn verify_manager(&self, manager_id: &str) -> StorageResult<()> {
        if self.manager_id() == manager_id {
            Ok(())
        } else {
            Err(StorageError::PermissionDenied {
                member_id: self.resource_id(),
            })
        }
    }
}

impl OwnedResource for Member {
    fn resource_id(&self) -> u64 {
        self.id
    }

    fn manager_id(&self) -> &str {
        &self.manager_id
    }
}
