// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded member database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `members`: id → serialized Member
//! - `members_by_email`: email → id, enforces email uniqueness
//! - `sequences`: sequence name → next id to hand out

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::{OwnershipEnforcer, StorageError, StorageResult};
use crate::models::{CreateMemberRequest, Member, UpdateMemberRequest};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: id → serialized Member (JSON bytes).
const MEMBERS: TableDefinition<u64, &[u8]> = TableDefinition::new("members");

/// Unique index: email → member id.
const MEMBERS_BY_EMAIL: TableDefinition<&str, u64> = TableDefinition::new("members_by_email");

/// Sequences: name → next value. Values only grow, so deleted ids are never reused.
const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

const MEMBER_SEQUENCE: &str = "members";

fn read_member(
    table: &impl ReadableTable<u64, &'static [u8]>,
    id: u64,
) -> StorageResult<Member> {
    let value = table.get(id)?.ok_or(StorageError::NotFound(id))?;
    Ok(serde_json::from_slice(value.value())?)
}

// =============================================================================
// MemberDatabase
// =============================================================================

pub struct MemberDatabase {
    db: Database,
}

impl MemberDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(MEMBERS)?;
            let _ = write_txn.open_table(MEMBERS_BY_EMAIL)?;
            let _ = write_txn.open_table(SEQUENCES)?;
        }
        write_txn.commit()?;

        tracing::info!(path = %path.display(), "Member database ready");
        Ok(Self { db })
    }

    /// All members of `manager_id`, ordered by id.
    pub fn list(&self, manager_id: &str) -> StorageResult<Vec<Member>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MEMBERS)?;

        let mut members = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let member: Member = serde_json::from_slice(value.value())?;
            if member.manager_id == manager_id {
                members.push(member);
            }
        }
        Ok(members)
    }

    pub fn get(&self, manager_id: &str, id: u64) -> StorageResult<Member> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MEMBERS)?;

        let member = read_member(&table, id)?;
        member.verify_manager(manager_id)?;
        Ok(member)
    }

    /// Store a new member owned by `manager_id` under the next id.
    pub fn create(&self, manager_id: &str, request: CreateMemberRequest) -> StorageResult<Member> {
        let write_txn = self.db.begin_write()?;
        let member = {
            let mut by_email = write_txn.open_table(MEMBERS_BY_EMAIL)?;
            if by_email.get(request.email.as_str())?.is_some() {
                return Err(StorageError::EmailTaken);
            }

            let mut sequences = write_txn.open_table(SEQUENCES)?;
            let id = sequences
                .get(MEMBER_SEQUENCE)?
                .map(|next| next.value())
                .unwrap_or(1);
            sequences.insert(MEMBER_SEQUENCE, id + 1)?;

            let member = Member {
                id,
                name: request.name,
                email: request.email,
                birth_date: request.birth_date,
                photo: request.photo,
                service_type: request.service_type,
                manager_id: manager_id.to_string(),
            };

            let json = serde_json::to_vec(&member)?;
            let mut members = write_txn.open_table(MEMBERS)?;
            members.insert(id, json.as_slice())?;
            by_email.insert(member.email.as_str(), id)?;
            member
        };
        write_txn.commit()?;

        tracing::debug!(member_id = member.id, manager_id, "Member created");
        Ok(member)
    }

    /// Apply a partial update to a member owned by `manager_id`.
    pub fn update(
        &self,
        manager_id: &str,
        id: u64,
        request: UpdateMemberRequest,
    ) -> StorageResult<Member> {
        let write_txn = self.db.begin_write()?;
        let member = {
            let mut members = write_txn.open_table(MEMBERS)?;
            let mut member = read_member(&members, id)?;
            member.verify_manager(manager_id)?;

            let previous_email = member.email.clone();
            request.apply(&mut member);

            if member.email != previous_email {
                let mut by_email = write_txn.open_table(MEMBERS_BY_EMAIL)?;
                if by_email.get(member.email.as_str())?.is_some() {
                    return Err(StorageError::EmailTaken);
                }
                by_email.remove(previous_email.as_str())?;
                by_email.insert(member.email.as_str(), id)?;
            }

            let json = serde_json::to_vec(&member)?;
            members.insert(id, json.as_slice())?;
            member
        };
        write_txn.commit()?;

        tracing::debug!(member_id = id, manager_id, "Member updated");
        Ok(member)
    }

    pub fn delete(&self, manager_id: &str, id: u64) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut members = write_txn.open_table(MEMBERS)?;
            let member = read_member(&members, id)?;
            member.verify_manager(manager_id)?;

            members.remove(id)?;
            let mut by_email = write_txn.open_table(MEMBERS_BY_EMAIL)?;
            by_email.remove(member.email.as_str())?;
        }
        write_txn.commit()?;

        tracing::debug!(member_id = id, manager_id, "Member deleted");
        Ok(())
    }
}
