// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Member Storage Module
//!
//! Members persist in an embedded redb database. Every mutation runs in a
//! single write transaction, so the email index and the id sequence can never
//! drift from the member rows.
//!
//! ## Storage Layout
//!
//! ```text
//! members           id → Member (JSON)
//! members_by_email  email → id
//! sequences         name → next id
//! ```
//!
//! Reads and writes are scoped to the calling manager: a member owned by
//! someone else is reported as [`StorageError::PermissionDenied`].

pub mod member_database;
pub mod ownership;

pub use member_database::MemberDatabase;
pub use ownership::{OwnedResource, OwnershipEnforcer};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("member {0} not found")]
    NotFound(u64),

    #[error("email already registered to another member")]
    EmailTaken,

    #[error("member {member_id} belongs to another manager")]
    PermissionDenied { member_id: u64 },
}

pub type StorageResult<T> = Result<T, StorageError>;
