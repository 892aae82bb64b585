// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the member API. JSON field names are
//! camelCase; dates are `YYYY-MM-DD`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;

// =============================================================================
// Service Type
// =============================================================================

/// Pricing plan a member is enrolled in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub enum ServiceType {
    #[serde(rename = "free")]
    Free,
    #[serde(rename = "half-price")]
    HalfPrice,
    #[serde(rename = "full-price")]
    FullPrice,
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceType::Free => write!(f, "free"),
            ServiceType::HalfPrice => write!(f, "half-price"),
            ServiceType::FullPrice => write!(f, "full-price"),
        }
    }
}

// =============================================================================
// Member Models
// =============================================================================

/// A member managed by exactly one manager.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Unique identifier, assigned on creation and never reused.
    pub id: u64,
    pub name: String,
    /// Unique across all members.
    pub email: String,
    #[schema(value_type = String, format = Date, example = "1990-04-21")]
    pub birth_date: NaiveDate,
    /// Photo URL or reference, may be empty.
    pub photo: String,
    pub service_type: ServiceType,
    /// Subject of the manager that owns this member.
    pub manager_id: String,
}

/// Request to create a member for the calling manager.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberRequest {
    pub name: String,
    pub email: String,
    #[schema(value_type = String, format = Date, example = "1990-04-21")]
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub photo: String,
    pub service_type: ServiceType,
}

impl CreateMemberRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::bad_request("name must not be empty"));
        }
        if !is_valid_email(&self.email) {
            return Err(ApiError::bad_request("email must be a valid email address"));
        }
        Ok(())
    }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date, example = "1990-04-21")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub service_type: Option<ServiceType>,
}

impl UpdateMemberRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(ApiError::bad_request("name must not be empty"));
        }
        if matches!(&self.email, Some(email) if !is_valid_email(email)) {
            return Err(ApiError::bad_request("email must be a valid email address"));
        }
        Ok(())
    }

    /// Apply the supplied fields to `member`.
    pub fn apply(self, member: &mut Member) {
        if let Some(name) = self.name {
            member.name = name;
        }
        if let Some(email) = self.email {
            member.email = email;
        }
        if let Some(birth_date) = self.birth_date {
            member.birth_date = birth_date;
        }
        if let Some(photo) = self.photo {
            member.photo = photo;
        }
        if let Some(service_type) = self.service_type {
            member.service_type = service_type;
        }
    }
}

/// Structural email check: one `@`, non-empty local part, dotted domain,
/// no whitespace.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}
