// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Library error type

use crate::types::{Permission, Role};
use thiserror::Error;

/// Errors raised by herd book operations
#[derive(Debug, Error)]
pub enum HerdError {
    /// A referenced record does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind
        entity: &'static str,
        /// Requested id
        id: u64,
    },

    /// A record failed a validation rule
    #[error("invalid {entity}: {reason}")]
    Invalid {
        /// Entity kind
        entity: &'static str,
        /// What was wrong
        reason: String,
    },

    /// Adding a parent link would make an animal its own ancestor
    #[error("parentage cycle: animal {0} would become its own ancestor")]
    ParentageCycle(u64),

    /// The acting user lacks a permission
    #[error("permission denied: {role:?} lacks {permission:?}")]
    PermissionDenied {
        /// Highest effective role of the user
        role: Role,
        /// Missing permission
        permission: Permission,
    },

    /// The acting user does not belong to the tenant
    #[error("user {user_id} cannot act on tenant {tenant_id}")]
    TenantMismatch {
        /// Acting user
        user_id: u64,
        /// Target tenant
        tenant_id: u64,
    },

    /// A stock adjustment would take an item below zero
    #[error("insufficient stock for {item}: have {available}, need {requested}")]
    InsufficientStock {
        /// Item name
        item: String,
        /// Quantity on hand
        available: f64,
        /// Quantity requested
        requested: f64,
    },
}

impl HerdError {
    /// Shorthand for [`HerdError::Invalid`]
    pub fn invalid(entity: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            entity,
            reason: reason.into(),
        }
    }
}
