// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Audit trail entries kept in the dataset

use crate::types::{next_id, AuditAction, AuditLog, HerdStore};
use chrono::{DateTime, Utc};

/// Which entries to list
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Only this tenant
    pub tenant_id: Option<u64>,
    /// Only this user
    pub user_id: Option<u64>,
    /// Only this action
    pub action: Option<AuditAction>,
    /// Only entries at or after this time
    pub since: Option<DateTime<Utc>>,
}

/// Append an entry and return its id
pub fn record(
    store: &mut HerdStore,
    tenant_id: Option<u64>,
    user_id: u64,
    action: AuditAction,
    entity_type: &str,
    entity_id: Option<u64>,
    details: impl Into<String>,
) -> u64 {
    let id = next_id(&store.audit_logs, |l| l.id);
    let details = details.into();
    tracing::debug!("audit {id}: {action:?} {entity_type} {details}");
    store.audit_logs.push(AuditLog {
        id,
        tenant_id,
        user_id,
        action,
        entity_type: entity_type.to_string(),
        entity_id,
        details,
        timestamp: Utc::now(),
    });
    id
}

/// Entries matching a filter, newest first
#[must_use]
pub fn filter<'a>(logs: &'a [AuditLog], filter: &AuditFilter) -> Vec<&'a AuditLog> {
    let mut matching: Vec<&AuditLog> = logs
        .iter()
        .filter(|l| filter.tenant_id.map_or(true, |t| l.tenant_id == Some(t)))
        .filter(|l| filter.user_id.map_or(true, |u| l.user_id == u))
        .filter(|l| filter.action.map_or(true, |a| l.action == a))
        .filter(|l| filter.since.map_or(true, |s| l.timestamp >= s))
        .collect();
    matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
    matching
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::demo_store;

    #[test]
    fn test_filter_by_tenant_newest_first() {
        let store = demo_store();
        let logs = filter(&store.audit_logs, &AuditFilter { tenant_id: Some(1), ..Default::default() });
        let ids: Vec<u64> = logs.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 4, 2, 3]);
    }

    #[test]
    fn test_filter_by_action() {
        let store = demo_store();
        let logs = filter(
            &store.audit_logs,
            &AuditFilter { action: Some(AuditAction::Export), ..Default::default() },
        );
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].tenant_id, Some(2));
    }

    #[test]
    fn test_record_appends() {
        let mut store = demo_store();
        let id = record(&mut store, Some(1), 2, AuditAction::Delete, "animal", Some(9), "removed");
        assert_eq!(id, 7);
        let newest = filter(&store.audit_logs, &AuditFilter::default())[0];
        assert_eq!(newest.id, 7);
    }
}
