// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Subscription plans, usage limits and invoice previews

use crate::types::{AnimalStatus, BillingCycle, HerdStore, PlanTier, Subscription, SubscriptionStatus};
use chrono::NaiveDate;
use serde::Serialize;

/// Limits attached to a plan; `None` means unlimited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanLimits {
    /// Active animals
    pub max_animals: Option<usize>,
    /// Farms
    pub max_farms: Option<usize>,
    /// Users
    pub max_users: Option<usize>,
}

impl PlanTier {
    /// Usage limits of the tier
    #[must_use]
    pub fn limits(self) -> PlanLimits {
        match self {
            Self::Basic => PlanLimits {
                max_animals: Some(50),
                max_farms: Some(1),
                max_users: Some(3),
            },
            Self::Professional => PlanLimits {
                max_animals: Some(500),
                max_farms: Some(5),
                max_users: Some(15),
            },
            Self::Enterprise => PlanLimits {
                max_animals: None,
                max_farms: None,
                max_users: None,
            },
        }
    }

    /// Monthly list price in minor units
    #[must_use]
    pub fn monthly_price_cents(self) -> i64 {
        match self {
            Self::Basic => 2_900,
            Self::Professional => 9_900,
            Self::Enterprise => 29_900,
        }
    }

    /// Price of one billing period; a year costs ten months
    #[must_use]
    pub fn price_cents(self, cycle: BillingCycle) -> i64 {
        match cycle {
            BillingCycle::Monthly => self.monthly_price_cents(),
            BillingCycle::Yearly => self.monthly_price_cents() * 10,
        }
    }
}

/// What a tenant currently uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Usage {
    /// Active animals
    pub animals: usize,
    /// Farms
    pub farms: usize,
    /// Users
    pub users: usize,
}

/// A limit the tenant is over
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LimitExceeded {
    /// Which resource
    pub resource: &'static str,
    /// Current usage
    pub used: usize,
    /// Plan limit
    pub limit: usize,
}

/// Invoice preview for one billing period
#[derive(Debug, Clone, Serialize)]
pub struct InvoicePreview {
    /// Tenant billed
    pub tenant_id: u64,
    /// Plan
    pub plan: PlanTier,
    /// Billing cycle
    pub billing_cycle: BillingCycle,
    /// Price before tax
    pub subtotal_cents: i64,
    /// Tax rate applied
    pub tax_rate_percent: f64,
    /// Tax amount
    pub tax_cents: i64,
    /// Total due
    pub total_cents: i64,
    /// Date the period starts
    pub period_start: NaiveDate,
}

/// Count a tenant's active animals, farms and users
#[must_use]
pub fn usage(store: &HerdStore, tenant_id: u64) -> Usage {
    Usage {
        animals: store
            .animals
            .iter()
            .filter(|a| a.tenant_id == tenant_id && a.status == AnimalStatus::Active)
            .count(),
        farms: store.farms.iter().filter(|f| f.tenant_id == tenant_id).count(),
        users: store
            .users
            .iter()
            .filter(|u| u.tenant_id == Some(tenant_id))
            .count(),
    }
}

/// Limits of `plan` that `usage` is over
#[must_use]
pub fn check_limits(plan: PlanTier, usage: &Usage) -> Vec<LimitExceeded> {
    let limits = plan.limits();
    [
        ("animals", usage.animals, limits.max_animals),
        ("farms", usage.farms, limits.max_farms),
        ("users", usage.users, limits.max_users),
    ]
    .into_iter()
    .filter_map(|(resource, used, limit)| {
        let limit = limit?;
        (used > limit).then_some(LimitExceeded { resource, used, limit })
    })
    .collect()
}

/// Price the next billing period of a subscription
#[must_use]
pub fn invoice_preview(subscription: &Subscription, tax_rate_percent: f64) -> InvoicePreview {
    let subtotal_cents = subscription.plan.price_cents(subscription.billing_cycle);
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    let tax_cents = (subtotal_cents as f64 * tax_rate_percent / 100.0).round() as i64;

    InvoicePreview {
        tenant_id: subscription.tenant_id,
        plan: subscription.plan,
        billing_cycle: subscription.billing_cycle,
        subtotal_cents,
        tax_rate_percent,
        tax_cents,
        total_cents: subtotal_cents + tax_cents,
        period_start: subscription.renews_on,
    }
}

/// Days until the next renewal; negative when it is overdue
#[must_use]
pub fn days_until_renewal(subscription: &Subscription, today: NaiveDate) -> i64 {
    (subscription.renews_on - today).num_days()
}

/// Whether the tenant may use the platform under this subscription
#[must_use]
pub fn is_entitled(subscription: &Subscription) -> bool {
    matches!(
        subscription.status,
        SubscriptionStatus::Trial | SubscriptionStatus::Active
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::demo_store;

    #[test]
    fn test_usage_counts_active_animals_only() {
        let store = demo_store();
        let used = usage(&store, 1);
        assert_eq!(used, Usage { animals: 8, farms: 2, users: 4 });
    }

    #[test]
    fn test_basic_plan_limits() {
        let used = Usage { animals: 51, farms: 1, users: 4 };
        let exceeded = check_limits(PlanTier::Basic, &used);
        let resources: Vec<_> = exceeded.iter().map(|e| e.resource).collect();
        assert_eq!(resources, vec!["animals", "users"]);
        assert!(check_limits(PlanTier::Enterprise, &used).is_empty());
    }

    #[test]
    fn test_invoice_preview() {
        let store = demo_store();
        let mut subscription = store.subscriptions[0].clone();
        let invoice = invoice_preview(&subscription, 20.0);
        assert_eq!(invoice.subtotal_cents, 9_900);
        assert_eq!(invoice.tax_cents, 1_980);
        assert_eq!(invoice.total_cents, 11_880);

        subscription.billing_cycle = BillingCycle::Yearly;
        assert_eq!(invoice_preview(&subscription, 0.0).total_cents, 99_000);
    }

    #[test]
    fn test_entitlement() {
        let store = demo_store();
        let mut subscription = store.subscriptions[1].clone();
        assert!(is_entitled(&subscription));
        subscription.status = SubscriptionStatus::Expired;
        assert!(!is_entitled(&subscription));
        let today = NaiveDate::from_ymd_opt(2025, 5, 21).unwrap();
        assert_eq!(days_until_renewal(&subscription, today), 10);
    }
}
