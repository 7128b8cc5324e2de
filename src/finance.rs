// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Expense and sales summaries

use crate::types::{Expense, ExpenseCategory, Sale};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Which records a summary covers
#[derive(Debug, Clone, Default)]
pub struct FinanceFilter {
    /// Tenant
    pub tenant_id: u64,
    /// Restrict to one farm
    pub farm_id: Option<u64>,
    /// First day included
    pub from: Option<NaiveDate>,
    /// Last day included
    pub to: Option<NaiveDate>,
}

impl FinanceFilter {
    fn matches(&self, tenant_id: u64, farm_id: u64, date: NaiveDate) -> bool {
        tenant_id == self.tenant_id
            && self.farm_id.map_or(true, |f| f == farm_id)
            && self.from.map_or(true, |from| date >= from)
            && self.to.map_or(true, |to| date <= to)
    }
}

/// Totals for one calendar month
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    /// Expenses in minor units
    pub expenses_cents: i64,
    /// Sales in minor units
    pub sales_cents: i64,
}

/// Financial summary
#[derive(Debug, Clone, Default, Serialize)]
pub struct FinanceSummary {
    /// Sum of matching expenses
    pub total_expenses_cents: i64,
    /// Sum of matching sales
    pub total_sales_cents: i64,
    /// Sales minus expenses
    pub net_profit_cents: i64,
    /// Expenses per category
    pub expenses_by_category: BTreeMap<ExpenseCategory, i64>,
    /// Per-month totals keyed `YYYY-MM`
    pub monthly: BTreeMap<String, MonthTotals>,
    /// Number of expense records
    pub expense_count: usize,
    /// Number of sale records
    pub sale_count: usize,
}

fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Summarize the expenses and sales a filter selects
#[must_use]
pub fn summarize(expenses: &[Expense], sales: &[Sale], filter: &FinanceFilter) -> FinanceSummary {
    let mut summary = FinanceSummary::default();

    for expense in expenses
        .iter()
        .filter(|e| filter.matches(e.tenant_id, e.farm_id, e.date))
    {
        summary.total_expenses_cents += expense.amount_cents;
        summary.expense_count += 1;
        *summary
            .expenses_by_category
            .entry(expense.category)
            .or_default() += expense.amount_cents;
        summary
            .monthly
            .entry(month_key(expense.date))
            .or_default()
            .expenses_cents += expense.amount_cents;
    }

    for sale in sales
        .iter()
        .filter(|s| filter.matches(s.tenant_id, s.farm_id, s.date))
    {
        summary.total_sales_cents += sale.amount_cents;
        summary.sale_count += 1;
        summary
            .monthly
            .entry(month_key(sale.date))
            .or_default()
            .sales_cents += sale.amount_cents;
    }

    summary.net_profit_cents = summary.total_sales_cents - summary.total_expenses_cents;
    summary
}

/// Format minor units as a decimal amount with a currency code
#[must_use]
pub fn format_money(cents: i64, currency: &str) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02} {currency}", abs / 100, abs % 100)
}
