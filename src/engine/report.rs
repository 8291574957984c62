use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::{BudgetState, Category, Transaction};

/// Sum of all recorded amounts, recomputed from the live list.
pub(crate) fn total_spending(transactions: &[Transaction]) -> Decimal {
    transactions.iter().map(|t| t.amount).sum()
}

/// Sum of recorded amounts in one category.
pub(crate) fn category_spending(transactions: &[Transaction], category: Category) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.category == category)
        .map(|t| t.amount)
        .sum()
}

/// Budget minus total spending. `None` while unconfigured.
pub(crate) fn remaining(state: &BudgetState) -> Option<Decimal> {
    state
        .budget_limit
        .map(|limit| limit - total_spending(&state.transactions))
}

/// Share of the budget used, in percent. `None` while unconfigured or when
/// the limit is zero.
pub(crate) fn percentage_used(state: &BudgetState) -> Option<Decimal> {
    match state.budget_limit {
        Some(limit) if limit != Decimal::ZERO => {
            Some(total_spending(&state.transactions) / limit * Decimal::ONE_HUNDRED)
        }
        _ => None,
    }
}

/// Per-category totals, including only categories with at least one
/// transaction.
pub(crate) fn spending_by_category(transactions: &[Transaction]) -> BTreeMap<Category, Decimal> {
    let mut by_category = BTreeMap::new();
    for t in transactions {
        *by_category.entry(t.category).or_insert(Decimal::ZERO) += t.amount;
    }
    by_category
}
