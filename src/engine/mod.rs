pub(crate) mod report;

use chrono::Utc;
use rust_decimal::Decimal;

use crate::models::{BudgetState, Category, Transaction};

/// A proposed expense, not yet part of any state.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Candidate {
    pub(crate) description: String,
    pub(crate) amount: Decimal,
    pub(crate) category: Category,
}

/// Which limit a confirmation is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfirmKind {
    CategoryLimit,
    OverallBudget,
}

/// An expense held back pending explicit user approval. Commit it with
/// [`commit`], or drop it to discard.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PendingExpense {
    pub(crate) candidate: Candidate,
    pub(crate) kind: ConfirmKind,
    /// How far over the relevant limit the expense would land.
    pub(crate) over_by: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RejectReason {
    InvalidInput,
    BudgetExceeded { remaining: Decimal },
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput => write!(f, "invalid input"),
            Self::BudgetExceeded { remaining } => {
                write!(f, "budget exceeded ({remaining:.2} remaining)")
            }
        }
    }
}

/// Outcome of evaluating a candidate expense.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Decision {
    /// Recorded immediately; carries the materialized transaction.
    Accepted(Transaction),
    /// Held back; the caller must confirm via [`commit`] or discard.
    NeedsConfirmation(PendingExpense),
    /// No state change.
    Rejected(RejectReason),
}

/// Decide whether a candidate expense is recorded, held for confirmation,
/// or rejected. Only the accept path mutates `state`.
///
/// The category-limit check runs before the overall-budget check: a category
/// cap is the narrower constraint and wins when both would trip.
pub(crate) fn evaluate(state: &mut BudgetState, candidate: Candidate) -> Decision {
    if candidate.description.trim().is_empty() || candidate.amount <= Decimal::ZERO {
        return Decision::Rejected(RejectReason::InvalidInput);
    }
    // The caller gates on setup, so an unconfigured state here is bad input.
    let Some(budget_limit) = state.budget_limit else {
        return Decision::Rejected(RejectReason::InvalidInput);
    };

    let total = report::total_spending(&state.transactions);
    let projected = total + candidate.amount;

    if let Some(&cap) = state.category_limits.get(&candidate.category) {
        let category_total = report::category_spending(&state.transactions, candidate.category);
        if category_total + candidate.amount > cap {
            return Decision::NeedsConfirmation(PendingExpense {
                kind: ConfirmKind::CategoryLimit,
                over_by: category_total + candidate.amount - cap,
                candidate,
            });
        }
    }

    if projected > budget_limit {
        if candidate.category.is_exemptible() {
            return Decision::NeedsConfirmation(PendingExpense {
                kind: ConfirmKind::OverallBudget,
                over_by: projected - budget_limit,
                candidate,
            });
        }
        return Decision::Rejected(RejectReason::BudgetExceeded {
            remaining: budget_limit - total,
        });
    }

    Decision::Accepted(insert(state, candidate))
}

/// Finalize a held expense after user approval. Inserts unconditionally:
/// the numbers were shown at decision time and are not re-checked, so a
/// state change between decision and commit is accepted.
pub(crate) fn commit(state: &mut BudgetState, pending: PendingExpense) -> Transaction {
    insert(state, pending.candidate)
}

/// Remove the transaction with the given id. A missing id is a no-op.
pub(crate) fn remove(state: &mut BudgetState, id: &str) {
    state.transactions.retain(|t| t.id != id);
}

/// Set the overall budget. The limit must be positive. Existing
/// transactions and category limits are preserved.
pub(crate) fn set_budget(state: &mut BudgetState, limit: Decimal) -> Result<(), RejectReason> {
    if limit <= Decimal::ZERO {
        return Err(RejectReason::InvalidInput);
    }
    state.budget_limit = Some(limit);
    Ok(())
}

/// Reset to unconfigured, dropping transactions and category limits.
pub(crate) fn clear_budget(state: &mut BudgetState) {
    *state = BudgetState::default();
}

/// Set or overwrite a per-category cap. The limit must be positive.
pub(crate) fn set_category_limit(
    state: &mut BudgetState,
    category: Category,
    limit: Decimal,
) -> Result<(), RejectReason> {
    if limit <= Decimal::ZERO {
        return Err(RejectReason::InvalidInput);
    }
    state.category_limits.insert(category, limit);
    Ok(())
}

/// Drop a per-category cap. A missing entry is a no-op.
pub(crate) fn clear_category_limit(state: &mut BudgetState, category: Category) {
    state.category_limits.remove(&category);
}

fn insert(state: &mut BudgetState, candidate: Candidate) -> Transaction {
    let txn = Transaction::new(
        next_id(state),
        candidate.description.trim().to_string(),
        candidate.amount,
        candidate.category,
    );
    // Newest first
    state.transactions.insert(0, txn.clone());
    txn
}

/// Millisecond-timestamp id, bumped while it collides with an existing one.
fn next_id(state: &BudgetState) -> String {
    let mut id = Utc::now().timestamp_millis();
    while state.transactions.iter().any(|t| t.id == id.to_string()) {
        id += 1;
    }
    id.to_string()
}

/// Edge-triggered "budget reached" latch. Fires once when total spending
/// crosses the limit and re-arms when spending drops back below it.
/// Session-local; never persisted.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct BudgetAlarm {
    tripped: bool,
}

impl BudgetAlarm {
    /// Returns true exactly once per transition into `total >= limit`.
    pub(crate) fn observe(&mut self, total: Decimal, limit: Option<Decimal>) -> bool {
        let over = matches!(limit, Some(l) if total >= l);
        let fired = over && !self.tripped;
        self.tripped = over;
        fired
    }
}

#[cfg(test)]
mod tests;
