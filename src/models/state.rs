use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Category, Transaction};

/// The durable budget document, one per identity. This is exactly the shape
/// persisted by the store.
///
/// `transactions` is newest-first by insertion. Total spending is always
/// recomputed from the live list; no aggregate is cached here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct BudgetState {
    /// Overall spending ceiling. `None` until setup completes.
    pub(crate) budget_limit: Option<Decimal>,
    pub(crate) transactions: Vec<Transaction>,
    /// Optional per-category caps. A category absent here has no limit.
    pub(crate) category_limits: BTreeMap<Category, Decimal>,
}

impl BudgetState {
    pub(crate) fn is_configured(&self) -> bool {
        self.budget_limit.is_some()
    }
}
