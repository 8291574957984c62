use chrono::Local;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Category;

/// A recorded expense. Immutable once created; removed only by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Transaction {
    pub(crate) id: String,
    pub(crate) description: String,
    pub(crate) amount: Decimal,
    pub(crate) category: Category,
    /// Display-only timestamp. Ordering is insertion-based, not by date.
    pub(crate) created_at: String,
}

impl Transaction {
    pub(crate) fn new(
        id: String,
        description: String,
        amount: Decimal,
        category: Category,
    ) -> Self {
        Self {
            id,
            description,
            amount,
            category,
            created_at: Local::now().format("%b %d, %H:%M").to_string(),
        }
    }
}
