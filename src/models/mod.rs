mod category;
mod state;
mod transaction;

pub(crate) use category::Category;
pub(crate) use state::BudgetState;
pub(crate) use transaction::Transaction;
