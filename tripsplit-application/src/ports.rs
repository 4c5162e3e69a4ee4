use crate::{
    error::{LedgerParseError, StoreError},
    model::{ExpenseId, GroupId, Ledger, StoredExpense},
};
use tripsplit_domain::{Expense, ParticipantId};

/// Persistence for validated expenses.
///
/// Implementations must tolerate concurrent callers; the service always
/// recomputes from the snapshot returned by a list call.
pub trait ExpenseStore: Send + Sync {
    fn create(&self, group: &GroupId, expense: Expense) -> Result<StoredExpense, StoreError>;

    /// Expenses of one group in creation order.
    fn list_by_group(&self, group: &GroupId) -> Result<Vec<StoredExpense>, StoreError>;

    /// Expenses across all groups where `participant` paid or owes a share.
    fn list_by_participant(
        &self,
        participant: &ParticipantId,
    ) -> Result<Vec<StoredExpense>, StoreError>;

    fn delete(&self, group: &GroupId, id: ExpenseId) -> Result<StoredExpense, StoreError>;
}

pub trait LedgerParser: Send + Sync {
    fn parse(&self, content: &str) -> Result<Ledger, LedgerParseError>;
}
