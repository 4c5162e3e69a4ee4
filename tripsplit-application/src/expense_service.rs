use crate::{
    error::{RosterError, StoreError, SubmissionError},
    model::{ExpenseId, GroupId, StoredExpense},
    ports::ExpenseStore,
};
use tripsplit_domain::{
    MemberBalances, Money, ParticipantId, Roster, Settlement, SettlementEngine, SplitRequest,
    SplitResolver, services::SETTLEMENT_EPSILON,
};

/// Entry point shared by every front end: validates and records expenses and
/// recomputes settlements from the store.
#[derive(Clone, Copy)]
pub struct ExpenseService<'a> {
    store: &'a dyn ExpenseStore,
    resolver: SplitResolver,
    engine: SettlementEngine,
}

impl<'a> ExpenseService<'a> {
    pub fn new(
        store: &'a dyn ExpenseStore,
        resolver: SplitResolver,
        engine: SettlementEngine,
    ) -> Self {
        Self {
            store,
            resolver,
            engine,
        }
    }

    pub fn engine(&self) -> SettlementEngine {
        self.engine
    }

    /// Resolves the split and stores the expense. Invalid input never
    /// reaches the store.
    pub fn submit(
        &self,
        group: &GroupId,
        request: SplitRequest,
    ) -> Result<StoredExpense, SubmissionError> {
        let expense = self.resolver.resolve(request).inspect_err(|err| {
            tracing::debug!(group = %group, error = %err, "Rejected expense submission");
        })?;
        let stored = self.store.create(group, expense)?;

        tracing::debug!(
            group = %group,
            id = %stored.id,
            amount = %stored.expense.amount(),
            payer = %stored.expense.payer(),
            "Expense recorded"
        );
        Ok(stored)
    }

    pub fn delete(&self, group: &GroupId, id: ExpenseId) -> Result<StoredExpense, StoreError> {
        let removed = self.store.delete(group, id)?;
        tracing::debug!(group = %group, id = %id, "Expense deleted");
        Ok(removed)
    }

    pub fn balances(&self, group: &GroupId, roster: &Roster) -> Result<MemberBalances, StoreError> {
        let expenses = self.store.list_by_group(group)?;
        Ok(self
            .engine
            .compute_balances(expenses.iter().map(|stored| &stored.expense), roster))
    }

    /// Full recomputation from the current snapshot of the group.
    pub fn settlement(&self, group: &GroupId, roster: &Roster) -> Result<Settlement, StoreError> {
        let expenses = self.store.list_by_group(group)?;
        let settlement = self
            .engine
            .settle(expenses.iter().map(|stored| &stored.expense), roster);

        tracing::debug!(
            group = %group,
            expense_count = expenses.len(),
            transfer_count = settlement.transfers.len(),
            "Settlement computed"
        );
        Ok(settlement)
    }

    pub fn expenses_for(&self, participant: &ParticipantId) -> Result<Vec<StoredExpense>, StoreError> {
        self.store.list_by_participant(participant)
    }

    /// Returns the roster without `participant`. Refused while they still owe
    /// or are owed more than the settlement tolerance.
    pub fn remove_participant(
        &self,
        group: &GroupId,
        roster: &Roster,
        participant: &ParticipantId,
    ) -> Result<Roster, RosterError> {
        if !roster.contains(participant) {
            return Err(RosterError::UnknownParticipant {
                participant: participant.clone(),
            });
        }

        let balances = self.balances(group, roster)?;
        let balance = balances.get(participant).copied().unwrap_or(Money::ZERO);
        if !balance.is_within(Money::from_decimal(SETTLEMENT_EPSILON)) {
            tracing::warn!(
                group = %group,
                participant = %participant,
                balance = %balance,
                "Refusing to remove participant with outstanding balance"
            );
            return Err(RosterError::OutstandingBalance {
                participant: participant.clone(),
                balance,
            });
        }

        let mut updated = roster.clone();
        updated.remove(participant);
        tracing::debug!(group = %group, participant = %participant, "Participant removed");
        Ok(updated)
    }
}
