use crate::{
    model::{Expense, MemberBalances, Roster, Settlement, Transfer},
    services::{BalanceCalculator, SettlementCalculator, StaleReferencePolicy},
};

/// Balances and transfers for a group, recomputed from scratch on every call.
///
/// Pure and synchronous: safe to call concurrently on independent snapshots.
#[derive(Clone, Copy, Debug, Default)]
pub struct SettlementEngine {
    balance_calculator: BalanceCalculator,
}

impl SettlementEngine {
    pub fn new(policy: StaleReferencePolicy) -> Self {
        Self {
            balance_calculator: BalanceCalculator::new(policy),
        }
    }

    pub fn policy(&self) -> StaleReferencePolicy {
        self.balance_calculator.policy()
    }

    pub fn compute_balances<'e, I>(&self, expenses: I, roster: &Roster) -> MemberBalances
    where
        I: IntoIterator<Item = &'e Expense>,
    {
        self.balance_calculator.calculate(expenses, roster)
    }

    pub fn compute_transfers(&self, balances: &MemberBalances) -> Vec<Transfer> {
        SettlementCalculator.calculate(balances)
    }

    pub fn settle<'e, I>(&self, expenses: I, roster: &Roster) -> Settlement
    where
        I: IntoIterator<Item = &'e Expense>,
    {
        let balances = self.compute_balances(expenses, roster);
        let transfers = self.compute_transfers(&balances);
        Settlement {
            balances,
            transfers,
        }
    }
}
