use crate::model::{Expense, MemberBalances, Money, ParticipantId, Roster};
use rust_decimal::Decimal;

/// Tolerance used for the zero-sum check and for treating a balance as settled.
pub const SETTLEMENT_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// How expense references to participants missing from the roster are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StaleReferencePolicy {
    /// Only roster members are credited or charged; references to anyone else
    /// are dropped. Removing a participant therefore changes other balances.
    #[default]
    Ignore,
    /// Removed participants keep their historical balance as an extra entry.
    Retain,
}

/// Folds expenses into per-participant balances.
///
/// `balance = Σ paid as payer − Σ owed shares`. Expenses are applied in any
/// order with the same result.
pub struct BalanceAccumulator<'r> {
    roster: &'r Roster,
    policy: StaleReferencePolicy,
    balances: MemberBalances,
    dropped_references: usize,
}

impl<'r> BalanceAccumulator<'r> {
    pub fn new(roster: &'r Roster, policy: StaleReferencePolicy) -> Self {
        let balances = roster
            .iter()
            .cloned()
            .map(|participant| (participant, Money::ZERO))
            .collect();

        Self {
            roster,
            policy,
            balances,
            dropped_references: 0,
        }
    }

    pub fn apply(&mut self, expense: &Expense) {
        self.credit(expense.payer(), expense.amount());
        for (participant, share) in expense.shares() {
            self.credit(participant, -*share);
        }
    }

    fn credit(&mut self, participant: &ParticipantId, amount: Money) {
        if !self.roster.contains(participant) && self.policy == StaleReferencePolicy::Ignore {
            self.dropped_references += 1;
            tracing::warn!(
                participant = %participant,
                amount = %amount,
                "Dropping expense reference to participant outside the roster"
            );
            return;
        }
        *self
            .balances
            .entry(participant.clone())
            .or_insert(Money::ZERO) += amount;
    }

    pub fn balances(&self) -> &MemberBalances {
        &self.balances
    }

    pub fn dropped_references(&self) -> usize {
        self.dropped_references
    }

    pub fn into_balances(self) -> MemberBalances {
        self.balances
    }
}

/// Computes per-participant balances from a snapshot of expenses.
#[derive(Clone, Copy, Debug, Default)]
pub struct BalanceCalculator {
    policy: StaleReferencePolicy,
}

impl BalanceCalculator {
    pub fn new(policy: StaleReferencePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> StaleReferencePolicy {
        self.policy
    }

    pub fn calculate<'e, I>(&self, expenses: I, roster: &Roster) -> MemberBalances
    where
        I: IntoIterator<Item = &'e Expense>,
    {
        let mut accumulator = BalanceAccumulator::new(roster, self.policy);
        let mut expense_count = 0usize;
        for expense in expenses {
            accumulator.apply(expense);
            expense_count += 1;
        }

        let dropped_references = accumulator.dropped_references();
        let balances = accumulator.into_balances();
        let total: Money = balances.values().sum();

        tracing::debug!(
            expense_count,
            member_count = balances.len(),
            dropped_references,
            total = %total,
            policy = ?self.policy,
            "Balances computed"
        );

        // Dropped references legitimately unbalance the table; anything else
        // means shares bypassed validation.
        let conserved = total.is_within(Money::from_decimal(SETTLEMENT_EPSILON));
        if dropped_references == 0 && !conserved {
            tracing::error!(
                total = %total,
                member_count = balances.len(),
                expense_count,
                "Balance conservation violated: expense shares do not match their amounts"
            );
        }
        debug_assert!(
            dropped_references > 0 || conserved,
            "balances sum to {total}, expected zero"
        );

        balances
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SplitMethod;
    use indexmap::IndexMap;
    use rstest::{fixture, rstest};

    fn expense(amount: i64, payer: &str, shares: &[(&str, i64)]) -> Expense {
        let shares: IndexMap<ParticipantId, Money> = shares
            .iter()
            .map(|(name, share)| (ParticipantId::from(*name), Money::from_i64(*share)))
            .collect();
        Expense::from_stored_parts(
            None,
            Money::from_i64(amount),
            payer.into(),
            SplitMethod::Manual,
            shares,
        )
    }

    fn balances(entries: &[(&str, i64)]) -> MemberBalances {
        entries
            .iter()
            .map(|(name, value)| (ParticipantId::from(*name), Money::from_i64(*value)))
            .collect()
    }

    #[fixture]
    fn roster() -> Roster {
        ["X", "Y", "Z"].into_iter().collect()
    }

    #[rstest]
    #[case::no_expenses(vec![], balances(&[("X", 0), ("Y", 0), ("Z", 0)]))]
    #[case::payer_shares(
        vec![expense(90, "X", &[("X", 30), ("Y", 30), ("Z", 30)])],
        balances(&[("X", 60), ("Y", -30), ("Z", -30)])
    )]
    #[case::payer_not_sharing(
        vec![expense(40, "Y", &[("X", 20), ("Z", 20)])],
        balances(&[("X", -20), ("Y", 40), ("Z", -20)])
    )]
    #[case::offsetting(
        vec![
            expense(50, "X", &[("Y", 50)]),
            expense(50, "Y", &[("X", 50)]),
        ],
        balances(&[("X", 0), ("Y", 0), ("Z", 0)])
    )]
    fn calculates_balances(
        roster: Roster,
        #[case] expenses: Vec<Expense>,
        #[case] expected: MemberBalances,
    ) {
        let result = BalanceCalculator::default().calculate(&expenses, &roster);
        assert_eq!(result, expected);
    }

    #[rstest]
    fn order_does_not_matter(roster: Roster) {
        let mut expenses = vec![
            expense(90, "X", &[("X", 30), ("Y", 30), ("Z", 30)]),
            expense(12, "Z", &[("Y", 12)]),
            expense(7, "Y", &[("X", 3), ("Z", 4)]),
        ];
        let forward = BalanceCalculator::default().calculate(&expenses, &roster);
        expenses.reverse();
        let backward = BalanceCalculator::default().calculate(&expenses, &roster);

        assert_eq!(forward, backward);
    }

    #[test]
    fn ignore_policy_drops_removed_participants() {
        let roster: Roster = ["X", "Y"].into_iter().collect();
        let expenses = [expense(90, "X", &[("X", 30), ("Y", 30), ("Z", 30)])];

        let calculator = BalanceCalculator::new(StaleReferencePolicy::Ignore);
        let mut accumulator = BalanceAccumulator::new(&roster, calculator.policy());
        for expense in &expenses {
            accumulator.apply(expense);
        }

        assert_eq!(accumulator.dropped_references(), 1);
        assert_eq!(
            accumulator.into_balances(),
            balances(&[("X", 60), ("Y", -30)])
        );
    }

    #[test]
    fn ignore_policy_skips_payer_outside_roster() {
        let roster: Roster = ["X", "Y"].into_iter().collect();
        let expenses = [expense(20, "Z", &[("X", 10), ("Y", 10)])];

        let result = BalanceCalculator::new(StaleReferencePolicy::Ignore).calculate(&expenses, &roster);

        assert_eq!(result, balances(&[("X", -10), ("Y", -10)]));
    }

    #[test]
    fn retain_policy_keeps_historical_balance() {
        let roster: Roster = ["X", "Y"].into_iter().collect();
        let expenses = [expense(90, "X", &[("X", 30), ("Y", 30), ("Z", 30)])];

        let result = BalanceCalculator::new(StaleReferencePolicy::Retain).calculate(&expenses, &roster);

        assert_eq!(result, balances(&[("X", 60), ("Y", -30), ("Z", -30)]));
    }
}
