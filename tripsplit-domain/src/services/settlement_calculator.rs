use crate::{
    model::{MemberBalances, Money, ParticipantId, Transfer},
    services::balance_calculator::SETTLEMENT_EPSILON,
};

/// Greedy debtor/creditor matching.
///
/// Only balances beyond [`SETTLEMENT_EPSILON`] take part. Debtors are visited
/// most-indebted first and creditors most-credited first; equal balances keep
/// participant identifier order. A side is finished once its remaining amount
/// is within [`SETTLEMENT_EPSILON`], so a leftover of a cent is not chased
/// with an extra transfer. The result is not guaranteed to use the fewest
/// possible transfers.
pub struct SettlementCalculator;

impl SettlementCalculator {
    pub fn calculate(&self, balances: &MemberBalances) -> Vec<Transfer> {
        let epsilon = Money::from_decimal(SETTLEMENT_EPSILON);

        // Both lists hold outstanding magnitudes, so each is sorted descending.
        let mut debtors: Vec<(ParticipantId, Money)> = balances
            .iter()
            .filter(|(_, balance)| **balance < -epsilon)
            .map(|(participant, balance)| (participant.clone(), balance.abs()))
            .collect();
        let mut creditors: Vec<(ParticipantId, Money)> = balances
            .iter()
            .filter(|(_, balance)| **balance > epsilon)
            .map(|(participant, balance)| (participant.clone(), *balance))
            .collect();
        debtors.sort_by(|a, b| b.1.cmp(&a.1));
        creditors.sort_by(|a, b| b.1.cmp(&a.1));

        let mut transfers = Vec::with_capacity(debtors.len() + creditors.len());
        let (mut debtor_idx, mut creditor_idx) = (0, 0);

        while let (Some((debtor, owed)), Some((creditor, credit))) =
            (debtors.get_mut(debtor_idx), creditors.get_mut(creditor_idx))
        {
            let amount = (*owed).min(*credit);
            if amount.is_positive() {
                transfers.push(Transfer {
                    from: debtor.clone(),
                    to: creditor.clone(),
                    amount,
                });
            }
            *owed -= amount;
            *credit -= amount;

            if owed.is_within(epsilon) {
                debtor_idx += 1;
            }
            if credit.is_within(epsilon) {
                creditor_idx += 1;
            }
        }

        tracing::debug!(
            debtor_count = debtors.len(),
            creditor_count = creditors.len(),
            transfer_count = transfers.len(),
            "Transfers computed"
        );

        transfers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn calculator() -> SettlementCalculator {
        SettlementCalculator
    }

    fn balances(entries: &[(&str, Money)]) -> MemberBalances {
        entries
            .iter()
            .map(|(name, money)| (ParticipantId::from(*name), *money))
            .collect()
    }

    fn rm(value: i64) -> Money {
        Money::from_i64(value)
    }

    #[rstest]
    #[case::two_people(
        balances(&[("You", rm(60)), ("Sarah", rm(-60))]),
        vec![("Sarah", "You", rm(60))]
    )]
    #[case::one_creditor_two_debtors(
        balances(&[("X", rm(60)), ("Y", rm(-30)), ("Z", rm(-30))]),
        vec![("Y", "X", rm(30)), ("Z", "X", rm(30))]
    )]
    #[case::one_debtor_two_creditors(
        balances(&[("A", Money::new(4666, 2)), ("B", Money::new(667, 2)), ("C", Money::new(-5333, 2))]),
        vec![("C", "A", Money::new(4666, 2)), ("C", "B", Money::new(667, 2))]
    )]
    #[case::largest_first(
        balances(&[("A", rm(-10)), ("B", rm(-40)), ("C", rm(20)), ("D", rm(30))]),
        vec![("B", "D", rm(30)), ("B", "C", rm(10)), ("A", "C", rm(10))]
    )]
    #[case::ties_follow_identifier_order(
        balances(&[("M", rm(-10)), ("K", rm(-10)), ("Z", rm(10)), ("P", rm(10))]),
        vec![("K", "P", rm(10)), ("M", "Z", rm(10))]
    )]
    #[case::all_settled(
        balances(&[("A", rm(0)), ("B", rm(0))]),
        vec![]
    )]
    #[case::within_tolerance(
        balances(&[("A", Money::new(1, 2)), ("B", Money::new(-1, 2))]),
        vec![]
    )]
    #[case::empty(balances(&[]), vec![])]
    fn settlement_calculator_cases(
        calculator: SettlementCalculator,
        #[case] balances: MemberBalances,
        #[case] expected: Vec<(&str, &str, Money)>,
    ) {
        let expected: Vec<Transfer> = expected
            .into_iter()
            .map(|(from, to, amount)| Transfer {
                from: from.into(),
                to: to.into(),
                amount,
            })
            .collect();

        assert_eq!(calculator.calculate(&balances), expected);
    }

    #[rstest]
    fn cent_leftover_within_tolerance_finishes_a_side(calculator: SettlementCalculator) {
        let balances = balances(&[
            ("C1", Money::new(1000, 2)),
            ("C2", Money::new(3, 2)),
            ("D", Money::new(-1001, 2)),
            ("E", Money::new(-2, 2)),
        ]);

        let transfers = calculator.calculate(&balances);

        assert_eq!(
            transfers,
            vec![
                Transfer {
                    from: "D".into(),
                    to: "C1".into(),
                    amount: Money::new(1000, 2),
                },
                Transfer {
                    from: "E".into(),
                    to: "C2".into(),
                    amount: Money::new(2, 2),
                },
            ]
        );
    }

    #[rstest]
    fn leftover_within_tolerance_is_not_transferred(calculator: SettlementCalculator) {
        let balances = balances(&[
            ("A", Money::new(1001, 2)),
            ("B", Money::new(-1000, 2)),
            ("C", Money::new(-1, 2)),
        ]);

        let transfers = calculator.calculate(&balances);

        assert_eq!(
            transfers,
            vec![Transfer {
                from: "B".into(),
                to: "A".into(),
                amount: Money::new(1000, 2),
            }]
        );
    }
}
