use dashmap::DashMap;
use indexmap::IndexMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tripsplit_application::{ExpenseId, ExpenseStore, GroupId, StoreError, StoredExpense};
use tripsplit_domain::{Expense, ParticipantId};

/// Process-local expense store. Groups are sharded by `DashMap`; ids are
/// unique across all groups and never reused.
#[derive(Default)]
pub struct InMemoryExpenseStore {
    groups: DashMap<GroupId, IndexMap<ExpenseId, StoredExpense>>,
    last_id: AtomicU64,
}

impl InMemoryExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> ExpenseId {
        ExpenseId(self.last_id.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

impl ExpenseStore for InMemoryExpenseStore {
    fn create(&self, group: &GroupId, expense: Expense) -> Result<StoredExpense, StoreError> {
        let stored = StoredExpense {
            id: self.next_id(),
            group: group.clone(),
            expense,
        };
        self.groups
            .entry(group.clone())
            .or_default()
            .insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn list_by_group(&self, group: &GroupId) -> Result<Vec<StoredExpense>, StoreError> {
        Ok(self
            .groups
            .get(group)
            .map(|expenses| expenses.values().cloned().collect())
            .unwrap_or_default())
    }

    fn list_by_participant(
        &self,
        participant: &ParticipantId,
    ) -> Result<Vec<StoredExpense>, StoreError> {
        let mut found: Vec<StoredExpense> = self
            .groups
            .iter()
            .flat_map(|group| {
                group
                    .values()
                    .filter(|stored| stored.expense.involves(participant))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();
        found.sort_by_key(|stored| stored.id);
        Ok(found)
    }

    fn delete(&self, group: &GroupId, id: ExpenseId) -> Result<StoredExpense, StoreError> {
        self.groups
            .get_mut(group)
            .and_then(|mut expenses| expenses.shift_remove(&id))
            .ok_or_else(|| StoreError::NotFound {
                group: group.clone(),
                id,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::collections::BTreeSet;
    use tripsplit_domain::{Money, SplitInput, SplitRequest, SplitResolver};

    fn expense(amount: i64, payer: &str, participants: &[&str]) -> Expense {
        SplitResolver::default()
            .resolve(SplitRequest {
                title: None,
                amount: Money::from_i64(amount),
                payer: payer.into(),
                participants: participants
                    .iter()
                    .copied()
                    .map(ParticipantId::from)
                    .collect(),
                method: SplitInput::Equal,
            })
            .expect("valid expense")
    }

    #[fixture]
    fn store() -> InMemoryExpenseStore {
        InMemoryExpenseStore::new()
    }

    #[rstest]
    fn create_assigns_increasing_ids(store: InMemoryExpenseStore) {
        let group = GroupId::from("langkawi");
        let first = store.create(&group, expense(10, "Mei", &["Mei"])).unwrap();
        let second = store.create(&"penang".into(), expense(20, "Mei", &["Mei"])).unwrap();

        assert_eq!(first.id, ExpenseId(1));
        assert_eq!(second.id, ExpenseId(2));
    }

    #[rstest]
    fn list_by_group_keeps_creation_order(store: InMemoryExpenseStore) {
        let group = GroupId::from("langkawi");
        store.create(&group, expense(10, "Mei", &["Mei"])).unwrap();
        store.create(&group, expense(20, "Ravi", &["Mei"])).unwrap();
        store.create(&"penang".into(), expense(30, "Ravi", &["Ravi"])).unwrap();

        let amounts: Vec<Money> = store
            .list_by_group(&group)
            .unwrap()
            .into_iter()
            .map(|stored| stored.expense.amount())
            .collect();

        assert_eq!(amounts, vec![Money::from_i64(10), Money::from_i64(20)]);
        assert!(store.list_by_group(&"unknown".into()).unwrap().is_empty());
    }

    #[rstest]
    #[case::payer_only("Ravi", vec![ExpenseId(2), ExpenseId(3)])]
    #[case::sharer_across_groups("Mei", vec![ExpenseId(1), ExpenseId(2)])]
    #[case::absent("Tan", vec![])]
    fn list_by_participant_spans_groups(
        store: InMemoryExpenseStore,
        #[case] participant: &str,
        #[case] expected: Vec<ExpenseId>,
    ) {
        store
            .create(&"langkawi".into(), expense(10, "Mei", &["Mei"]))
            .unwrap();
        store
            .create(&"penang".into(), expense(20, "Ravi", &["Mei", "Aisyah"]))
            .unwrap();
        store
            .create(&"langkawi".into(), expense(30, "Ravi", &["Aisyah"]))
            .unwrap();

        let ids: Vec<ExpenseId> = store
            .list_by_participant(&participant.into())
            .unwrap()
            .into_iter()
            .map(|stored| stored.id)
            .collect();

        assert_eq!(ids, expected);
    }

    #[rstest]
    fn delete_removes_only_from_its_group(store: InMemoryExpenseStore) {
        let group = GroupId::from("langkawi");
        let stored = store.create(&group, expense(10, "Mei", &["Mei"])).unwrap();

        assert_eq!(
            store.delete(&"penang".into(), stored.id),
            Err(StoreError::NotFound {
                group: "penang".into(),
                id: stored.id,
            })
        );
        assert_eq!(store.delete(&group, stored.id), Ok(stored.clone()));
        assert_eq!(
            store.delete(&group, stored.id),
            Err(StoreError::NotFound {
                group,
                id: stored.id,
            })
        );
    }

    #[rstest]
    fn concurrent_creates_get_unique_ids(store: InMemoryExpenseStore) {
        let group = GroupId::from("langkawi");
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..25 {
                        store.create(&group, expense(10, "Mei", &["Mei"])).unwrap();
                    }
                });
            }
        });

        let ids: BTreeSet<ExpenseId> = store
            .list_by_group(&group)
            .unwrap()
            .into_iter()
            .map(|stored| stored.id)
            .collect();
        assert_eq!(ids.len(), 100);
    }
}
