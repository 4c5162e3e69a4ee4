use arcstr::ArcStr;
use std::fmt;
use tripsplit_domain::{Expense, ParticipantId, SplitRequest};

/// Identifies a trip (or any other expense group).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(ArcStr);

impl GroupId {
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(value: &str) -> Self {
        Self(ArcStr::from(value))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpenseId(pub u64);

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An expense as persisted by an [`crate::ports::ExpenseStore`].
#[derive(Clone, Debug, PartialEq)]
pub struct StoredExpense {
    pub id: ExpenseId,
    pub group: GroupId,
    pub expense: Expense,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Balances,
    Settle,
    Drop(ParticipantId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerStatement {
    Members(Vec<ParticipantId>),
    Expense(SplitRequest),
    Command(Command),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerStatementWithLine {
    pub line: usize,
    pub statement: LedgerStatement,
}

/// A parsed ledger file, statements in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ledger {
    statements: Vec<LedgerStatementWithLine>,
}

impl Ledger {
    pub fn new(statements: Vec<LedgerStatementWithLine>) -> Self {
        Self { statements }
    }

    pub fn statements(&self) -> &[LedgerStatementWithLine] {
        &self.statements
    }

    pub fn has_command(&self) -> bool {
        self.statements
            .iter()
            .any(|stmt| matches!(stmt.statement, LedgerStatement::Command(_)))
    }

    pub fn into_statements(self) -> Vec<LedgerStatementWithLine> {
        self.statements
    }
}
