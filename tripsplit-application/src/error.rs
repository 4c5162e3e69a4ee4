use crate::model::{ExpenseId, GroupId};
use thiserror::Error;
use tripsplit_domain::{Money, ParticipantId, SplitValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("expense {id} not found in group '{group}'")]
    NotFound { group: GroupId, id: ExpenseId },
    #[error("expense store unavailable: {0}")]
    Unavailable(String),
}

/// Why an expense was not recorded. Nothing is stored on either path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Invalid(#[from] SplitValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("'{participant}' is not a member of the group")]
    UnknownParticipant { participant: ParticipantId },
    #[error("'{participant}' still has an outstanding balance of {balance}")]
    OutstandingBalance {
        participant: ParticipantId,
        balance: Money,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerParseError {
    #[error("line {line}: no MEMBERS declaration before this statement")]
    MissingMembers { line: usize },
    #[error("syntax error at line {line}: {detail}")]
    SyntaxError { line: usize, detail: String },
}
