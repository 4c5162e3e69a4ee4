#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod expense_service;
pub mod model;
pub mod ports;

pub use error::{LedgerParseError, RosterError, StoreError, SubmissionError};
pub use expense_service::ExpenseService;
pub use model::{
    Command, ExpenseId, GroupId, Ledger, LedgerStatement, LedgerStatementWithLine, StoredExpense,
};
pub use ports::{ExpenseStore, LedgerParser};
