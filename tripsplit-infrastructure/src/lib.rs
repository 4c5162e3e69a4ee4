#![warn(clippy::uninlined_format_args)]

pub mod ledger_parser;
pub mod memory_store;

pub use ledger_parser::TripsplitLedgerParser;
pub use memory_store::InMemoryExpenseStore;
