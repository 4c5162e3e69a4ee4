#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod services;

pub use model::{
    Expense, MemberBalances, Money, ParticipantId, Roster, Settlement, SplitMethod, Transfer,
};
pub use services::{
    BalanceAccumulator, BalanceCalculator, SettlementCalculator, SettlementEngine, SplitContext,
    SplitInput, SplitRequest, SplitResolver, SplitValidationError, StaleReferencePolicy,
};
