pub mod balance_calculator;
pub mod settlement_calculator;
pub mod settlement_engine;
pub mod split_resolver;

pub use balance_calculator::{
    BalanceAccumulator, BalanceCalculator, SETTLEMENT_EPSILON, StaleReferencePolicy,
};
pub use settlement_calculator::SettlementCalculator;
pub use settlement_engine::SettlementEngine;
pub use split_resolver::{
    PERCENTAGE_TOLERANCE, SPLIT_MISMATCH_TOLERANCE, SplitContext, SplitInput, SplitRequest,
    SplitResolver, SplitValidationError, UnsupportedScale,
};
