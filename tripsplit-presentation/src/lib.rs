#![warn(clippy::uninlined_format_args)]

pub mod currency;
pub mod error_presenter;
pub mod settlement_presenter;
pub mod text_table;

pub use currency::CurrencyDisplay;
pub use error_presenter::{
    format_at_line, format_ledger_parse_error, format_roster_error, format_store_error,
    format_submission_error, format_validation_error,
};
pub use settlement_presenter::SettlementPresenter;
