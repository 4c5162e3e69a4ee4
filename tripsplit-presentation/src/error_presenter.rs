use crate::currency::CurrencyDisplay;
use tripsplit_application::{LedgerParseError, RosterError, StoreError, SubmissionError};
use tripsplit_domain::SplitValidationError;
use tripsplit_i18n as i18n;

pub fn format_validation_error(error: &SplitValidationError, display: &CurrencyDisplay) -> String {
    match error {
        SplitValidationError::EmptyParticipants => i18n::EMPTY_PARTICIPANTS.to_string(),
        SplitValidationError::NonPositiveAmount { amount } => {
            i18n::non_positive_amount(display.format(*amount))
        }
        SplitValidationError::DuplicateParticipant { participant } => {
            i18n::duplicate_participant(participant)
        }
        SplitValidationError::ExcessPrecision { amount, scale } => {
            i18n::excess_precision(amount, *scale)
        }
        SplitValidationError::AmountOutOfRange { value } => i18n::amount_out_of_range(value),
        SplitValidationError::UnknownShareParticipant { participant } => {
            i18n::unknown_share_participant(participant)
        }
        SplitValidationError::NegativeShare { participant, value } => {
            i18n::negative_share(participant, value)
        }
        SplitValidationError::SplitMismatch { total, expected } => {
            i18n::split_mismatch(display.format(*total), display.format(*expected))
        }
        SplitValidationError::PercentageMismatch { total } => {
            i18n::percentage_mismatch(total.normalize())
        }
    }
}

pub fn format_store_error(error: &StoreError) -> String {
    match error {
        StoreError::NotFound { group, id } => i18n::expense_not_found(id, group),
        StoreError::Unavailable(reason) => i18n::store_unavailable(reason),
    }
}

pub fn format_submission_error(error: &SubmissionError, display: &CurrencyDisplay) -> String {
    match error {
        SubmissionError::Invalid(err) => format_validation_error(err, display),
        SubmissionError::Store(err) => format_store_error(err),
    }
}

pub fn format_roster_error(error: &RosterError, display: &CurrencyDisplay) -> String {
    match error {
        RosterError::UnknownParticipant { participant } => i18n::unknown_participant(participant),
        RosterError::OutstandingBalance {
            participant,
            balance,
        } => i18n::outstanding_balance(participant, display.format_signed(*balance)),
        RosterError::Store(err) => format_store_error(err),
    }
}

pub fn format_ledger_parse_error(error: &LedgerParseError) -> String {
    match error {
        LedgerParseError::MissingMembers { line } => i18n::missing_members(*line).to_string(),
        LedgerParseError::SyntaxError { line, detail } => i18n::at_line(*line, detail).to_string(),
    }
}

/// Prefixes a message with the ledger line it came from.
pub fn format_at_line(line: usize, message: impl std::fmt::Display) -> String {
    i18n::at_line(line, message).to_string()
}
