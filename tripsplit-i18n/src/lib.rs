#[cfg(all(feature = "ms", feature = "en"))]
compile_error!("Cannot enable both 'ms' and 'en' features at the same time");

use std::fmt::Display;

#[cfg(feature = "ms")]
pub mod strings {
    pub const PARTICIPANT: &str = "Peserta";
    pub const BALANCE: &str = "Baki";
    pub const FROM: &str = "Daripada";
    pub const TO: &str = "Kepada";
    pub const AMOUNT: &str = "Jumlah";
    pub const BALANCES: &str = "Baki";
    pub const TRANSFERS: &str = "Pindahan";
    pub const ALL_SETTLED: &str = "Semua sudah selesai.";
    pub const EMPTY_PARTICIPANTS: &str = "Perbelanjaan memerlukan sekurang-kurangnya seorang peserta.";
}

#[cfg(not(feature = "ms"))]
pub mod strings {
    pub const PARTICIPANT: &str = "Participant";
    pub const BALANCE: &str = "Balance";
    pub const FROM: &str = "From";
    pub const TO: &str = "To";
    pub const AMOUNT: &str = "Amount";
    pub const BALANCES: &str = "Balances";
    pub const TRANSFERS: &str = "Transfers";
    pub const ALL_SETTLED: &str = "Everyone is settled up.";
    pub const EMPTY_PARTICIPANTS: &str = "An expense needs at least one participant.";
}

pub use strings::*;

#[cfg(feature = "ms")]
mod messages {
    use super::Display;

    pub fn non_positive_amount(amount: impl Display) -> String {
        format!("Jumlah mesti lebih daripada sifar (diberi {amount}).")
    }

    pub fn duplicate_participant(name: impl Display) -> String {
        format!("Peserta '{name}' disenaraikan lebih daripada sekali.")
    }

    pub fn excess_precision(amount: impl Display, scale: u32) -> String {
        format!("Jumlah {amount} mempunyai lebih daripada {scale} tempat perpuluhan.")
    }

    pub fn amount_out_of_range(value: impl Display) -> String {
        format!("Nilai {value} terlalu besar untuk dibahagikan.")
    }

    pub fn unknown_share_participant(name: impl Display) -> String {
        format!("Bahagian diberi untuk '{name}' yang bukan peserta perbelanjaan ini.")
    }

    pub fn negative_share(name: impl Display, value: impl Display) -> String {
        format!("Bahagian untuk '{name}' adalah negatif ({value}).")
    }

    pub fn split_mismatch(total: impl Display, expected: impl Display) -> String {
        format!("Jumlah bahagian {total} tidak sama dengan jumlah bil {expected}.")
    }

    pub fn percentage_mismatch(total: impl Display) -> String {
        format!("Peratusan berjumlah {total}%, sepatutnya 100%.")
    }

    pub fn expense_not_found(id: impl Display, group: impl Display) -> String {
        format!("Perbelanjaan {id} tidak dijumpai dalam kumpulan '{group}'.")
    }

    pub fn store_unavailable(reason: impl Display) -> String {
        format!("Storan perbelanjaan tidak tersedia: {reason}")
    }

    pub fn unknown_participant(name: impl Display) -> String {
        format!("'{name}' bukan ahli kumpulan ini.")
    }

    pub fn outstanding_balance(name: impl Display, balance: impl Display) -> String {
        format!("'{name}' masih mempunyai baki tertunggak {balance}. Selesaikan dahulu sebelum membuang.")
    }
}

#[cfg(not(feature = "ms"))]
mod messages {
    use super::Display;

    pub fn non_positive_amount(amount: impl Display) -> String {
        format!("Amount must be greater than zero (got {amount}).")
    }

    pub fn duplicate_participant(name: impl Display) -> String {
        format!("Participant '{name}' is listed more than once.")
    }

    pub fn excess_precision(amount: impl Display, scale: u32) -> String {
        format!("Amount {amount} has more than {scale} decimal places.")
    }

    pub fn amount_out_of_range(value: impl Display) -> String {
        format!("Value {value} is too large to split.")
    }

    pub fn unknown_share_participant(name: impl Display) -> String {
        format!("A share was given for '{name}', who is not part of this expense.")
    }

    pub fn negative_share(name: impl Display, value: impl Display) -> String {
        format!("The share for '{name}' is negative ({value}).")
    }

    pub fn split_mismatch(total: impl Display, expected: impl Display) -> String {
        format!("Shares add up to {total} but the bill is {expected}.")
    }

    pub fn percentage_mismatch(total: impl Display) -> String {
        format!("Percentages add up to {total}%, expected 100%.")
    }

    pub fn expense_not_found(id: impl Display, group: impl Display) -> String {
        format!("Expense {id} was not found in group '{group}'.")
    }

    pub fn store_unavailable(reason: impl Display) -> String {
        format!("Expense store unavailable: {reason}")
    }

    pub fn unknown_participant(name: impl Display) -> String {
        format!("'{name}' is not a member of this group.")
    }

    pub fn outstanding_balance(name: impl Display, balance: impl Display) -> String {
        format!("'{name}' still has an outstanding balance of {balance}. Settle up before removing them.")
    }
}

pub use messages::*;

pub struct LineErrorMessage<M> {
    line: usize,
    message: M,
}

pub struct MissingMembersMessage {
    line: usize,
}

/// Wraps any message with the ledger line it refers to.
pub fn at_line<M: Display>(line: usize, message: M) -> LineErrorMessage<M> {
    LineErrorMessage { line, message }
}

pub fn missing_members(line: usize) -> MissingMembersMessage {
    MissingMembersMessage { line }
}

#[cfg(feature = "ms")]
impl<M: Display> Display for LineErrorMessage<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Baris {}: {}", self.line, self.message)
    }
}

#[cfg(feature = "ms")]
impl Display for MissingMembersMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Baris {}: tiada pengisytiharan `MEMBERS := ...` sebelum pernyataan ini.",
            self.line
        )
    }
}

#[cfg(not(feature = "ms"))]
impl<M: Display> Display for LineErrorMessage<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Line {}: {}", self.line, self.message)
    }
}

#[cfg(not(feature = "ms"))]
impl Display for MissingMembersMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Line {}: no `MEMBERS := ...` declaration before this statement.",
            self.line
        )
    }
}
