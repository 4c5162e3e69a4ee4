use crate::model::{Expense, Money, ParticipantId, SplitMethod};
use fxhash::FxHashSet;
use indexmap::IndexMap;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use std::cmp::Reverse;
use thiserror::Error;

/// Largest accepted gap between manual shares and the bill amount.
pub const SPLIT_MISMATCH_TOLERANCE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);
/// Largest accepted gap between the percentage total and 100.
pub const PERCENTAGE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const MAX_SCALE: u32 = 18;

/// Raw bill input as entered by a user.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitRequest {
    pub title: Option<String>,
    pub amount: Money,
    pub payer: ParticipantId,
    pub participants: Vec<ParticipantId>,
    pub method: SplitInput,
}

/// Cost-sharing rule with its explicit per-participant values.
#[derive(Clone, Debug, PartialEq)]
pub enum SplitInput {
    Equal,
    /// Amount owed per participant. Participants without an entry owe nothing.
    Manual(IndexMap<ParticipantId, Money>),
    /// Percentage of the bill per participant.
    Percentage(IndexMap<ParticipantId, Decimal>),
}

impl SplitInput {
    pub fn method(&self) -> SplitMethod {
        match self {
            SplitInput::Equal => SplitMethod::Equal,
            SplitInput::Manual(_) => SplitMethod::Manual,
            SplitInput::Percentage(_) => SplitMethod::Percentage,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SplitValidationError {
    #[error("an expense needs at least one participant")]
    EmptyParticipants,
    #[error("amount must be positive (got {amount})")]
    NonPositiveAmount { amount: Money },
    #[error("participant '{participant}' is listed more than once")]
    DuplicateParticipant { participant: ParticipantId },
    #[error("amount {amount} has more than {scale} decimal places")]
    ExcessPrecision { amount: Money, scale: u32 },
    #[error("value {value} is too large to split")]
    AmountOutOfRange { value: Decimal },
    #[error("share given for '{participant}' who is not part of the expense")]
    UnknownShareParticipant { participant: ParticipantId },
    #[error("share for '{participant}' is negative ({value})")]
    NegativeShare {
        participant: ParticipantId,
        value: Decimal,
    },
    #[error("manual shares add up to {total}, expected {expected}")]
    SplitMismatch { total: Money, expected: Money },
    #[error("percentages add up to {total}, expected 100")]
    PercentageMismatch { total: Decimal },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("currency scale {scale} is not supported (max {max_supported})")]
pub struct UnsupportedScale {
    pub scale: u32,
    pub max_supported: u32,
}

/// Minor-unit precision that shares are settled in.
///
/// Shares are computed in whole minor units (cents for RM), so an expense's
/// shares always add up to its amount without float drift.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitContext {
    scale: u32,
}

impl SplitContext {
    pub fn new(scale: u32) -> Result<Self, UnsupportedScale> {
        if scale > MAX_SCALE {
            return Err(UnsupportedScale {
                scale,
                max_supported: MAX_SCALE,
            });
        }
        Ok(Self { scale })
    }

    /// Two decimal places, as used for Malaysian Ringgit.
    pub fn myr() -> Self {
        Self { scale: 2 }
    }

    pub fn scale(self) -> u32 {
        self.scale
    }

    fn factor(self) -> Decimal {
        Decimal::from(10_i64.pow(self.scale))
    }

    /// Exact conversion. Finer precision than the scale is `ExcessPrecision`;
    /// a value outside the `i64` minor-unit range is `AmountOutOfRange`.
    pub fn to_minor_units(self, amount: Money) -> Result<i64, SplitValidationError> {
        let value = amount.as_decimal();
        if value.normalize().scale() > self.scale {
            return Err(SplitValidationError::ExcessPrecision {
                amount,
                scale: self.scale,
            });
        }
        value
            .checked_mul(self.factor())
            .and_then(|units| units.to_i64())
            .ok_or(SplitValidationError::AmountOutOfRange { value })
    }

    pub fn from_minor_units(self, units: i64) -> Money {
        Money::new(units, self.scale)
    }

    fn round_to_minor_units(self, value: Decimal) -> Result<i64, SplitValidationError> {
        value
            .checked_mul(self.factor())
            .map(|units| units.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|units| units.to_i64())
            .ok_or(SplitValidationError::AmountOutOfRange { value })
    }
}

impl Default for SplitContext {
    fn default() -> Self {
        Self::myr()
    }
}

/// Turns raw bill input into a validated [`Expense`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SplitResolver {
    context: SplitContext,
}

impl SplitResolver {
    pub fn new(context: SplitContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> SplitContext {
        self.context
    }

    pub fn resolve(&self, request: SplitRequest) -> Result<Expense, SplitValidationError> {
        let SplitRequest {
            title,
            amount,
            payer,
            participants,
            method,
        } = request;

        if participants.is_empty() {
            return Err(SplitValidationError::EmptyParticipants);
        }
        if !amount.is_positive() {
            return Err(SplitValidationError::NonPositiveAmount { amount });
        }

        let mut seen: FxHashSet<&ParticipantId> = FxHashSet::default();
        for participant in &participants {
            if !seen.insert(participant) {
                return Err(SplitValidationError::DuplicateParticipant {
                    participant: participant.clone(),
                });
            }
        }

        let amount_units = self.context.to_minor_units(amount)?;

        let split_method = method.method();
        let units = match method {
            SplitInput::Equal => split_evenly(amount_units, participants.len()),
            SplitInput::Manual(entries) => {
                self.manual_units(amount, amount_units, &participants, &entries)?
            }
            SplitInput::Percentage(entries) => {
                self.percentage_units(amount, amount_units, &participants, &entries)?
            }
        };

        let shares: IndexMap<ParticipantId, Money> = participants
            .into_iter()
            .zip(units)
            .map(|(participant, share)| (participant, self.context.from_minor_units(share)))
            .collect();

        tracing::debug!(
            amount = %amount,
            payer = %payer,
            split_method = %split_method,
            participant_count = shares.len(),
            "Resolved expense split"
        );

        Ok(Expense::new(title, amount, payer, split_method, shares))
    }

    fn manual_units(
        &self,
        amount: Money,
        amount_units: i64,
        participants: &[ParticipantId],
        entries: &IndexMap<ParticipantId, Money>,
    ) -> Result<Vec<i64>, SplitValidationError> {
        check_entries(participants, entries, |value| value.as_decimal())?;

        let total = entries.values().try_fold(Money::ZERO, |total, value| {
            total
                .checked_add(*value)
                .ok_or(SplitValidationError::AmountOutOfRange {
                    value: value.as_decimal(),
                })
        })?;
        if (total - amount).abs().as_decimal() > SPLIT_MISMATCH_TOLERANCE {
            return Err(SplitValidationError::SplitMismatch {
                total,
                expected: amount,
            });
        }

        let mut units = participants
            .iter()
            .map(|participant| {
                let share = entries.get(participant).copied().unwrap_or(Money::ZERO);
                self.context.round_to_minor_units(share.as_decimal())
            })
            .collect::<Result<Vec<_>, _>>()?;
        reconcile_residual(amount_units, &mut units);
        Ok(units)
    }

    fn percentage_units(
        &self,
        amount: Money,
        amount_units: i64,
        participants: &[ParticipantId],
        entries: &IndexMap<ParticipantId, Decimal>,
    ) -> Result<Vec<i64>, SplitValidationError> {
        check_entries(participants, entries, |value| *value)?;

        let total = entries.values().try_fold(Decimal::ZERO, |total, value| {
            total
                .checked_add(*value)
                .ok_or(SplitValidationError::AmountOutOfRange { value: *value })
        })?;
        if (total - ONE_HUNDRED).abs() > PERCENTAGE_TOLERANCE {
            return Err(SplitValidationError::PercentageMismatch { total });
        }

        let mut units = participants
            .iter()
            .map(|participant| {
                let percentage = entries.get(participant).copied().unwrap_or(Decimal::ZERO);
                let share = amount
                    .as_decimal()
                    .checked_mul(percentage)
                    .ok_or(SplitValidationError::AmountOutOfRange { value: percentage })?;
                self.context.round_to_minor_units(share / ONE_HUNDRED)
            })
            .collect::<Result<Vec<_>, _>>()?;
        reconcile_residual(amount_units, &mut units);
        Ok(units)
    }
}

fn check_entries<V>(
    participants: &[ParticipantId],
    entries: &IndexMap<ParticipantId, V>,
    value_of: impl Fn(&V) -> Decimal,
) -> Result<(), SplitValidationError> {
    for (participant, value) in entries {
        if !participants.contains(participant) {
            return Err(SplitValidationError::UnknownShareParticipant {
                participant: participant.clone(),
            });
        }
        let value = value_of(value);
        if value.is_sign_negative() && !value.is_zero() {
            return Err(SplitValidationError::NegativeShare {
                participant: participant.clone(),
                value,
            });
        }
    }
    Ok(())
}

/// Even split in minor units; the first `total % count` participants carry
/// one extra unit.
fn split_evenly(total: i64, count: usize) -> Vec<i64> {
    let Ok(divisor) = i64::try_from(count) else {
        return Vec::new();
    };
    if divisor == 0 {
        return Vec::new();
    }

    let base = total / divisor;
    let remainder = (total % divisor).unsigned_abs();
    let step = total.signum();

    (0..count)
        .map(|idx| {
            if (idx as u64) < remainder {
                base + step
            } else {
                base
            }
        })
        .collect()
}

/// Spreads `target − Σ units` one unit at a time across the shares, largest
/// first, so the result sums exactly to `target`. Shares never go below zero
/// and zero shares only receive units when every share is zero.
fn reconcile_residual(target: i64, units: &mut [i64]) {
    let mut residual = i128::from(target) - units.iter().copied().map(i128::from).sum::<i128>();
    if residual == 0 {
        return;
    }

    let mut order: Vec<usize> = (0..units.len())
        .filter(|&idx| units.get(idx).is_some_and(|share| *share > 0))
        .collect();
    if order.is_empty() {
        order = (0..units.len()).collect();
    }
    order.sort_by_key(|&idx| Reverse(units.get(idx).copied().unwrap_or(0)));

    let step: i64 = if residual > 0 { 1 } else { -1 };
    while residual != 0 {
        let mut progressed = false;
        for &idx in &order {
            if residual == 0 {
                break;
            }
            let Some(share) = units.get_mut(idx) else {
                continue;
            };
            if step < 0 && *share == 0 {
                continue;
            }
            *share += step;
            residual -= i128::from(step);
            progressed = true;
        }
        if !progressed {
            break;
        }
    }

    debug_assert_eq!(residual, 0, "residual could not be absorbed by shares");
}
