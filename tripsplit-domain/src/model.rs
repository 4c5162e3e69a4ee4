use crate::services::SETTLEMENT_EPSILON;
use arcstr::ArcStr;
use indexmap::{IndexMap, IndexSet};
use rust_decimal::Decimal;
use std::{
    collections::BTreeMap,
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
};

/// A named party in a shared-expense group.
///
/// Identifiers are compared by their exact text; `"Mei"` and `"mei"` are two
/// different participants.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticipantId(ArcStr);

impl ParticipantId {
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        Self(ArcStr::from(value))
    }
}

impl AsRef<str> for ParticipantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn zero() -> Self {
        Self::ZERO
    }

    /// Builds `num × 10^-scale`, e.g. `Money::new(1250, 2)` is 12.50.
    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub const fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn signum(self) -> i64 {
        if self.is_positive() {
            1
        } else if self.is_negative() {
            -1
        } else {
            0
        }
    }

    /// `None` when the sum does not fit in a `Decimal`.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// True when `|self| <= tolerance`.
    pub fn is_within(self, tolerance: Money) -> bool {
        self.abs() <= tolerance
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Ordered set of participants currently in a group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roster {
    members: IndexSet<ParticipantId>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a participant; returns `false` if they were already present.
    pub fn add(&mut self, participant: ParticipantId) -> bool {
        self.members.insert(participant)
    }

    /// Removes a participant, keeping the order of the others.
    pub fn remove(&mut self, participant: &ParticipantId) -> bool {
        self.members.shift_remove(participant)
    }

    pub fn contains(&self, participant: &ParticipantId) -> bool {
        self.members.contains(participant)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParticipantId> + '_ {
        self.members.iter()
    }
}

impl FromIterator<ParticipantId> for Roster {
    fn from_iter<T: IntoIterator<Item = ParticipantId>>(iter: T) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a str> for Roster {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        iter.into_iter().map(ParticipantId::from).collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SplitMethod {
    Equal,
    Manual,
    Percentage,
}

impl fmt::Display for SplitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SplitMethod::Equal => "EQUAL",
            SplitMethod::Manual => "MANUAL",
            SplitMethod::Percentage => "PERCENTAGE",
        };
        f.write_str(label)
    }
}

/// A single paid bill. [`crate::services::SplitResolver`] builds these with
/// shares that sum exactly to `amount`.
#[derive(Clone, Debug, PartialEq)]
pub struct Expense {
    title: Option<String>,
    amount: Money,
    payer: ParticipantId,
    split_method: SplitMethod,
    shares: IndexMap<ParticipantId, Money>,
}

impl Expense {
    pub(crate) fn new(
        title: Option<String>,
        amount: Money,
        payer: ParticipantId,
        split_method: SplitMethod,
        shares: IndexMap<ParticipantId, Money>,
    ) -> Self {
        Self {
            title,
            amount,
            payer,
            split_method,
            shares,
        }
    }

    /// Rebuilds an expense from previously stored parts without re-validating
    /// them. Balance computation trusts stored shares.
    pub fn from_stored_parts(
        title: Option<String>,
        amount: Money,
        payer: ParticipantId,
        split_method: SplitMethod,
        shares: IndexMap<ParticipantId, Money>,
    ) -> Self {
        Self::new(title, amount, payer, split_method, shares)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn payer(&self) -> &ParticipantId {
        &self.payer
    }

    pub fn split_method(&self) -> SplitMethod {
        self.split_method
    }

    pub fn participants(&self) -> impl Iterator<Item = &ParticipantId> + '_ {
        self.shares.keys()
    }

    pub fn shares(&self) -> &IndexMap<ParticipantId, Money> {
        &self.shares
    }

    pub fn share_of(&self, participant: &ParticipantId) -> Option<Money> {
        self.shares.get(participant).copied()
    }

    /// Whether `participant` paid for or shares in this expense.
    pub fn involves(&self, participant: &ParticipantId) -> bool {
        &self.payer == participant || self.shares.contains_key(participant)
    }
}

/// Balance table keyed by participant. A `BTreeMap` keeps iteration order
/// stable, which the transfer tie-break relies on.
pub type MemberBalances = BTreeMap<ParticipantId, Money>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub balances: MemberBalances,
    pub transfers: Vec<Transfer>,
}

impl Settlement {
    /// No transfer is due and every balance is within the settlement tolerance.
    pub fn is_settled(&self) -> bool {
        let epsilon = Money::from_decimal(SETTLEMENT_EPSILON);
        self.transfers.is_empty()
            && self
                .balances
                .values()
                .all(|balance| balance.is_within(epsilon))
    }

    pub fn total_transferred(&self) -> Money {
        self.transfers.iter().map(|transfer| transfer.amount).sum()
    }
}
