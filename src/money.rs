use std::fmt;

use serde::{Deserialize, Serialize};

/// An amount of money in whole cents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Nothing owed
    pub const ZERO: Self = Self(0);

    /// Build an amount from a number of cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// The amount in cents
    #[must_use]
    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Whether this amount is zero
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Multiply by a whole number of units, saturating on overflow
    #[must_use]
    pub const fn times(self, units: u64) -> Self {
        Self(self.0.saturating_mul(units))
    }

    /// Convert a dollar amount such as `15.5`, rounding to the nearest cent.
    ///
    /// Returns `None` for negative, non-finite or implausibly large amounts.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_dollars(dollars: f64) -> Option<Self> {
        /// Largest accepted amount, in cents
        const LIMIT: f64 = 1e15;
        let cents = (dollars * 100.0).round();
        if (0.0..=LIMIT).contains(&cents) {
            Some(Self(cents as u64))
        } else {
            None
        }
    }

    /// Add two amounts, saturating on overflow
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}
