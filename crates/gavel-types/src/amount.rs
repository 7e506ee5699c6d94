//! Fixed-point money.
//!
//! Budgets, prices, and bids are integer hundredths of a budget unit. Every
//! constant the engine cares about (0.20 floors, 0.50 increments, 1.5x
//! nomination premiums) lands exactly on this grid, and equality is exact,
//! which the conditional-write compare key requires.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};

/// A non-negative money amount in hundredths of a budget unit.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// From hundredths: `Amount::from_hundredths(220)` is 2.20.
    pub const fn from_hundredths(hundredths: u64) -> Self {
        Self(hundredths)
    }

    /// From whole budget units: `Amount::from_units(5)` is 5.00.
    pub const fn from_units(units: u64) -> Self {
        Self(units * 100)
    }

    pub const fn hundredths(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Subtraction clamped at zero.
    pub const fn saturating_sub(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_sub(rhs.0))
    }

    /// `None` when `rhs` exceeds `self`.
    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// Scale by a rational factor, rounding down to the grid.
    ///
    /// Used for the nomination premium band (`amount.scale(3, 2)` is 1.5x).
    pub const fn scale(self, numer: u64, denom: u64) -> Amount {
        Amount(self.0 * numer / denom)
    }

    pub fn min(self, other: Amount) -> Amount {
        Amount(self.0.min(other.0))
    }

    pub fn max(self, other: Amount) -> Amount {
        Amount(self.0.max(other.0))
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount(self.0 - rhs.0)
    }
}

impl Mul<u64> for Amount {
    type Output = Amount;

    fn mul(self, rhs: u64) -> Amount {
        Amount(self.0 * rhs)
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let units = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{units}")
        } else if frac % 10 == 0 {
            write!(f, "{units}.{}", frac / 10)
        } else {
            write!(f, "{units}.{frac:02}")
        }
    }
}
