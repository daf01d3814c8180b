//! Money as integer cents with 2-decimal wire semantics.
//!
//! All amounts in the console (sale totals, commissions, transaction amounts,
//! commission rates on products) are currency values with two decimal places.
//! Internally they are stored as `i64` cents; on the wire they appear as plain
//! decimal numbers (`12.5` means 12 units and 50 cents), matching the records
//! the persistence collaborator hands us.

use core::iter::Sum;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A currency amount in cents. May be negative (bonus debits).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Sum an iterator of amounts through a widened accumulator.
    ///
    /// Folds over whole snapshots go through i128 so a pathological input
    /// cannot wrap; the result saturates at the i64 range.
    pub fn total<I>(amounts: I) -> Money
    where
        I: IntoIterator<Item = Money>,
    {
        let wide: i128 = amounts.into_iter().map(|m| m.0 as i128).sum();
        Money(wide.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Multiply by a record count (e.g. per-unit cost x quantity).
    pub fn times(self, count: u32) -> Money {
        Money(self.0.saturating_mul(count as i64))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        Money::total(iter)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0 as f64 / 100.0)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let units = f64::deserialize(deserializer)?;
        if !units.is_finite() {
            return Err(serde::de::Error::custom("money amount must be finite"));
        }
        Ok(Money((units * 100.0).round() as i64))
    }
}
