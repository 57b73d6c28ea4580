//! Conversion between decimal amounts and the integer cents stored in the database.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::Error;

/// The number of fractional digits kept for amounts.
pub const AMOUNT_SCALE: u32 = 2;

/// Round `amount` to whole cents, with midpoints rounded away from zero.
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert `amount` to cents, rounding to two decimal places first.
///
/// # Errors
/// Returns [Error::Validation] if the amount does not fit in an `i64` number
/// of cents.
pub fn to_cents(amount: Decimal) -> Result<i64, Error> {
    round_amount(amount)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.to_i64())
        .ok_or_else(|| Error::Validation("Amount is too large.".to_owned()))
}

/// Convert `cents` back into a decimal amount with two decimal places.
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, AMOUNT_SCALE)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::{from_cents, to_cents};

    #[track_caller]
    fn decimal(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    #[test]
    fn converts_to_cents() {
        assert_eq!(to_cents(decimal("1500.00")), Ok(150_000));
        assert_eq!(to_cents(decimal("-50.25")), Ok(-5025));
    }

    #[test]
    fn rounds_midpoints_away_from_zero() {
        assert_eq!(to_cents(decimal("0.005")), Ok(1));
        assert_eq!(to_cents(decimal("-0.005")), Ok(-1));
        assert_eq!(to_cents(decimal("12.344")), Ok(1234));
    }

    #[test]
    fn converts_from_cents() {
        assert_eq!(from_cents(-3550), decimal("-35.50"));
        assert_eq!(from_cents(-3550).to_string(), "-35.50");
    }

    #[test]
    fn rejects_amounts_that_overflow() {
        assert!(to_cents(Decimal::MAX).is_err());
    }
}
