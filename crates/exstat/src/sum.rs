//! High-precision summation.
//!
//! Each representation is summed with the strongest guarantee it allows:
//!
//! - Integers and rationals are summed exactly. Numerators are accumulated per
//!   distinct denominator and the partial sums are combined at the end, which
//!   keeps intermediate denominators small.
//! - Decimals use checked fixed-point addition and fail with
//!   [`StatisticsError::DecimalOverflow`] once the 28-digit precision is
//!   exhausted.
//! - Floats use Shewchuk's exact-partials algorithm: the returned value is the
//!   exact sum of the inputs rounded once to the nearest `f64`.
//!
//! # Examples
//!
//! ```
//! use exstat::{Number, sum};
//!
//! let data = [1e50, 1.0, -1e50].repeat(1000);
//! assert_eq!(sum(data, 0).unwrap(), Number::from(1000.0));
//! ```

use std::{collections::BTreeMap, iter};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero as _;
use rust_decimal::Decimal;

use crate::{
    StatisticsError,
    lattice::{self, Representation as _, with_representation},
    number::{Number, NumericKind},
};

/// Returns `start` plus the high-precision sum of `data`.
///
/// The result has the common kind of `start` and every element of `data`.
/// Empty `data` returns `start`.
///
/// # Examples
///
/// ```
/// use exstat::{Number, sum};
///
/// assert_eq!(sum([3.0, 2.25, 4.5, -0.5, 1.0], 0.75).unwrap(), Number::from(11.0));
///
/// let fractions = ["2/3", "7/5", "1/4", "5/6"].map(|s| s.parse::<Number>().unwrap());
/// assert_eq!(sum(fractions, 0).unwrap(), "63/20".parse::<Number>().unwrap());
/// ```
pub fn sum<I, S>(data: I, start: S) -> Result<Number, StatisticsError>
where
    I: IntoIterator,
    I::Item: Into<Number>,
    S: Into<Number>,
{
    let start = start.into();
    let data = lattice::materialize(data);
    let values = || iter::once(&start).chain(&data);
    let kind = NumericKind::resolve(values())?.unwrap_or(start.kind());
    with_representation!(kind, R => {
        let converted = values().map(R::convert).collect::<Result<Vec<_>, _>>()?;
        Ok(R::total(converted)?.into_number(kind))
    })
}

/// Exact sum of rationals.
pub(crate) fn exact_sum<I>(values: I) -> BigRational
where
    I: IntoIterator<Item = BigRational>,
{
    let mut partials = BTreeMap::<BigInt, BigInt>::new();
    for value in values {
        let (numer, denom) = value.into_raw();
        *partials.entry(denom).or_insert_with(BigInt::zero) += numer;
    }
    partials
        .into_iter()
        .fold(BigRational::zero(), |total, (denom, numer)| {
            total + BigRational::new(numer, denom)
        })
}

/// Fixed-point sum of decimals.
pub(crate) fn decimal_sum<I>(values: I) -> Result<Decimal, StatisticsError>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| total.checked_add(value))
        .ok_or(StatisticsError::DecimalOverflow { operation: "sum" })
}

/// Correctly rounded sum of floats.
///
/// Infinities and NaN propagate with the IEEE semantics of a naive sum. If
/// the partials overflow although every input is finite, the values are summed
/// as exact rationals and rounded once instead.
pub(crate) fn float_sum<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let values = values.into_iter().collect::<Vec<_>>();
    if values.iter().any(|v| !v.is_finite()) {
        return values.iter().sum();
    }
    match exact_partials(&values) {
        Some(partials) => round_partials(&partials),
        None => {
            let exact = exact_sum(values.iter().filter_map(|v| BigRational::from_float(*v)));
            Number::Rational(exact).to_f64()
        }
    }
}

/// Splits the running sum into non-overlapping partials, smallest first.
///
/// Returns `None` on intermediate overflow.
fn exact_partials(values: &[f64]) -> Option<Vec<f64>> {
    let mut partials = Vec::<f64>::new();
    for &value in values {
        let mut x = value;
        let mut kept = 0;
        for idx in 0..partials.len() {
            let mut y = partials[idx];
            if x.abs() < y.abs() {
                (x, y) = (y, x);
            }
            let hi = x + y;
            let lo = y - (hi - x);
            if lo != 0.0 {
                partials[kept] = lo;
                kept += 1;
            }
            x = hi;
        }
        if !x.is_finite() {
            return None;
        }
        partials.truncate(kept);
        partials.push(x);
    }
    Some(partials)
}

/// Rounds the exact value represented by `partials` to the nearest float,
/// ties to even.
#[expect(clippy::float_cmp)]
fn round_partials(partials: &[f64]) -> f64 {
    let Some((&last, rest)) = partials.split_last() else {
        return 0.0;
    };
    let mut hi = last;
    let mut lo = 0.0;
    let mut remaining = rest.len();
    while remaining > 0 {
        remaining -= 1;
        let x = hi;
        let y = rest[remaining];
        hi = x + y;
        let y_rounded = hi - x;
        lo = y - y_rounded;
        if lo != 0.0 {
            break;
        }
    }
    // `lo` sits exactly halfway between two floats; look at the next partial
    // to decide which way the exact value falls.
    if remaining > 0 {
        let next = rest[remaining - 1];
        if (lo < 0.0 && next < 0.0) || (lo > 0.0 && next > 0.0) {
            let y = lo * 2.0;
            let x = hi + y;
            if y == x - hi {
                hi = x;
            }
        }
    }
    hi
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg64;

    use super::*;

    fn frac(numer: i64, denom: i64) -> Number {
        Number::Rational(BigRational::new(numer.into(), denom.into()))
    }

    fn reference_sum(values: &[f64]) -> f64 {
        let exact = values
            .iter()
            .map(|v| BigRational::from_float(*v).unwrap())
            .fold(BigRational::zero(), |acc, v| acc + v);
        Number::Rational(exact).to_f64()
    }

    #[test]
    fn test_cancellation_is_not_lost() {
        let data = [1e50, 1.0, -1e50].repeat(1000);
        assert_eq!(float_sum(data.iter().copied()), 1000.0);
        // A naive left fold loses every small term.
        assert_eq!(data.iter().sum::<f64>(), 0.0);
    }

    #[test]
    fn test_many_small_values_after_huge_value() {
        let mut data = vec![1e16];
        data.extend(iter::repeat_n(1.0, 10_000));
        assert_eq!(float_sum(data.iter().copied()), 1e16 + 10_000.0);
    }

    #[test]
    fn test_half_way_rounding_uses_lower_partials() {
        // 1 + 2^-53 is a tie between 1.0 and the next float; the extra 2^-100
        // pushes the exact value above it.
        let data = [1.0, 2f64.powi(-53), 2f64.powi(-100)];
        assert_eq!(float_sum(data), 1.0 + f64::EPSILON);
        let data = [1.0, 2f64.powi(-53), -2f64.powi(-100)];
        assert_eq!(float_sum(data), 1.0);
    }

    #[test]
    fn test_matches_reference_on_random_data() {
        let mut rng = Pcg64::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let len = rng.random_range(1..50);
            let values = (0..len)
                .map(|_| {
                    let mantissa = rng.random_range(-1.0..1.0);
                    let exponent = rng.random_range(-60..60);
                    mantissa * 2f64.powi(exponent)
                })
                .collect::<Vec<f64>>();
            assert_eq!(
                float_sum(values.iter().copied()),
                reference_sum(&values),
                "values: {values:?}"
            );
        }
    }

    #[test]
    fn test_intermediate_overflow_falls_back_to_exact() {
        let data = [f64::MAX, f64::MAX, -f64::MAX];
        assert_eq!(float_sum(data), f64::MAX);
    }

    #[test]
    fn test_non_finite_values_propagate() {
        assert!(float_sum([1.0, f64::INFINITY]).is_infinite());
        assert!(float_sum([f64::INFINITY, f64::NEG_INFINITY]).is_nan());
        assert!(float_sum([1.0, f64::NAN]).is_nan());
    }

    #[test]
    fn test_empty_float_sum_is_zero() {
        assert_eq!(float_sum([]), 0.0);
    }

    #[test]
    fn test_exact_sum_groups_denominators() {
        let values = [frac(2, 3), frac(7, 5), frac(1, 4), frac(5, 6)]
            .iter()
            .map(|v| v.to_rational().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(Number::Rational(exact_sum(values)), frac(63, 20));
    }

    #[test]
    fn test_decimal_sum() {
        let data = ["0.1375", "0.2108", "0.3061", "0.0419"]
            .map(|s| Number::parse_decimal(s).unwrap());
        let total = sum(data, 0).unwrap();
        assert_eq!(total.kind(), NumericKind::Decimal);
        assert_eq!(total.to_string(), "0.6963");
    }

    #[test]
    fn test_decimal_overflow_is_reported() {
        let data = [Decimal::MAX, Decimal::ONE];
        assert_eq!(
            decimal_sum(data),
            Err(StatisticsError::DecimalOverflow { operation: "sum" })
        );
    }

    #[test]
    fn test_sum_with_start() {
        assert_eq!(
            sum([3.0, 2.25, 4.5, -0.5, 1.0], 0.75).unwrap(),
            Number::from(11.0)
        );
        let total = sum([1, 2, 3], 4).unwrap();
        assert_eq!(total.kind(), NumericKind::Integer);
        assert_eq!(total, Number::from(10));
    }

    #[test]
    fn test_sum_of_empty_returns_start() {
        let total = sum(Vec::<Number>::new(), frac(1, 3)).unwrap();
        assert_eq!(total.kind(), NumericKind::Rational);
        assert_eq!(total, frac(1, 3));
    }

    #[test]
    fn test_sum_mixed_integer_and_rational() {
        let total = sum([Number::from(1), frac(1, 2), frac(1, 2)], 0).unwrap();
        assert_eq!(total.kind(), NumericKind::Rational);
        assert_eq!(total, Number::from(2));
    }

    #[test]
    fn test_sum_rejects_decimal_with_rational() {
        let data = [Number::parse_decimal("0.5").unwrap(), frac(1, 2)];
        assert!(matches!(sum(data, 0), Err(StatisticsError::MixedTypes(_))));
    }
}
