//! Common-kind resolution for mixed datasets.
//!
//! Every aggregation resolves the kinds of its inputs to one common
//! [`NumericKind`] before doing any arithmetic, then converts each value once
//! into the matching [`Representation`]:
//!
//! | kinds                 | common kind | representation |
//! |-----------------------|-------------|----------------|
//! | integer only          | integer     | `BigRational`  |
//! | integer + rational    | rational    | `BigRational`  |
//! | integer + decimal     | decimal     | `Decimal`      |
//! | integer/rational + float | float    | `f64`          |
//! | decimal + rational    | error       |                |
//! | decimal + float       | error       |                |

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{FromPrimitive as _, Signed as _, ToPrimitive as _, Zero as _};
use rust_decimal::{Decimal, MathematicalOps};

use crate::{
    MixedTypeError, StatisticsError,
    number::{Number, NumericKind, decimal_to_rational, rational_to_f64},
    sum,
};

impl NumericKind {
    /// Returns the kind that can represent values of both `self` and `other`
    /// without avoidable precision loss.
    ///
    /// # Examples
    ///
    /// ```
    /// use exstat::NumericKind;
    ///
    /// assert_eq!(NumericKind::Integer.coerce(NumericKind::Rational), Ok(NumericKind::Rational));
    /// assert_eq!(NumericKind::Rational.coerce(NumericKind::Float), Ok(NumericKind::Float));
    /// assert!(NumericKind::Decimal.coerce(NumericKind::Rational).is_err());
    /// ```
    pub fn coerce(self, other: Self) -> Result<Self, MixedTypeError> {
        match (self, other) {
            (a, b) if a == b => Ok(a),
            (Self::Integer, kind) | (kind, Self::Integer) => Ok(kind),
            (Self::Rational, Self::Float) | (Self::Float, Self::Rational) => Ok(Self::Float),
            (left, right) => Err(MixedTypeError { left, right }),
        }
    }

    /// Resolves the common kind of a dataset in one pass.
    ///
    /// Returns `Ok(None)` for an empty dataset.
    pub fn resolve<'a, I>(values: I) -> Result<Option<Self>, MixedTypeError>
    where
        I: IntoIterator<Item = &'a Number>,
    {
        values.into_iter().try_fold(None::<Self>, |common, value| {
            let kind = value.kind();
            match common {
                None => Ok(Some(kind)),
                Some(common) => common.coerce(kind).map(Some),
            }
        })
    }
}

/// Resolves the common kind, failing on empty input.
pub(crate) fn require_kind<'a, I>(
    values: I,
    operation: &'static str,
) -> Result<NumericKind, StatisticsError>
where
    I: IntoIterator<Item = &'a Number>,
{
    NumericKind::resolve(values)?.ok_or(StatisticsError::NotEnoughData {
        operation,
        required: 1,
    })
}

/// Materializes caller data once, consuming one-shot iterators exactly once.
pub(crate) fn materialize<I>(data: I) -> Vec<Number>
where
    I: IntoIterator,
    I::Item: Into<Number>,
{
    data.into_iter().map(Into::into).collect()
}

/// Materializes caller data as a separate ascending view.
pub(crate) fn materialize_sorted<I>(data: I) -> Vec<Number>
where
    I: IntoIterator,
    I::Item: Into<Number>,
{
    let mut values = materialize(data);
    values.sort_by(Number::total_cmp);
    values
}

/// Arithmetic capabilities of a common representation.
///
/// Aggregations are written once against this trait and instantiated for
/// each representation through [`with_representation!`].
pub(crate) trait Representation: Clone + Sized {
    /// Converts a value whose kind has already been resolved against this
    /// representation.
    fn convert(value: &Number) -> Result<Self, StatisticsError>;

    fn from_count(count: usize) -> Result<Self, StatisticsError>;

    /// Sums values without accumulating rounding error beyond what the
    /// representation itself imposes.
    fn total<I>(values: I) -> Result<Self, StatisticsError>
    where
        I: IntoIterator<Item = Self>;

    fn add(&self, rhs: &Self) -> Result<Self, StatisticsError>;
    fn sub(&self, rhs: &Self) -> Result<Self, StatisticsError>;
    fn mul(&self, rhs: &Self) -> Result<Self, StatisticsError>;

    /// Divides by a non-zero value.
    fn div(&self, rhs: &Self) -> Result<Self, StatisticsError>;

    fn abs(&self) -> Self;

    /// Square root of a non-negative value.
    ///
    /// Stays exact when the root is representable, otherwise falls back to
    /// a float.
    fn square_root(&self, kind: NumericKind) -> Number;

    fn into_number(self, kind: NumericKind) -> Number;

    fn convert_all(values: &[Number]) -> Result<Vec<Self>, StatisticsError> {
        values.iter().map(Self::convert).collect()
    }
}

/// Runs `$body` with `$repr` aliased to the representation of `$kind`.
macro_rules! with_representation {
    ($kind:expr, $repr:ident => $body:expr) => {
        match $kind {
            $crate::NumericKind::Integer | $crate::NumericKind::Rational => {
                type $repr = ::num_rational::BigRational;
                $body
            }
            $crate::NumericKind::Decimal => {
                type $repr = ::rust_decimal::Decimal;
                $body
            }
            $crate::NumericKind::Float => {
                type $repr = f64;
                $body
            }
        }
    };
}

pub(crate) use with_representation;

impl Representation for BigRational {
    fn convert(value: &Number) -> Result<Self, StatisticsError> {
        match value {
            Number::Integer(v) => Ok(Self::from_integer(v.clone())),
            Number::Rational(v) => Ok(v.clone()),
            other => Err(MixedTypeError {
                left: NumericKind::Rational,
                right: other.kind(),
            }
            .into()),
        }
    }

    fn from_count(count: usize) -> Result<Self, StatisticsError> {
        Ok(Self::from_integer(BigInt::from(count)))
    }

    fn total<I>(values: I) -> Result<Self, StatisticsError>
    where
        I: IntoIterator<Item = Self>,
    {
        Ok(sum::exact_sum(values))
    }

    fn add(&self, rhs: &Self) -> Result<Self, StatisticsError> {
        Ok(self + rhs)
    }

    fn sub(&self, rhs: &Self) -> Result<Self, StatisticsError> {
        Ok(self - rhs)
    }

    fn mul(&self, rhs: &Self) -> Result<Self, StatisticsError> {
        Ok(self * rhs)
    }

    fn div(&self, rhs: &Self) -> Result<Self, StatisticsError> {
        debug_assert!(!rhs.is_zero(), "division by zero");
        Ok(self / rhs)
    }

    fn abs(&self) -> Self {
        num_traits::Signed::abs(self)
    }

    fn square_root(&self, kind: NumericKind) -> Number {
        if self.is_negative() {
            return Number::Float(f64::NAN);
        }
        let numer_root = self.numer().sqrt();
        let denom_root = self.denom().sqrt();
        if &(&numer_root * &numer_root) == self.numer() && &(&denom_root * &denom_root) == self.denom()
        {
            Number::from_exact(Self::new(numer_root, denom_root), kind)
        } else {
            Number::Float(rational_to_f64(self).sqrt())
        }
    }

    fn into_number(self, kind: NumericKind) -> Number {
        Number::from_exact(self, kind)
    }
}

impl Representation for Decimal {
    fn convert(value: &Number) -> Result<Self, StatisticsError> {
        match value {
            Number::Integer(v) => v
                .to_i128()
                .and_then(Decimal::from_i128)
                .ok_or(StatisticsError::DecimalOverflow {
                    operation: "conversion",
                }),
            Number::Decimal(v) => Ok(*v),
            other => Err(MixedTypeError {
                left: NumericKind::Decimal,
                right: other.kind(),
            }
            .into()),
        }
    }

    fn from_count(count: usize) -> Result<Self, StatisticsError> {
        Decimal::from_usize(count).ok_or(StatisticsError::DecimalOverflow {
            operation: "conversion",
        })
    }

    fn total<I>(values: I) -> Result<Self, StatisticsError>
    where
        I: IntoIterator<Item = Self>,
    {
        sum::decimal_sum(values)
    }

    fn add(&self, rhs: &Self) -> Result<Self, StatisticsError> {
        self.checked_add(*rhs)
            .ok_or(StatisticsError::DecimalOverflow {
                operation: "addition",
            })
    }

    fn sub(&self, rhs: &Self) -> Result<Self, StatisticsError> {
        self.checked_sub(*rhs)
            .ok_or(StatisticsError::DecimalOverflow {
                operation: "subtraction",
            })
    }

    fn mul(&self, rhs: &Self) -> Result<Self, StatisticsError> {
        self.checked_mul(*rhs)
            .ok_or(StatisticsError::DecimalOverflow {
                operation: "multiplication",
            })
    }

    /// Quotients carry the canonical scale, so `3.00 / 2` is `1.5`.
    fn div(&self, rhs: &Self) -> Result<Self, StatisticsError> {
        self.checked_div(*rhs)
            .map(|quotient| quotient.normalize())
            .ok_or(StatisticsError::DecimalOverflow {
                operation: "division",
            })
    }

    fn abs(&self) -> Self {
        Decimal::abs(self)
    }

    fn square_root(&self, _kind: NumericKind) -> Number {
        let value = decimal_to_rational(*self);
        match MathematicalOps::sqrt(self) {
            Some(root) if is_exact_root(&decimal_to_rational(root), &value) => {
                Number::Decimal(root.normalize())
            }
            _ => Number::Float(rational_to_f64(&value).sqrt()),
        }
    }

    fn into_number(self, _kind: NumericKind) -> Number {
        Number::Decimal(self)
    }
}

/// Decimal products round to 28 digits, so the square is checked exactly.
fn is_exact_root(root: &BigRational, value: &BigRational) -> bool {
    &(root * root) == value
}

impl Representation for f64 {
    /// Every kind converts, decimals included, so callers that give up on a
    /// common exact kind can still interpolate in floats.
    fn convert(value: &Number) -> Result<Self, StatisticsError> {
        Ok(value.to_f64())
    }

    #[expect(clippy::cast_precision_loss)]
    fn from_count(count: usize) -> Result<Self, StatisticsError> {
        Ok(count as f64)
    }

    fn total<I>(values: I) -> Result<Self, StatisticsError>
    where
        I: IntoIterator<Item = Self>,
    {
        Ok(sum::float_sum(values))
    }

    fn add(&self, rhs: &Self) -> Result<Self, StatisticsError> {
        Ok(self + rhs)
    }

    fn sub(&self, rhs: &Self) -> Result<Self, StatisticsError> {
        Ok(self - rhs)
    }

    fn mul(&self, rhs: &Self) -> Result<Self, StatisticsError> {
        Ok(self * rhs)
    }

    fn div(&self, rhs: &Self) -> Result<Self, StatisticsError> {
        Ok(self / rhs)
    }

    fn abs(&self) -> Self {
        f64::abs(*self)
    }

    fn square_root(&self, _kind: NumericKind) -> Number {
        Number::Float(f64::sqrt(*self))
    }

    fn into_number(self, _kind: NumericKind) -> Number {
        Number::Float(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(literals: &[&str]) -> Vec<Number> {
        literals
            .iter()
            .map(|s| Number::parse_decimal(s).unwrap())
            .collect()
    }

    #[test]
    fn test_coerce_table() {
        use NumericKind::{Decimal, Float, Integer, Rational};

        let cases = [
            (Integer, Integer, Some(Integer)),
            (Integer, Rational, Some(Rational)),
            (Integer, Decimal, Some(Decimal)),
            (Integer, Float, Some(Float)),
            (Rational, Rational, Some(Rational)),
            (Rational, Decimal, None),
            (Rational, Float, Some(Float)),
            (Decimal, Decimal, Some(Decimal)),
            (Decimal, Float, None),
            (Float, Float, Some(Float)),
        ];
        for (a, b, expected) in cases {
            assert_eq!(a.coerce(b).ok(), expected, "coerce({a}, {b})");
            assert_eq!(b.coerce(a).ok(), expected, "coerce({b}, {a})");
        }
    }

    #[test]
    fn test_resolve_empty_is_none() {
        assert_eq!(NumericKind::resolve(&Vec::<Number>::new()), Ok(None));
    }

    #[test]
    fn test_resolve_reports_first_conflict() {
        let data = numbers(&["1", "2.5", "3", "1/3"]);
        assert_eq!(
            NumericKind::resolve(&data),
            Err(MixedTypeError {
                left: NumericKind::Decimal,
                right: NumericKind::Rational,
            })
        );
    }

    #[test]
    fn test_resolve_infers_accumulator_kind() {
        let data = vec![Number::from(2), Number::from(0.5), Number::from(3)];
        assert_eq!(
            NumericKind::resolve(data.iter()),
            Ok(Some(NumericKind::Float))
        );
    }

    #[test]
    fn test_resolve_integer_and_rational() {
        let data = numbers(&["1", "1/3", "7"]);
        assert_eq!(NumericKind::resolve(&data), Ok(Some(NumericKind::Rational)));
    }

    #[test]
    fn test_float_dominates_exact_integers() {
        let data = vec![Number::from(1), Number::from(0.5)];
        assert_eq!(NumericKind::resolve(&data), Ok(Some(NumericKind::Float)));
    }

    #[test]
    fn test_rational_sqrt_stays_exact_for_perfect_squares() {
        let value = BigRational::new(9.into(), 4.into());
        let root = value.square_root(NumericKind::Rational);
        assert_eq!(root.kind(), NumericKind::Rational);
        assert_eq!(root, Number::from(1.5));

        let value = BigRational::from_integer(2.into());
        let root = value.square_root(NumericKind::Integer);
        assert_eq!(root.kind(), NumericKind::Float);
        assert!((root.to_f64() - std::f64::consts::SQRT_2).abs() < 1e-15);
    }

    #[test]
    fn test_decimal_sqrt_stays_exact_for_perfect_squares() {
        let root = Decimal::new(625, 2).square_root(NumericKind::Decimal);
        assert_eq!(root.kind(), NumericKind::Decimal);
        assert_eq!(root, Number::from(2.5));

        let root = Decimal::new(2, 0).square_root(NumericKind::Decimal);
        assert_eq!(root.kind(), NumericKind::Float);
    }

    #[test]
    fn test_decimal_sqrt_of_rounded_quotient_is_float() {
        // 19/12 rounded to 28 digits squares back to itself in decimal
        // arithmetic, but its root is irrational.
        let variance = Decimal::new(19, 0) / Decimal::new(12, 0);
        let root = variance.square_root(NumericKind::Decimal);
        assert_eq!(root.kind(), NumericKind::Float);
        assert!((root.to_f64() - (19.0_f64 / 12.0).sqrt()).abs() < 1e-15);
    }

    #[test]
    fn test_decimal_division_is_normalized() {
        let quotient = Decimal::new(225, 2).div(&Decimal::new(4, 0)).unwrap();
        assert_eq!(quotient.to_string(), "0.5625");
        let quotient = Decimal::new(300, 2).div(&Decimal::new(2, 0)).unwrap();
        assert_eq!(quotient.to_string(), "1.5");
    }

    #[test]
    fn test_decimal_conversion_overflow() {
        let huge = Number::Integer(BigInt::from(10).pow(40));
        assert_eq!(
            Decimal::convert(&huge),
            Err(StatisticsError::DecimalOverflow {
                operation: "conversion"
            })
        );
    }
}
