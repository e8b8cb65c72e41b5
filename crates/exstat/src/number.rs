//! Numeric values and their representation kinds.
//!
//! A [`Number`] is one datum handed to the statistics functions. It carries its
//! exact representation with it: arbitrary-precision integers and rationals,
//! fixed-point decimals, or binary floating point. The kind never changes
//! after construction; aggregation decides a common kind for a whole dataset
//! (see [`NumericKind::coerce`]) and converts at that boundary only.

use std::{cmp::Ordering, fmt, str::FromStr};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed as _, ToPrimitive as _, Zero as _};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// The representation kind of a [`Number`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum NumericKind {
    /// Arbitrary-precision integer.
    #[display("integer")]
    Integer,
    /// Arbitrary-precision numerator/denominator pair.
    #[display("rational")]
    Rational,
    /// Fixed-point base-10 decimal with up to 28 significant digits.
    #[display("decimal")]
    Decimal,
    /// IEEE 754 double precision float.
    #[display("float")]
    Float,
}

impl NumericKind {
    /// Returns `true` for kinds whose arithmetic never rounds.
    #[must_use]
    pub fn is_exact(self) -> bool {
        !matches!(self, Self::Float)
    }
}

/// A single real-valued datum.
///
/// Equality and ordering are numeric and exact across kinds, so
/// `Number::from(4) == Number::from(4.0)` holds, while `0.1f64` is *not*
/// equal to the rational `1/10` (the float is a dyadic approximation).
///
/// # Examples
///
/// ```
/// use exstat::Number;
///
/// let half: Number = "1/2".parse().unwrap();
/// assert_eq!(half, Number::from(0.5));
/// assert!(Number::from(3) > half);
/// assert_eq!(half.to_string(), "1/2");
/// ```
#[derive(Debug, Clone)]
pub enum Number {
    /// Exact integer of any size.
    Integer(BigInt),
    /// Exact fraction, always in lowest terms.
    Rational(BigRational),
    /// Exact base-10 fixed-point value.
    Decimal(Decimal),
    /// Binary floating point, possibly infinite or NaN.
    Float(f64),
}

impl Number {
    /// Returns the representation kind of this value.
    #[must_use]
    pub fn kind(&self) -> NumericKind {
        match self {
            Self::Integer(_) => NumericKind::Integer,
            Self::Rational(_) => NumericKind::Rational,
            Self::Decimal(_) => NumericKind::Decimal,
            Self::Float(_) => NumericKind::Float,
        }
    }

    /// Returns `false` only for infinite or NaN floats.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Float(v) => v.is_finite(),
            _ => true,
        }
    }

    /// Returns `true` if the value is NaN.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        matches!(self, Self::Float(v) if v.is_nan())
    }

    /// Converts to the nearest `f64`.
    ///
    /// Magnitudes beyond the float range saturate to infinity.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        match self {
            Self::Integer(v) => v.to_f64().unwrap_or_else(|| saturate(v.is_negative())),
            Self::Rational(v) => rational_to_f64(v),
            Self::Decimal(v) => v.to_f64().unwrap_or(f64::NAN),
            Self::Float(v) => *v,
        }
    }

    /// Converts to an exact rational.
    ///
    /// Every finite float is a dyadic rational, so only infinities and NaN
    /// return `None`.
    #[must_use]
    pub fn to_rational(&self) -> Option<BigRational> {
        match self {
            Self::Integer(v) => Some(BigRational::from_integer(v.clone())),
            Self::Rational(v) => Some(v.clone()),
            Self::Decimal(v) => Some(decimal_to_rational(*v)),
            Self::Float(v) => BigRational::from_float(*v),
        }
    }

    /// Parses a literal as an exact decimal where the default grammar would
    /// produce a float.
    ///
    /// Integer and `p/q` literals keep their exact kinds.
    ///
    /// # Examples
    ///
    /// ```
    /// use exstat::{Number, NumericKind};
    ///
    /// assert_eq!(Number::parse_decimal("0.1375").unwrap().kind(), NumericKind::Decimal);
    /// assert_eq!(Number::parse_decimal("7").unwrap().kind(), NumericKind::Integer);
    /// ```
    pub fn parse_decimal(literal: &str) -> Result<Self, ParseNumberError> {
        let trimmed = literal.trim();
        if let Some(number) = parse_exact(trimmed)? {
            return Ok(number);
        }
        Decimal::from_str_exact(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map(Self::Decimal)
            .map_err(|_| ParseNumberError::new(literal))
    }

    /// Total order used for sorting: numeric order with NaN placed last.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other)
            .unwrap_or_else(|| match (self.is_nan(), other.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                _ => Ordering::Less,
            })
    }

    /// Builds an exact result, reporting it as an integer only when the
    /// aggregation ran over integers and the value is integral.
    pub(crate) fn from_exact(value: BigRational, kind: NumericKind) -> Self {
        if kind == NumericKind::Integer && value.is_integer() {
            Self::Integer(value.to_integer())
        } else {
            Self::Rational(value)
        }
    }
}

fn saturate(negative: bool) -> f64 {
    if negative {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    }
}

pub(crate) fn rational_to_f64(value: &BigRational) -> f64 {
    value
        .to_f64()
        .unwrap_or_else(|| saturate(value.is_negative()))
}

pub(crate) fn decimal_to_rational(value: Decimal) -> BigRational {
    let denom = BigInt::from(10u8).pow(value.scale());
    BigRational::new(BigInt::from(value.mantissa()), denom)
}

/// Parses integer and `p/q` literals; `Ok(None)` means "neither".
fn parse_exact(literal: &str) -> Result<Option<Number>, ParseNumberError> {
    if let Some((numer, denom)) = literal.split_once('/') {
        let numer = numer
            .trim()
            .parse::<BigInt>()
            .map_err(|_| ParseNumberError::new(literal))?;
        let denom = denom
            .trim()
            .parse::<BigInt>()
            .map_err(|_| ParseNumberError::new(literal))?;
        if denom.is_zero() {
            return Err(ParseNumberError::new(literal));
        }
        return Ok(Some(Number::Rational(BigRational::new(numer, denom))));
    }
    Ok(literal.parse::<BigInt>().ok().map(Number::Integer))
}

/// Error returned when a literal is not a recognised number.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid number literal '{literal}'")]
pub struct ParseNumberError {
    literal: String,
}

impl ParseNumberError {
    fn new(literal: &str) -> Self {
        Self {
            literal: literal.to_owned(),
        }
    }
}

/// Parses integers (`42`), rationals (`3/4`) and floats (`2.5`, `1e-3`,
/// `inf`, `nan`).
impl FromStr for Number {
    type Err = ParseNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(number) = parse_exact(trimmed)? {
            return Ok(number);
        }
        trimmed
            .parse::<f64>()
            .map(Self::Float)
            .map_err(|_| ParseNumberError::new(s))
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Rational(a), Self::Rational(b)) => Some(a.cmp(b)),
            (Self::Decimal(a), Self::Decimal(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            _ => match (self.to_rational(), other.to_rational()) {
                (Some(a), Some(b)) => Some(a.cmp(&b)),
                // At least one side is an infinity or NaN.
                _ => self.to_f64().partial_cmp(&other.to_f64()),
            },
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Rational(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            // Debug keeps the trailing ".0" on integral floats.
            Self::Float(v) => write!(f, "{v:?}"),
        }
    }
}

/// Exact kinds serialize losslessly: wide integers, rationals and decimals
/// become strings.
impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Integer(v) => match v.to_i64() {
                Some(v) => serializer.serialize_i64(v),
                None => serializer.collect_str(v),
            },
            Self::Rational(v) => serializer.collect_str(v),
            Self::Decimal(v) => serializer.collect_str(v),
            Self::Float(v) => serializer.serialize_f64(*v),
        }
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    Self::Integer(BigInt::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Self::Integer(value)
    }
}

impl From<BigRational> for Number {
    fn from(value: BigRational) -> Self {
        Self::Rational(value)
    }
}

impl From<Decimal> for Number {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<&Number> for Number {
    fn from(value: &Number) -> Self {
        value.clone()
    }
}
