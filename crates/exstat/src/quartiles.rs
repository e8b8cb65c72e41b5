//! Quartiles and interquartile range.
//!
//! There is no single agreed definition of the first and third quartiles of
//! a sample. [`QuartileScheme`] selects one of four common conventions.
//! Q2 is the median except under the nearest-rank scheme, which never
//! averages.
//!
//! Tukey's hinges also give the statistics built on them: [`midhinge`],
//! [`trimean`] and [`fivenum`]. [`quartile_skewness`] measures asymmetry
//! from any three quartiles.

use std::str::FromStr;

use serde::Serialize;

use crate::{
    StatisticsError, central,
    lattice::{self, Representation, with_representation},
    number::{Number, NumericKind},
};

/// Convention used to locate Q1 and Q3.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum QuartileScheme {
    /// Tukey's hinges: medians of the two halves, each half including the
    /// median.
    #[default]
    #[display("inclusive")]
    Inclusive,
    /// Moore and McCabe: medians of the two halves, each half excluding the
    /// median. Used by the TI-85 calculator.
    #[display("exclusive")]
    Exclusive,
    /// Mendenhall and Sincich: nearest rank, never interpolating.
    #[display("m&s")]
    MendenhallSincich,
    /// Minitab: linear interpolation at `(n + 1) / 4` and `3 (n + 1) / 4`.
    #[display("minitab")]
    Minitab,
}

impl QuartileScheme {
    /// Every scheme, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Inclusive,
        Self::Exclusive,
        Self::MendenhallSincich,
        Self::Minitab,
    ];

    /// Accepted names for each scheme, matched case-insensitively.
    pub const ALIASES: [(&'static str, Self); 10] = [
        ("inclusive", Self::Inclusive),
        ("incl", Self::Inclusive),
        ("tukey", Self::Inclusive),
        ("hinges", Self::Inclusive),
        ("exclusive", Self::Exclusive),
        ("excl", Self::Exclusive),
        ("m&m", Self::Exclusive),
        ("ti-85", Self::Exclusive),
        ("m&s", Self::MendenhallSincich),
        ("minitab", Self::Minitab),
    ];

    /// Sorted positions of Q1, Q2 and Q3 for a dataset of `n >= 3` values.
    fn positions(self, n: usize) -> [Position; 3] {
        let median = if n % 2 == 0 {
            Position::Midpoint(n / 2 - 1)
        } else {
            Position::At(n / 2)
        };
        match self {
            Self::Inclusive => {
                let (q1, q3) = halves(n, (n + 1) / 4, matches!(n % 4, 0 | 3));
                [q1, median, q3]
            }
            Self::Exclusive => {
                let (q1, q3) = halves(n, n / 4, matches!(n % 4, 0 | 1));
                [q1, median, q3]
            }
            Self::MendenhallSincich => [
                Position::At(round_quarters(n + 1, Tie::Up) - 1),
                Position::At(round_quarters(2 * (n + 1), Tie::Even) - 1),
                Position::At(round_quarters(3 * (n + 1), Tie::Down) - 1),
            ],
            Self::Minitab => [1, 2, 3].map(|k| {
                let quarters = k * (n + 1) - 4;
                Position::Between {
                    index: quarters / 4,
                    quarters: quarters % 4,
                }
            }),
        }
    }
}

/// Error returned when parsing an unknown [`QuartileScheme`] name.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown quartile scheme '{name}'")]
pub struct UnknownSchemeError {
    name: String,
}

impl FromStr for QuartileScheme {
    type Err = UnknownSchemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALIASES
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(s.trim()))
            .map(|(_, scheme)| *scheme)
            .ok_or_else(|| UnknownSchemeError { name: s.to_owned() })
    }
}

/// Location of a quartile in the sorted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    /// The value at this index.
    At(usize),
    /// Mean of the values at `index` and `index + 1`.
    Midpoint(usize),
    /// `quarters / 4` of the way from `index` to `index + 1`.
    Between { index: usize, quarters: usize },
}

/// Q1 and Q3 as medians of the lower and upper halves.
fn halves(n: usize, i: usize, average: bool) -> (Position, Position) {
    if average {
        (Position::Midpoint(i - 1), Position::Midpoint(n - i - 1))
    } else {
        (Position::At(i), Position::At(n - i - 1))
    }
}

#[derive(Debug, Clone, Copy)]
enum Tie {
    Up,
    Down,
    Even,
}

/// Rounds `quarters / 4` to an integer, resolving halves with `tie`.
fn round_quarters(quarters: usize, tie: Tie) -> usize {
    let whole = quarters / 4;
    match (quarters % 4, tie) {
        (0 | 1, _) | (2, Tie::Down) => whole,
        (2, Tie::Even) if whole % 2 == 0 => whole,
        _ => whole + 1,
    }
}

/// First, second and third quartiles of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quartiles {
    /// First quartile.
    pub q1: Number,
    /// Second quartile, usually the median.
    pub q2: Number,
    /// Third quartile.
    pub q3: Number,
}

impl Quartiles {
    /// Returns `q3 - q1`.
    pub fn range(&self) -> Result<Number, StatisticsError> {
        let kind = lattice::require_kind([&self.q1, &self.q3], "iqr")?;
        with_representation!(kind, R => {
            let q1 = R::convert(&self.q1)?;
            let q3 = R::convert(&self.q3)?;
            Ok(q3.sub(&q1)?.into_number(kind))
        })
    }

    /// Returns the quartile skewness of these quartiles.
    ///
    /// See [`quartile_skewness`].
    pub fn skewness(&self) -> Result<Number, StatisticsError> {
        quartile_skewness(self.q1.clone(), self.q2.clone(), self.q3.clone())
    }
}

/// Tukey's five-number summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiveNumber {
    /// Smallest value.
    pub minimum: Number,
    /// Median of the lower half, including the median for odd counts.
    pub lower_hinge: Number,
    /// Median of all values.
    pub median: Number,
    /// Median of the upper half, including the median for odd counts.
    pub upper_hinge: Number,
    /// Largest value.
    pub maximum: Number,
}

/// Returns the quartiles of `data` under `scheme`.
///
/// # Errors
///
/// Fails on fewer than three values, or when the data mixes incompatible
/// kinds.
///
/// # Examples
///
/// ```
/// use exstat::{Number, QuartileScheme, quartiles};
///
/// let q = quartiles(1..=8, QuartileScheme::Inclusive).unwrap();
/// assert_eq!((q.q1, q.q2, q.q3), (Number::from(2.5), Number::from(4.5), Number::from(6.5)));
///
/// let q = quartiles(1..=8, "minitab".parse().unwrap()).unwrap();
/// assert_eq!((q.q1, q.q3), (Number::from(2.25), Number::from(6.75)));
/// ```
pub fn quartiles<I>(data: I, scheme: QuartileScheme) -> Result<Quartiles, StatisticsError>
where
    I: IntoIterator,
    I::Item: Into<Number>,
{
    quartiles_of_sorted(&lattice::materialize_sorted(data), scheme)
}

/// Returns the interquartile range `Q3 - Q1` of `data` under `scheme`.
///
/// # Examples
///
/// ```
/// use exstat::{Number, QuartileScheme, iqr};
///
/// assert_eq!(iqr(1..=11, QuartileScheme::Exclusive).unwrap(), Number::from(6));
/// ```
pub fn iqr<I>(data: I, scheme: QuartileScheme) -> Result<Number, StatisticsError>
where
    I: IntoIterator,
    I::Item: Into<Number>,
{
    quartiles(data, scheme)?.range()
}

/// Returns the midhinge of `data`, the mean of its lower and upper hinges.
///
/// # Errors
///
/// Fails on fewer than three values.
///
/// # Examples
///
/// ```
/// use exstat::{Number, midhinge};
///
/// assert_eq!(midhinge([1, 2, 3, 4, 5, 6, 7, 8]).unwrap(), Number::from(4.5));
/// ```
pub fn midhinge<I>(data: I) -> Result<Number, StatisticsError>
where
    I: IntoIterator,
    I::Item: Into<Number>,
{
    let sorted = lattice::materialize_sorted(data);
    let Quartiles { q1, q3, .. } = quartiles_of_sorted(&sorted, QuartileScheme::Inclusive)?;
    mean_in_kind_of(&sorted, &[q1, q3])
}

/// Returns Tukey's trimean of `data`, `(Q1 + 2 Q2 + Q3) / 4` over the hinges
/// and the median.
///
/// # Errors
///
/// Fails on fewer than three values.
///
/// # Examples
///
/// ```
/// use exstat::{Number, trimean};
///
/// assert_eq!(trimean([11, 22, 33, 44, 55, 66, 77, 88, 99]).unwrap(), Number::from(55));
/// ```
pub fn trimean<I>(data: I) -> Result<Number, StatisticsError>
where
    I: IntoIterator,
    I::Item: Into<Number>,
{
    let sorted = lattice::materialize_sorted(data);
    let Quartiles { q1, q2, q3 } = quartiles_of_sorted(&sorted, QuartileScheme::Inclusive)?;
    mean_in_kind_of(&sorted, &[q1, q2.clone(), q2, q3])
}

/// Returns the five-number summary of `data`: minimum, lower hinge, median,
/// upper hinge and maximum.
///
/// # Errors
///
/// Fails on fewer than three values.
///
/// # Examples
///
/// ```
/// use exstat::{Number, fivenum};
///
/// let summary = fivenum(100..110).unwrap();
/// assert_eq!(summary.lower_hinge, Number::from(102));
/// assert_eq!(summary.median, Number::from(104.5));
/// assert_eq!(summary.maximum, Number::from(109));
/// ```
pub fn fivenum<I>(data: I) -> Result<FiveNumber, StatisticsError>
where
    I: IntoIterator,
    I::Item: Into<Number>,
{
    let sorted = lattice::materialize_sorted(data);
    let Quartiles { q1, q2, q3 } = quartiles_of_sorted(&sorted, QuartileScheme::Inclusive)?;
    Ok(FiveNumber {
        minimum: sorted[0].clone(),
        lower_hinge: q1,
        median: q2,
        upper_hinge: q3,
        maximum: sorted[sorted.len() - 1].clone(),
    })
}

/// Returns the quartile skewness `((q3 - q2) - (q2 - q1)) / (q3 - q1)`.
///
/// The result lies in `[-1, 1]`. When all three quartiles are equal the
/// measure is undefined and the result is NaN.
///
/// # Errors
///
/// Fails unless `q1 <= q2 <= q3`, and when the quartiles mix incompatible
/// kinds.
///
/// # Examples
///
/// ```
/// use exstat::{Number, quartile_skewness};
///
/// assert_eq!(quartile_skewness(3, 5, 7).unwrap(), Number::from(0));
/// assert_eq!(quartile_skewness(0, 1, 10).unwrap(), "4/5".parse::<Number>().unwrap());
/// assert!(quartile_skewness(1, 1, 1).unwrap().is_nan());
/// ```
pub fn quartile_skewness<A, B, C>(q1: A, q2: B, q3: C) -> Result<Number, StatisticsError>
where
    A: Into<Number>,
    B: Into<Number>,
    C: Into<Number>,
{
    let (q1, q2, q3) = (q1.into(), q2.into(), q3.into());
    let ordered = q1 <= q2 && q2 <= q3;
    if !ordered {
        return Err(StatisticsError::UnorderedQuartiles {
            q1: q1.to_string(),
            q2: q2.to_string(),
            q3: q3.to_string(),
        });
    }
    if q1 == q3 {
        return Ok(Number::Float(f64::NAN));
    }
    let kind = lattice::require_kind([&q1, &q2, &q3], "quartile_skewness")?;
    with_representation!(kind, R => {
        let [q1, q2, q3] = [&q1, &q2, &q3].map(R::convert);
        let (q1, q2, q3) = (q1?, q2?, q3?);
        let upper = q3.sub(&q2)?;
        let lower = q2.sub(&q1)?;
        Ok(upper.sub(&lower)?.div(&q3.sub(&q1)?)?.into_number(kind))
    })
}

/// Mean of `points` taken from `sorted`, reported in the dataset's kind.
fn mean_in_kind_of(sorted: &[Number], points: &[Number]) -> Result<Number, StatisticsError> {
    let kind = lattice::require_kind(sorted, "quartiles")?;
    with_representation!(kind, R => {
        let values = R::convert_all(points)?;
        Ok(central::mean_in(&values)?.into_number(kind))
    })
}

pub(crate) fn quartiles_of_sorted(
    sorted: &[Number],
    scheme: QuartileScheme,
) -> Result<Quartiles, StatisticsError> {
    const REQUIRED: usize = 3;

    if sorted.len() < REQUIRED {
        return Err(StatisticsError::NotEnoughData {
            operation: "quartiles",
            required: REQUIRED,
        });
    }
    let kind = lattice::require_kind(sorted, "quartiles")?;
    let [q1, q2, q3] = scheme
        .positions(sorted.len())
        .map(|position| evaluate(sorted, position, kind));
    Ok(Quartiles {
        q1: q1?,
        q2: q2?,
        q3: q3?,
    })
}

fn evaluate(
    sorted: &[Number],
    position: Position,
    kind: NumericKind,
) -> Result<Number, StatisticsError> {
    match position {
        Position::At(index) | Position::Between { index, quarters: 0 } => Ok(sorted[index].clone()),
        Position::Midpoint(index) => with_representation!(kind, R => {
            let pair = R::convert_all(&sorted[index..=index + 1])?;
            Ok(central::mean_in(&pair)?.into_number(kind))
        }),
        Position::Between { index, quarters } => with_representation!(kind, R => {
            let a = R::convert(&sorted[index])?;
            let b = R::convert(&sorted[index + 1])?;
            let fraction = R::from_count(quarters)?.div(&R::from_count(4)?)?;
            Ok(a.add(&fraction.mul(&b.sub(&a)?)?)?.into_number(kind))
        }),
    }
}
