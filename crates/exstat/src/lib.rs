//! Exact descriptive statistics.
//!
//! This crate computes averages and measures of spread over datasets of
//! integers, rationals, fixed-point decimals and floats, keeping the most
//! precise representation the inputs allow:
//!
//! - **Numeric model**: [`Number`] values tagged with their [`NumericKind`]
//! - **Summation**: exact for integers, rationals and decimals, correctly
//!   rounded for floats
//! - **Averages**: mean, median family, mode
//! - **Spread**: population and sample variance and standard deviation,
//!   median absolute deviation
//! - **Order statistics**: quartiles under several conventions, hinges,
//!   trimean, five-number summary, min/max, range, midrange
//! - **Summary**: a serializable bundle of the most common of the above
//!
//! # Modules
//!
//! - [`number`]: Numeric values and their kinds
//! - [`sum`](mod@sum): High-precision summation
//! - [`central`]: Measures of central tendency
//! - [`dispersion`]: Measures of spread
//! - [`quartiles`](mod@quartiles): Quartiles and the statistics built on them
//! - [`range`](mod@range): Minimum, maximum, range and midrange
//! - [`summary`]: Combined summary statistics
//!
//! # Examples
//!
//! ## Exact averages
//!
//! ```
//! use exstat::{Number, mean, median};
//!
//! assert_eq!(mean([1, 2, 3, 4, 4]).unwrap(), "14/5".parse::<Number>().unwrap());
//! assert_eq!(median([1, 3, 5, 7]).unwrap(), Number::from(4));
//! ```
//!
//! ## Spread of decimal data
//!
//! ```
//! use exstat::{Number, variance};
//!
//! let data = ["27.5", "30.25", "30.25", "34.5", "41.75"]
//!     .map(|s| Number::parse_decimal(s).unwrap());
//! assert_eq!(variance(data, None).unwrap().to_string(), "31.01875");
//! ```
//!
//! ## Mixed kinds
//!
//! ```
//! use exstat::{Number, StatisticsError, mean};
//!
//! let data = [Number::parse_decimal("0.5").unwrap(), "1/3".parse().unwrap()];
//! assert!(matches!(mean(data), Err(StatisticsError::MixedTypes(_))));
//! ```

pub use self::{
    central::{mean, median, median_grouped, median_high, median_low, mode, numeric_mode},
    dispersion::{
        MadScale, MedianRule, ParseMedianRuleError, mad, pstdev, pvariance, stdev, variance,
    },
    number::{Number, NumericKind, ParseNumberError},
    quartiles::{
        FiveNumber, QuartileScheme, Quartiles, UnknownSchemeError, fivenum, iqr, midhinge,
        quartile_skewness, quartiles, trimean,
    },
    range::{midrange, minmax, range},
    sum::sum,
    summary::Summary,
};

pub mod central;
pub mod dispersion;
mod lattice;
pub mod number;
pub mod quartiles;
pub mod range;
pub mod sum;
pub mod summary;

/// A dataset mixes numeric kinds that have no lossless common kind.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("cannot mix {left} and {right} values in one dataset")]
pub struct MixedTypeError {
    /// Kind resolved from the values seen so far.
    pub left: NumericKind,
    /// Kind of the value that conflicts with it.
    pub right: NumericKind,
}

/// Error returned by every statistic in this crate.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum StatisticsError {
    #[display("{operation} requires at least {required} data point(s)")]
    NotEnoughData {
        operation: &'static str,
        required: usize,
    },
    #[display("no unique mode; found {count} equally common values")]
    NoUniqueMode { count: usize },
    #[display("class interval must be finite and positive, got {interval}")]
    InvalidInterval { interval: String },
    #[display("decimal precision exceeded during {operation}")]
    DecimalOverflow { operation: &'static str },
    #[display("quartiles must satisfy q1 <= q2 <= q3, got {q1}, {q2}, {q3}")]
    UnorderedQuartiles { q1: String, q2: String, q3: String },
    #[display("{_0}")]
    MixedTypes(#[error(not(source))] MixedTypeError),
}

impl From<MixedTypeError> for StatisticsError {
    fn from(err: MixedTypeError) -> Self {
        Self::MixedTypes(err)
    }
}
