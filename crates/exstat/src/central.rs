//! Measures of central tendency.
//!
//! | function           | result                                            |
//! |--------------------|---------------------------------------------------|
//! | [`mean`]           | arithmetic mean                                   |
//! | [`median`]         | middle value, or mean of the middle two           |
//! | [`median_low`]     | middle value, or the lower of the middle two      |
//! | [`median_high`]    | middle value, or the higher of the middle two     |
//! | [`median_grouped`] | 50th percentile of data grouped in class intervals|
//! | [`mode`]           | single most common value                          |
//!
//! Every function accepts anything iterable, including one-shot iterators,
//! and never mutates caller data: sorting happens on a private copy.

use std::{cmp::Ordering, collections::HashMap, hash::Hash};

use crate::{
    StatisticsError,
    lattice::{self, Representation, with_representation},
    number::{Number, NumericKind},
};

/// Returns the arithmetic mean of `data`.
///
/// The sum and the division both happen in the common kind of the data, so
/// integer and rational data give an exact rational result.
///
/// # Examples
///
/// ```
/// use exstat::{Number, mean};
///
/// assert_eq!(mean([-1.0, 2.5, 3.25, 5.75]).unwrap(), Number::from(2.625));
///
/// let fractions = ["3/7", "1/21", "5/3", "1/3"].map(|s| s.parse::<Number>().unwrap());
/// assert_eq!(mean(fractions).unwrap(), "13/21".parse::<Number>().unwrap());
/// ```
pub fn mean<I>(data: I) -> Result<Number, StatisticsError>
where
    I: IntoIterator,
    I::Item: Into<Number>,
{
    mean_of(&lattice::materialize(data))
}

pub(crate) fn mean_of(data: &[Number]) -> Result<Number, StatisticsError> {
    let kind = lattice::require_kind(data, "mean")?;
    with_representation!(kind, R => {
        let values = R::convert_all(data)?;
        Ok(mean_in(&values)?.into_number(kind))
    })
}

/// Mean of already converted values. `values` must not be empty.
pub(crate) fn mean_in<R>(values: &[R]) -> Result<R, StatisticsError>
where
    R: Representation,
{
    R::total(values.iter().cloned())?.div(&R::from_count(values.len())?)
}

/// Returns the median of `data`, averaging the two middle values when the
/// count is even.
///
/// The average may not be a member of the data, and integer data may give a
/// non-integral rational median. The whole dataset must resolve to a common
/// kind even when the count is odd.
///
/// # Examples
///
/// ```
/// use exstat::{Number, median};
///
/// assert_eq!(median([1, 3, 5]).unwrap(), Number::from(3));
/// assert_eq!(median([1, 3, 5, 7]).unwrap(), Number::from(4.0));
/// assert_eq!(median([2, 3, 4, 5]).unwrap(), Number::from(3.5));
/// ```
pub fn median<I>(data: I) -> Result<Number, StatisticsError>
where
    I: IntoIterator,
    I::Item: Into<Number>,
{
    median_of_sorted(&lattice::materialize_sorted(data))
}

pub(crate) fn median_of_sorted(sorted: &[Number]) -> Result<Number, StatisticsError> {
    let kind = lattice::require_kind(sorted, "median")?;
    let n = sorted.len();
    if n % 2 == 1 {
        return Ok(sorted[n / 2].clone());
    }
    with_representation!(kind, R => {
        let middle = R::convert_all(&sorted[n / 2 - 1..=n / 2])?;
        Ok(mean_in(&middle)?.into_number(kind))
    })
}

/// Returns the low median of `data`.
///
/// The result is always a member of the data and keeps its kind.
///
/// # Examples
///
/// ```
/// use exstat::{Number, median_low};
///
/// assert_eq!(median_low([1, 3, 5]).unwrap(), Number::from(3));
/// assert_eq!(median_low([1, 3, 5, 7]).unwrap(), Number::from(3));
/// ```
pub fn median_low<I>(data: I) -> Result<Number, StatisticsError>
where
    I: IntoIterator,
    I::Item: Into<Number>,
{
    median_low_of_sorted(&lattice::materialize_sorted(data))
}

pub(crate) fn median_low_of_sorted(sorted: &[Number]) -> Result<Number, StatisticsError> {
    let n = sorted.len();
    if n == 0 {
        return Err(StatisticsError::NotEnoughData {
            operation: "median_low",
            required: 1,
        });
    }
    Ok(sorted[(n - 1) / 2].clone())
}

/// Returns the high median of `data`.
///
/// The result is always a member of the data and keeps its kind.
///
/// # Examples
///
/// ```
/// use exstat::{Number, median_high};
///
/// assert_eq!(median_high([1, 3, 5]).unwrap(), Number::from(3));
/// assert_eq!(median_high([1, 3, 5, 7]).unwrap(), Number::from(5));
/// ```
pub fn median_high<I>(data: I) -> Result<Number, StatisticsError>
where
    I: IntoIterator,
    I::Item: Into<Number>,
{
    median_high_of_sorted(&lattice::materialize_sorted(data))
}

pub(crate) fn median_high_of_sorted(sorted: &[Number]) -> Result<Number, StatisticsError> {
    sorted
        .get(sorted.len() / 2)
        .cloned()
        .ok_or(StatisticsError::NotEnoughData {
            operation: "median_high",
            required: 1,
        })
}

/// Returns the median of continuous data grouped into classes of width
/// `interval` centred on the data values.
///
/// With `x` the value at sorted index `n / 2`, `L = x - interval / 2` the
/// lower class limit, `cf` the number of values below `x` and `f` the number
/// of values equal to `x`, the result is `L + interval * (n / 2 - cf) / f`.
///
/// The arithmetic runs in the common kind of the data and `interval`. When
/// they have none (a decimal mixed with a rational or a float), it runs in
/// floats instead of failing. The function does not check that data points
/// are at least `interval` apart.
///
/// # Errors
///
/// Fails on empty data and when `interval` is not finite and positive.
///
/// # Examples
///
/// ```
/// use exstat::{Number, median_grouped};
///
/// assert_eq!(median_grouped([52, 52, 53, 54], 1).unwrap(), Number::from(52.5));
/// assert_eq!(median_grouped([1, 3, 3, 5, 7], 2).unwrap(), Number::from(3.5));
///
/// let m = median_grouped([1, 2, 2, 3, 4, 4, 4, 4, 4, 5], 1).unwrap();
/// assert_eq!(m, "37/10".parse::<Number>().unwrap());
/// ```
pub fn median_grouped<I, W>(data: I, interval: W) -> Result<Number, StatisticsError>
where
    I: IntoIterator,
    I::Item: Into<Number>,
    W: Into<Number>,
{
    median_grouped_of_sorted(&lattice::materialize_sorted(data), &interval.into())
}

pub(crate) fn median_grouped_of_sorted(
    sorted: &[Number],
    interval: &Number,
) -> Result<Number, StatisticsError> {
    let n = sorted.len();
    if n == 0 {
        return Err(StatisticsError::NotEnoughData {
            operation: "median_grouped",
            required: 1,
        });
    }
    if !interval.is_finite() || *interval <= Number::from(0) {
        return Err(StatisticsError::InvalidInterval {
            interval: interval.to_string(),
        });
    }
    if n == 1 {
        return Ok(sorted[0].clone());
    }

    let x = &sorted[n / 2];
    let below = sorted.partition_point(|v| v.total_cmp(x) == Ordering::Less);
    let freq = sorted[below..]
        .iter()
        .take_while(|v| v.total_cmp(x) == Ordering::Equal)
        .count();

    let kind = NumericKind::resolve(sorted.iter().chain([interval]))
        .ok()
        .flatten()
        .unwrap_or(NumericKind::Float);
    with_representation!(kind, R => {
        let x = R::convert(x)?;
        let interval = R::convert(interval)?;
        let two = R::from_count(2)?;
        let lower_limit = x.sub(&interval.div(&two)?)?;
        let offset = R::from_count(n)?.div(&two)?.sub(&R::from_count(below)?)?;
        let step = interval.mul(&offset)?.div(&R::from_count(freq)?)?;
        Ok(lower_limit.add(&step)?.into_number(kind))
    })
}

/// Returns the single most common value of `data`.
///
/// Values are counted in a hash table keyed by the values themselves, so
/// nominal data works as well as integers. For [`Number`] data, whose
/// equality is numeric across kinds, use [`numeric_mode`].
///
/// # Errors
///
/// Fails on empty data, and when several values share the highest
/// frequency.
///
/// # Examples
///
/// ```
/// use exstat::{StatisticsError, mode};
///
/// assert_eq!(mode([1, 1, 2, 3, 3, 3, 3, 4]).unwrap(), 3);
/// assert_eq!(mode(["red", "blue", "blue", "red", "green", "red", "red"]).unwrap(), "red");
/// assert_eq!(mode([1, 2, 3]), Err(StatisticsError::NoUniqueMode { count: 3 }));
/// ```
pub fn mode<I>(data: I) -> Result<I::Item, StatisticsError>
where
    I: IntoIterator,
    I::Item: Hash + Eq,
{
    let mut table = HashMap::<I::Item, usize>::new();
    for value in data {
        *table.entry(value).or_default() += 1;
    }
    unique_most_common(table)
}

/// Returns the single most common value of numeric `data`.
///
/// Values are compared numerically, so `1`, `1.0` and `2/2` count as one
/// value; the first of them in `data` is returned. Equal values are found
/// by sorting a private copy.
///
/// # Errors
///
/// Fails on empty data, and when several values share the highest
/// frequency.
///
/// # Examples
///
/// ```
/// use exstat::{Number, numeric_mode};
///
/// let data = [Number::from(2.5), Number::from(1), Number::from(1.0)];
/// assert_eq!(numeric_mode(data).unwrap(), Number::from(1));
/// ```
pub fn numeric_mode<I>(data: I) -> Result<Number, StatisticsError>
where
    I: IntoIterator,
    I::Item: Into<Number>,
{
    let sorted = lattice::materialize_sorted(data);
    let runs = sorted
        .chunk_by(|a, b| a.total_cmp(b).is_eq())
        .map(|run| (run[0].clone(), run.len()));
    unique_most_common(runs)
}

fn unique_most_common<T, I>(counts: I) -> Result<T, StatisticsError>
where
    I: IntoIterator<Item = (T, usize)>,
{
    let mut most_common = None;
    let mut max_count = 0;
    let mut ties = 0;
    for (value, count) in counts {
        match count.cmp(&max_count) {
            Ordering::Less => {}
            Ordering::Equal => ties += 1,
            Ordering::Greater => {
                most_common = Some(value);
                max_count = count;
                ties = 1;
            }
        }
    }
    if ties > 1 {
        return Err(StatisticsError::NoUniqueMode { count: ties });
    }
    most_common.ok_or(StatisticsError::NotEnoughData {
        operation: "mode",
        required: 1,
    })
}
