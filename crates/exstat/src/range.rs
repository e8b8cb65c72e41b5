//! Minimum, maximum, range and midrange.

use std::cmp::Ordering;

use crate::{
    StatisticsError, central,
    lattice::{self, Representation as _, with_representation},
    number::Number,
};

/// Returns the smallest and largest values of `data` in one pass.
///
/// Values keep their own kinds. NaN orders after every other value.
///
/// # Examples
///
/// ```
/// use exstat::{Number, minmax};
///
/// let (min, max) = minmax([3, 1, 4, 1, 5, 9, 2, 6]).unwrap();
/// assert_eq!(min, Number::from(1));
/// assert_eq!(max, Number::from(9));
/// ```
pub fn minmax<I>(data: I) -> Result<(Number, Number), StatisticsError>
where
    I: IntoIterator,
    I::Item: Into<Number>,
{
    let mut values = data.into_iter().map(Into::into);
    let first = values.next().ok_or(StatisticsError::NotEnoughData {
        operation: "minmax",
        required: 1,
    })?;
    Ok(values.fold((first.clone(), first), |(min, max), value| {
        if value.total_cmp(&min) == Ordering::Less {
            (value, max)
        } else if value.total_cmp(&max) == Ordering::Greater {
            (min, value)
        } else {
            (min, max)
        }
    }))
}

/// Returns the statistical range of `data`, the largest value minus the
/// smallest.
///
/// The subtraction runs in the common kind of the whole dataset, so a single
/// value gives a zero of that kind.
///
/// # Examples
///
/// ```
/// use exstat::{Number, range};
///
/// assert_eq!(range([1.5, 4.5, 9.0]).unwrap(), Number::from(7.5));
/// assert_eq!(range([42]).unwrap(), Number::from(0));
/// ```
pub fn range<I>(data: I) -> Result<Number, StatisticsError>
where
    I: IntoIterator,
    I::Item: Into<Number>,
{
    let sorted = lattice::materialize_sorted(data);
    let kind = lattice::require_kind(&sorted, "range")?;
    let (min, max) = (&sorted[0], &sorted[sorted.len() - 1]);
    with_representation!(kind, R => {
        Ok(R::convert(max)?.sub(&R::convert(min)?)?.into_number(kind))
    })
}

/// Returns the mean of the smallest and largest values of `data`.
///
/// The whole dataset must resolve to a common kind, and the average is
/// taken in that kind.
///
/// # Examples
///
/// ```
/// use exstat::{Number, midrange};
///
/// assert_eq!(midrange([2, 9, 4]).unwrap(), "11/2".parse::<Number>().unwrap());
/// assert_eq!(midrange([0.5, 2.5]).unwrap(), Number::from(1.5));
/// ```
pub fn midrange<I>(data: I) -> Result<Number, StatisticsError>
where
    I: IntoIterator,
    I::Item: Into<Number>,
{
    midrange_of_sorted(&lattice::materialize_sorted(data))
}

pub(crate) fn midrange_of_sorted(sorted: &[Number]) -> Result<Number, StatisticsError> {
    let kind = lattice::require_kind(sorted, "midrange")?;
    let extremes = [sorted[0].clone(), sorted[sorted.len() - 1].clone()];
    with_representation!(kind, R => {
        let extremes = R::convert_all(&extremes)?;
        Ok(central::mean_in(&extremes)?.into_number(kind))
    })
}
