use serde::Serialize;

use crate::{
    StatisticsError, central,
    dispersion::{self, Divisor, Finish},
    lattice,
    number::Number,
    quartiles::{self, QuartileScheme, Quartiles},
};

/// Summary statistics of one dataset.
///
/// Every field is computed with the same functions the crate exposes
/// individually, over one sorted copy of the data.
///
/// # Examples
///
/// ```
/// use exstat::{Number, Summary};
///
/// let summary = Summary::new([5, 2, 4, 1, 3]).unwrap();
/// assert_eq!(summary.count, 5);
/// assert_eq!(summary.min, Number::from(1));
/// assert_eq!(summary.max, Number::from(5));
/// assert_eq!(summary.mean, Number::from(3));
/// assert_eq!(summary.variance, Some("5/2".parse().unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Number of data points.
    pub count: usize,
    /// Smallest value, in its own kind.
    pub min: Number,
    /// Largest value, in its own kind.
    pub max: Number,
    /// Arithmetic mean.
    pub mean: Number,
    /// Median, averaging the middle two values for even counts.
    pub median: Number,
    /// Lower of the middle two values for even counts.
    pub median_low: Number,
    /// Higher of the middle two values for even counts.
    pub median_high: Number,
    /// Population variance.
    pub pvariance: Number,
    /// Population standard deviation.
    pub pstdev: Number,
    /// Sample variance, `None` for fewer than two data points.
    pub variance: Option<Number>,
    /// Sample standard deviation, `None` for fewer than two data points.
    pub stdev: Option<Number>,
    /// Tukey's hinges, `None` for fewer than three data points.
    pub quartiles: Option<Quartiles>,
}

impl Summary {
    /// Computes summary statistics from unsorted values.
    ///
    /// # Errors
    ///
    /// Fails on empty data, and when the data mixes incompatible kinds.
    pub fn new<I>(data: I) -> Result<Self, StatisticsError>
    where
        I: IntoIterator,
        I::Item: Into<Number>,
    {
        Self::from_sorted(&lattice::materialize_sorted(data))
    }

    /// Computes summary statistics from values already sorted by
    /// [`Number::total_cmp`].
    ///
    /// # Panics
    ///
    /// Panics if `sorted` is not sorted in ascending order.
    pub fn from_sorted(sorted: &[Number]) -> Result<Self, StatisticsError> {
        assert!(
            sorted.is_sorted_by(|a, b| a.total_cmp(b).is_le()),
            "values must be sorted in ascending order"
        );

        let count = sorted.len();
        let mean = central::mean_of(sorted)?;
        let (min, max) = (sorted[0].clone(), sorted[count - 1].clone());
        let sample = |finish| {
            (count >= 2)
                .then(|| dispersion::spread(sorted, None, Divisor::Sample, finish))
                .transpose()
        };

        Ok(Self {
            count,
            min,
            max,
            median: central::median_of_sorted(sorted)?,
            median_low: central::median_low_of_sorted(sorted)?,
            median_high: central::median_high_of_sorted(sorted)?,
            pvariance: dispersion::spread(
                sorted,
                None,
                Divisor::Population,
                Finish::Variance,
            )?,
            pstdev: dispersion::spread(
                sorted,
                None,
                Divisor::Population,
                Finish::StandardDeviation,
            )?,
            variance: sample(Finish::Variance)?,
            stdev: sample(Finish::StandardDeviation)?,
            quartiles: (count >= 3)
                .then(|| quartiles::quartiles_of_sorted(sorted, QuartileScheme::Inclusive))
                .transpose()?,
            mean,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NumericKind, pstdev, stdev, variance};

    #[test]
    fn test_matches_individual_functions() {
        let data = [1.5, 2.5, 2.5, 2.75, 3.25, 4.75];
        let summary = Summary::new(data).unwrap();
        assert_eq!(summary.count, 6);
        assert_eq!(summary.min, Number::from(1.5));
        assert_eq!(summary.max, Number::from(4.75));
        assert_eq!(summary.mean, crate::mean(data).unwrap());
        assert_eq!(summary.median, crate::median(data).unwrap());
        assert_eq!(summary.median_low, Number::from(2.5));
        assert_eq!(summary.median_high, Number::from(2.75));
        assert_eq!(summary.pvariance, crate::pvariance(data, None).unwrap());
        assert_eq!(summary.pstdev, pstdev(data, None).unwrap());
        assert_eq!(summary.variance, Some(variance(data, None).unwrap()));
        assert_eq!(summary.stdev, Some(stdev(data, None).unwrap()));
        assert_eq!(
            summary.quartiles,
            Some(crate::quartiles(data, QuartileScheme::Inclusive).unwrap())
        );
    }

    #[test]
    fn test_single_value_has_no_sample_statistics() {
        let summary = Summary::new([42]).unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.mean, Number::from(42));
        assert_eq!(summary.pvariance, Number::from(0));
        assert_eq!(summary.pvariance.kind(), NumericKind::Integer);
        assert_eq!(summary.variance, None);
        assert_eq!(summary.stdev, None);
        assert_eq!(summary.quartiles, None);
    }

    #[test]
    fn test_two_values_have_no_quartiles() {
        let summary = Summary::new([1, 2]).unwrap();
        assert_eq!(summary.variance, Some("1/2".parse().unwrap()));
        assert_eq!(summary.quartiles, None);
    }

    #[test]
    fn test_errors_propagate() {
        assert!(matches!(
            Summary::new(Vec::<Number>::new()),
            Err(StatisticsError::NotEnoughData { .. })
        ));
        let data = [Number::parse_decimal("0.5").unwrap(), Number::from(0.5)];
        assert!(matches!(
            Summary::new(data),
            Err(StatisticsError::MixedTypes(_))
        ));
    }

    #[test]
    #[should_panic(expected = "values must be sorted in ascending order")]
    fn test_from_sorted_rejects_unsorted_input() {
        let _ = Summary::from_sorted(&[Number::from(2), Number::from(1)]);
    }

    #[test]
    fn test_serialize() {
        let summary = Summary::new([1, 2, 4]).unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["count"], 3);
        assert_eq!(json["mean"], "7/3");
        assert_eq!(json["median"], 2);
        assert_eq!(json["quartiles"]["q1"], "3/2");
        assert!(json["stdev"].is_f64());
    }
}
