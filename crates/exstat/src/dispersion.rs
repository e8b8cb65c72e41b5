//! Measures of spread.
//!
//! All four functions share one computation: the sum of squared deviations
//! from a center, taken in the common kind of the data and the center, then
//! divided by `n` (population) or `n - 1` (sample). The standard deviations
//! take a square root of that quotient, which is exact only when the
//! variance is a perfect square.
//!
//! [`mad`] is the robust alternative: the median of absolute deviations from
//! the median.

use std::str::FromStr;

use crate::{
    StatisticsError, central,
    lattice::{self, Representation, with_representation},
    number::{Number, ParseNumberError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Divisor {
    /// Divide by `n`.
    Population,
    /// Divide by `n - 1` (Bessel's correction).
    Sample,
}

impl Divisor {
    fn required(self) -> usize {
        match self {
            Self::Population => 1,
            Self::Sample => 2,
        }
    }

    fn degrees_of_freedom(self, len: usize) -> usize {
        match self {
            Self::Population => len,
            Self::Sample => len - 1,
        }
    }
}

/// Returns the population variance of `data`.
///
/// When `mu` is given it is used as the center verbatim, without checking
/// that it is the mean of `data`.
///
/// # Examples
///
/// ```
/// use exstat::{Number, pvariance};
///
/// let data = [0.0, 0.25, 0.25, 1.25, 1.5, 1.75, 2.75, 3.25];
/// assert_eq!(pvariance(data, None).unwrap(), Number::from(1.25));
///
/// let m = Number::from(1.375);
/// assert_eq!(pvariance(data, Some(m)).unwrap(), Number::from(1.25));
/// ```
pub fn pvariance<I>(data: I, mu: Option<Number>) -> Result<Number, StatisticsError>
where
    I: IntoIterator,
    I::Item: Into<Number>,
{
    spread(
        &lattice::materialize(data),
        mu.as_ref(),
        Divisor::Population,
        Finish::Variance,
    )
}

/// Returns the sample variance of `data`, using `n - 1` as the divisor.
///
/// # Errors
///
/// Fails with [`StatisticsError::NotEnoughData`] on fewer than two values.
///
/// # Examples
///
/// ```
/// use exstat::{Number, variance};
///
/// let data = [2.75, 1.75, 1.25, 0.25, 0.5, 1.25, 3.5];
/// let v = variance(data, None).unwrap().to_f64();
/// assert!((v - 1.3720238095238095).abs() < 1e-15);
/// ```
pub fn variance<I>(data: I, xbar: Option<Number>) -> Result<Number, StatisticsError>
where
    I: IntoIterator,
    I::Item: Into<Number>,
{
    spread(
        &lattice::materialize(data),
        xbar.as_ref(),
        Divisor::Sample,
        Finish::Variance,
    )
}

/// Returns the population standard deviation of `data`.
///
/// # Examples
///
/// ```
/// use exstat::{Number, NumericKind, pstdev};
///
/// let s = pstdev([2, 4, 4, 4, 5, 5, 7, 9], None).unwrap();
/// assert_eq!(s.kind(), NumericKind::Integer);
/// assert_eq!(s, Number::from(2));
/// ```
pub fn pstdev<I>(data: I, mu: Option<Number>) -> Result<Number, StatisticsError>
where
    I: IntoIterator,
    I::Item: Into<Number>,
{
    spread(
        &lattice::materialize(data),
        mu.as_ref(),
        Divisor::Population,
        Finish::StandardDeviation,
    )
}

/// Returns the sample standard deviation of `data`.
///
/// # Errors
///
/// Fails with [`StatisticsError::NotEnoughData`] on fewer than two values.
pub fn stdev<I>(data: I, xbar: Option<Number>) -> Result<Number, StatisticsError>
where
    I: IntoIterator,
    I::Item: Into<Number>,
{
    spread(
        &lattice::materialize(data),
        xbar.as_ref(),
        Divisor::Sample,
        Finish::StandardDeviation,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Finish {
    Variance,
    StandardDeviation,
}

impl Finish {
    fn operation(self, divisor: Divisor) -> &'static str {
        match (self, divisor) {
            (Self::Variance, Divisor::Population) => "pvariance",
            (Self::Variance, Divisor::Sample) => "variance",
            (Self::StandardDeviation, Divisor::Population) => "pstdev",
            (Self::StandardDeviation, Divisor::Sample) => "stdev",
        }
    }
}

pub(crate) fn spread(
    data: &[Number],
    center: Option<&Number>,
    divisor: Divisor,
    finish: Finish,
) -> Result<Number, StatisticsError> {
    let operation = finish.operation(divisor);
    let required = divisor.required();
    if data.len() < required {
        return Err(StatisticsError::NotEnoughData {
            operation,
            required,
        });
    }

    let kind = lattice::require_kind(data.iter().chain(center), operation)?;
    with_representation!(kind, R => {
        let values = R::convert_all(data)?;
        let center = match center {
            Some(center) => R::convert(center)?,
            None => central::mean_in(&values)?,
        };
        let squares = sum_of_squares(&values, &center)?;
        let quotient = squares.div(&R::from_count(divisor.degrees_of_freedom(values.len()))?)?;
        Ok(match finish {
            Finish::Variance => quotient.into_number(kind),
            Finish::StandardDeviation => quotient.square_root(kind),
        })
    })
}

/// `Σ(x - center)²`, each difference taken before squaring.
fn sum_of_squares<R>(values: &[R], center: &R) -> Result<R, StatisticsError>
where
    R: Representation,
{
    let squares = values
        .iter()
        .map(|value| {
            let deviation = value.sub(center)?;
            deviation.mul(&deviation)
        })
        .collect::<Result<Vec<_>, _>>()?;
    R::total(squares)
}

/// Which middle value a median takes when the count is even.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MedianRule {
    /// Mean of the two middle values, as [`median`](crate::median).
    #[default]
    #[display("average")]
    Average,
    /// Lower middle value, as [`median_low`](crate::median_low).
    #[display("low")]
    Low,
    /// Higher middle value, as [`median_high`](crate::median_high).
    #[display("high")]
    High,
}

impl MedianRule {
    fn median_of_sorted(self, sorted: &[Number]) -> Result<Number, StatisticsError> {
        match self {
            Self::Average => central::median_of_sorted(sorted),
            Self::Low => central::median_low_of_sorted(sorted),
            Self::High => central::median_high_of_sorted(sorted),
        }
    }
}

impl FromStr for MedianRule {
    type Err = ParseMedianRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Average, Self::Low, Self::High]
            .into_iter()
            .find(|rule| rule.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseMedianRuleError { name: s.to_owned() })
    }
}

/// Error returned when parsing an unknown [`MedianRule`] name.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown median rule '{name}', expected average, low or high")]
pub struct ParseMedianRuleError {
    name: String,
}

/// Factor the median absolute deviation is multiplied by.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum MadScale {
    /// Raw median absolute deviation.
    #[default]
    Unscaled,
    /// Consistent estimator of the standard deviation for normal data.
    Normal,
    /// Consistent estimator of the standard deviation for uniform data.
    Uniform,
    /// Any other factor.
    Factor(Number),
}

impl MadScale {
    /// `1 / Φ⁻¹(3/4)` to four decimal places.
    pub const NORMAL: f64 = 1.4826;

    /// Returns `sqrt(4/3)`.
    #[must_use]
    pub fn uniform() -> f64 {
        (4.0_f64 / 3.0).sqrt()
    }

    fn factor(&self) -> Option<Number> {
        match self {
            Self::Unscaled => None,
            Self::Normal => Some(Number::Float(Self::NORMAL)),
            Self::Uniform => Some(Number::Float(Self::uniform())),
            Self::Factor(factor) => Some(factor.clone()),
        }
    }
}

/// Parses `none`, `normal` or `uniform` case-insensitively, or a numeric
/// factor.
impl FromStr for MadScale {
    type Err = ParseNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::Unscaled),
            "normal" => Ok(Self::Normal),
            "uniform" => Ok(Self::Uniform),
            _ => s.parse().map(Self::Factor),
        }
    }
}

/// Returns the median absolute deviation of `data`.
///
/// Deviations are taken from `center`, or from the median of `data` when it
/// is `None`. `rule` selects the middle value for both medians when the
/// count is even. The deviations are computed in the common kind of `data`
/// and `center`, and `scale` multiplies the result in the common kind of the
/// deviation and the factor.
///
/// # Errors
///
/// Fails on empty data, and when the data, the center or the factor mix
/// incompatible kinds.
///
/// # Examples
///
/// ```
/// use exstat::{MadScale, MedianRule, Number, mad};
///
/// let data = [0.5, 1.5, 3.25, 4.25, 6.25, 6.75];
/// let m = mad(data, None, MedianRule::Average, MadScale::Unscaled).unwrap();
/// assert_eq!(m, Number::from(2.375));
/// let m = mad(data, None, MedianRule::Low, MadScale::Unscaled).unwrap();
/// assert_eq!(m, Number::from(1.75));
/// ```
pub fn mad<I>(
    data: I,
    center: Option<Number>,
    rule: MedianRule,
    scale: MadScale,
) -> Result<Number, StatisticsError>
where
    I: IntoIterator,
    I::Item: Into<Number>,
{
    let sorted = lattice::materialize_sorted(data);
    if sorted.is_empty() {
        return Err(StatisticsError::NotEnoughData {
            operation: "mad",
            required: 1,
        });
    }
    let center = match center {
        Some(center) => center,
        None => rule.median_of_sorted(&sorted)?,
    };

    let kind = lattice::require_kind(sorted.iter().chain([&center]), "mad")?;
    let mut deviations = with_representation!(kind, R => {
        let center = R::convert(&center)?;
        sorted
            .iter()
            .map(|value| Ok(R::convert(value)?.sub(&center)?.abs().into_number(kind)))
            .collect::<Result<Vec<_>, StatisticsError>>()?
    });
    deviations.sort_by(Number::total_cmp);
    let deviation = rule.median_of_sorted(&deviations)?;

    let Some(factor) = scale.factor() else {
        return Ok(deviation);
    };
    let kind = lattice::require_kind([&deviation, &factor], "mad")?;
    with_representation!(kind, R => {
        Ok(R::convert(&deviation)?.mul(&R::convert(&factor)?)?.into_number(kind))
    })
}

#[cfg(test)]
mod tests {
    use num_rational::BigRational;
    use rand::{Rng as _, SeedableRng as _, seq::SliceRandom as _};
    use rand_pcg::Pcg64;

    use super::*;
    use crate::{NumericKind, mean};

    fn frac(numer: i64, denom: i64) -> Number {
        Number::Rational(BigRational::new(numer.into(), denom.into()))
    }

    fn decimals(literals: &[&str]) -> Vec<Number> {
        literals
            .iter()
            .map(|s| Number::parse_decimal(s).unwrap())
            .collect()
    }

    fn assert_close(actual: &Number, expected: f64) {
        assert!(
            (actual.to_f64() - expected).abs() < 1e-12,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_pvariance_of_floats_is_exact_for_dyadic_data() {
        let data = [0.0, 0.25, 0.25, 1.25, 1.5, 1.75, 2.75, 3.25];
        let pv = pvariance(data, None).unwrap();
        assert_eq!(pv.kind(), NumericKind::Float);
        assert_eq!(pv, Number::from(1.25));

        let v = variance(data, None).unwrap();
        assert_close(&v, pv.to_f64() * 8.0 / 7.0);
    }

    #[test]
    fn test_variance_of_decimals() {
        let data = decimals(&["27.5", "30.25", "30.25", "34.5", "41.75"]);
        let v = variance(data.clone(), None).unwrap();
        assert_eq!(v.kind(), NumericKind::Decimal);
        assert_eq!(v.to_string(), "31.01875");
        let pv = pvariance(data, None).unwrap();
        assert_eq!(pv.kind(), NumericKind::Decimal);
        assert_eq!(pv, frac(4963, 200));
    }

    #[test]
    fn test_variance_of_rationals() {
        let v = variance([frac(1, 6), frac(1, 2), frac(5, 3)], None).unwrap();
        assert_eq!(v.kind(), NumericKind::Rational);
        assert_eq!(v, frac(67, 108));

        let pv = pvariance([frac(1, 4), frac(5, 4), frac(1, 2)], None).unwrap();
        assert_eq!(pv, frac(13, 72));
    }

    #[test]
    fn test_pvariance_of_integers_reports_rational() {
        let pv = pvariance([1, 2, 2, 4, 4, 4, 5, 6], None).unwrap();
        assert_eq!(pv.kind(), NumericKind::Rational);
        assert_eq!(pv, frac(5, 2));

        let pv = pvariance([2, 4, 4, 4, 5, 5, 7, 9], None).unwrap();
        assert_eq!(pv.kind(), NumericKind::Integer);
        assert_eq!(pv, Number::from(4));
    }

    #[test]
    fn test_supplied_mean_gives_identical_result() {
        let mut rng = Pcg64::seed_from_u64(7);
        for _ in 0..50 {
            let len = rng.random_range(2..30);
            let data = (0..len)
                .map(|_| rng.random_range(-100.0..100.0))
                .collect::<Vec<f64>>();
            let m = mean(data.iter().copied()).unwrap();
            assert_eq!(
                pvariance(data.iter().copied(), Some(m.clone())).unwrap(),
                pvariance(data.iter().copied(), None).unwrap(),
                "data: {data:?}"
            );
            assert_eq!(
                variance(data.iter().copied(), Some(m)).unwrap(),
                variance(data.iter().copied(), None).unwrap(),
                "data: {data:?}"
            );
        }

        let data = [frac(1, 6), frac(1, 2), frac(5, 3)];
        assert_eq!(
            variance(data.clone(), Some(frac(7, 9))).unwrap(),
            variance(data, None).unwrap()
        );
    }

    #[test]
    fn test_supplied_center_is_not_validated() {
        // Deviations from 0 rather than from the mean 2.
        let pv = pvariance([1, 2, 3], Some(Number::from(0))).unwrap();
        assert_eq!(pv, frac(14, 3));
    }

    #[test]
    fn test_float_center_promotes_integer_data() {
        let pv = pvariance([1, 2, 3], Some(Number::from(2.0))).unwrap();
        assert_eq!(pv.kind(), NumericKind::Float);
        assert_close(&pv, 2.0 / 3.0);
    }

    #[test]
    fn test_decimal_center_with_float_data_is_rejected() {
        let center = Number::parse_decimal("1.5").unwrap();
        assert!(matches!(
            pvariance([1.0, 2.0], Some(center)),
            Err(StatisticsError::MixedTypes(_))
        ));
    }

    #[test]
    fn test_standard_deviations_of_floats() {
        let data = [1.5, 2.5, 2.5, 2.75, 3.25, 4.75];
        let s = stdev(data, None).unwrap();
        assert_eq!(s.kind(), NumericKind::Float);
        assert_close(&s, 1.081_087_415_521_982_7);
        assert_close(&pstdev(data, None).unwrap(), 0.986_893_273_527_251);
    }

    #[test]
    fn test_standard_deviation_stays_exact_for_perfect_squares() {
        let s = pstdev([2, 4, 4, 4, 5, 5, 7, 9], None).unwrap();
        assert_eq!(s.kind(), NumericKind::Integer);
        assert_eq!(s, Number::from(2));

        // variance 1/4
        let s = pstdev([frac(1, 2), frac(3, 2)], None).unwrap();
        assert_eq!(s.kind(), NumericKind::Rational);
        assert_eq!(s, frac(1, 2));

        let s = stdev([1, 2, 4], None).unwrap();
        assert_eq!(s.kind(), NumericKind::Float);
        assert_close(&s, (7.0_f64 / 3.0).sqrt());
    }

    #[test]
    fn test_standard_deviation_of_decimals() {
        let s = pstdev(decimals(&["1.5", "2.5"]), None).unwrap();
        assert_eq!(s.kind(), NumericKind::Decimal);
        assert_eq!(s, Number::from(0.5));

        let s = stdev(decimals(&["1.5", "2.5", "4.0"]), None).unwrap();
        assert_eq!(s.kind(), NumericKind::Float);
    }

    #[test]
    fn test_mad_is_shift_invariant() {
        let data = [-1.25, 0.5, 0.5, 1.75, 3.25, 4.5, 4.5, 6.25, 6.75, 9.75];
        for delta in [0.0, 100.0, 1e6, 1e9] {
            let shifted = data.iter().map(|x| x + delta);
            assert_eq!(
                mad(shifted, None, MedianRule::Average, MadScale::Unscaled).unwrap(),
                Number::from(2.625),
                "delta {delta}"
            );
        }
    }

    #[test]
    fn test_mad_with_supplied_median() {
        let mut rng = Pcg64::seed_from_u64(35);
        let datasets = [
            (0..35).collect::<Vec<i32>>(),
            (-17..53).step_by(7).collect(),
            (11..79).step_by(3).collect(),
        ];
        for mut data in datasets {
            let unscaled = |data: &[i32], center| {
                mad(data.iter().copied(), center, MedianRule::Average, MadScale::Unscaled).unwrap()
            };
            let expected = unscaled(&data, None);
            let m = central::median(data.iter().copied()).unwrap();
            data.shuffle(&mut rng);
            assert_eq!(unscaled(&data, Some(m)), expected, "{data:?}");
        }
    }

    #[test]
    fn test_mad_median_rule_for_even_counts() {
        let data = [0.5, 1.5, 3.25, 4.25, 6.25, 6.75];
        let cases = [
            (MedianRule::Average, 2.375),
            (MedianRule::Low, 1.75),
            (MedianRule::High, 2.5),
        ];
        for (rule, expected) in cases {
            assert_eq!(
                mad(data, None, rule, MadScale::Unscaled).unwrap(),
                Number::from(expected),
                "{rule}"
            );
        }
    }

    #[test]
    fn test_mad_median_rule_does_not_matter_for_odd_counts() {
        let mut rng = Pcg64::seed_from_u64(55);
        let data = (0..55)
            .map(|_| rng.random_range(42.0..65.0))
            .collect::<Vec<f64>>();
        let expected = mad(data.iter().copied(), None, MedianRule::Average, MadScale::Unscaled);
        for rule in [MedianRule::Low, MedianRule::High] {
            assert_eq!(
                mad(data.iter().copied(), None, rule, MadScale::Unscaled),
                expected
            );
        }
    }

    #[test]
    fn test_mad_scales() {
        let data = [0.5, 1.5, 3.25, 4.25, 6.25, 6.75];
        let scaled = |scale| mad(data, None, MedianRule::Average, scale).unwrap();
        assert_eq!(scaled(MadScale::Normal), Number::from(2.375 * 1.4826));
        assert_eq!(
            scaled(MadScale::Uniform),
            Number::from(2.375 * (4.0_f64 / 3.0).sqrt())
        );
        for factor in [-1.25, 0.0, 1.25, 4.5, 9.75] {
            assert_eq!(
                scaled(MadScale::Factor(Number::from(factor))),
                Number::from(2.375 * factor)
            );
        }
    }

    #[test]
    fn test_mad_of_integers_stays_exact() {
        let m = mad([1, 2, 3, 4, 100], None, MedianRule::Average, MadScale::Unscaled).unwrap();
        assert_eq!(m.kind(), NumericKind::Integer);
        assert_eq!(m, Number::from(1));

        // Median 3, deviations 1, 1, 2, 5.
        let m = mad([1, 2, 4, 8], None, MedianRule::Average, MadScale::Unscaled).unwrap();
        assert_eq!(m, frac(3, 2));

        let m = mad([1, 2, 4, 8], None, MedianRule::Average, MadScale::Normal).unwrap();
        assert_eq!(m.kind(), NumericKind::Float);
    }

    #[test]
    fn test_parse_mad_scale_and_rule() {
        for name in ["none", "None", "NONE"] {
            assert_eq!(name.parse::<MadScale>(), Ok(MadScale::Unscaled));
        }
        assert_eq!("Normal".parse::<MadScale>(), Ok(MadScale::Normal));
        assert_eq!("UNIFORM".parse::<MadScale>(), Ok(MadScale::Uniform));
        assert_eq!(
            "3/2".parse::<MadScale>(),
            Ok(MadScale::Factor(frac(3, 2)))
        );
        assert!("gaussian".parse::<MadScale>().is_err());

        assert_eq!("LOW".parse::<MedianRule>(), Ok(MedianRule::Low));
        assert_eq!("average".parse::<MedianRule>(), Ok(MedianRule::Average));
        assert!("middle".parse::<MedianRule>().is_err());
    }

    #[test]
    fn test_mad_empty_input() {
        assert_eq!(
            mad(Vec::<Number>::new(), Some(Number::from(0)), MedianRule::Average, MadScale::Unscaled),
            Err(StatisticsError::NotEnoughData {
                operation: "mad",
                required: 1
            })
        );
    }

    #[test]
    fn test_not_enough_data() {
        assert_eq!(
            pvariance(Vec::<Number>::new(), None),
            Err(StatisticsError::NotEnoughData {
                operation: "pvariance",
                required: 1
            })
        );
        assert!(matches!(
            pstdev(Vec::<Number>::new(), None),
            Err(StatisticsError::NotEnoughData { required: 1, .. })
        ));
        assert_eq!(
            variance([1.5], None),
            Err(StatisticsError::NotEnoughData {
                operation: "variance",
                required: 2
            })
        );
        assert!(matches!(
            stdev([3], None),
            Err(StatisticsError::NotEnoughData { required: 2, .. })
        ));
        assert_eq!(pvariance([3], None).unwrap(), Number::from(0));
    }
}
