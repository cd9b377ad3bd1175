//! Distribution of published outcomes over an interval of true readings
//!
//! A reporting chain is a non-decreasing step function of the reading. Its
//! only breakpoints are the `n + 0.5` crossings of the first rounding: every
//! later rounding acts on an exact function of that whole degree, so it
//! cannot split a first-rounding bucket. Cutting the interval at those
//! crossings gives one piece per whole degree, each with a single published
//! value. Assuming the true reading is uniform over the interval, each
//! published value's probability is its pieces' share of the total length.

use rustc_hash::{FxBuildHasher, FxHashMap};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::config::DomainBounds;
use crate::core_types::exact::round_half_up;
use crate::error::{Result, RoundingError};
use crate::pipeline::Pipeline;
use crate::range_finder::UncertaintyRange;

/// One value the interval could publish
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrintedOutcome {
    /// Published whole-degree Fahrenheit value
    pub value: i64,
    /// Whole-number percentage; all outcomes sum to exactly 100
    pub probability_percent: u32,
    /// Exact fraction of the interval length (0..=1)
    pub share: f64,
}

/// Every value an interval could publish, ascending by value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintedDistribution {
    /// Outcomes sorted ascending by value; never empty
    pub outcomes: Vec<PrintedOutcome>,
    /// More than one outcome is possible
    pub is_split: bool,
    /// Number of distinct outcomes
    pub outcome_count: usize,
}

impl PrintedDistribution {
    fn from_outcomes(outcomes: Vec<PrintedOutcome>) -> Self {
        let outcome_count = outcomes.len();
        Self {
            outcomes,
            is_split: outcome_count > 1,
            outcome_count,
        }
    }

    /// Most likely outcome (lowest value on a tie)
    pub fn most_likely(&self) -> Option<&PrintedOutcome> {
        self.outcomes
            .iter()
            .reduce(|best, o| if o.share > best.share { o } else { best })
    }

    /// Outcome for a published value, if possible
    pub fn outcome(&self, value: i64) -> Option<&PrintedOutcome> {
        self.outcomes.iter().find(|o| o.value == value)
    }
}

impl fmt::Display for PrintedDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, outcome) in self.outcomes.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{}°F {}%", outcome.value, outcome.probability_percent)?;
        }
        Ok(())
    }
}

impl UncertaintyRange {
    /// Re-propagate this range through its own chain
    ///
    /// # Errors
    /// Only if the range has been edited into an invalid interval.
    pub fn printed_distribution(&self) -> Result<PrintedDistribution> {
        distribute(self.min_true, self.max_true, self.pipeline)
    }
}

/// Distribution of published values for true readings uniform over
/// `[min_true, max_true)`, in the chain's input unit.
///
/// A zero-length interval is a single reading: one outcome at 100%.
///
/// # Errors
/// - [`RoundingError::NonFinite`] for NaN or infinite bounds
/// - [`RoundingError::OutOfRange`] if a bound is outside the default operating range
/// - [`RoundingError::InvalidInterval`] if `min_true > max_true`
pub fn printed_distribution(
    min_true: f64,
    max_true: f64,
    pipeline: Pipeline,
) -> Result<PrintedDistribution> {
    printed_distribution_with(&DomainBounds::default(), min_true, max_true, pipeline)
}

/// [`printed_distribution`] against explicit bounds
///
/// # Errors
/// See [`printed_distribution`].
pub fn printed_distribution_with(
    bounds: &DomainBounds,
    min_true: f64,
    max_true: f64,
    pipeline: Pipeline,
) -> Result<PrintedDistribution> {
    let unit = pipeline.input_unit();
    bounds.check(min_true, unit)?;
    bounds.check(max_true, unit)?;
    distribute(min_true, max_true, pipeline)
}

/// Distribution for the symmetric interval `[reading - tolerance, reading + tolerance)`
///
/// # Errors
/// See [`printed_distribution`]; a negative tolerance is an invalid interval.
pub fn printed_distribution_around(
    reading: f64,
    tolerance: f64,
    pipeline: Pipeline,
) -> Result<PrintedDistribution> {
    printed_distribution_around_with(&DomainBounds::default(), reading, tolerance, pipeline)
}

/// [`printed_distribution_around`] against explicit bounds
///
/// # Errors
/// See [`printed_distribution`].
pub fn printed_distribution_around_with(
    bounds: &DomainBounds,
    reading: f64,
    tolerance: f64,
    pipeline: Pipeline,
) -> Result<PrintedDistribution> {
    if !tolerance.is_finite() {
        return Err(RoundingError::NonFinite);
    }
    printed_distribution_with(bounds, reading - tolerance, reading + tolerance, pipeline)
}

fn distribute(min_true: f64, max_true: f64, pipeline: Pipeline) -> Result<PrintedDistribution> {
    if !min_true.is_finite() || !max_true.is_finite() {
        return Err(RoundingError::NonFinite);
    }
    if min_true > max_true {
        return Err(RoundingError::InvalidInterval {
            min: min_true,
            max: max_true,
        });
    }

    if min_true == max_true {
        return Ok(PrintedDistribution::from_outcomes(vec![PrintedOutcome {
            value: pipeline.display_for(min_true),
            probability_percent: 100,
            share: 1.0,
        }]));
    }

    // One piece per first-rounding bucket touched by the interval
    let first = round_half_up(min_true);
    let last = round_half_up(max_true);
    let mut lengths: FxHashMap<i64, f64> =
        FxHashMap::with_capacity_and_hasher(2, FxBuildHasher);
    for n in first..=last {
        let lo = min_true.max(n as f64 - 0.5);
        let hi = max_true.min(n as f64 + 0.5);
        if hi > lo {
            *lengths
                .entry(pipeline.display_for_rounded_input(n))
                .or_default() += hi - lo;
        }
    }

    let total = max_true - min_true;
    let mut outcomes: Vec<PrintedOutcome> = lengths
        .into_iter()
        .map(|(value, length)| PrintedOutcome {
            value,
            probability_percent: 0,
            share: length / total,
        })
        .collect();
    outcomes.sort_unstable_by_key(|o| o.value);
    assign_percentages(&mut outcomes);

    let distribution = PrintedDistribution::from_outcomes(outcomes);
    debug!(
        min_true,
        max_true,
        %pipeline,
        outcomes = distribution.outcome_count,
        "printed distribution: {distribution}"
    );
    Ok(distribution)
}

/// Round each share to a whole percent, then move the residual onto the
/// largest outcome so the total is exactly 100.
///
/// With many small outcomes the residual can exceed the largest bucket; in
/// that case percentages fall back to largest-remainder apportionment,
/// which also sums to 100 and never goes negative.
fn assign_percentages(outcomes: &mut [PrintedOutcome]) {
    let Some(largest) = largest_index(outcomes) else {
        return;
    };

    let rounded: Vec<i64> = outcomes
        .iter()
        .map(|o| round_half_up(o.share * 100.0))
        .collect();
    let residual = 100 - rounded.iter().sum::<i64>();
    if rounded[largest] + residual >= 0 {
        for (i, (outcome, percent)) in outcomes.iter_mut().zip(rounded).enumerate() {
            let percent = if i == largest { percent + residual } else { percent };
            outcome.probability_percent = percent.clamp(0, 100) as u32;
        }
        return;
    }

    let floors: Vec<i64> = outcomes
        .iter()
        .map(|o| (o.share * 100.0).floor() as i64)
        .collect();
    let mut remaining = 100 - floors.iter().sum::<i64>();
    let mut order: Vec<usize> = (0..outcomes.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = outcomes[a].share * 100.0 - floors[a] as f64;
        let rb = outcomes[b].share * 100.0 - floors[b] as f64;
        rb.total_cmp(&ra).then(a.cmp(&b))
    });
    for (i, floor) in floors.iter().enumerate() {
        outcomes[i].probability_percent = (*floor).clamp(0, 100) as u32;
    }
    for &i in order.iter().cycle() {
        if remaining <= 0 {
            break;
        }
        outcomes[i].probability_percent += 1;
        remaining -= 1;
    }
}

/// Index of the largest share, lowest index on a tie
fn largest_index(outcomes: &[PrintedOutcome]) -> Option<usize> {
    outcomes
        .iter()
        .enumerate()
        .reduce(|best, cur| if cur.1.share > best.1.share { cur } else { best })
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{simulate_asos, simulate_metar};
    use crate::range_finder::find_range;
    use approx::assert_relative_eq;

    fn percent_total(d: &PrintedDistribution) -> u32 {
        d.outcomes.iter().map(|o| o.probability_percent).sum()
    }

    #[test]
    fn test_straddling_interval_splits() {
        // 70.5°F is where ASOS jumps from 70 to 72
        let d = printed_distribution(69.2, 70.8, Pipeline::Asos).unwrap();
        assert!(d.is_split);
        assert_eq!(d.outcome_count, 2);
        assert_eq!(d.outcomes[0].value, 70);
        assert_eq!(d.outcomes[1].value, 72);
        assert_relative_eq!(d.outcomes[0].share, 1.3 / 1.6, epsilon = 1e-9);
        assert_relative_eq!(d.outcomes[1].share, 0.3 / 1.6, epsilon = 1e-9);
        assert_eq!(d.outcomes[0].probability_percent, 81);
        assert_eq!(d.outcomes[1].probability_percent, 19);
        assert_eq!(d.to_string(), "70°F 81% | 72°F 19%");
    }

    #[test]
    fn test_interval_inside_one_bucket() {
        let d = printed_distribution(69.6, 70.4, Pipeline::Asos).unwrap();
        assert!(!d.is_split);
        assert_eq!(d.outcome_count, 1);
        assert_eq!(d.outcomes[0].value, 70);
        assert_eq!(d.outcomes[0].probability_percent, 100);
    }

    #[test]
    fn test_recovered_range_never_splits() {
        for pipeline in Pipeline::ALL {
            let range = find_range(70, pipeline).unwrap();
            let d = range.printed_distribution().unwrap();
            assert!(!d.is_split);
            assert_eq!(d.outcomes[0].value, 70);
            assert_eq!(d.outcomes[0].probability_percent, 100);
        }
    }

    #[test]
    fn test_degenerate_interval() {
        let d = printed_distribution(69.7, 69.7, Pipeline::Asos).unwrap();
        assert_eq!(d.outcome_count, 1);
        assert_eq!(d.outcomes[0].value, simulate_asos(69.7).displayed_f);
        assert_eq!(d.outcomes[0].probability_percent, 100);

        let d = printed_distribution(20.5, 20.5, Pipeline::Metar).unwrap();
        assert_eq!(d.outcomes[0].value, simulate_metar(20.5).displayed_f);
    }

    #[test]
    fn test_many_outcomes() {
        // 60°F to 80°F spans eleven ASOS displays
        let d = printed_distribution(60.0, 80.0, Pipeline::Asos).unwrap();
        assert!(d.outcome_count > 2);
        assert_eq!(percent_total(&d), 100);
        assert!(d.outcomes.windows(2).all(|w| w[0].value < w[1].value));
        let share_total: f64 = d.outcomes.iter().map(|o| o.share).sum();
        assert_relative_eq!(share_total, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_full_domain_percentages_sum_to_100() {
        let d = printed_distribution(-50.0, 150.0, Pipeline::Asos).unwrap();
        assert_eq!(percent_total(&d), 100);
        let d = printed_distribution(-45.0, 65.0, Pipeline::Metar).unwrap();
        assert_eq!(percent_total(&d), 100);
    }

    #[test]
    fn test_residual_goes_to_largest_bucket() {
        // Shares 0.875 / 0.125 round to 88 + 13 = 101; the larger bucket gives one back
        let mut outcomes = vec![
            PrintedOutcome {
                value: 70,
                probability_percent: 0,
                share: 0.875,
            },
            PrintedOutcome {
                value: 72,
                probability_percent: 0,
                share: 0.125,
            },
        ];
        assign_percentages(&mut outcomes);
        assert_eq!(outcomes[0].probability_percent, 87);
        assert_eq!(outcomes[1].probability_percent, 13);
    }

    #[test]
    fn test_invalid_intervals() {
        assert!(matches!(
            printed_distribution(71.0, 70.0, Pipeline::Asos),
            Err(RoundingError::InvalidInterval { .. })
        ));
        assert_eq!(
            printed_distribution(f64::NAN, 70.0, Pipeline::Asos),
            Err(RoundingError::NonFinite)
        );
        assert!(matches!(
            printed_distribution(0.0, 70.0, Pipeline::Metar),
            Err(RoundingError::OutOfRange { .. })
        ));
        assert!(printed_distribution_around(21.0, -0.2, Pipeline::Metar).is_err());
    }

    #[test]
    fn test_around_reading() {
        // 21.4°C ± 0.2°C straddles the 21.5°C rounding boundary
        let d = printed_distribution_around(21.4, 0.2, Pipeline::Metar).unwrap();
        assert!(d.is_split);
        assert_eq!(d.outcome(70).map(|o| o.probability_percent), Some(75));
        assert_eq!(d.outcome(72).map(|o| o.probability_percent), Some(25));
        assert_eq!(d.most_likely().map(|o| o.value), Some(70));
    }
}
