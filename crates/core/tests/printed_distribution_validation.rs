//! Validation of printed-outcome distributions
//!
//! # Test Categories
//! 1. Reference scenarios (single bucket, boundary straddle, degenerate)
//! 2. Normalisation over seeded random intervals
//! 3. Proportionality of shares to sub-interval lengths
//! 4. End-to-end: display → range → distribution
//!
//! Run tests with: `cargo test --test printed_distribution_validation`

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use temp_rounding_core::{
    find_range, printed_distribution, printed_distribution_around, simulate_asos, simulate_metar,
    CalculatorConfig, CalculatorMode, Pipeline, PrintedDistribution, TemperatureUnit,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn assert_well_formed(d: &PrintedDistribution) {
    assert!(!d.outcomes.is_empty());
    assert_eq!(d.outcome_count, d.outcomes.len());
    assert_eq!(d.is_split, d.outcome_count > 1);
    let percent: u32 = d.outcomes.iter().map(|o| o.probability_percent).sum();
    assert_eq!(percent, 100, "percentages of {d} sum to {percent}");
    let share: f64 = d.outcomes.iter().map(|o| o.share).sum();
    assert_relative_eq!(share, 1.0, epsilon = 1e-9);
    assert!(d.outcomes.windows(2).all(|w| w[0].value < w[1].value));
}

// ============================================================================
// 1. REFERENCE SCENARIOS
// ============================================================================

#[test]
fn test_reading_inside_one_bucket_prints_once() {
    init_tracing();
    // 21.0°C ± 0.3°C never leaves the 21°C bucket
    let d = printed_distribution_around(21.0, 0.3, Pipeline::Metar).unwrap();
    assert_well_formed(&d);
    assert!(!d.is_split);
    assert_eq!(d.outcomes[0].value, 70);
    assert_eq!(d.outcomes[0].probability_percent, 100);
}

#[test]
fn test_reading_straddling_boundary_splits_in_two() {
    // [70.0, 71.0) crosses the 70.5°F boundary at its midpoint
    let d = printed_distribution(70.0, 71.0, Pipeline::Asos).unwrap();
    assert_well_formed(&d);
    assert!(d.is_split);
    assert_eq!(d.outcome_count, 2);
    assert_eq!(d.outcome(70).map(|o| o.probability_percent), Some(50));
    assert_eq!(d.outcome(72).map(|o| o.probability_percent), Some(50));
}

#[test]
fn test_zero_length_interval_matches_forward_simulation() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..500 {
        let f: f64 = rng.random_range(-49.0..149.0);
        let d = printed_distribution(f, f, Pipeline::Asos).unwrap();
        assert_eq!(d.outcome_count, 1);
        assert_eq!(d.outcomes[0].value, simulate_asos(f).displayed_f);
        assert_eq!(d.outcomes[0].probability_percent, 100);

        let c: f64 = rng.random_range(-45.0..65.0);
        let d = printed_distribution(c, c, Pipeline::Metar).unwrap();
        assert_eq!(d.outcomes[0].value, simulate_metar(c).displayed_f);
    }
}

// ============================================================================
// 2. NORMALISATION
// ============================================================================

#[test]
fn test_random_intervals_are_normalised() {
    let mut rng = StdRng::seed_from_u64(42);
    for pipeline in Pipeline::ALL {
        let (lo, hi) = match pipeline {
            Pipeline::Asos => (-49.0, 140.0),
            Pipeline::Metar => (-45.0, 60.0),
        };
        for _ in 0..1000 {
            let min: f64 = rng.random_range(lo..hi);
            let width: f64 = rng.random_range(0.0..5.0);
            let d = printed_distribution(min, min + width, pipeline).unwrap();
            assert_well_formed(&d);
        }
    }
}

// ============================================================================
// 3. PROPORTIONALITY
// ============================================================================

#[test]
fn test_shares_follow_sub_interval_lengths() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        // Straddle the 21.5°C boundary by a random amount on each side
        let below: f64 = rng.random_range(0.01..0.99);
        let above: f64 = rng.random_range(0.01..0.99);
        let d = printed_distribution(21.5 - below, 21.5 + above, Pipeline::Metar).unwrap();
        assert_well_formed(&d);
        assert_eq!(d.outcome_count, 2);
        let total = below + above;
        assert_relative_eq!(d.outcomes[0].share, below / total, epsilon = 1e-9);
        assert_relative_eq!(d.outcomes[1].share, above / total, epsilon = 1e-9);
    }
}

// ============================================================================
// 4. END TO END
// ============================================================================

#[test]
fn test_recovered_ranges_print_only_their_display() {
    for pipeline in Pipeline::ALL {
        for displayed in [-40, 0, 32, 50, 70, 100, 122] {
            let Ok(range) = find_range(displayed, pipeline) else {
                continue;
            };
            let d = range.printed_distribution().unwrap();
            assert!(!d.is_split, "{range} split into {d}");
            assert_eq!(d.outcomes[0].value, displayed);
        }
    }
}

#[test]
fn test_widened_range_can_print_neighbours() {
    // Widen the ASOS 70°F range by half a degree each side: shares 1/6, 2/3, 1/6
    // round to 17 + 67 + 17 = 101, so the largest bucket gives one percent back
    let range = find_range(70, Pipeline::Asos).unwrap();
    let d = printed_distribution(range.min_true - 0.5, range.max_true + 0.5, Pipeline::Asos)
        .unwrap();
    assert_well_formed(&d);
    assert_eq!(d.outcome_count, 3);
    assert_eq!(d.outcome(68).map(|o| o.probability_percent), Some(17));
    assert_eq!(d.outcome(70).map(|o| o.probability_percent), Some(66));
    assert_eq!(d.outcome(72).map(|o| o.probability_percent), Some(17));
}

#[test]
fn test_calculator_reading_mode() {
    // 69.7°F ± 1°F on ASOS reaches past 70.5°F
    let config = CalculatorConfig {
        pipeline: Pipeline::Asos,
        mode: CalculatorMode::FromReading,
        entry_unit: TemperatureUnit::Fahrenheit,
        value: 69.7,
        tolerance: 1.0,
        ..CalculatorConfig::default()
    };
    let report = config.evaluate().unwrap();
    assert_well_formed(&report.distribution);
    assert!(report.distribution.is_split);
    assert_eq!(report.trace.displayed, 70);
}
