use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use temp_rounding_core::{
    find_range, find_range_from_celsius, printed_distribution, printed_distribution_around,
    simulate_asos, simulate_metar, CalculatorConfig, DomainBounds, Pipeline, PrintedDistribution,
    RangeTable, RoundingError, UncertaintyRange,
};

/// Temperature rounding explorer for ASOS and METAR reports
#[derive(Parser, Debug)]
#[command(name = "rounding-demo")]
#[command(about = "What true readings sit behind a published temperature, and what a reading could print as", long_about = None)]
struct Args {
    /// Reporting chain (asos, metar)
    #[arg(short, long, default_value = "asos")]
    pipeline: Pipeline,

    /// Published whole-degree Fahrenheit value to invert
    #[arg(short, long, allow_negative_numbers = true)]
    displayed: Option<i64>,

    /// Whole-degree Celsius intermediate to invert
    #[arg(short, long, allow_negative_numbers = true)]
    celsius: Option<i64>,

    /// Hypothetical true reading, in the chain's input unit (°F for ASOS, °C for METAR)
    #[arg(short, long, allow_negative_numbers = true)]
    reading: Option<f64>,

    /// Half-width of the interval around --reading
    #[arg(short, long, default_value_t = 0.5)]
    tolerance: f64,

    /// Lower bound of an explicit interval (use with --max)
    #[arg(long, allow_negative_numbers = true, requires = "max")]
    min: Option<f64>,

    /// Upper bound of an explicit interval (use with --min)
    #[arg(long, allow_negative_numbers = true, requires = "min")]
    max: Option<f64>,

    /// Print the range of every display from -50°F to 150°F
    #[arg(long)]
    table: bool,

    /// Evaluate a calculator state saved as JSON
    #[arg(long)]
    config: Option<PathBuf>,
}

fn print_range(range: &UncertaintyRange) {
    println!("{range}");
    let (lo, hi) = range.fahrenheit_bounds();
    println!("  in °F: {lo} to {hi} (width {:.1}°F)", range.width_fahrenheit());
    if range.is_ambiguous() {
        println!("  WARNING: more than one intermediate value: {:?}", range.intermediate_values);
    }
}

fn print_distribution(distribution: &PrintedDistribution) {
    if distribution.is_split {
        println!("Could print as {} values:", distribution.outcome_count);
    } else {
        println!("Prints as a single value:");
    }
    for outcome in &distribution.outcomes {
        let bar = "#".repeat((outcome.probability_percent / 2) as usize);
        println!("  {:>4}°F {:>3}% {bar}", outcome.value, outcome.probability_percent);
    }
}

fn print_table(pipeline: Pipeline) -> Result<(), RoundingError> {
    let table = RangeTable::build(pipeline, &DomainBounds::default())?;
    println!("=== {pipeline} range table ===\n");
    for entry in table.entries() {
        match &entry.range {
            Some(range) => println!("  {range}"),
            None => println!("  {pipeline} {}°F: never published", entry.displayed_f),
        }
    }
    println!("\n{} displays are never published", table.unreachable().len());
    Ok(())
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = args.pipeline;

    if let Some(path) = &args.config {
        let text = std::fs::read_to_string(path)?;
        let config: CalculatorConfig = serde_json::from_str(&text)?;
        println!("=== Calculator ({}) ===\n", path.display());
        let report = config.evaluate()?;
        if let Some(range) = &report.range {
            print_range(range);
        }
        println!("Trace: {}", report.trace);
        print_distribution(&report.distribution);
        return Ok(());
    }

    if args.table {
        print_table(pipeline)?;
        return Ok(());
    }

    let mut did_something = false;

    if let Some(displayed) = args.displayed {
        println!("=== {pipeline} display {displayed}°F ===\n");
        print_range(&find_range(displayed, pipeline)?);
        println!();
        did_something = true;
    }

    if let Some(celsius) = args.celsius {
        println!("=== {pipeline} through {celsius}°C ===\n");
        print_range(&find_range_from_celsius(celsius, pipeline)?);
        println!();
        did_something = true;
    }

    if let Some(reading) = args.reading {
        println!("=== {pipeline} reading {reading} ± {} ===\n", args.tolerance);
        println!("Trace: {}", pipeline.simulate(reading));
        print_distribution(&printed_distribution_around(reading, args.tolerance, pipeline)?);
        println!();
        did_something = true;
    }

    if let (Some(min), Some(max)) = (args.min, args.max) {
        println!("=== {pipeline} interval [{min}, {max}) ===\n");
        print_distribution(&printed_distribution(min, max, pipeline)?);
        println!();
        did_something = true;
    }

    if !did_something {
        println!("=== Reference readings ===\n");
        let asos = simulate_asos(69.7);
        println!(
            "ASOS 69.7°F -> {}°F -> {:.2}°C -> {}°C -> {:.1}°F -> {}°F",
            asos.rounded_f, asos.celsius_exact, asos.rounded_c, asos.fahrenheit_exact, asos.displayed_f
        );
        let metar = simulate_metar(20.7);
        println!(
            "METAR 20.7°C -> {}°C -> {:.1}°F -> {}°F\n",
            metar.rounded_c, metar.fahrenheit_exact, metar.displayed_f
        );
        for p in Pipeline::ALL {
            print_range(&find_range(70, p)?);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_argument_is_parsed() {
        let args = Args::try_parse_from(["demo-headless", "--pipeline", "METAR", "-d", "70"]).unwrap();
        assert_eq!(args.pipeline, Pipeline::Metar);
        assert_eq!(args.displayed, Some(70));

        let args = Args::try_parse_from(["demo-headless"]).unwrap();
        assert_eq!(args.pipeline, Pipeline::Asos);
    }

    #[test]
    fn test_unknown_pipeline_is_rejected() {
        let err = Args::try_parse_from(["demo-headless", "--pipeline", "synop"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(err.to_string().contains("expected asos or metar"));
    }
}
