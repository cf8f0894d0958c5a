use anyhow::Result;
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

use intersection_sim::export;
use intersection_sim::simulation::{
    run_simulation, ArrivalRates, CycleTime, Direction, Intersection, RateInput,
    SummaryStatistics, TrafficPatternProfile,
};

#[derive(Parser)]
#[command(name = "intersection_sim")]
#[command(about = "Traffic light simulation of a four-way intersection")]
struct Cli {
    /// Simulation duration in seconds
    #[arg(long, default_value = "3600")]
    duration: f64,

    /// Northbound arrival rate (vehicles/sec)
    #[arg(long, default_value = "0.05")]
    north_rate: f64,

    /// Southbound arrival rate (vehicles/sec)
    #[arg(long, default_value = "0.05")]
    south_rate: f64,

    /// Eastbound arrival rate (vehicles/sec)
    #[arg(long, default_value = "0.08")]
    east_rate: f64,

    /// Westbound arrival rate (vehicles/sec)
    #[arg(long, default_value = "0.07")]
    west_rate: f64,

    /// Green time of every phase in seconds
    #[arg(long, default_value = "30")]
    green: f64,

    /// Yellow time of every phase in seconds
    #[arg(long, default_value = "3")]
    yellow: f64,

    /// Simulated start time in seconds since midnight
    #[arg(long, default_value = "0")]
    start_time: f64,

    /// Scale the rates by time-of-day traffic patterns (rush hours, night)
    #[arg(long)]
    dynamic: bool,

    /// Seed for the random source
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Path to write summary metrics as JSON
    #[arg(long)]
    metrics_path: Option<PathBuf>,

    /// Path to write summary metrics as CSV
    #[arg(long)]
    csv_path: Option<PathBuf>,

    /// Print a histogram of waiting times with this many bins
    #[arg(long)]
    histogram: Option<usize>,

    /// Print final light states and lane queues along with the statistics
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let cycle_time = CycleTime::new(cli.green, cli.yellow)?;
    let intersection = Intersection::basic_four_way(cycle_time);

    let rates = ArrivalRates::new([
        (Direction::North, cli.north_rate),
        (Direction::South, cli.south_rate),
        (Direction::East, cli.east_rate),
        (Direction::West, cli.west_rate),
    ])?;
    let rate_input = if cli.dynamic {
        RateInput::from_parts(None, Some(TrafficPatternProfile::new(rates)))?
    } else {
        RateInput::from_parts(Some(rates), None)?
    };

    let simulation = run_simulation(
        cli.duration,
        &intersection,
        rate_input,
        cli.start_time,
        StdRng::seed_from_u64(cli.seed),
    )?;
    let stats = simulation.statistics();

    if cli.verbose {
        simulation.print_summary();
    } else {
        println!("{stats}");
    }

    if let Some(bins) = cli.histogram {
        print_histogram(stats, bins);
    }

    let snapshot = stats.snapshot();
    if let Some(path) = &cli.metrics_path {
        export::write_json(path, &snapshot)?;
        info!("Wrote JSON metrics to {}", path.display());
    }
    if let Some(path) = &cli.csv_path {
        export::write_csv(path, &snapshot)?;
        info!("Wrote CSV metrics to {}", path.display());
    }

    Ok(())
}

/// Render the wait-time histogram as a text bar chart
fn print_histogram(stats: &SummaryStatistics, bins: usize) {
    const BAR_WIDTH: usize = 50;

    let histogram = stats.histogram(bins);
    let Some(largest) = histogram.iter().map(|b| b.count).max().filter(|&c| c > 0) else {
        println!("\nNo departed vehicles to plot.");
        return;
    };

    println!("\n=== Waiting Time Histogram ===");
    for bin in &histogram {
        let bar = "#".repeat(bin.count * BAR_WIDTH / largest);
        println!(
            "{:>8.1} - {:>8.1} | {:<width$} {}",
            bin.lower,
            bin.upper,
            bar,
            bin.count,
            width = BAR_WIDTH
        );
    }
}
