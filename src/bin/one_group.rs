//! One-group mean tests: t-test, Wilcoxon, power and the normal approximation.

use clap::Parser;
use stat_quantlets::hypothesis::{
    check_mean, compare_with_normal, explain_power, OneGroupConfig, PowerConfig,
};
use stat_quantlets::Result;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "one-group")]
#[command(about = "Compare the mean of one group with a fixed value", long_about = None)]
struct Cli {
    /// Data file (comma or whitespace separated)
    #[arg(short, long, default_value = "data/altman_91.txt")]
    input: PathBuf,

    /// Value the mean is compared with
    #[arg(short, long, default_value_t = 7725.0)]
    check_value: f64,

    /// Confidence level of the interval
    #[arg(long, default_value_t = 0.95)]
    confidence: f64,

    /// Significance level
    #[arg(short, long, default_value_t = 0.05)]
    alpha: f64,

    /// Seed of the simulated sample used for power analysis
    #[arg(short, long, default_value_t = 12345)]
    seed: u32,
}

fn run(cli: &Cli) -> Result<()> {
    let config = OneGroupConfig::default()
        .with_path(cli.input.clone())
        .with_check_value(cli.check_value)
        .with_confidence(cli.confidence)
        .with_alpha(cli.alpha);
    let report = check_mean(&config)?;
    print!("{}", report);
    println!();

    let power_config = PowerConfig::default()
        .with_seed(cli.seed)
        .with_alpha(cli.alpha);
    let power = explain_power(&power_config)?;
    println!("{}", power);

    let comparison = compare_with_normal(&power_config)?;
    print!("{}", comparison);
    Ok(())
}

fn main() -> ExitCode {
    stat_quantlets::logging::init("info");
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
