//! Mauna Loa CO2: decomposition, correlograms and ARIMA models.

use clap::Parser;
use stat_quantlets::data::{read_co2_table, Co2Config, DEFAULT_CO2_URL};
use stat_quantlets::pipeline::{
    acf_and_pacf, fit_arima_models, get_co2_data, show_co2_data, PipelineConfig,
};
use stat_quantlets::Result;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "co2-timeseries")]
#[command(about = "Time series analysis of the Mauna Loa CO2 record", long_about = None)]
struct Cli {
    /// URL of the monthly table
    #[arg(short, long, default_value = DEFAULT_CO2_URL)]
    url: String,

    /// Read the table from a local file instead of fetching it
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Header lines to skip (default: every '#' line)
    #[arg(long)]
    skip_rows: Option<usize>,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Lags shown in the correlograms
    #[arg(long)]
    nlags: Option<usize>,

    /// Seed of the simulated series
    #[arg(short, long, default_value_t = 12345)]
    seed: u32,
}

fn run(cli: &Cli) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let mut config = PipelineConfig::default().with_seed(cli.seed);
    if let Some(nlags) = cli.nlags {
        config = config.with_nlags(nlags);
    }

    let table = match &cli.file {
        Some(path) => {
            let table = read_co2_table(path, cli.skip_rows)?;
            show_co2_data(&table, config.chart_width, &mut out)?;
            table
        }
        None => {
            let mut co2 = Co2Config::default()
                .with_url(cli.url.as_str())
                .with_timeout_secs(cli.timeout);
            if let Some(skip) = cli.skip_rows {
                co2 = co2.with_skip_rows(skip);
            }
            get_co2_data(&co2, &mut out)?
        }
    };

    let decomposition = acf_and_pacf(&table, &config, &mut out)?;
    fit_arima_models(&decomposition, &config, &mut out)?;
    out.flush()?;
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
