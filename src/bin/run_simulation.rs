use clap::Parser;
use log::{error, info};
use oeesim::{validate_series, FactorySimulation, SimResult, SimulationConfig};
use std::path::PathBuf;
use std::process::ExitCode;

/// Simulate an hourly OEE series for a small plant and write it as CSV
#[derive(Parser, Debug)]
#[command(name = "run_simulation")]
#[command(version, about, long_about = None)]
struct Args {
    /// Output CSV path
    #[arg(default_value = "data/ultra_complex_OEE.csv")]
    output: PathBuf,

    /// Simulated hours
    #[arg(long, value_name = "N")]
    hours: Option<u64>,

    /// Random seed
    #[arg(long, value_name = "S")]
    seed: Option<u64>,

    /// Number of machines
    #[arg(long, value_name = "M")]
    machines: Option<usize>,

    /// Repair worker pool capacity
    #[arg(long, value_name = "W")]
    workers: Option<u32>,

    /// Hours a batch spends in work in progress
    #[arg(long, value_name = "L")]
    lag: Option<usize>,

    /// Check the series and write nothing if it has issues
    #[arg(long)]
    validate: bool,
}

impl Args {
    fn config(&self) -> SimulationConfig {
        let mut config = SimulationConfig::new();
        if let Some(hours) = self.hours {
            config = config.with_horizon(hours);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(machines) = self.machines {
            config = config.with_machine_count(machines);
        }
        if let Some(workers) = self.workers {
            config = config.with_worker_capacity(workers);
        }
        if let Some(lag) = self.lag {
            config = config.with_wip_lag(lag);
        }
        config
    }
}

/// Returns the number of validation issues found, zero when not validating
fn run(args: &Args) -> SimResult<usize> {
    let output = FactorySimulation::new(args.config())?.run()?;

    if args.validate {
        let issues = validate_series(&output.records);
        if !issues.is_empty() {
            for issue in &issues {
                error!("{}", issue);
            }
            return Ok(issues.len());
        }
        info!("Validation passed for {} rows", output.records.len());
    }

    output.write_csv(&args.output)?;
    Ok(0)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(issues) => {
            error!("Series failed validation with {} issues, nothing written", issues);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_library_config() {
        let args = Args::try_parse_from(["run_simulation"]).unwrap();
        assert_eq!(args.output, PathBuf::from("data/ultra_complex_OEE.csv"));
        assert!(!args.validate);
        assert_eq!(args.config(), SimulationConfig::new());
    }

    #[test]
    fn flags_override_config() {
        let args = Args::try_parse_from([
            "run_simulation",
            "out/series.csv",
            "--hours",
            "48",
            "--seed",
            "7",
            "--machines",
            "1",
            "--workers",
            "2",
            "--lag",
            "5",
            "--validate",
        ])
        .unwrap();
        assert_eq!(args.output, PathBuf::from("out/series.csv"));
        assert!(args.validate);
        let config = args.config();
        assert_eq!(config.horizon_hours, 48);
        assert_eq!(config.seed, 7);
        assert_eq!(config.machine_count, 1);
        assert_eq!(config.worker_capacity, 2);
        assert_eq!(config.wip_lag, 5);
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(Args::try_parse_from(["run_simulation", "--hours", "many"]).is_err());
        assert!(Args::try_parse_from(["run_simulation", "--bogus"]).is_err());
    }
}
