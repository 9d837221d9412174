//! request-distributor command-line driver.
//!
//! Builds a router from configuration and either runs simulated traffic until
//! interrupted or submits a fixed batch and prints the outcomes as JSON.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;

use request_distributor::lifecycle::{self, signals, Shutdown};
use request_distributor::simulation::{submit_batch, RequestGenerator, SimulationDriver};
use request_distributor::{Method, RequestDraft};

#[derive(Parser)]
#[command(name = "request-distributor")]
#[command(about = "Round-robin request distributor with a stage pipeline", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate traffic until Ctrl-C (or --requests) and print a report
    Run {
        /// Stop after this many requests
        #[arg(short, long)]
        requests: Option<u64>,

        /// Override the delay between requests
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Print Prometheus exposition text after the report
        #[arg(long)]
        prometheus: bool,
    },
    /// Submit requests and print every outcome
    Submit {
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Fixed method; random when omitted
        #[arg(short, long)]
        method: Option<Method>,

        /// Fixed path; random when omitted
        #[arg(short, long)]
        path: Option<String>,

        /// Request ID; only valid when submitting a single request
        #[arg(long)]
        id: Option<String>,
    },
    /// List backends, optionally after submitting some requests
    Backends {
        #[arg(long, default_value_t = 0)]
        submit: usize,
    },
}

/// Reject argument combinations clap cannot express on its own.
fn check_args(cli: &Cli) -> Result<(), clap::Error> {
    match &cli.command {
        Commands::Submit {
            count,
            id: Some(_),
            ..
        } if *count != 1 => Err(Cli::command().error(
            ErrorKind::ArgumentConflict,
            "--id can only be used when --count is 1",
        )),
        _ => Ok(()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    if let Err(e) = check_args(&cli) {
        e.exit();
    }

    let runtime = lifecycle::initialize(cli.config.as_deref())?;
    let router = runtime.router.clone();
    let generator = RequestGenerator::from_config(&runtime.config.simulation);

    match cli.command {
        Commands::Run {
            requests,
            interval_ms,
            prometheus,
        } => {
            let shutdown = Shutdown::new();
            let mut driver = SimulationDriver::new(router.clone(), &runtime.config.simulation);
            if let Some(max) = requests {
                driver = driver.with_max_requests(max);
            }
            if let Some(ms) = interval_ms {
                driver = driver.with_interval(Duration::from_millis(ms));
            }

            tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));
            let report = driver.run(shutdown.subscribe()).await;
            println!("{}", serde_json::to_string_pretty(&report)?);

            if prometheus {
                match &runtime.prometheus {
                    Some(handle) => println!("{}", handle.render()),
                    None => eprintln!(
                        "Metrics recorder is disabled (observability.metrics_enabled = false)"
                    ),
                }
            }
        }
        Commands::Submit {
            count,
            method,
            path,
            id,
        } => {
            let outcomes: Vec<_> = if method.is_none() && path.is_none() && id.is_none() {
                submit_batch(&router, &generator, count)
            } else {
                (0..count)
                    .map(|_| {
                        let random = generator.generate();
                        let mut draft = RequestDraft::new(
                            method.unwrap_or(random.method),
                            path.clone().unwrap_or(random.path),
                        );
                        if let Some(id) = &id {
                            draft = draft.with_id(id.clone());
                        }
                        router.submit(draft)
                    })
                    .collect()
            };

            let output = json!({
                "outcomes": outcomes,
                "metrics": router.snapshot_metrics(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Backends { submit } => {
            submit_batch(&router, &generator, submit);
            println!("{}", serde_json::to_string_pretty(&router.list_backends())?);
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("request-distributor").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_id_with_single_request() {
        assert!(check_args(&parse(&["submit", "--id", "42"])).is_ok());
        assert!(check_args(&parse(&["submit", "-n", "1", "--id", "42"])).is_ok());
    }

    #[test]
    fn test_id_with_many_requests_is_rejected() {
        let err = check_args(&parse(&["submit", "-n", "3", "--id", "42"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_batch_without_id_is_accepted() {
        assert!(check_args(&parse(&["submit", "-n", "3"])).is_ok());
    }
}
