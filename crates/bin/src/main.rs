//! Euler CLI binary.
//!
//! Builds the security upload and attribute upload files from a data
//! directory.

mod config;

use clap::Parser;
use config::{Cli, RunConfig};
use euler::data::DataSource;
use std::fs;
use std::process;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    let config = RunConfig::from(cli);

    info!(
        data_dir = %config.data_dir.display(),
        countries = %config.pipeline.countries.join(", "),
        "Starting upload run"
    );

    let tables = DataSource::new(&config.data_dir).load_all()?;
    let output = euler::run(tables, &config.pipeline)?;

    // Both tables are rendered before either file is touched.
    let uploads = output.render()?;
    fs::create_dir_all(&config.output_dir)?;
    let [securities, attributes] = uploads.write_to(&config.output_dir, &config.operator)?;

    print!("{}", output.summary.to_ascii_table());
    println!("\nSecurity upload:  {}", securities.display());
    println!("Attribute upload: {}", attributes.display());

    if config.report_json {
        let report = output.write_report(&config.output_dir, &config.operator)?;
        println!("Run report:       {}", report.display());
    }

    Ok(())
}

/// Install the global subscriber. `RUST_LOG` applies unless `--verbose` is set.
fn init_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
