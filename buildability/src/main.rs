mod batch;
mod error;
mod options;
mod output;
mod progress;
mod report;
#[cfg(test)]
mod testing;

use anyhow::Error as AnyError;
use arcgis::ArcGis;
use batch::Summary;
use clap::Parser;
use log::info;
use options::{Cli, Format, Input};
use report::Analyzer;
use std::process::ExitCode;

fn main() -> Result<ExitCode, AnyError> {
    let cli = Cli::parse();
    let input = cli.input()?;

    env_logger::init();

    let gis = ArcGis::new(cli.service_config())?;
    let analyzer = Analyzer::new(&gis)
        .interval(cli.contour_interval())
        .dem_samples(cli.dem_samples());

    match input {
        Input::Single(query) => {
            let report = batch::run_one(&analyzer, &query, cli.csv.as_deref())?;
            match cli.format {
                Format::Table => print!("{}", output::report_table(&report)),
                Format::Json => println!("{}", output::report_json(&report)?),
            }
            Ok(ExitCode::SUCCESS)
        }
        Input::Batch(path) => {
            let addresses = batch::read_batch(&path)?;
            info!("{}: {} address(es)", path.display(), addresses.len());
            let pb = progress::bar(path.display().to_string(), addresses.len() as u64);
            let entries = batch::run(&analyzer, addresses, &pb);
            if let Some(csv) = &cli.csv {
                output::append_csv(csv, &entries)?;
            }
            match cli.format {
                Format::Table => print!("{}", output::batch_table(&entries)),
                Format::Json => println!("{}", output::batch_json(&entries)?),
            }
            let summary = Summary::of(&entries);
            if summary.failed > 0 {
                eprintln!(
                    "{} of {} entries failed",
                    summary.failed, summary.total
                );
            }
            Ok(summary.exit_code())
        }
    }
}
