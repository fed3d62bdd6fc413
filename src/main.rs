use std::env;
use std::path::PathBuf;

use anyhow::Result;

use freightprint::data::{self, DataError};
use freightprint::emissions::factors::FactorTable;
use freightprint::pipeline;

const USAGE: &str = "Usage: freightprint [--data-dir <dir>] [--output <file>] [--factors <file>] [--sample]";

struct Options {
    data_dir: PathBuf,
    output: Option<PathBuf>,
    factors: Option<PathBuf>,
    sample_only: bool,
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> Option<Options> {
        let mut options = Options {
            data_dir: PathBuf::from("data"),
            output: None,
            factors: None,
            sample_only: false,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data-dir" => options.data_dir = PathBuf::from(args.next()?),
                "--output" => options.output = Some(PathBuf::from(args.next()?)),
                "--factors" => options.factors = Some(PathBuf::from(args.next()?)),
                "--sample" => options.sample_only = true,
                _ => return None,
            }
        }

        Some(options)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let options = match Options::parse(env::args().skip(1)) {
        Some(options) => options,
        None => {
            eprintln!("{}", USAGE);
            std::process::exit(1);
        },
    };

    let factors = match &options.factors {
        Some(path) => data::load_factor_table(path)?,
        None => FactorTable::default(),
    };

    if !options.sample_only {
        match data::locate_inputs(&options.data_dir) {
            Ok(inputs) => {
                let (records, report) = pipeline::run_real(&inputs, &factors)?;
                println!("Loaded {} order lines from {}.", records.len(), options.data_dir.display());
                println!("{}", report.render());

                let output = options
                    .output
                    .unwrap_or_else(|| options.data_dir.join("detailed_report.csv"));
                data::export_records(&output, &records)?;
                println!("\nDetailed report saved to: {}", output.display());

                return Ok(());
            },
            Err(DataError::MissingFile(path)) => {
                println!("Data files not found ({}). Using sample data.", path.display());
            },
            Err(err) => return Err(err.into()),
        }
    }

    let (records, report) = pipeline::run_sample(&factors);
    println!("{}", report.render());

    let output = options
        .output
        .unwrap_or_else(|| PathBuf::from("co2_emissions_report.csv"));
    data::export_records(&output, &records)?;
    println!("\nResults exported to: {}", output.display());

    Ok(())
}
