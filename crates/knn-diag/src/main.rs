use std::process::ExitCode;

use knn_diag::{run, KnnError, KnnResult, RunConfig};
use tracing_subscriber::FmtSubscriber;

// Optional, read from the working directory next to the CSV files.
const CONFIG_FILE: &str = "knn-diag.json";

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> KnnResult<()> {
    let config = RunConfig::load_or_default(CONFIG_FILE)?;
    config.validate()?;

    // stdout carries only the accuracy lines
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.level()?)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| KnnError::Config(e.to_string()))?;

    // nothing is printed unless every k succeeded
    let report = run(&config)?;
    for result in &report {
        println!("{result}");
    }
    Ok(())
}
