use std::process::ExitCode;

use clap::Parser;
use tally::cli::{self, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    let config = match cli::load_config(&args) {
        Ok(config) => config,
        Err(err) => {
            tally::init_with_filter(args.verbose.then_some("tally=debug"));
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let directive = if args.verbose {
        Some("tally=debug")
    } else {
        config.log_filter.as_deref()
    };
    tally::init_with_filter(directive);

    match cli::run(args, config).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
