mod cli;
mod commands;
mod formatting;
mod progress;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use commands::run_extract;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

/// Logs go to stderr so stdout stays parseable; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "dtc=info,dtc_lib=info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();
    let args = cli::parse();
    init_tracing(args.verbose);

    match args.command {
        Commands::Extract {
            crawl,
            styles_dir,
            categories,
            min_occurrences,
            output_dir,
            viewport,
            max_concurrent,
            format,
            output,
        } => {
            run_extract(
                &raw_args,
                args.config,
                args.verbose,
                crawl,
                styles_dir,
                categories,
                min_occurrences,
                output_dir,
                viewport,
                max_concurrent,
                format,
                output,
            )
            .await
        }
    }
}
