mod cli;
mod cluster_linked;
mod cluster_te;
mod evidence;
mod evidence_keying;
mod globals;
mod gz_utils;
mod int_range;
mod key_worker_pool;
mod linked_call;
mod linked_output;
mod log_utils;
mod logger;
mod os_utils;
mod reference_te;
mod run_stats;
mod te_call;
mod te_output;

use std::{error, process};

use hhmmss::Hhmmss;
use log::info;

use crate::cli::Commands;
use crate::globals::{PROGRAM_NAME, PROGRAM_VERSION};
use crate::linked_call::run_linked_call;
use crate::logger::setup_output_dir_and_logger;
use crate::te_call::run_te_call;

fn run(settings: &cli::Settings) -> Result<(), Box<dyn error::Error>> {
    info!("Starting {PROGRAM_NAME} {PROGRAM_VERSION}");
    info!(
        "cmdline: {}",
        std::env::args().collect::<Vec<_>>().join(" ")
    );
    info!("Running on {} threads", settings.shared.thread_count);

    let start = std::time::Instant::now();

    match &settings.command {
        Commands::ClusterLinked(x) => {
            run_linked_call(&settings.shared, x)?;
        }
        Commands::ClusterTe(x) => {
            run_te_call(&settings.shared, x)?;
        }
    }

    info!(
        "{PROGRAM_NAME} completed. Total Runtime: {}",
        start.elapsed().hhmmssxxx()
    );
    Ok(())
}

fn main() {
    let settings = cli::validate_and_fix_settings(cli::parse_settings());

    // Setup logger, including creation of the output directory for the log file:
    setup_output_dir_and_logger(
        settings.get_output_dir(),
        settings.shared.clobber,
        settings.shared.debug,
    );

    if let Err(err) = run(&settings) {
        log::error!("{err}");
        process::exit(2);
    }
}
