//! Virtual Patent Fusion Engine command-line interface: wires configuration,
//! environment validation and the two-phase pipeline together, and logs a
//! configuration, environment and run summary at each stage.

pub mod pipeline;
pub mod progress;
pub mod system;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};
use vpfusion_core::config::Config;
use vpfusion_error::{Error, Result};

pub fn run(config: Config) -> Result<()> {
    log_configuration(&config);

    let env = system::probe();
    let (cpu_count, chunk_size) = system::validate_parallel_config(&config, &env)?;

    let cancelled = Arc::new(AtomicBool::new(false));
    let handler_flag = cancelled.clone();
    ctrlc::set_handler(move || {
        warn!("Ctrl+C received, finishing in-flight work before stopping");
        handler_flag.store(true, Ordering::Relaxed);
    })
    .map_err(|err| Error::unexpected(err.to_string()).with_operation("cli::set_ctrlc_handler"))?;

    let summary = pipeline::run(&config, cpu_count, chunk_size, cancelled)?;
    log_summary(&summary);
    Ok(())
}

fn log_configuration(config: &Config) {
    info!(
        "configuration: office={} input={} output={} formats={:?} batch_size={} max_text_length={} parse_lang={}",
        config.patent_office,
        config.vertical_origin_path.display(),
        config.destination_path.display(),
        config.output_formats,
        config.batch_size,
        config.max_text_length,
        config.parse_lang,
    );
}

fn log_summary(summary: &pipeline::RunSummary) {
    info!(
        "run complete: {} file(s) scanned across {} directories, {} patent(s) produced, {} merged, {} unparseable file(s), {:.2}s elapsed",
        summary.files_scanned,
        summary.directories_scanned,
        summary.patents_produced,
        summary.merged_patents,
        summary.unparseable_file_count,
        summary.elapsed_seconds,
    );
}
