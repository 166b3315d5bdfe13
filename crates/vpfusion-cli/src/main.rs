use std::path::PathBuf;

use clap::Parser;
use vpfusion_core::config::Config;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Merge patent XML kind-code variants into provenance-annotated virtual
/// patents, driven by a priority list, through a two-phase worker pipeline.
#[derive(Parser, Debug)]
#[command(name = "vpfusion", about = "Virtual Patent Fusion Engine", version)]
struct Cli {
    /// TOML configuration file (key set and defaults described in DESIGN.md).
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: PathBuf,

    /// Override `patent_office` from the config file.
    #[arg(long)]
    office: Option<String>,

    /// Override `vertical_origin_path` from the config file.
    #[arg(short = 'i', long = "input", value_name = "DIR")]
    input: Option<PathBuf>,

    /// Override `destination_path` from the config file.
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    output: Option<PathBuf>,

    /// Override `output_formats` from the config file (repeatable: csv, xml, json).
    #[arg(long = "format", value_name = "FORMAT", action = clap::ArgAction::Append)]
    formats: Vec<String>,

    /// Override `batch_size` from the config file.
    #[arg(long)]
    batch_size: Option<usize>,

    /// Override `parse_lang` from the config file.
    #[arg(long = "parse-lang")]
    parse_lang: Option<String>,
}

fn apply_overrides(mut config: Config, cli: &Cli) -> Config {
    if let Some(office) = &cli.office {
        config.patent_office = office.clone();
    }
    if let Some(input) = &cli.input {
        config.vertical_origin_path = input.clone();
    }
    if let Some(output) = &cli.output {
        config.destination_path = output.clone();
    }
    if !cli.formats.is_empty() {
        config.output_formats = cli.formats.clone();
    }
    if let Some(batch_size) = cli.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(parse_lang) = &cli.parse_lang {
        config.parse_lang = parse_lang.clone();
    }
    config
}

fn main() {
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();

    let result = Config::load_toml(&cli.config)
        .map(|config| apply_overrides(config, &cli))
        .and_then(|config| {
            config.validate()?;
            Ok(config)
        })
        .and_then(vpfusion_cli::run);

    if let Err(err) = result {
        eprintln!("Error: {err}");
        tracing::error!("{err}");
        std::process::exit(1);
    }
}
