extern crate log;
pub mod config;
pub mod extract;
pub mod geofile;
use crate::config::ExtractConfig;
use crate::extract::extract_feature;
use clap::Parser;
use std::path::PathBuf;

/// Extract the feature with a given identifier from a shapefile into its own shapefile.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Identifier of the feature to extract. The output shapefile is named after it.
    identifier: String,

    /// Path to an optional YAML config file overriding the input path, identifier field and
    /// output directory.
    #[arg(short, long)]
    config_filepath: Option<PathBuf>,
}

fn try_main(args: Args) -> anyhow::Result<()> {
    let config = match &args.config_filepath {
        Some(config_filepath) => ExtractConfig::from_yaml_file(config_filepath)?,
        None => ExtractConfig::default(),
    };
    log::debug!("{:?}", config);

    let report = extract_feature(&config, &args.identifier)?;
    log::info!(
        "Scanned {} features, {} matched",
        report.features_scanned,
        report.matched_indices.len()
    );
    if let Some(output_path) = report.output_path {
        log::info!("Wrote {:?}", output_path);
    }
    Ok(())
}

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => err.exit(),
    };
    if let Err(e) = try_main(args) {
        eprintln!("Error: {:?}", e);
        std::process::exit(1)
    }
}
