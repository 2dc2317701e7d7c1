pub mod save;
pub mod scan;

use anyhow::Context;
use gdal::vector::LayerAccess;

use crate::config::ExtractConfig;
use crate::geofile::gdal_geofile::open_vector_dataset;
use scan::{scan_layer, ScanReport};

/// Open the configured input geofile and extract every feature whose identifier field equals
/// `target` into `<output_dir>/<target>`.
pub fn extract_feature(config: &ExtractConfig, target: &str) -> anyhow::Result<ScanReport> {
    let dataset = open_vector_dataset(&config.input_path)?;
    let layer = dataset
        .layer(0)
        .with_context(|| format!("Reading first layer of {:?}", config.input_path))?;
    log::info!(
        "Opened layer {} of {:?} with {} features",
        layer.name(),
        config.input_path,
        layer.feature_count()
    );

    let spatial_ref = match layer.spatial_ref() {
        Ok(spatial_ref) => Some(spatial_ref),
        Err(err) => {
            log::warn!("Layer has no usable spatial ref, writing without one: {}", err);
            None
        }
    };
    scan_layer(
        &layer,
        spatial_ref.as_ref(),
        &config.id_field,
        target,
        &config.output_dir,
    )
}
