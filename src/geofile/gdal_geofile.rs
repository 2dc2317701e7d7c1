use anyhow::{anyhow, Context};
use gdal::vector::LayerAccess;
use std::path::Path;

use super::feature::SourceFeature;

pub enum GdalDriverType {
    EsriShapefile,
}

impl GdalDriverType {
    pub fn name(&self) -> &'static str {
        match self {
            GdalDriverType::EsriShapefile => "ESRI Shapefile",
        }
    }
}

/// Open a file as a vector-only GDAL dataset.
pub fn open_vector_dataset(filepath: &Path) -> anyhow::Result<gdal::Dataset> {
    if !filepath.exists() {
        return Err(anyhow!("Input geofile {:?} not found", filepath));
    }
    gdal::DriverManager::register_all();
    let mut open_options = gdal::DatasetOptions::default();
    open_options.open_flags = gdal::GdalOpenFlags::GDAL_OF_VECTOR;
    gdal::Dataset::open_ex(filepath, open_options)
        .with_context(|| format!("Opening geofile {:?}", filepath))
}

/// Names of the fields defined on a layer, in definition order.
pub fn layer_field_names<L: LayerAccess>(layer: &L) -> Vec<String> {
    layer.defn().fields().map(|field| field.name()).collect()
}

/// Where and how a single feature is written.
pub struct SingleFeatureOutput<'a> {
    pub filepath: &'a Path,
    pub layer_name: &'a str,
    pub crs: Option<&'a gdal::spatial_ref::SpatialRef>,
    pub layer_type: gdal::vector::OGRwkbGeometryType::Type,
    pub driver: GdalDriverType,
}

/// Create a new dataset holding one layer with exactly one feature. The field definitions of the
/// source layer are copied to the new layer so that the feature keeps its attributes. A feature
/// without geometry is written as a null shape. The dataset is flushed and closed before
/// returning.
pub fn write_feature_to_geofile(
    feature: &SourceFeature,
    source_defn: &gdal::vector::Defn,
    output: &SingleFeatureOutput,
) -> anyhow::Result<()> {
    let driver = gdal::DriverManager::get_driver_by_name(output.driver.name())
        .context("Getting GDAL driver")?;

    if let Some(crs) = output.crs {
        log::debug!("Using spatial ref {} for writing geofile", crs.name()?);
    }

    let mut dataset = driver
        .create_vector_only(output.filepath)
        .with_context(|| format!("Creating geofile {:?}", output.filepath))?;
    {
        let layer_options = gdal::LayerOptions {
            name: output.layer_name,
            srs: output.crs,
            ty: output.layer_type,
            options: None,
        };
        let layer = dataset.create_layer(layer_options)?;

        for field in source_defn.fields() {
            let field_defn = gdal::vector::FieldDefn::new(&field.name(), field.field_type())?;
            field_defn.set_width(field.width());
            field_defn.set_precision(field.precision());
            field_defn.add_to_layer(&layer)?;
        }

        let mut new_feature = gdal::vector::Feature::new(layer.defn())?;
        match feature.geometry() {
            Some(geometry) => new_feature.set_geometry(geometry.clone())?,
            None => log::warn!("Feature {} has no geometry, writing a null shape", feature.index),
        }
        for (field_name, value) in feature.attributes() {
            new_feature.set_field(&field_name, &value)?;
        }
        new_feature
            .create(&layer)
            .with_context(|| format!("Writing feature {} to {:?}", feature.index, output.filepath))?;
    }
    // Dropping the dataset flushes it to disk.
    drop(dataset);
    Ok(())
}
