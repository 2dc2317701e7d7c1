use anyhow::{anyhow, Context};
use gdal::vector::OGRwkbGeometryType;
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use crate::geofile::{
    feature::SourceFeature,
    gdal_geofile::{write_feature_to_geofile, GdalDriverType, SingleFeatureOutput},
};

/// Output path for a matched identifier: the identifier itself, inside `output_dir`.
pub fn output_path_for_identifier(output_dir: &Path, identifier: &str) -> anyhow::Result<PathBuf> {
    let mut components = Path::new(identifier).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(output_dir.join(identifier)),
        _ => Err(anyhow!(
            "Identifier '{}' cannot be used as an output file name",
            identifier
        )),
    }
}

/// Remove whatever exists at `path`. The shapefile driver creates a directory for paths without
/// a `.shp` extension, so directories are removed recursively.
pub fn remove_existing_output(path: &Path) -> anyhow::Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err).with_context(|| format!("Inspecting {:?}", path)),
    };
    log::debug!("Removing existing output {:?}", path);
    let removed = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removed.with_context(|| format!("Removing existing output {:?}", path))
}

fn is_polygonal(geometry: &gdal::vector::Geometry) -> bool {
    let flat_type = unsafe { gdal_sys::OGR_GT_Flatten(geometry.geometry_type()) };
    flat_type == OGRwkbGeometryType::wkbPolygon || flat_type == OGRwkbGeometryType::wkbMultiPolygon
}

/// Save a single feature to a new polygon shapefile at `output_path`, replacing anything already
/// there. The layer is named after the last path component and uses `spatial_ref`. Features
/// without geometry are saved as null shapes.
pub fn save_feature(
    output_path: &Path,
    feature: &SourceFeature,
    source_defn: &gdal::vector::Defn,
    spatial_ref: Option<&gdal::spatial_ref::SpatialRef>,
) -> anyhow::Result<()> {
    if let Some(geometry) = feature.geometry() {
        if !is_polygonal(geometry) {
            return Err(anyhow!(
                "Feature {} has geometry type {}, which cannot be written to a polygon layer",
                feature.index,
                gdal::vector::geometry_type_to_name(geometry.geometry_type())
            ));
        }
    }

    let layer_name = output_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("Output path {:?} has no file name", output_path))?;

    remove_existing_output(output_path)?;
    write_feature_to_geofile(
        feature,
        source_defn,
        &SingleFeatureOutput {
            filepath: output_path,
            layer_name,
            crs: spatial_ref,
            layer_type: OGRwkbGeometryType::wkbPolygon,
            driver: GdalDriverType::EsriShapefile,
        },
    )
}
