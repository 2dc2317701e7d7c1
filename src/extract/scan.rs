use anyhow::anyhow;
use gdal::vector::LayerAccess;
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};

use super::save::{output_path_for_identifier, save_feature};
use crate::geofile::{feature::SourceFeature, gdal_geofile::layer_field_names};

/// What a scan over a layer did.
#[derive(Debug, Default, PartialEq)]
pub struct ScanReport {
    /// Features actually read; indices with no feature are not counted.
    pub features_scanned: u64,
    /// Indices of the features that matched, in scan order. Each was saved to `output_path`.
    pub matched_indices: Vec<u64>,
    pub output_path: Option<PathBuf>,
}

/// Scan all features of `layer` by index and save every one whose `id_field` equals `target`.
///
/// The scan always covers the full index range. Several matches are saved to the same path one
/// after the other, so the last match is what remains on disk.
pub fn scan_layer<L: LayerAccess>(
    layer: &L,
    spatial_ref: Option<&gdal::spatial_ref::SpatialRef>,
    id_field: &str,
    target: &str,
    output_dir: &Path,
) -> anyhow::Result<ScanReport> {
    if !layer_field_names(layer).iter().any(|name| name == id_field) {
        return Err(anyhow!(
            "Layer {} has no field named {}",
            layer.name(),
            id_field
        ));
    }

    let feature_count = layer.feature_count();
    log::info!("Scanning {} features for {} = {}", feature_count, id_field, target);

    let mut report = ScanReport::default();
    let bar = ProgressBar::new(feature_count);
    for index in 0..feature_count {
        bar.inc(1);
        let feature = match layer.feature(index) {
            Some(feature) => SourceFeature::new(index, feature),
            None => {
                log::debug!("No feature at index {}", index);
                continue;
            }
        };
        report.features_scanned += 1;
        if feature.identifier(id_field)?.as_deref() != Some(target) {
            continue;
        }

        let output_path = output_path_for_identifier(output_dir, target)?;
        log::info!("Feature {} matches, saving to {:?}", index, output_path);
        save_feature(&output_path, &feature, layer.defn(), spatial_ref)?;
        report.matched_indices.push(index);
        report.output_path = Some(output_path);
    }
    bar.finish_and_clear();

    match report.matched_indices.len() {
        0 => log::warn!("No feature with {} = {} found", id_field, target),
        1 => {}
        n => log::warn!(
            "{} features with {} = {}, the last one overwrote the others",
            n,
            id_field,
            target
        ),
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use gdal::vector::{FieldValue, LayerAccess};
    use rstest::rstest;
    use testdir::testdir;

    use super::scan_layer;
    use crate::geofile::gdal_geofile::{
        open_vector_dataset,
        test_utils::{county_fixtures, write_polygon_fixture, FixtureFeature},
    };

    #[rstest]
    #[case("06037", vec![0])]
    #[case("06111", vec![2])]
    #[case("99999", vec![])]
    #[case("6037", vec![])]
    fn test_scan_matches(#[case] target: &str, #[case] expected_indices: Vec<u64>) {
        let test_dir = testdir!();
        let source_filepath = write_polygon_fixture(&test_dir, "counties", &county_fixtures());
        let source = open_vector_dataset(&source_filepath).unwrap();
        let layer = source.layer(0).unwrap();
        let spatial_ref = layer.spatial_ref().ok();

        let report =
            scan_layer(&layer, spatial_ref.as_ref(), "GEOID", target, &test_dir).unwrap();
        assert_eq!(report.features_scanned, 3);
        assert_eq!(report.matched_indices, expected_indices);
        assert_eq!(test_dir.join(target).exists(), !expected_indices.is_empty());
    }

    #[rstest]
    fn test_scan_does_not_stop_at_first_match() {
        let test_dir = testdir!();
        let mut features = county_fixtures();
        features.push(FixtureFeature {
            geoid: Some("06037"),
            name: "Los Angeles (duplicate)",
            aland: 1,
            wkt: Some("POLYGON ((0 0,1 0,1 1,0 1,0 0))"),
        });
        let source_filepath = write_polygon_fixture(&test_dir, "counties", &features);
        let source = open_vector_dataset(&source_filepath).unwrap();
        let layer = source.layer(0).unwrap();

        let output_dir = test_dir.join("out");
        std::fs::create_dir(&output_dir).unwrap();
        let report = scan_layer(&layer, None, "GEOID", "06037", &output_dir).unwrap();
        assert_eq!(report.features_scanned, 4);
        assert_eq!(report.matched_indices, vec![0, 3]);

        let output = open_vector_dataset(&output_dir.join("06037")).unwrap();
        let output_layer = output.layer(0).unwrap();
        assert_eq!(output_layer.feature_count(), 1);
        assert_eq!(
            output_layer.feature(0).unwrap().field("NAME").unwrap(),
            Some(FieldValue::StringValue("Los Angeles (duplicate)".to_string()))
        );
    }

    #[rstest]
    #[case("")]
    #[case("06059")]
    fn test_scan_skips_unset_identifier(#[case] target: &str) {
        let test_dir = testdir!();
        let mut features = county_fixtures();
        features.push(FixtureFeature {
            geoid: None,
            name: "Unassigned",
            aland: 0,
            wkt: Some("POLYGON ((0 0,1 0,1 1,0 1,0 0))"),
        });
        let source_filepath = write_polygon_fixture(&test_dir, "counties", &features);
        let source = open_vector_dataset(&source_filepath).unwrap();
        let layer = source.layer(0).unwrap();

        let output_dir = test_dir.join("out");
        std::fs::create_dir(&output_dir).unwrap();
        let report = scan_layer(&layer, None, "GEOID", target, &output_dir).unwrap();
        assert_eq!(report.features_scanned, 4);
        assert!(!report.matched_indices.contains(&3));
        if target.is_empty() {
            assert!(report.matched_indices.is_empty());
            assert_eq!(std::fs::read_dir(&output_dir).unwrap().count(), 0);
        } else {
            assert_eq!(report.matched_indices, vec![1]);
        }
    }

    #[rstest]
    fn test_scan_unknown_field() {
        let test_dir = testdir!();
        let source_filepath = write_polygon_fixture(&test_dir, "counties", &county_fixtures());
        let source = open_vector_dataset(&source_filepath).unwrap();
        let layer = source.layer(0).unwrap();

        let result = scan_layer(&layer, None, "COUNTYFP", "037", &test_dir);
        assert!(result.is_err());
    }
}
