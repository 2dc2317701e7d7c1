use anyhow::Context;
use gdal::vector::FieldValue;

/// A feature read from a source layer, together with the index it was read from.
pub struct SourceFeature<'a> {
    pub index: u64,
    pub feature: gdal::vector::Feature<'a>,
}

impl<'a> SourceFeature<'a> {
    pub fn new(index: u64, feature: gdal::vector::Feature<'a>) -> Self {
        Self { index, feature }
    }

    /// Read a field as identifier text. Null or unset values and non-string fields yield `None`.
    pub fn identifier(&self, field_name: &str) -> anyhow::Result<Option<String>> {
        let value = self
            .feature
            .field(field_name)
            .with_context(|| format!("Reading field {} of feature {}", field_name, self.index))?;
        Ok(value.and_then(field_value_as_identifier))
    }

    /// The feature's geometry, if it has one.
    pub fn geometry(&self) -> Option<&gdal::vector::Geometry> {
        // Feature::geometry panics on a null geometry, so look at the handle first.
        let geometry_ref = unsafe { gdal_sys::OGR_F_GetGeometryRef(self.feature.c_feature()) };
        if geometry_ref.is_null() {
            return None;
        }
        Some(self.feature.geometry())
    }

    /// All set attribute values of the feature, keyed by field name.
    pub fn attributes(&self) -> Vec<(String, FieldValue)> {
        self.feature
            .fields()
            .filter_map(|(name, value)| value.map(|value| (name, value)))
            .collect()
    }
}

pub fn field_value_as_identifier(value: FieldValue) -> Option<String> {
    match value {
        FieldValue::StringValue(value) => Some(value),
        _ => None,
    }
}
