use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::{fs::read_to_string, path::Path, path::PathBuf};

pub const DEFAULT_INPUT_PATH: &str = "counties/counties.shp";
pub const DEFAULT_ID_FIELD: &str = "GEOID";

/// Where features are read from, which field identifies them, and where extracted features go.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    pub input_path: PathBuf,
    pub id_field: String,
    pub output_dir: PathBuf,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            id_field: DEFAULT_ID_FIELD.to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl ExtractConfig {
    pub fn from_yaml_str(contents: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(contents).context("Parsing config")
    }

    pub fn from_yaml_file(filepath: &Path) -> anyhow::Result<Self> {
        if !filepath.exists() {
            return Err(anyhow!("Config file {:?} not found", filepath));
        }
        let contents = read_to_string(filepath)?;
        Self::from_yaml_str(&contents).with_context(|| format!("Reading config {:?}", filepath))
    }
}
