use std::fs;

use anyhow::{Context, Result};

use super::graph::OccupationData;
use super::parse::parse_dataset;

pub fn load_occupation_data(dataset_path: &str) -> Result<OccupationData> {
    let raw = fs::read_to_string(dataset_path)
        .with_context(|| format!("failed to read occupation dataset from {dataset_path}"))?;

    parse_dataset(&raw)
        .with_context(|| format!("failed to parse occupation dataset {dataset_path}"))
}
