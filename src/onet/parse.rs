use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use super::graph::{Occupation, OccupationData, SimilarityLink};

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawOccupation {
    #[serde(alias = "id")]
    pub(super) code: String,
    #[serde(default, alias = "label")]
    pub(super) title: String,
    #[serde(default, alias = "desc")]
    pub(super) description: String,
    #[serde(default)]
    pub(super) size: Option<f32>,
    #[serde(default)]
    pub(super) color: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawLink {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) weight: f32,
    #[serde(default, alias = "desc")]
    pub(super) description: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawDataset {
    #[serde(alias = "nodes")]
    occupations: Vec<RawOccupation>,
    #[serde(alias = "similarities")]
    links: Vec<RawLink>,
}

pub(super) fn parse_dataset(raw: &str) -> Result<OccupationData> {
    let dataset: RawDataset =
        serde_json::from_str(raw).context("invalid occupation dataset JSON")?;

    if dataset.occupations.is_empty() {
        return Err(anyhow!("occupation dataset contains no occupations"));
    }

    let mut occupations = Vec::with_capacity(dataset.occupations.len());
    let mut index_by_code = HashMap::with_capacity(dataset.occupations.len());

    for raw_occupation in dataset.occupations {
        if raw_occupation.code.is_empty()
            || index_by_code.contains_key(&raw_occupation.code)
        {
            continue;
        }

        let title = if raw_occupation.title.is_empty() {
            raw_occupation.code.clone()
        } else {
            raw_occupation.title
        };

        index_by_code.insert(raw_occupation.code.clone(), occupations.len());
        occupations.push(Occupation {
            code: raw_occupation.code,
            title,
            description: raw_occupation.description,
            size: raw_occupation.size.filter(|size| size.is_finite() && *size > 0.0),
            color: raw_occupation.color,
        });
    }

    if occupations.is_empty() {
        return Err(anyhow!("occupation dataset contains no usable occupations"));
    }

    let occupation_count = occupations.len();
    let links = dataset
        .links
        .into_iter()
        .filter(|link| {
            link.source != link.target
                && link.source < occupation_count
                && link.target < occupation_count
                && link.weight.is_finite()
        })
        .map(|link| SimilarityLink {
            source: link.source,
            target: link.target,
            weight: link.weight.clamp(0.0, 1.0),
            description: link.description,
        })
        .collect();

    Ok(OccupationData {
        occupations,
        links,
        index_by_code,
    })
}
