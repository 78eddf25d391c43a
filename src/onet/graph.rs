use std::collections::HashMap;

/// One occupation record from the O*NET export. Identity is the SOC code;
/// records are never mutated after loading.
#[derive(Clone, Debug, PartialEq)]
pub struct Occupation {
    pub code: String,
    pub title: String,
    pub description: String,
    pub size: Option<f32>,
    pub color: Option<String>,
}

/// A raw similarity link between two occupations, indexing into the
/// unfiltered occupation list. Weight is in [0, 1] after loading.
#[derive(Clone, Debug, PartialEq)]
pub struct SimilarityLink {
    pub source: usize,
    pub target: usize,
    pub weight: f32,
    pub description: Option<String>,
}

#[derive(Clone, Debug)]
pub struct OccupationData {
    pub occupations: Vec<Occupation>,
    pub links: Vec<SimilarityLink>,
    pub index_by_code: HashMap<String, usize>,
}

impl OccupationData {
    pub fn occupation_count(&self) -> usize {
        self.occupations.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Min and max link weight across the dataset, None when there are no
    /// links.
    pub fn weight_range(&self) -> Option<(f32, f32)> {
        let mut range: Option<(f32, f32)> = None;
        for link in &self.links {
            range = Some(match range {
                Some((min, max)) => (min.min(link.weight), max.max(link.weight)),
                None => (link.weight, link.weight),
            });
        }
        range
    }

    /// Occupations linked to `index`, strongest similarity first.
    pub fn neighbors_of(&self, index: usize) -> Vec<(usize, f32)> {
        let mut neighbors = Vec::new();
        for link in &self.links {
            if link.source == index {
                neighbors.push((link.target, link.weight));
            } else if link.target == index {
                neighbors.push((link.source, link.weight));
            }
        }

        // collapse duplicate pairs onto their strongest link first
        neighbors.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.total_cmp(&a.1)));
        neighbors.dedup_by_key(|entry| entry.0);
        neighbors.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        neighbors
    }

    /// The strongest links in the dataset, weight descending.
    pub fn strongest_links(&self, limit: usize) -> Vec<&SimilarityLink> {
        let mut links = self.links.iter().collect::<Vec<_>>();
        links.sort_by(|a, b| {
            b.weight
                .total_cmp(&a.weight)
                .then_with(|| (a.source, a.target).cmp(&(b.source, b.target)))
        });
        links.truncate(limit);
        links
    }
}
