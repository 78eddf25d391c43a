use std::collections::HashMap;

use eframe::egui::{Color32, Vec2, vec2};

use crate::onet::{Occupation, SimilarityLink};
use crate::util::stable_pair;

use super::super::physics::ALPHA_START;
use super::super::render_utils::{EDGE_COLOR, node_fill, size_radius};
use super::super::{PhysicsScratch, RenderGraph, RenderNode, ViewModel, ViewScratch};

pub(in crate::app) struct BuiltNetwork {
    pub(in crate::app) nodes: Vec<Occupation>,
    pub(in crate::app) edges: Vec<BuiltEdge>,
}

/// An edge of the built subgraph. Endpoints index into the built node
/// list, never into the raw occupation list.
#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct BuiltEdge {
    pub(in crate::app) source: usize,
    pub(in crate::app) target: usize,
    pub(in crate::app) weight: f32,
    pub(in crate::app) color: Color32,
}

/// Build the displayable subgraph from the raw dataset.
///
/// Node inclusion is decided first: with `hide_unrelated`, an occupation
/// is dropped when no raw link touches it at all. Incidence is counted
/// over the unfiltered, unthresholded link list, so the set of visible
/// nodes does not change as the threshold moves. Links are then kept when
/// their weight clears `similarity_threshold / 100` and both endpoints
/// survived, re-indexed against the built node list.
///
/// The threshold is not validated here; out-of-range values degenerate to
/// a full or empty edge set. Callers clamp at the configuration boundary.
pub(in crate::app) fn build_network(
    occupations: &[Occupation],
    links: &[SimilarityLink],
    similarity_threshold: f32,
    hide_unrelated: bool,
) -> BuiltNetwork {
    let mut incidence = vec![0usize; occupations.len()];
    for link in links {
        if let Some(count) = incidence.get_mut(link.source) {
            *count += 1;
        }
        if let Some(count) = incidence.get_mut(link.target) {
            *count += 1;
        }
    }

    let mut new_mapping: Vec<Option<usize>> = vec![None; occupations.len()];
    let mut nodes = Vec::with_capacity(occupations.len());
    for (index, occupation) in occupations.iter().enumerate() {
        if hide_unrelated && incidence[index] == 0 {
            continue;
        }
        new_mapping[index] = Some(nodes.len());
        nodes.push(occupation.clone());
    }

    let cutoff = similarity_threshold / 100.0;
    let mut edges = Vec::new();
    for link in links {
        if link.weight < cutoff {
            continue;
        }

        let source = new_mapping.get(link.source).copied().flatten();
        let target = new_mapping.get(link.target).copied().flatten();
        if let (Some(source), Some(target)) = (source, target) {
            edges.push(BuiltEdge {
                source,
                target,
                weight: link.weight,
                color: EDGE_COLOR,
            });
        }
    }

    BuiltNetwork { nodes, edges }
}

fn make_render_node(occupation: &Occupation, scatter: f32) -> RenderNode {
    let (jx, jy) = stable_pair(&occupation.code);

    RenderNode {
        code: occupation.code.clone(),
        title: occupation.title.clone(),
        world_pos: vec2(jx, jy) * scatter,
        velocity: Vec2::ZERO,
        size_radius: occupation.size.map(size_radius),
        fill: node_fill(occupation.color.as_deref(), &occupation.code),
    }
}

impl ViewModel {
    /// Full restart of the view: the previous render graph (simulation
    /// included) is discarded before the subgraph is rebuilt, so a
    /// superseded layout can never deliver another tick. Safe to call
    /// any number of times.
    pub(in crate::app) fn rebuild_render_graph(&mut self) {
        self.render_graph_revision = self.render_graph_revision.wrapping_add(1);
        self.search_match_cache = None;
        self.graph_cache = None;

        let network = build_network(
            &self.data.occupations,
            &self.data.links,
            self.similarity_threshold,
            self.hide_unrelated,
        );

        self.visible_node_count = network.nodes.len();
        self.visible_edge_count = network.edges.len();
        self.graph_dirty = false;

        if network.nodes.is_empty() {
            return;
        }

        let scatter = 40.0 * (network.nodes.len() as f32).sqrt();
        let mut index_by_code = HashMap::with_capacity(network.nodes.len());
        let nodes = network
            .nodes
            .iter()
            .enumerate()
            .map(|(index, occupation)| {
                index_by_code.insert(occupation.code.clone(), index);
                make_render_node(occupation, scatter)
            })
            .collect::<Vec<_>>();

        let mut neighbors = vec![Vec::new(); nodes.len()];
        for edge in &network.edges {
            neighbors[edge.source].push(edge.target);
            neighbors[edge.target].push(edge.source);
        }

        self.graph_cache = Some(RenderGraph {
            nodes,
            edges: network.edges,
            index_by_code,
            neighbors,
            alpha: ALPHA_START,
            physics_scratch: PhysicsScratch { forces: Vec::new() },
            view_scratch: ViewScratch {
                screen_positions: Vec::new(),
                screen_radii: Vec::new(),
                visible_indices: Vec::new(),
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::onet::OccupationData;

    use super::*;

    fn occupation(code: &str) -> Occupation {
        Occupation {
            code: code.to_string(),
            title: format!("Occupation {code}"),
            description: format!("Description for {code}"),
            size: None,
            color: None,
        }
    }

    fn link(source: usize, target: usize, weight: f32) -> SimilarityLink {
        SimilarityLink {
            source,
            target,
            weight,
            description: None,
        }
    }

    fn abc() -> Vec<Occupation> {
        vec![
            occupation("11-1011.00"),
            occupation("11-1021.00"),
            occupation("13-2011.01"),
        ]
    }

    fn edge_pairs(network: &BuiltNetwork) -> Vec<(usize, usize)> {
        network
            .edges
            .iter()
            .map(|edge| (edge.source, edge.target))
            .collect()
    }

    #[test]
    fn built_edges_never_dangle() {
        let occupations = abc();
        // includes raw links pointing outside the node list
        let links = vec![
            link(0, 1, 0.9),
            link(1, 2, 0.3),
            link(0, 17, 0.95),
            link(42, 2, 0.95),
        ];

        for threshold in [0.0, 25.0, 50.0, 100.0] {
            for hide_unrelated in [false, true] {
                let network = build_network(&occupations, &links, threshold, hide_unrelated);
                for edge in &network.edges {
                    assert!(edge.source < network.nodes.len());
                    assert!(edge.target < network.nodes.len());
                }
            }
        }
    }

    #[test]
    fn threshold_filtering_is_monotonic() {
        let occupations = abc();
        let links = vec![link(0, 1, 0.9), link(1, 2, 0.3), link(0, 2, 0.55)];

        let mut previous: Option<Vec<(usize, usize)>> = None;
        for threshold in [0.0, 30.0, 55.0, 90.0, 100.0] {
            let network = build_network(&occupations, &links, threshold, false);
            let pairs = edge_pairs(&network);
            if let Some(previous) = &previous {
                assert!(pairs.iter().all(|pair| previous.contains(pair)));
            }
            previous = Some(pairs);
        }
    }

    #[test]
    fn without_hiding_the_node_list_is_untouched() {
        let occupations = abc();
        let links = vec![link(0, 1, 0.9)];

        for threshold in [0.0, 50.0, 100.0] {
            let network = build_network(&occupations, &links, threshold, false);
            assert_eq!(network.nodes, occupations);
        }
    }

    #[test]
    fn hiding_drops_isolated_nodes_and_their_edges() {
        let occupations = vec![
            occupation("11-1011.00"),
            occupation("11-1021.00"),
            occupation("13-2011.01"),
            occupation("53-7121.00"), // no links touch this one
        ];
        let links = vec![link(0, 1, 0.9), link(1, 2, 0.3)];

        let network = build_network(&occupations, &links, 0.0, true);
        assert_eq!(network.nodes.len(), 3);
        assert!(network.nodes.iter().all(|node| node.code != "53-7121.00"));
        assert_eq!(edge_pairs(&network), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn hide_check_ignores_the_threshold() {
        // B-C is below the threshold, but C still counts as related
        // because incidence is taken over the raw link list.
        let occupations = abc();
        let links = vec![link(0, 1, 0.9), link(1, 2, 0.3)];

        let network = build_network(&occupations, &links, 50.0, true);
        assert_eq!(network.nodes.len(), 3);
        assert_eq!(edge_pairs(&network), vec![(0, 1)]);
    }

    #[test]
    fn worked_example_from_the_dataset_docs() {
        let occupations = abc();
        let links = vec![link(0, 1, 0.9), link(1, 2, 0.3)];

        let network = build_network(&occupations, &links, 50.0, false);
        assert_eq!(network.nodes.len(), 3);
        assert_eq!(edge_pairs(&network), vec![(0, 1)]);
        assert_eq!(network.edges[0].weight, 0.9);
    }

    #[test]
    fn boundary_thresholds_admit_and_reject_exactly() {
        let occupations = abc();
        let links = vec![link(0, 1, 1.0), link(1, 2, 0.0), link(0, 2, 0.5)];

        let all = build_network(&occupations, &links, 0.0, false);
        assert_eq!(all.edges.len(), 3);

        let exact = build_network(&occupations, &links, 100.0, false);
        assert_eq!(edge_pairs(&exact), vec![(0, 1)]);
    }

    #[test]
    fn out_of_range_thresholds_degenerate_quietly() {
        let occupations = abc();
        let links = vec![link(0, 1, 1.0), link(1, 2, 0.2)];

        assert!(build_network(&occupations, &links, 150.0, false).edges.is_empty());
        assert_eq!(build_network(&occupations, &links, -50.0, false).edges.len(), 2);
    }

    #[test]
    fn remap_preserves_original_order() {
        let occupations = vec![
            occupation("11-1011.00"),
            occupation("99-0000.00"), // isolated
            occupation("11-1021.00"),
            occupation("13-2011.01"),
        ];
        let links = vec![link(0, 2, 0.8), link(2, 3, 0.6)];

        let network = build_network(&occupations, &links, 0.0, true);
        let codes = network
            .nodes
            .iter()
            .map(|node| node.code.as_str())
            .collect::<Vec<_>>();
        assert_eq!(codes, vec!["11-1011.00", "11-1021.00", "13-2011.01"]);
        assert_eq!(edge_pairs(&network), vec![(0, 1), (1, 2)]);
    }

    fn test_data() -> OccupationData {
        let occupations = abc();
        let index_by_code: HashMap<String, usize> = occupations
            .iter()
            .enumerate()
            .map(|(index, occupation)| (occupation.code.clone(), index))
            .collect();

        OccupationData {
            occupations,
            links: vec![link(0, 1, 0.9), link(1, 2, 0.3)],
            index_by_code,
        }
    }

    #[test]
    fn restarting_twice_leaves_one_fresh_render_graph() {
        let mut model = ViewModel::new(test_data());

        model.rebuild_render_graph();
        let first_revision = model.render_graph_revision;
        assert!(model.graph_cache.is_some());

        // cool the simulation, then restart; the replacement must be fresh
        if let Some(cache) = model.graph_cache.as_mut() {
            cache.alpha = 0.0;
        }
        model.rebuild_render_graph();

        let cache = model.graph_cache.as_ref().expect("render graph exists");
        assert_eq!(cache.alpha, ALPHA_START);
        assert_eq!(cache.nodes.len(), 3);
        assert_eq!(model.render_graph_revision, first_revision + 1);
        assert!(!model.graph_dirty);
    }

    #[test]
    fn empty_build_clears_the_render_graph() {
        let mut model = ViewModel::new(OccupationData {
            occupations: vec![occupation("11-1011.00")],
            links: Vec::new(),
            index_by_code: HashMap::from([("11-1011.00".to_string(), 0)]),
        });
        model.hide_unrelated = true;

        model.rebuild_render_graph();
        assert!(model.graph_cache.is_none());
        assert_eq!(model.visible_node_count, 0);
        assert_eq!(model.visible_edge_count, 0);
    }
}
