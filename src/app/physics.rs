use eframe::egui::{Vec2, vec2};

use super::{PhysicsConfig, RenderGraph};

pub(super) const ALPHA_START: f32 = 1.0;
pub(super) const ALPHA_MIN: f32 = 0.004;
const ALPHA_DECAY: f32 = 0.987;

const CHARGE_STRENGTH: f32 = 5200.0;
const SPRING_STRENGTH: f32 = 0.08;
const GRAVITY_STRENGTH: f32 = 0.03;
const SOFTENING: f32 = 140.0;
const FORCE_INTO_VELOCITY: f32 = 0.06;
const MAX_SPEED: f32 = 26.0;

/// Preferred rest length for a similarity link. Stronger similarity pulls
/// the pair closer together.
pub(super) fn link_distance(weight: f32) -> f32 {
    40.0 + ((1.0 - weight.clamp(0.0, 1.0)) * 160.0)
}

/// Spring strength for a similarity link, scaled by its weight.
pub(super) fn link_strength(weight: f32) -> f32 {
    0.15 + (weight.clamp(0.0, 1.0) * 0.85)
}

/// Advance the simulation one tick. Returns false once the layout has
/// cooled to rest; a cooled graph delivers no further position updates
/// until its alpha is reset.
pub(super) fn step_physics(cache: &mut RenderGraph, config: PhysicsConfig) -> bool {
    let node_count = cache.nodes.len();
    if node_count < 2 || cache.alpha < ALPHA_MIN {
        return false;
    }

    let scratch = &mut cache.physics_scratch;
    scratch.forces.resize(node_count, Vec2::ZERO);
    scratch.forces.fill(Vec2::ZERO);
    let forces = &mut scratch.forces;

    let charge = CHARGE_STRENGTH * config.charge_scale.clamp(0.1, 3.0);
    let spring = SPRING_STRENGTH * config.spring_scale.clamp(0.1, 3.0);
    let gravity = GRAVITY_STRENGTH * config.gravity_scale.clamp(0.0, 3.0);
    let time_step_scale = (config.delta_seconds * 60.0).clamp(0.25, 3.0);
    let damping_factor = config.velocity_damping.clamp(0.6, 0.97).powf(time_step_scale);
    let alpha = cache.alpha;

    for from in 0..node_count {
        for to in (from + 1)..node_count {
            let delta = cache.nodes[from].world_pos - cache.nodes[to].world_pos;
            let distance_sq = delta.length_sq();
            let distance = distance_sq.sqrt();
            let direction = if distance > 0.0001 {
                delta / distance
            } else {
                let angle = ((from as f32) * 0.618_034 + (to as f32) * 0.414_214)
                    * std::f32::consts::TAU;
                vec2(angle.cos(), angle.sin())
            };

            let push = direction * (charge / (distance_sq + SOFTENING));
            forces[from] += push;
            forces[to] -= push;
        }
    }

    for edge in &cache.edges {
        if edge.source >= node_count || edge.target >= node_count || edge.source == edge.target {
            continue;
        }

        let delta = cache.nodes[edge.source].world_pos - cache.nodes[edge.target].world_pos;
        let distance_sq = delta.length_sq();
        if distance_sq <= 0.0001 * 0.0001 {
            continue;
        }
        let distance = distance_sq.sqrt();
        let direction = delta / distance;

        let displacement = distance - link_distance(edge.weight);
        let correction = direction * (displacement * spring * link_strength(edge.weight));

        forces[edge.source] -= correction;
        forces[edge.target] += correction;
    }

    for (index, force) in forces.iter_mut().enumerate().take(node_count) {
        *force -= cache.nodes[index].world_pos * gravity;
    }

    let max_speed_sq = MAX_SPEED * MAX_SPEED;
    for (index, force) in forces.iter().enumerate().take(node_count) {
        let mut velocity = (cache.nodes[index].velocity
            + (*force * (FORCE_INTO_VELOCITY * alpha * time_step_scale)))
            * damping_factor;

        let speed_sq = velocity.length_sq();
        if speed_sq > max_speed_sq {
            velocity *= MAX_SPEED / speed_sq.sqrt();
        }

        cache.nodes[index].velocity = velocity;
        cache.nodes[index].world_pos += velocity * time_step_scale;
    }

    let mut centroid = Vec2::ZERO;
    for node in &cache.nodes {
        centroid += node.world_pos;
    }
    centroid /= node_count as f32;
    if centroid.length_sq() > 0.000_001 {
        for node in &mut cache.nodes {
            node.world_pos -= centroid;
        }
    }

    cache.alpha = alpha * ALPHA_DECAY.powf(time_step_scale);
    true
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use eframe::egui::{Color32, Vec2, vec2};

    use super::super::{BuiltEdge, PhysicsScratch, RenderGraph, RenderNode, ViewScratch};
    use super::*;

    fn test_config() -> PhysicsConfig {
        PhysicsConfig {
            charge_scale: 1.0,
            spring_scale: 1.0,
            gravity_scale: 1.0,
            velocity_damping: 0.9,
            delta_seconds: 1.0 / 60.0,
        }
    }

    fn test_cache(positions: &[Vec2], edges: &[(usize, usize, f32)]) -> RenderGraph {
        let nodes = positions
            .iter()
            .enumerate()
            .map(|(index, position)| RenderNode {
                code: format!("11-10{index:02}.00"),
                title: format!("Occupation {index}"),
                world_pos: *position,
                velocity: Vec2::ZERO,
                size_radius: None,
                fill: Color32::WHITE,
            })
            .collect::<Vec<_>>();

        let mut neighbors = vec![Vec::new(); nodes.len()];
        let edges = edges
            .iter()
            .map(|&(source, target, weight)| {
                neighbors[source].push(target);
                neighbors[target].push(source);
                BuiltEdge {
                    source,
                    target,
                    weight,
                    color: Color32::GRAY,
                }
            })
            .collect();

        RenderGraph {
            nodes,
            edges,
            index_by_code: HashMap::new(),
            neighbors,
            alpha: ALPHA_START,
            physics_scratch: PhysicsScratch { forces: Vec::new() },
            view_scratch: ViewScratch {
                screen_positions: Vec::new(),
                screen_radii: Vec::new(),
                visible_indices: Vec::new(),
            },
        }
    }

    #[test]
    fn link_distance_shrinks_with_similarity() {
        assert_eq!(link_distance(1.0), 40.0);
        assert_eq!(link_distance(0.0), 200.0);
        assert!(link_distance(0.9) < link_distance(0.2));
        // out-of-range weights are clamped, not amplified
        assert_eq!(link_distance(7.0), 40.0);
    }

    #[test]
    fn link_strength_grows_with_similarity() {
        assert!(link_strength(0.9) > link_strength(0.1));
        assert!(link_strength(0.0) > 0.0);
        assert_eq!(link_strength(1.0), 1.0);
    }

    #[test]
    fn linked_nodes_pull_together() {
        let mut cache = test_cache(
            &[vec2(-200.0, 0.0), vec2(200.0, 0.0)],
            &[(0, 1, 0.9)],
        );

        for _ in 0..600 {
            if !step_physics(&mut cache, test_config()) {
                break;
            }
        }

        let separation = (cache.nodes[0].world_pos - cache.nodes[1].world_pos).length();
        assert!(separation < 300.0, "separation was {separation}");
        assert!(separation > 10.0, "separation collapsed to {separation}");
    }

    #[test]
    fn unlinked_nodes_push_apart() {
        let mut cache = test_cache(&[vec2(-2.5, 0.0), vec2(2.5, 0.0)], &[]);

        for _ in 0..600 {
            if !step_physics(&mut cache, test_config()) {
                break;
            }
        }

        let separation = (cache.nodes[0].world_pos - cache.nodes[1].world_pos).length();
        assert!(separation > 20.0, "separation was {separation}");
    }

    #[test]
    fn simulation_cools_to_rest() {
        let mut cache = test_cache(
            &[vec2(-80.0, 10.0), vec2(90.0, -20.0), vec2(5.0, 120.0)],
            &[(0, 1, 0.7), (1, 2, 0.4)],
        );

        let mut steps = 0;
        while step_physics(&mut cache, test_config()) {
            steps += 1;
            assert!(steps < 5000, "simulation never cooled");
        }

        assert!(cache.alpha < ALPHA_MIN);
        assert!(!step_physics(&mut cache, test_config()));
    }

    #[test]
    fn degenerate_graphs_do_not_tick() {
        let mut empty = test_cache(&[], &[]);
        assert!(!step_physics(&mut empty, test_config()));

        let mut single = test_cache(&[Vec2::ZERO], &[]);
        assert!(!step_physics(&mut single, test_config()));
    }
}
