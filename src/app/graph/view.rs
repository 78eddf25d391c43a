use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{self, Align2, Color32, FontId, Rect, Sense, Stroke, Ui, Vec2, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::super::physics::step_physics;
use super::super::render_utils::{
    blend_color, dim_color, draw_background, edge_visible, label_font_size, node_radius,
    stroke_width, world_to_screen,
};
use super::super::{PhysicsConfig, RenderGraph, ViewModel};

const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
const HOVER_COLOR: Color32 = Color32::from_rgb(255, 164, 101);
const NEIGHBOR_COLOR: Color32 = Color32::from_rgb(241, 146, 94);
const MATCH_COLOR: Color32 = Color32::from_rgb(103, 196, 255);
const RING_COLOR: Color32 = Color32::from_rgb(170, 170, 170);
const LABEL_COLOR: Color32 = Color32::from_gray(238);

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl ViewModel {
    fn update_screen_space(rect: Rect, pan: Vec2, zoom: f32, cache: &mut RenderGraph) {
        cache.view_scratch.screen_positions.clear();
        cache.view_scratch.screen_radii.clear();
        cache
            .view_scratch
            .screen_positions
            .reserve(cache.nodes.len());
        cache.view_scratch.screen_radii.reserve(cache.nodes.len());

        for render_node in &cache.nodes {
            cache.view_scratch.screen_positions.push(world_to_screen(
                rect,
                pan,
                zoom,
                render_node.world_pos,
            ));
            // world-unit radius under semantic zoom, projected to screen;
            // the floor keeps far-out nodes hoverable
            cache
                .view_scratch
                .screen_radii
                .push((node_radius(render_node.size_radius, zoom) * zoom).max(2.5));
        }
    }

    fn cached_search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        if self.selected.is_some() {
            return None;
        }

        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.graph_revision == self.render_graph_revision
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let cache = self.graph_cache.as_ref()?;
        let matcher = SkimMatcherV2::default();
        let matches = cache
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let matched = fuzzy_match_score(&matcher, &node.title, query).is_some()
                    || fuzzy_match_score(&matcher, &node.code, query).is_some();
                matched.then_some(index)
            })
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(super::super::SearchMatchCache {
            query: query.to_owned(),
            graph_revision: self.render_graph_revision,
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        if self.graph_dirty {
            self.rebuild_render_graph();
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        let search_matches = self.cached_search_matches();
        let pan = self.pan;
        let zoom = self.zoom;
        let frame_delta_seconds = ui
            .ctx()
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);
        let physics = PhysicsConfig {
            charge_scale: self.physics_charge,
            spring_scale: self.physics_spring,
            gravity_scale: self.physics_gravity,
            velocity_damping: self.physics_velocity_damping,
            delta_seconds: frame_delta_seconds,
        };
        let selected_code = self.selected.clone();

        let Some(cache) = self.graph_cache.as_mut() else {
            self.visible_node_count = 0;
            self.visible_edge_count = 0;
            ui.label("No occupations matched the current filters.");
            return;
        };

        let mut physics_moving = false;
        if self.live_physics {
            physics_moving = step_physics(cache, physics);
        }

        if physics_moving || response.dragged() {
            ui.ctx().request_repaint();
        }

        Self::update_screen_space(rect, pan, zoom, cache);
        Self::visible_indices_into(
            rect,
            &cache.view_scratch.screen_positions,
            &cache.view_scratch.screen_radii,
            &mut cache.view_scratch.visible_indices,
        );
        self.visible_node_count = cache.view_scratch.visible_indices.len();

        let hovered = Self::hovered_index(
            ui,
            &cache.view_scratch.visible_indices,
            &cache.view_scratch.screen_positions,
            &cache.view_scratch.screen_radii,
        );

        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let hovered_index = hovered.map(|(index, _distance)| index);
        let selected_index = selected_code
            .as_deref()
            .and_then(|code| cache.index_by_code.get(code))
            .copied();
        let focus_index = hovered_index.or(selected_index);
        let focus_neighbors = focus_index.map(|index| {
            cache
                .neighbors
                .get(index)
                .map(|neighbors| neighbors.iter().copied().collect::<HashSet<_>>())
                .unwrap_or_default()
        });
        let match_active = search_matches
            .as_ref()
            .is_some_and(|matches| !matches.is_empty());

        // semantic-zoom attribute sizes, projected to screen pixels
        let edge_stroke = stroke_width(zoom) * zoom;
        let label_pixels = label_font_size(zoom) * zoom;

        let mut visible_edge_count = 0usize;
        for edge in &cache.edges {
            let start = cache.view_scratch.screen_positions[edge.source];
            let end = cache.view_scratch.screen_positions[edge.target];
            if !edge_visible(rect, start, end, 2.5) {
                continue;
            }

            let is_incident = focus_index
                .is_some_and(|index| edge.source == index || edge.target == index);
            let (width, color) = if is_incident {
                (edge_stroke * 1.8, NEIGHBOR_COLOR)
            } else if focus_index.is_some() {
                (edge_stroke, dim_color(edge.color, 0.45))
            } else {
                (edge_stroke, edge.color)
            };

            painter.line_segment([start, end], Stroke::new(width, color));
            visible_edge_count += 1;
        }
        self.visible_edge_count = visible_edge_count;

        for &index in &cache.view_scratch.visible_indices {
            let render_node = &cache.nodes[index];
            let position = cache.view_scratch.screen_positions[index];
            let radius = cache.view_scratch.screen_radii[index];

            let is_selected = selected_index == Some(index);
            let is_hovered = hovered_index == Some(index);
            let is_neighbor = focus_neighbors
                .as_ref()
                .is_some_and(|neighbors| neighbors.contains(&index));
            let is_match = search_matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&index));

            let color = if is_hovered {
                HOVER_COLOR
            } else if is_selected {
                blend_color(render_node.fill, SELECTED_COLOR, 0.72)
            } else if is_neighbor {
                blend_color(render_node.fill, NEIGHBOR_COLOR, 0.55)
            } else if is_match {
                blend_color(render_node.fill, MATCH_COLOR, 0.68)
            } else if focus_index.is_some() {
                dim_color(render_node.fill, 0.5)
            } else if match_active {
                dim_color(render_node.fill, 0.38)
            } else {
                render_node.fill
            };

            painter.circle_filled(position, radius, color);
            painter.circle_stroke(position, radius, Stroke::new(edge_stroke, RING_COLOR));

            let should_draw_label = is_selected
                || is_hovered
                || is_neighbor
                || (is_match && zoom > 0.35)
                || zoom > 1.35;
            if should_draw_label {
                painter.text(
                    position + vec2(radius + 4.0, 0.0),
                    Align2::LEFT_CENTER,
                    render_node.title.as_str(),
                    FontId::proportional(label_pixels),
                    LABEL_COLOR,
                );
            }
        }

        let mut pending_selection: Option<Option<String>> = None;
        let mut pending_center: Option<Vec2> = None;

        if let Some(index) = hovered_index {
            let render_node = &cache.nodes[index];
            let overlay = format!(
                "{}  |  {}  |  {} links",
                render_node.title,
                render_node.code,
                cache.neighbors.get(index).map_or(0, Vec::len)
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                overlay,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );

            // forward the hovered occupation to the details panel
            self.inspected = Some(render_node.code.clone());
        }

        if response.double_clicked() {
            if let Some(index) = hovered_index {
                pending_center = Some(cache.nodes[index].world_pos);
                pending_selection = Some(Some(cache.nodes[index].code.clone()));
            }
        } else if response.clicked_by(egui::PointerButton::Primary) {
            pending_selection =
                Some(hovered_index.map(|index| cache.nodes[index].code.clone()));
        }

        if let Some(selection) = pending_selection {
            self.set_selected(selection);
        }
        if let Some(world) = pending_center {
            self.center_on(world);
        }
    }
}
