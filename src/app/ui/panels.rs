use eframe::egui::{self, Align, Context, Layout, Vec2};

use crate::onet::OccupationData;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn new(data: OccupationData) -> Self {
        Self {
            data,
            similarity_threshold: 50.0,
            hide_unrelated: false,
            search: String::new(),
            selected: None,
            inspected: None,
            pan: Vec2::ZERO,
            zoom: 1.0,
            live_physics: true,
            physics_charge: 1.0,
            physics_spring: 1.0,
            physics_gravity: 1.0,
            physics_velocity_damping: 0.9,
            graph_dirty: true,
            render_graph_revision: 0,
            graph_cache: None,
            search_match_cache: None,
            visible_node_count: 0,
            visible_edge_count: 0,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        dataset_path: &str,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        if self.graph_dirty {
            self.rebuild_render_graph();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("O*NET Neighbors");
                    ui.separator();
                    ui.label(format!("dataset: {dataset_path}"));
                    ui.label(format!("occupations: {}", self.data.occupation_count()));
                    ui.label(format!("similarity links: {}", self.data.link_count()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload dataset"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Restart layout").clicked() {
                        self.graph_dirty = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!(
                            "in view: {} occupations, {} links",
                            self.visible_node_count, self.visible_edge_count
                        ));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(330.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(360.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Loading occupation similarity network...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<String>) {
        if self.selected == selected {
            return;
        }

        self.selected = selected;
        self.search_match_cache = None;
    }
}
