use eframe::egui::{self, Ui};

use super::super::ViewModel;
use super::super::physics::ALPHA_START;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Network filters");
        ui.add_space(6.0);

        let mut changed = false;

        let threshold_slider = ui
            .add(
                egui::Slider::new(&mut self.similarity_threshold, 0.0..=100.0)
                    .step_by(1.0)
                    .text("Similarity threshold")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Hide similarity links weaker than this percentage.");
        changed |= threshold_slider.changed();
        ui.label(format!(
            "Showing links at {:.0}% similarity or above",
            self.similarity_threshold.round()
        ));

        changed |= ui
            .checkbox(&mut self.hide_unrelated, "Hide unrelated occupations")
            .on_hover_text(
                "Drop occupations that no similarity link touches at all. \
                 Links below the threshold still count as related.",
            )
            .changed();

        if let Some((min, max)) = self.data.weight_range() {
            ui.small(format!(
                "Dataset similarity range: {:.0}% - {:.0}%",
                min * 100.0,
                max * 100.0
            ));
        }

        if changed {
            self.similarity_threshold = self.similarity_threshold.clamp(0.0, 100.0);
            self.graph_dirty = true;
        }

        ui.separator();

        ui.label("Search occupations");
        ui.text_edit_singleline(&mut self.search)
            .on_hover_text("Fuzzy match on occupation titles and SOC codes.");

        ui.separator();

        ui.checkbox(&mut self.live_physics, "Live physics simulation")
            .on_hover_text("Continuously simulate layout forces while viewing the graph.");

        if ui
            .button("Reheat layout")
            .on_hover_text("Restore full simulation energy without rebuilding the graph.")
            .clicked()
            && let Some(cache) = self.graph_cache.as_mut()
        {
            cache.alpha = ALPHA_START;
        }

        ui.collapsing("Physics tuning", |ui| {
            ui.add(
                egui::Slider::new(&mut self.physics_charge, 0.1..=3.0)
                    .text("Repulsion")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("How strongly occupations push away from each other.");

            ui.add(
                egui::Slider::new(&mut self.physics_spring, 0.1..=3.0)
                    .text("Link spring")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("How strongly linked occupations pull toward their rest distance.");

            ui.add(
                egui::Slider::new(&mut self.physics_gravity, 0.0..=3.0)
                    .text("Gravity")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Pull toward the center of the layout.");

            ui.add(
                egui::Slider::new(&mut self.physics_velocity_damping, 0.6..=0.97)
                    .text("Velocity damping")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("How quickly node movement slows each frame.");
        });

        ui.separator();

        egui::CollapsingHeader::new("Strongest similarities")
            .default_open(true)
            .show(ui, |ui| self.draw_strongest_links(ui));

        ui.separator();
        ui.small(
            "Hover any occupation for details, click to pin it, \
             double-click to center the view on it.",
        );
    }

    fn draw_strongest_links(&mut self, ui: &mut Ui) {
        let rows = self
            .data
            .strongest_links(15)
            .into_iter()
            .filter_map(|link| {
                let source = self.data.occupations.get(link.source)?;
                let target = self.data.occupations.get(link.target)?;
                let label = format!(
                    "{} -- {}  ({:.0}%)",
                    source.title,
                    target.title,
                    link.weight * 100.0
                );
                let hover = link
                    .description
                    .clone()
                    .unwrap_or_else(|| format!("{} -- {}", source.code, target.code));
                Some((source.code.clone(), label, hover))
            })
            .collect::<Vec<_>>();

        if rows.is_empty() {
            ui.label("The dataset contains no similarity links.");
            return;
        }

        let mut pending_selection = None;
        for (code, label, hover) in rows {
            if ui.link(label).on_hover_text(hover).clicked() {
                pending_selection = Some(code);
            }
        }

        if let Some(code) = pending_selection {
            self.set_selected(Some(code));
        }
    }
}
