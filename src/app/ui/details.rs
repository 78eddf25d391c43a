use eframe::egui::{self, RichText, Ui};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Occupation details");
        ui.add_space(6.0);

        let Some(code) = self.inspected.clone().or_else(|| self.selected.clone()) else {
            ui.label("Move the mouse over any occupation in the graph to show further information, or click to pin it.");
            return;
        };

        let Some(&index) = self.data.index_by_code.get(&code) else {
            // dataset reloads can orphan an inspected code; not an error
            ui.label("The inspected occupation is not part of the current dataset.");
            return;
        };

        let occupation = &self.data.occupations[index];
        let title = occupation.title.clone();
        let description = occupation.description.clone();

        ui.label(RichText::new(title).strong());
        ui.small(code.as_str());
        ui.hyperlink_to(
            "O*NET summary",
            format!("https://www.onetonline.org/link/summary/{code}"),
        );
        ui.add_space(6.0);

        if description.is_empty() {
            ui.label("No description available for this occupation.");
        } else {
            ui.label(description);
        }

        ui.separator();
        ui.label(RichText::new("Most similar occupations").strong());

        let neighbors = self
            .data
            .neighbors_of(index)
            .into_iter()
            .filter_map(|(neighbor_index, weight)| {
                let neighbor = self.data.occupations.get(neighbor_index)?;
                Some((neighbor.code.clone(), neighbor.title.clone(), weight))
            })
            .collect::<Vec<_>>();

        if neighbors.is_empty() {
            ui.label("No similarity links touch this occupation.");
            return;
        }

        let mut pending_selection = None;
        egui::ScrollArea::vertical()
            .id_salt("similar_occupations_scroll")
            .max_height(320.0)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (neighbor_code, neighbor_title, weight) in &neighbors {
                    let label = format!("{neighbor_title}  ({:.0}%)", weight * 100.0);
                    if ui.link(label).on_hover_text(neighbor_code.as_str()).clicked() {
                        pending_selection = Some(neighbor_code.clone());
                    }
                }
            });

        if let Some(neighbor_code) = pending_selection {
            self.set_selected(Some(neighbor_code));
        }
    }
}
