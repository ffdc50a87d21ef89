use eframe::egui::{self, RichText, Sense, Ui, vec2};

use crate::cast::Faction;

use super::super::filter::GraphFilter;
use super::super::layout::LayoutKind;
use super::super::render_utils::faction_color;
use super::super::ViewModel;

fn layout_hint(kind: LayoutKind) -> &'static str {
    match kind {
        LayoutKind::Manual => "Hand-placed positions from the dataset.",
        LayoutKind::Columns => "One column per book, grouped by faction.",
        LayoutKind::Force => "Force simulation clustered around faction centres.",
        LayoutKind::Prominence => "Force simulation where important characters take more room.",
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        let computing = self.layouts.is_computing();

        ui.label("Layout");
        let mut requested = self.layouts.active();
        ui.horizontal_wrapped(|ui| {
            for kind in LayoutKind::ALL {
                ui.selectable_value(&mut requested, kind, kind.label())
                    .on_hover_text(layout_hint(kind));
            }
        });
        if requested != self.layouts.active() {
            self.select_layout(requested);
        }

        let dragged = self.layouts.override_count();
        ui.horizontal(|ui| {
            let reshuffle = ui
                .add_enabled(
                    self.layouts.active().is_randomized() && !computing,
                    egui::Button::new("Reshuffle"),
                )
                .on_hover_text(format!(
                    "Recompute from a new random start, discarding {dragged} dragged position(s)."
                ));
            if reshuffle.clicked() {
                self.reshuffle_layout();
            }
            if ui.button("Fit").clicked() {
                self.fit_view();
            }
            if ui.button("Reset view").clicked() {
                self.reset_view();
            }
        });
        if computing {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Computing layout...");
            });
        }

        ui.separator();

        ui.label("Books");
        let mut filter = self.filter;
        ui.horizontal_wrapped(|ui| {
            ui.selectable_value(&mut filter.max_book, None, "All");
            for book in self.graph.books() {
                ui.selectable_value(&mut filter.max_book, Some(book), format!("Up to {book}"));
            }
        });

        ui.add_space(4.0);
        egui::ComboBox::from_label("Faction")
            .selected_text(filter.faction.map_or("All factions", |faction| faction.label()))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut filter.faction, None, "All factions");
                for faction in Faction::ALL {
                    ui.selectable_value(&mut filter.faction, Some(faction), faction.label());
                }
            });
        if ui
            .add_enabled(filter.is_active(), egui::Button::new("Clear filters"))
            .clicked()
        {
            filter = GraphFilter::default();
        }

        ui.separator();

        ui.label("Search (name or id)")
            .on_hover_text("Fuzzy-highlight matching characters while nothing is selected.");
        ui.text_edit_singleline(&mut self.search);

        ui.separator();
        ui.label(RichText::new("Groups").small());
        for faction in Faction::ALL {
            let count = self.graph.faction_count(faction);
            if count == 0 {
                continue;
            }
            let active = filter.faction == Some(faction);
            let faded = filter.faction.is_some() && !active;

            let response = ui
                .horizontal(|ui| {
                    let (dot, _) = ui.allocate_exact_size(vec2(10.0, 10.0), Sense::hover());
                    let color = faction_color(faction);
                    ui.painter().circle_filled(
                        dot.center(),
                        4.0,
                        if faded { color.gamma_multiply(0.3) } else { color },
                    );
                    let text = RichText::new(format!("{} ({count})", faction.label()));
                    ui.add(
                        egui::Label::new(if active { text.strong() } else { text })
                            .sense(Sense::click()),
                    )
                })
                .inner
                .on_hover_text("Click to show only this faction; click again to show all.");
            if response.clicked() {
                filter.toggle_faction(faction);
            }
        }
        ui.add_space(4.0);
        ui.small("Dashed ring = introduced after book 1");

        self.set_filter(filter);
    }
}
