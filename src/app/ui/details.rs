use eframe::egui::{self, RichText, Ui};

use crate::cast::{Faction, Relation, RelationKind};
use crate::util::book_tag;

use super::super::render_utils::{faction_color, relation_color};
use super::super::ViewModel;

struct RelatedEntry {
    id: String,
    relation: String,
    kind: RelationKind,
    /// Label and faction, absent for dangling relations.
    target: Option<(String, Faction)>,
    visible: bool,
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        let Some(selected_id) = self.selection.selected.clone() else {
            return;
        };

        let Some(node) = self.graph.node(&selected_id) else {
            ui.label("Selected character no longer exists in the graph.");
            return;
        };

        let color = faction_color(node.faction);
        ui.add_space(6.0);
        ui.label(RichText::new(&node.label).heading().color(color));
        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new(node.faction.label()).color(color));
            ui.label(book_tag(node.book));
            if let Some(role) = &node.role {
                ui.label(RichText::new(role).weak());
            }
        });
        if let Some(description) = &node.description {
            ui.add_space(4.0);
            ui.label(description.as_str());
        }

        let outgoing = self.related_entries(self.graph.outgoing(&selected_id), &selected_id);
        let incoming = self.related_entries(self.graph.incoming(&selected_id), &selected_id);

        let mut clicked = None;
        ui.separator();
        egui::ScrollArea::vertical()
            .id_salt("relations_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                Self::draw_related_list(ui, "Connects to", &outgoing, &mut clicked);
                ui.add_space(8.0);
                Self::draw_related_list(ui, "Connected by", &incoming, &mut clicked);
            });

        if let Some(id) = clicked {
            self.select_node(&id);
        }
    }

    fn related_entries<'a>(
        &self,
        relations: impl Iterator<Item = &'a Relation>,
        selected_id: &str,
    ) -> Vec<RelatedEntry> {
        relations
            .filter_map(|relation| {
                let id = relation.other_end(selected_id)?.to_owned();
                let target = self
                    .graph
                    .node(&id)
                    .map(|node| (node.label.clone(), node.faction));
                Some(RelatedEntry {
                    visible: self.visible.contains(&id),
                    id,
                    relation: relation.label.clone(),
                    kind: relation.kind,
                    target,
                })
            })
            .collect()
    }

    fn draw_related_list(
        ui: &mut Ui,
        title: &str,
        entries: &[RelatedEntry],
        clicked: &mut Option<String>,
    ) {
        ui.label(RichText::new(format!("{title} ({})", entries.len())).small().strong());
        if entries.is_empty() {
            ui.weak("None");
            return;
        }

        for entry in entries {
            let Some((label, faction)) = &entry.target else {
                ui.weak(format!("{} (unknown character)", entry.id));
                continue;
            };

            ui.horizontal_wrapped(|ui| {
                let link = ui
                    .add_enabled(
                        entry.visible,
                        egui::Link::new(RichText::new(label).color(faction_color(*faction))),
                    )
                    .on_disabled_hover_text("Hidden by the current filters.");
                if link.clicked() {
                    *clicked = Some(entry.id.clone());
                }
                ui.label(
                    RichText::new(&entry.relation)
                        .small()
                        .color(relation_color(entry.kind)),
                );
                ui.label(RichText::new(faction.label()).small().weak());
            });
        }
    }
}
