use std::sync::Arc;

use eframe::egui::{self, Align, Context, Layout, Vec2};

use crate::cast::CastGraph;

use super::super::filter::GraphFilter;
use super::super::highlight::{HighlightCache, SelectionState};
use super::super::layout::{LayoutKind, LayoutSelector};
use super::super::viewport::{GestureController, Viewport};
use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn new(
        graph: CastGraph,
        initial_layout: LayoutKind,
        seed: Option<u64>,
    ) -> Self {
        let graph = Arc::new(graph);
        let layouts = LayoutSelector::new(Arc::clone(&graph), initial_layout, seed);

        let mut model = Self {
            visible: GraphFilter::default().apply(&graph),
            graph,
            layouts,
            viewport: Viewport::default(),
            gestures: GestureController::default(),
            selection: SelectionState::default(),
            filter: GraphFilter::default(),
            visible_dirty: false,
            visible_revision: 0,
            highlight_cache: HighlightCache::default(),
            search: String::new(),
            search_match_cache: None,
            pending_fit: false,
            canvas_size: Vec2::ZERO,
        };
        // The curated layout already matches the reset view.
        model.pending_fit = model.layouts.active() != LayoutKind::Manual;
        model
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        if self.layouts.poll() {
            self.pending_fit = true;
        }
        if self.layouts.any_computing() {
            ctx.request_repaint();
        }
        if self.visible_dirty {
            self.rebuild_visible_graph();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Cast Web");
                    if ui
                        .add_enabled(
                            self.selection.selected.is_some(),
                            egui::Button::new("Clear selection"),
                        )
                        .clicked()
                    {
                        self.clear_selection();
                    }
                    ui.separator();
                    ui.label(format!("characters: {}", self.graph.node_count()));
                    ui.label(format!("relations: {}", self.graph.edge_count()));
                    let dangling = self.graph.dangling_edge_count();
                    if dangling > 0 {
                        ui.label(format!("dangling: {dangling}"))
                            .on_hover_text("Relations naming an unknown character are not drawn.");
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!("zoom: {}%", self.viewport.zoom_percent()));
                        ui.label(format!(
                            "visible: {} / {}",
                            self.visible.node_count(),
                            self.visible.edge_count()
                        ));
                        ui.label(format!("layout: {}", self.layouts.active()));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| self.draw_controls(ui));

        if self.selection.selected.is_some() {
            egui::SidePanel::right("details")
                .resizable(true)
                .default_width(315.0)
                .show(ctx, |ui| self.draw_details(ui));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));
    }

    pub(in crate::app) fn select_layout(&mut self, kind: LayoutKind) {
        if kind == self.layouts.active() {
            return;
        }

        self.gestures.cancel();
        self.selection.set_hovered(None);
        if self.layouts.select(kind) {
            self.fit_view();
        } else {
            self.pending_fit = true;
        }
    }

    pub(in crate::app) fn reshuffle_layout(&mut self) {
        self.gestures.cancel();
        self.layouts.reshuffle();
        self.pending_fit = true;
    }

    pub(in crate::app) fn set_filter(&mut self, filter: GraphFilter) {
        if filter == self.filter {
            return;
        }

        log::info!(
            "filter changed: faction {}, books {}",
            filter.faction.map_or("all", |faction| faction.label()),
            filter
                .max_book
                .map_or_else(|| "all".to_owned(), |book| format!("up to {book}"))
        );
        self.filter = filter;
        self.visible_dirty = true;
        self.selection.clear_selection();
    }

    pub(in crate::app) fn select_node(&mut self, id: &str) {
        if self.visible.contains(id) {
            self.selection.select(id);
        }
    }

    pub(in crate::app) fn clear_selection(&mut self) {
        if let Some(id) = self.selection.selected.as_deref() {
            log::debug!("clearing selection of {id}");
        }
        self.selection.clear_selection();
    }

    pub(in crate::app) fn reset_view(&mut self) {
        self.viewport.reset();
        self.pending_fit = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cast::Faction;
    use crate::cast::fixtures::triangle;

    fn model() -> ViewModel {
        ViewModel::new(triangle(), LayoutKind::Manual, Some(3))
    }

    #[test]
    fn clear_selection_keeps_hover() {
        let mut model = model();
        model.select_node("a");
        model.selection.set_hovered(Some("b".to_owned()));
        assert_eq!(model.selection.selected.as_deref(), Some("a"));

        model.clear_selection();
        assert_eq!(model.selection.selected, None);
        assert_eq!(model.selection.hovered.as_deref(), Some("b"));

        model.clear_selection();
        assert_eq!(model.selection.selected, None);
    }

    #[test]
    fn hidden_nodes_cannot_be_selected() {
        let mut model = model();
        model.set_filter(GraphFilter {
            faction: Some(Faction::Party),
            max_book: None,
        });
        model.rebuild_visible_graph();

        model.select_node("c");
        assert_eq!(model.selection.selected, None);
        model.select_node("a");
        assert_eq!(model.selection.selected.as_deref(), Some("a"));
    }
}
