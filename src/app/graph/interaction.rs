use eframe::egui::{self, Pos2, Rect, Ui};

use super::super::ViewModel;
use super::super::scene::Scene;

fn canvas_local(rect: Rect, pointer: Pos2) -> Pos2 {
    (pointer - rect.min).to_pos2()
}

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(&mut self, ui: &Ui, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        self.viewport.zoom_by_scroll(scroll);
    }

    /// Hover tracking is frozen while a drag is in progress.
    pub(in crate::app) fn handle_graph_hover(
        &mut self,
        rect: Rect,
        response: &egui::Response,
        scene: &Scene,
    ) {
        if self.gestures.is_active() {
            return;
        }

        let hovered = response
            .hover_pos()
            .and_then(|pointer| scene.node_at(canvas_local(rect, pointer)))
            .map(|node| self.graph.nodes[node.index].id.clone());
        self.selection.set_hovered(hovered);
    }

    /// Node drag and panning. Both are disabled while the active layout is
    /// still being computed.
    pub(in crate::app) fn handle_graph_drag(
        &mut self,
        rect: Rect,
        response: &egui::Response,
        scene: &Scene,
    ) {
        if self.layouts.is_computing() {
            self.gestures.cancel();
            return;
        }

        let pointer = response
            .interact_pointer_pos()
            .map(|pointer| canvas_local(rect, pointer));

        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(pointer) = pointer
        {
            let hit = scene.node_at(pointer).and_then(|node| {
                let id = &self.graph.nodes[node.index].id;
                self.layouts
                    .resolve(id)
                    .map(|position| (id.clone(), position))
            });
            self.gestures.begin(pointer, hit, &self.viewport);
        }

        if response.dragged()
            && let Some(pointer) = pointer
        {
            self.gestures.update(pointer, &mut self.viewport);
        }

        if response.drag_stopped()
            && let Some((id, position)) = self.gestures.end()
            && !self.layouts.record_drag(&id, position)
        {
            log::debug!("drop of {id} ignored: no computed position");
        }
    }

    /// Click on a node toggles it; click on empty canvas clears the selection.
    pub(in crate::app) fn handle_graph_click(
        &mut self,
        rect: Rect,
        response: &egui::Response,
        scene: &Scene,
    ) {
        if !response.clicked_by(egui::PointerButton::Primary) {
            return;
        }

        let clicked = response
            .interact_pointer_pos()
            .and_then(|pointer| scene.node_at(canvas_local(rect, pointer)))
            .map(|node| node.index);
        match clicked {
            Some(index) => {
                let id = self.graph.nodes[index].id.clone();
                self.selection.click_node(&id);
            }
            None => self.selection.clear_selection(),
        }
    }
}
