use std::f32::consts::TAU;

use eframe::egui::epaint::QuadraticBezierShape;
use eframe::egui::{
    self, Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Shape, Stroke, Ui, vec2,
};

use crate::util::book_tag;

use super::super::render_utils::{
    ARROW_CLEARANCE, EDGE_BOW, arrow_head, blend_color, circle_visible, draw_background,
    edge_curve, faction_color, faction_fill, relation_color,
};
use super::super::scene::{Scene, SceneEdge, SceneNode};
use super::super::ViewModel;

const SEARCH_RING: Color32 = Color32::from_rgb(103, 196, 255);

fn dashed_circle(painter: &Painter, center: Pos2, radius: f32, stroke: Stroke) {
    let segments = 48;
    let points = (0..=segments)
        .map(|step| {
            let angle = step as f32 / segments as f32 * TAU;
            center + vec2(angle.cos(), angle.sin()) * radius
        })
        .collect::<Vec<_>>();
    painter.extend(Shape::dashed_line(&points, stroke, 3.0, 3.0));
}

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        self.canvas_size = rect.size();

        if self.pending_fit && !self.layouts.is_computing() {
            self.fit_view();
        }

        self.handle_graph_zoom(ui, &response);
        let scene = self.current_scene();
        self.handle_graph_hover(rect, &response, &scene);
        self.handle_graph_drag(rect, &response, &scene);
        self.handle_graph_click(rect, &response, &scene);

        if self.selection.hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }
        if response.dragged() || self.gestures.is_active() {
            ui.ctx().request_repaint();
        }

        let scene = self.current_scene();
        draw_background(&painter, rect, self.viewport.pan, self.viewport.zoom);

        for edge in &scene.edges {
            self.draw_edge(&painter, rect, edge);
        }
        for node in &scene.nodes {
            self.draw_node(&painter, rect, node);
        }

        self.draw_overlay(&painter, rect, &scene);
    }

    fn draw_edge(&self, painter: &Painter, rect: Rect, edge: &SceneEdge) {
        let relation = &self.graph.edges[edge.index];
        let zoom = self.viewport.zoom;
        let offset = rect.min.to_vec2();
        let curve = edge_curve(
            edge.from + offset,
            edge.to + offset,
            edge.from_radius,
            edge.to_radius + ARROW_CLEARANCE * zoom,
            EDGE_BOW * zoom,
        );

        let opacity = if edge.dimmed {
            0.05
        } else if edge.active {
            0.9
        } else {
            0.18
        };
        let color = relation_color(relation.kind);
        let stroke = Stroke::new(
            if edge.active { 2.2 } else { 1.0 },
            color.gamma_multiply(opacity),
        );

        painter.add(QuadraticBezierShape::from_points_stroke(
            [curve.start, curve.control, curve.end],
            false,
            Color32::TRANSPARENT,
            stroke,
        ));

        let direction = curve.end_direction();
        let tip = curve.end + direction * (ARROW_CLEARANCE * zoom * 0.8);
        painter.add(Shape::convex_polygon(
            arrow_head(tip, direction, 8.0 * zoom).to_vec(),
            color.gamma_multiply(opacity.max(0.1)),
            Stroke::NONE,
        ));

        if edge.active {
            painter.text(
                curve.midpoint() - vec2(0.0, 7.0 * zoom),
                Align2::CENTER_BOTTOM,
                &relation.label,
                FontId::monospace((9.0 * zoom).clamp(8.0, 16.0)),
                color.gamma_multiply(0.88),
            );
        }
    }

    fn draw_node(&self, painter: &Painter, rect: Rect, node: &SceneNode) {
        let character = &self.graph.nodes[node.index];
        let zoom = self.viewport.zoom;
        let center = node.center + rect.min.to_vec2();
        let radius = node.radius;
        if !circle_visible(rect, center, radius + 40.0 * zoom) {
            return;
        }

        let color = faction_color(character.faction);
        let opacity = if node.dimmed { 0.12 } else { 1.0 };

        if character.book > 1 && !node.dimmed {
            dashed_circle(
                painter,
                center,
                radius + 5.0 * zoom,
                Stroke::new(1.0, color.gamma_multiply(0.4)),
            );
        }
        if node.selected || node.hovered {
            let (width, alpha) = if node.selected { (2.0, 0.35) } else { (1.0, 0.18) };
            painter.circle_stroke(
                center,
                radius + 9.0 * zoom,
                Stroke::new(width, color.gamma_multiply(alpha)),
            );
        }
        if node.search_match {
            painter.circle_stroke(
                center,
                radius + 4.0 * zoom,
                Stroke::new(1.6, blend_color(color, SEARCH_RING, 0.7)),
            );
        }

        let fill = if node.selected {
            faction_fill(character.faction)
        } else {
            faction_fill(character.faction).gamma_multiply(0.53)
        };
        let border = if node.selected {
            2.5
        } else if node.hovered {
            2.0
        } else {
            1.5
        };
        painter.circle(
            center,
            radius,
            fill.gamma_multiply(opacity),
            Stroke::new(border, color.gamma_multiply(opacity)),
        );

        let label_size = if node.selected { 11.0 } else { 9.5 };
        painter.text(
            center + vec2(0.0, radius + 10.0 * zoom),
            Align2::CENTER_TOP,
            &character.label,
            FontId::proportional((label_size * zoom * 1.3).clamp(8.0, 20.0)),
            color.gamma_multiply(opacity),
        );

        let tag_opacity = if node.dimmed {
            0.08
        } else if character.book > 1 {
            0.7
        } else {
            0.3
        };
        painter.text(
            center + vec2(0.0, radius + 24.0 * zoom),
            Align2::CENTER_TOP,
            book_tag(character.book),
            FontId::monospace((8.0 * zoom * 1.2).clamp(7.0, 14.0)),
            color.gamma_multiply(tag_opacity),
        );
    }

    fn draw_overlay(&self, painter: &Painter, rect: Rect, scene: &Scene) {
        painter.text(
            rect.right_bottom() - vec2(12.0, 10.0),
            Align2::RIGHT_BOTTOM,
            format!("{}%", scene.zoom_percent),
            FontId::monospace(12.0),
            Color32::from_gray(120),
        );

        if let Some(active) = self.selection.hovered.as_deref().and_then(|id| self.graph.node(id)) {
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!("{}  |  {}", active.label, active.faction.label()),
                FontId::proportional(13.0),
                Color32::from_gray(230),
            );
        }

        if scene.computing {
            painter.rect_filled(rect, 0.0, Color32::from_black_alpha(150));
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                format!("Computing {} layout...", self.layouts.active().label().to_lowercase()),
                FontId::proportional(18.0),
                Color32::from_rgb(0xf5, 0x9e, 0x0b),
            );
            let dot = (painter.ctx().input(|input| input.time) * 3.0) as f32;
            painter.circle_filled(
                rect.center() + vec2(dot.sin() * 24.0, 28.0),
                4.0,
                Color32::from_rgb(0xf5, 0x9e, 0x0b),
            );
        } else if scene.nodes.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No characters match the current filters.",
                FontId::proportional(15.0),
                Color32::from_gray(140),
            );
        }
    }
}
