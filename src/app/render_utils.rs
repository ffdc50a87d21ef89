use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, pos2, vec2};

use crate::cast::{Faction, RelationKind};

/// Sideways bow of every edge curve, in graph units.
pub(super) const EDGE_BOW: f32 = 26.0;
/// Space left in front of the target node for the arrow head, in graph units.
pub(super) const ARROW_CLEARANCE: f32 = 9.0;

const AMBER: Color32 = Color32::from_rgb(0xf5, 0x9e, 0x0b);
const GREEN: Color32 = Color32::from_rgb(0x34, 0xd3, 0x99);
const RED: Color32 = Color32::from_rgb(0xf8, 0x71, 0x71);
const VIOLET: Color32 = Color32::from_rgb(0xa7, 0x8b, 0xfa);
const BLUE: Color32 = Color32::from_rgb(0x60, 0xa5, 0xfa);
const ORANGE: Color32 = Color32::from_rgb(0xfb, 0x92, 0x3c);
const SLATE: Color32 = Color32::from_rgb(0x94, 0xa3, 0xb8);

pub(super) fn faction_color(faction: Faction) -> Color32 {
    match faction {
        Faction::Party => AMBER,
        Faction::Meadowlark => GREEN,
        Faction::Crawlers => Color32::from_rgb(0xe8, 0x79, 0xf9),
        Faction::Antagonists => RED,
        Faction::System => VIOLET,
        Faction::Media => BLUE,
        Faction::Npcs => ORANGE,
        Faction::Backstory => SLATE,
    }
}

/// Dark fill used inside node circles.
pub(super) fn faction_fill(faction: Faction) -> Color32 {
    match faction {
        Faction::Party => Color32::from_rgb(0x78, 0x35, 0x0f),
        Faction::Meadowlark => Color32::from_rgb(0x06, 0x4e, 0x3b),
        Faction::Crawlers => Color32::from_rgb(0x4a, 0x04, 0x4e),
        Faction::Antagonists => Color32::from_rgb(0x45, 0x0a, 0x0a),
        Faction::System => Color32::from_rgb(0x3b, 0x07, 0x64),
        Faction::Media => Color32::from_rgb(0x1e, 0x3a, 0x5f),
        Faction::Npcs => Color32::from_rgb(0x43, 0x14, 0x07),
        Faction::Backstory => Color32::from_rgb(0x1e, 0x29, 0x3b),
    }
}

pub(super) fn relation_color(kind: RelationKind) -> Color32 {
    match kind {
        RelationKind::Party | RelationKind::Companion => AMBER,
        RelationKind::Trains => Color32::from_rgb(0xfd, 0xe6, 0x8a),
        RelationKind::Allied
        | RelationKind::Protected
        | RelationKind::Rescued
        | RelationKind::Leads
        | RelationKind::Joined => GREEN,
        RelationKind::Killed
        | RelationKind::Kills
        | RelationKind::Antagonizes
        | RelationKind::Hunts
        | RelationKind::Puppet
        | RelationKind::Coerces => RED,
        RelationKind::Controls | RelationKind::Employs => VIOLET,
        RelationKind::Manages | RelationKind::Hosts | RelationKind::Brokers => BLUE,
        RelationKind::Causes | RelationKind::Quest | RelationKind::Loved => ORANGE,
        RelationKind::Exgf => SLATE,
        RelationKind::Connected => Color32::from_rgb(0x78, 0x71, 0x6c),
    }
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(6, 6, 12));

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.min + pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(245, 158, 11, 10));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([pos2(x, rect.top()), pos2(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([pos2(rect.left(), y), pos2(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

/// Quadratic curve from the rim of the source to just short of the target,
/// bowed to the left of the travel direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct EdgeCurve {
    pub start: Pos2,
    pub control: Pos2,
    pub end: Pos2,
}

impl EdgeCurve {
    pub fn midpoint(&self) -> Pos2 {
        let start = self.start.to_vec2();
        let control = self.control.to_vec2();
        let end = self.end.to_vec2();
        (start * 0.25 + control * 0.5 + end * 0.25).to_pos2()
    }

    /// Unit direction of the curve where it meets the target.
    pub fn end_direction(&self) -> Vec2 {
        let tangent = self.end - self.control;
        if tangent.length_sq() > 0.0 {
            tangent.normalized()
        } else {
            Vec2::X
        }
    }
}

/// All inputs in one coordinate space (graph or screen; the bow must be
/// scaled to match).
pub(super) fn edge_curve(
    from: Pos2,
    to: Pos2,
    from_radius: f32,
    to_radius: f32,
    bow: f32,
) -> EdgeCurve {
    let delta = to - from;
    let length = delta.length();
    let unit = if length > 0.0 { delta / length } else { Vec2::ZERO };

    let start = from + unit * from_radius;
    let end = to - unit * to_radius;
    let middle = start + (end - start) * 0.5;
    let control = middle + vec2(-unit.y, unit.x) * bow;

    EdgeCurve {
        start,
        control,
        end,
    }
}

pub(super) fn arrow_head(tip: Pos2, direction: Vec2, size: f32) -> [Pos2; 3] {
    let back = tip - direction * size;
    let side = vec2(-direction.y, direction.x) * (size * 0.4);
    [tip, back + side, back - side]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_is_trimmed_by_radii() {
        let curve = edge_curve(pos2(0.0, 0.0), pos2(200.0, 0.0), 25.0, 34.0, EDGE_BOW);
        assert_eq!(curve.start, pos2(25.0, 0.0));
        assert_eq!(curve.end, pos2(166.0, 0.0));
        assert_eq!(curve.control, pos2(95.5, EDGE_BOW));
    }

    #[test]
    fn coincident_endpoints_do_not_produce_nan() {
        let curve = edge_curve(pos2(5.0, 5.0), pos2(5.0, 5.0), 25.0, 34.0, EDGE_BOW);
        assert!(curve.start.x.is_finite() && curve.control.y.is_finite());
        assert!(curve.end_direction().x.is_finite());
    }

    #[test]
    fn arrow_points_at_tip() {
        let [tip, left, right] = arrow_head(pos2(10.0, 0.0), Vec2::X, 8.0);
        assert_eq!(tip, pos2(10.0, 0.0));
        assert_eq!(left.x, 2.0);
        assert_eq!(right.x, 2.0);
        assert_eq!(left.y, -right.y);
    }
}
