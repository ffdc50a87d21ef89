use eframe::egui::{Pos2, Rect, Vec2};

/// Smallest rectangle covering every circle, `None` when there are none.
pub fn circles_bounds(circles: impl IntoIterator<Item = (Pos2, f32)>) -> Option<Rect> {
    circles
        .into_iter()
        .map(|(center, radius)| Rect::from_center_size(center, Vec2::splat(radius.max(0.0) * 2.0)))
        .reduce(|bounds, circle| bounds.union(circle))
}

/// `"Bk 2"` style tag shown under nodes.
pub fn book_tag(book: u32) -> String {
    format!("Bk {book}")
}
