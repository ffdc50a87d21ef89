use crate::cast::CastGraph;

use super::PositionMap;

pub(in crate::app) fn fixed_layout(graph: &CastGraph) -> PositionMap {
    graph
        .nodes
        .iter()
        .map(|node| (node.id.clone(), node.reference))
        .collect()
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;
    use crate::cast::fixtures::triangle;

    #[test]
    fn passes_reference_positions_through() {
        let graph = triangle();
        let positions = fixed_layout(&graph);
        assert_eq!(positions.get("c").copied(), Some(pos2(400.0, 300.0)));
    }

    #[test]
    fn is_idempotent() {
        let graph = triangle();
        assert_eq!(fixed_layout(&graph), fixed_layout(&graph));
    }
}
