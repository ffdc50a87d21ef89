mod graph;
mod load;
mod parse;

pub use graph::{CastGraph, CharacterNode, Faction, Relation, RelationKind};
pub use load::load_cast_graph;

#[cfg(test)]
pub(crate) mod fixtures {
    use std::collections::HashMap;

    use eframe::egui::pos2;

    use super::{CastGraph, CharacterNode, Faction, Relation, RelationKind};

    pub(crate) fn node(id: &str, faction: Faction, book: u32, x: f32, y: f32) -> CharacterNode {
        CharacterNode {
            id: id.to_owned(),
            label: id.to_uppercase(),
            faction,
            book,
            role: None,
            description: None,
            reference: pos2(x, y),
        }
    }

    pub(crate) fn edge(from: &str, to: &str) -> Relation {
        Relation {
            from: from.to_owned(),
            to: to.to_owned(),
            kind: RelationKind::Connected,
            label: format!("{from} -> {to}"),
        }
    }

    pub(crate) fn graph(nodes: Vec<CharacterNode>, edges: Vec<Relation>) -> CastGraph {
        CastGraph::new(nodes, edges, HashMap::new()).expect("fixture graph is valid")
    }

    pub(crate) fn weighted_graph(
        nodes: Vec<CharacterNode>,
        edges: Vec<Relation>,
        importance: &[(&str, f32)],
    ) -> CastGraph {
        let importance = importance
            .iter()
            .map(|(id, weight)| ((*id).to_owned(), *weight))
            .collect();
        CastGraph::new(nodes, edges, importance).expect("fixture graph is valid")
    }

    /// A -> B, C -> A, with A and B in one faction/book and C in another.
    pub(crate) fn triangle() -> CastGraph {
        graph(
            vec![
                node("a", Faction::Party, 1, 100.0, 100.0),
                node("b", Faction::Party, 1, 200.0, 120.0),
                node("c", Faction::Media, 2, 400.0, 300.0),
            ],
            vec![edge("a", "b"), edge("c", "a")],
        )
    }
}
