use std::collections::HashSet;

use crate::cast::{CastGraph, CharacterNode, Faction};

/// Narrowing of the node set by faction and book. `None` means "all".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(in crate::app) struct GraphFilter {
    pub faction: Option<Faction>,
    /// Cumulative: books up to and including this one are shown.
    pub max_book: Option<u32>,
}

impl GraphFilter {
    pub fn accepts(&self, node: &CharacterNode) -> bool {
        self.faction.is_none_or(|faction| node.faction == faction)
            && self.max_book.is_none_or(|book| node.book <= book)
    }

    pub fn toggle_faction(&mut self, faction: Faction) {
        self.faction = if self.faction == Some(faction) {
            None
        } else {
            Some(faction)
        };
    }

    pub fn is_active(&self) -> bool {
        self.faction.is_some() || self.max_book.is_some()
    }

    pub fn apply(&self, graph: &CastGraph) -> VisibleGraph {
        let nodes = graph
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| self.accepts(node))
            .map(|(index, _)| index)
            .collect::<Vec<_>>();
        let ids = nodes
            .iter()
            .map(|&index| graph.nodes[index].id.clone())
            .collect::<HashSet<_>>();
        let edges = graph
            .edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| ids.contains(&edge.from) && ids.contains(&edge.to))
            .map(|(index, _)| index)
            .collect();

        VisibleGraph { nodes, edges, ids }
    }
}

/// Indices into the full graph that survive the current filter. Dangling
/// edges never make it in since their missing endpoint is never visible.
#[derive(Clone, Debug, Default)]
pub(in crate::app) struct VisibleGraph {
    pub nodes: Vec<usize>,
    pub edges: Vec<usize>,
    ids: HashSet<String>,
}

impl VisibleGraph {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cast::fixtures::{edge, graph, node, triangle};

    #[test]
    fn unfiltered_shows_everything_but_dangling_edges() {
        let graph = graph(
            vec![
                node("a", Faction::Party, 1, 0.0, 0.0),
                node("b", Faction::Media, 2, 0.0, 0.0),
            ],
            vec![edge("a", "b"), edge("a", "ghost")],
        );
        let visible = GraphFilter::default().apply(&graph);
        assert_eq!(visible.nodes, vec![0, 1]);
        assert_eq!(visible.edges, vec![0]);
    }

    #[test]
    fn faction_filter_drops_nodes_and_their_edges() {
        let graph = triangle();
        let filter = GraphFilter {
            faction: Some(Faction::Party),
            max_book: None,
        };
        let visible = filter.apply(&graph);

        assert!(!visible.contains("c"));
        assert!(visible.contains("a") && visible.contains("b"));
        for &index in &visible.edges {
            let edge = &graph.edges[index];
            assert!(edge.from != "c" && edge.to != "c");
        }
        assert_eq!(visible.edge_count(), 1);
    }

    #[test]
    fn book_filter_is_cumulative() {
        let graph = graph(
            vec![
                node("one", Faction::Party, 1, 0.0, 0.0),
                node("two", Faction::Party, 2, 0.0, 0.0),
                node("three", Faction::Party, 3, 0.0, 0.0),
            ],
            Vec::new(),
        );
        let filter = GraphFilter {
            faction: None,
            max_book: Some(2),
        };
        let visible = filter.apply(&graph);
        assert!(visible.contains("one") && visible.contains("two"));
        assert!(!visible.contains("three"));
    }

    #[test]
    fn legend_click_toggles_faction() {
        let mut filter = GraphFilter::default();
        filter.toggle_faction(Faction::Media);
        assert_eq!(filter.faction, Some(Faction::Media));
        filter.toggle_faction(Faction::Party);
        assert_eq!(filter.faction, Some(Faction::Party));
        filter.toggle_faction(Faction::Party);
        assert!(!filter.is_active());
    }
}
