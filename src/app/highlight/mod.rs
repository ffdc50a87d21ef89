use std::collections::HashSet;
use std::sync::Arc;

use crate::cast::CastGraph;

use super::filter::VisibleGraph;

/// Hover wins over selection.
pub(in crate::app) fn active<'a>(
    hovered: Option<&'a str>,
    selected: Option<&'a str>,
) -> Option<&'a str> {
    hovered.or(selected)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(in crate::app) struct SelectionState {
    pub hovered: Option<String>,
    pub selected: Option<String>,
}

impl SelectionState {
    pub fn active(&self) -> Option<&str> {
        active(self.hovered.as_deref(), self.selected.as_deref())
    }

    pub fn set_hovered(&mut self, id: Option<String>) {
        self.hovered = id;
    }

    /// Clicking the selected node deselects it; any other node becomes selected.
    pub fn click_node(&mut self, id: &str) {
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        } else {
            self.selected = Some(id.to_owned());
        }
    }

    pub fn select(&mut self, id: &str) {
        self.selected = Some(id.to_owned());
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Drops hover and selection that point at nodes no longer shown.
    pub fn retain_visible(&mut self, visible: &VisibleGraph) {
        if self.hovered.as_deref().is_some_and(|id| !visible.contains(id)) {
            self.hovered = None;
        }
        if self.selected.as_deref().is_some_and(|id| !visible.contains(id)) {
            self.selected = None;
        }
    }
}

/// The active node plus its one-hop neighbours over visible edges, in either
/// direction. `None` when the active node is not visible.
pub(in crate::app) fn connected_set(
    graph: &CastGraph,
    visible: &VisibleGraph,
    active: &str,
) -> Option<HashSet<String>> {
    if !visible.contains(active) {
        return None;
    }

    let mut connected = HashSet::from([active.to_owned()]);
    for &index in &visible.edges {
        if let Some(other) = graph.edges[index].other_end(active) {
            connected.insert(other.to_owned());
        }
    }
    Some(connected)
}

/// Connected set memoised on (active node, visible revision).
#[derive(Default)]
pub(in crate::app) struct HighlightCache {
    key: Option<(String, u64)>,
    connected: Option<Arc<HashSet<String>>>,
}

impl HighlightCache {
    pub fn connected(
        &mut self,
        graph: &CastGraph,
        visible: &VisibleGraph,
        visible_revision: u64,
        active: Option<&str>,
    ) -> Option<Arc<HashSet<String>>> {
        let Some(active) = active else {
            self.key = None;
            self.connected = None;
            return None;
        };

        let fresh = self
            .key
            .as_ref()
            .is_some_and(|(id, revision)| id == active && *revision == visible_revision);
        if !fresh {
            self.key = Some((active.to_owned(), visible_revision));
            self.connected = connected_set(graph, visible, active).map(Arc::new);
        }
        self.connected.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::filter::GraphFilter;
    use crate::cast::Faction;
    use crate::cast::fixtures::triangle;

    fn ids(items: &[&str]) -> HashSet<String> {
        items.iter().map(|id| (*id).to_owned()).collect()
    }

    #[test]
    fn connected_set_is_one_hop_both_ways() {
        let graph = triangle();
        let visible = GraphFilter::default().apply(&graph);

        assert_eq!(connected_set(&graph, &visible, "a"), Some(ids(&["a", "b", "c"])));
        assert_eq!(connected_set(&graph, &visible, "b"), Some(ids(&["b", "a"])));
    }

    #[test]
    fn connected_set_ignores_hidden_edges() {
        let graph = triangle();
        let visible = GraphFilter {
            faction: Some(Faction::Party),
            max_book: None,
        }
        .apply(&graph);

        assert_eq!(connected_set(&graph, &visible, "a"), Some(ids(&["a", "b"])));
        assert_eq!(connected_set(&graph, &visible, "c"), None);
    }

    #[test]
    fn hover_takes_precedence_over_selection() {
        assert_eq!(active(Some("h"), Some("s")), Some("h"));
        assert_eq!(active(None, Some("s")), Some("s"));
        assert_eq!(active(None, None), None);

        let mut state = SelectionState::default();
        state.click_node("a");
        state.set_hovered(Some("b".to_owned()));
        assert_eq!(state.active(), Some("b"));
        state.set_hovered(None);
        assert_eq!(state.active(), Some("a"), "selection survives the hover");
    }

    #[test]
    fn clicking_selected_node_deselects() {
        let mut state = SelectionState::default();
        state.click_node("a");
        state.click_node("b");
        assert_eq!(state.selected.as_deref(), Some("b"));
        state.click_node("b");
        assert_eq!(state.selected, None);
    }

    #[test]
    fn hidden_selection_is_dropped() {
        let graph = triangle();
        let visible = GraphFilter {
            faction: Some(Faction::Media),
            max_book: None,
        }
        .apply(&graph);
        let mut state = SelectionState {
            hovered: Some("c".to_owned()),
            selected: Some("a".to_owned()),
        };
        state.retain_visible(&visible);
        assert_eq!(state.hovered.as_deref(), Some("c"));
        assert_eq!(state.selected, None);
    }

    #[test]
    fn cache_recomputes_when_revision_changes() {
        let graph = triangle();
        let mut cache = HighlightCache::default();
        let all = GraphFilter::default().apply(&graph);
        let first = cache.connected(&graph, &all, 1, Some("a"));
        assert_eq!(first.as_deref(), Some(&ids(&["a", "b", "c"])));

        let party = GraphFilter {
            faction: Some(Faction::Party),
            max_book: None,
        }
        .apply(&graph);
        let second = cache.connected(&graph, &party, 2, Some("a"));
        assert_eq!(second.as_deref(), Some(&ids(&["a", "b"])));
        assert_eq!(cache.connected(&graph, &party, 2, None), None);
    }
}
