use std::collections::HashSet;
use std::sync::Arc;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::util::circles_bounds;

use super::super::scene::{Scene, SceneInput, build_scene};
use super::super::{SearchMatchCache, ViewModel};

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

impl ViewModel {
    pub(in crate::app) fn rebuild_visible_graph(&mut self) {
        self.visible = self.filter.apply(&self.graph);
        self.visible_revision = self.visible_revision.wrapping_add(1);
        self.visible_dirty = false;
        self.selection.retain_visible(&self.visible);

        log::debug!(
            "visible graph: {} of {} nodes, {} of {} edges",
            self.visible.node_count(),
            self.graph.node_count(),
            self.visible.edge_count(),
            self.graph.edge_count()
        );
    }

    /// Fits the viewport to the visible nodes. Stays pending while the active
    /// layout has nothing to show yet.
    pub(in crate::app) fn fit_view(&mut self) {
        let positions = self.layouts.resolved_positions();
        let bounds = circles_bounds(self.visible.nodes.iter().filter_map(|&index| {
            let node = &self.graph.nodes[index];
            positions
                .get(&node.id)
                .map(|&position| (position, self.layouts.node_radius(node)))
        }));

        match bounds {
            Some(bounds) => {
                self.viewport.fit_to_bounds(bounds, self.canvas_size);
                self.pending_fit = false;
            }
            None => self.pending_fit = !self.visible.nodes.is_empty(),
        }
    }

    /// Visible nodes matching the search box, only while nothing is selected.
    pub(in crate::app) fn cached_search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        if self.selection.selected.is_some() {
            return None;
        }

        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.visible_revision == self.visible_revision
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matcher = SkimMatcherV2::default();
        let matches = self
            .visible
            .nodes
            .iter()
            .copied()
            .filter(|&index| {
                let node = &self.graph.nodes[index];
                fuzzy_match_score(&matcher, &node.label, query).is_some()
                    || fuzzy_match_score(&matcher, &node.id, query).is_some()
            })
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            visible_revision: self.visible_revision,
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    pub(in crate::app) fn current_scene(&mut self) -> Scene {
        let search_matches = self.cached_search_matches();
        let connected = self.highlight_cache.connected(
            &self.graph,
            &self.visible,
            self.visible_revision,
            self.selection.active(),
        );

        build_scene(&SceneInput {
            graph: &self.graph,
            visible: &self.visible,
            layouts: &self.layouts,
            viewport: &self.viewport,
            selection: &self.selection,
            connected: connected.as_deref(),
            drag_preview: self.gestures.dragged_node(),
            search_matches: search_matches.as_deref(),
        })
    }
}
