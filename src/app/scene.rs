use std::collections::HashSet;

use eframe::egui::Pos2;

use crate::cast::CastGraph;

use super::filter::VisibleGraph;
use super::highlight::SelectionState;
use super::layout::LayoutSelector;
use super::viewport::Viewport;

const SELECTED_GROWTH: f32 = 8.0;
const HOVERED_GROWTH: f32 = 5.0;

/// A visible, positioned node in canvas-local screen space.
#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct SceneNode {
    pub index: usize,
    pub center: Pos2,
    pub radius: f32,
    pub dimmed: bool,
    pub hovered: bool,
    pub selected: bool,
    pub search_match: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct SceneEdge {
    pub index: usize,
    pub from: Pos2,
    pub to: Pos2,
    pub from_radius: f32,
    pub to_radius: f32,
    /// Touches the active node.
    pub active: bool,
    pub dimmed: bool,
}

#[derive(Clone, Debug, Default)]
pub(in crate::app) struct Scene {
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
    pub zoom_percent: u32,
    pub computing: bool,
}

impl Scene {
    /// Topmost node whose circle contains `point`.
    pub fn node_at(&self, point: Pos2) -> Option<&SceneNode> {
        self.nodes
            .iter()
            .rev()
            .find(|node| node.center.distance_sq(point) <= node.radius * node.radius)
    }
}

pub(in crate::app) struct SceneInput<'a> {
    pub graph: &'a CastGraph,
    pub visible: &'a VisibleGraph,
    pub layouts: &'a LayoutSelector,
    pub viewport: &'a Viewport,
    pub selection: &'a SelectionState,
    pub connected: Option<&'a HashSet<String>>,
    /// Live position of the node being dragged, in graph space.
    pub drag_preview: Option<(&'a str, Pos2)>,
    pub search_matches: Option<&'a HashSet<usize>>,
}

/// Projects the visible graph through the active layout and the viewport.
/// Nodes without a resolved position are left out, and so are their edges.
pub(in crate::app) fn build_scene(input: &SceneInput<'_>) -> Scene {
    let SceneInput {
        graph,
        visible,
        layouts,
        viewport,
        selection,
        connected,
        drag_preview,
        search_matches,
    } = *input;

    let mut screen = vec![None; graph.node_count()];
    let mut nodes = Vec::with_capacity(visible.node_count());

    for &index in &visible.nodes {
        let node = &graph.nodes[index];
        let resolved = match drag_preview {
            Some((id, position)) if id == node.id => Some(position),
            _ => layouts.resolve(&node.id),
        };
        let Some(position) = resolved else {
            continue;
        };

        let selected = selection.selected.as_deref() == Some(node.id.as_str());
        let hovered = selection.hovered.as_deref() == Some(node.id.as_str());
        let growth = if selected {
            SELECTED_GROWTH
        } else if hovered {
            HOVERED_GROWTH
        } else {
            0.0
        };
        let radius = (layouts.node_radius(node) + growth) * viewport.zoom;
        let center = viewport.to_screen(position);
        screen[index] = Some((center, radius));

        nodes.push(SceneNode {
            index,
            center,
            radius,
            dimmed: connected.is_some_and(|set| !set.contains(&node.id)),
            hovered,
            selected,
            search_match: search_matches.is_some_and(|matches| matches.contains(&index)),
        });
    }

    let active = selection.active();
    let mut edges = Vec::with_capacity(visible.edge_count());
    for &index in &visible.edges {
        let edge = &graph.edges[index];
        let endpoints = graph
            .index_by_id
            .get(&edge.from)
            .and_then(|&from| screen[from])
            .zip(graph.index_by_id.get(&edge.to).and_then(|&to| screen[to]));
        let Some(((from, from_radius), (to, to_radius))) = endpoints else {
            continue;
        };

        let is_active = active.is_some_and(|id| edge.touches(id));
        edges.push(SceneEdge {
            index,
            from,
            to,
            from_radius,
            to_radius,
            active: is_active,
            dimmed: connected.is_some() && !is_active,
        });
    }

    Scene {
        nodes,
        edges,
        zoom_percent: viewport.zoom_percent(),
        computing: layouts.is_computing(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use eframe::egui::{pos2, vec2};

    use super::*;
    use crate::app::filter::GraphFilter;
    use crate::app::highlight::connected_set;
    use crate::app::layout::LayoutKind;
    use crate::cast::Faction;
    use crate::cast::fixtures::triangle;

    struct Fixture {
        graph: Arc<CastGraph>,
        layouts: LayoutSelector,
        viewport: Viewport,
    }

    fn fixture() -> Fixture {
        let graph = Arc::new(triangle());
        Fixture {
            layouts: LayoutSelector::new(Arc::clone(&graph), LayoutKind::Manual, Some(1)),
            graph,
            viewport: Viewport {
                pan: vec2(0.0, 0.0),
                zoom: 1.0,
            },
        }
    }

    fn scene(
        fixture: &Fixture,
        visible: &VisibleGraph,
        selection: &SelectionState,
        drag_preview: Option<(&str, Pos2)>,
    ) -> Scene {
        let connected = selection
            .active()
            .and_then(|id| connected_set(&fixture.graph, visible, id));
        build_scene(&SceneInput {
            graph: &fixture.graph,
            visible,
            layouts: &fixture.layouts,
            viewport: &fixture.viewport,
            selection,
            connected: connected.as_ref(),
            drag_preview,
            search_matches: None,
        })
    }

    #[test]
    fn hover_dims_everything_outside_its_neighbourhood() {
        let fixture = fixture();
        let visible = GraphFilter::default().apply(&fixture.graph);
        let selection = SelectionState {
            hovered: Some("b".to_owned()),
            selected: None,
        };
        let scene = scene(&fixture, &visible, &selection, None);

        let dimmed = scene
            .nodes
            .iter()
            .filter(|node| node.dimmed)
            .map(|node| fixture.graph.nodes[node.index].id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(dimmed, vec!["c"]);

        let a_to_b = scene.edges.iter().find(|edge| edge.index == 0).expect("a -> b");
        let c_to_a = scene.edges.iter().find(|edge| edge.index == 1).expect("c -> a");
        assert!(a_to_b.active && !a_to_b.dimmed);
        assert!(!c_to_a.active && c_to_a.dimmed);
    }

    #[test]
    fn nothing_dims_without_an_active_node() {
        let fixture = fixture();
        let visible = GraphFilter::default().apply(&fixture.graph);
        let scene = scene(&fixture, &visible, &SelectionState::default(), None);
        assert!(scene.nodes.iter().all(|node| !node.dimmed));
        assert!(scene.edges.iter().all(|edge| !edge.dimmed && !edge.active));
        assert_eq!(scene.zoom_percent, 100);
        assert!(!scene.computing);
    }

    #[test]
    fn selected_and_hovered_nodes_grow() {
        let fixture = fixture();
        let visible = GraphFilter::default().apply(&fixture.graph);
        let selection = SelectionState {
            hovered: Some("b".to_owned()),
            selected: Some("a".to_owned()),
        };
        let scene = scene(&fixture, &visible, &selection, None);
        let radius = |index: usize| {
            scene
                .nodes
                .iter()
                .find(|node| node.index == index)
                .map(|node| node.radius)
        };

        assert_eq!(radius(0), Some(33.0));
        assert_eq!(radius(1), Some(30.0));
        assert_eq!(radius(2), Some(25.0));
    }

    #[test]
    fn drag_preview_overrides_resolved_position() {
        let fixture = fixture();
        let visible = GraphFilter::default().apply(&fixture.graph);
        let scene = scene(
            &fixture,
            &visible,
            &SelectionState::default(),
            Some(("c", pos2(10.0, 20.0))),
        );
        let c = scene.nodes.iter().find(|node| node.index == 2).expect("c");
        assert_eq!(c.center, pos2(10.0, 20.0));
        assert_eq!(scene.node_at(pos2(12.0, 18.0)).map(|node| node.index), Some(2));
    }

    #[test]
    fn filtered_nodes_and_their_edges_are_absent() {
        let fixture = fixture();
        let visible = GraphFilter {
            faction: Some(Faction::Party),
            max_book: None,
        }
        .apply(&fixture.graph);
        let scene = scene(&fixture, &visible, &SelectionState::default(), None);

        assert_eq!(scene.nodes.len(), 2);
        assert_eq!(scene.edges.len(), 1);
        assert!(scene.nodes.iter().all(|node| node.index != 2));
    }

    #[test]
    fn unpositioned_nodes_are_skipped() {
        let mut fixture = fixture();
        fixture.layouts.select(LayoutKind::Force);
        let visible = GraphFilter::default().apply(&fixture.graph);
        let scene = scene(&fixture, &visible, &SelectionState::default(), None);

        assert!(scene.nodes.is_empty());
        assert!(scene.edges.is_empty());
        assert!(scene.computing);
    }
}
