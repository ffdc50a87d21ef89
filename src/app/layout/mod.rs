mod columns;
mod fixed;
mod force;
mod store;
mod worker;

use std::collections::HashMap;
use std::fmt;

use eframe::egui::Pos2;

use crate::cast::{CastGraph, CharacterNode};

use columns::{ColumnParams, column_layout};
use fixed::fixed_layout;
use force::{ForceParams, force_layout};
use store::LayoutStore;

pub(in crate::app) use worker::LayoutSelector;

/// Node identity to graph-space position.
pub type PositionMap = HashMap<String, Pos2>;

/// Graph-space radius used by every engine that does not size nodes by weight.
pub(in crate::app) const STANDARD_NODE_RADIUS: f32 = 25.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum LayoutKind {
    /// Hand-placed reference coordinates.
    Manual,
    /// Columns per book, grouped by faction.
    Columns,
    /// Force-directed simulation clustered by faction.
    Force,
    /// Force-directed simulation sized by importance.
    Prominence,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 4] = [Self::Manual, Self::Columns, Self::Force, Self::Prominence];

    pub fn label(self) -> &'static str {
        match self {
            Self::Manual => "Manual",
            Self::Columns => "By book",
            Self::Force => "Force",
            Self::Prominence => "Prominence",
        }
    }

    pub fn is_randomized(self) -> bool {
        matches!(self, Self::Force | Self::Prominence)
    }

    /// Graph-space radius this engine reserves for `node`.
    pub fn node_radius(self, graph: &CastGraph, node: &CharacterNode) -> f32 {
        match self {
            Self::Prominence => ForceParams::prominence()
                .sizing
                .map(|sizing| sizing.radius(graph.importance(&node.id)))
                .unwrap_or(STANDARD_NODE_RADIUS),
            Self::Manual | Self::Columns | Self::Force => STANDARD_NODE_RADIUS,
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Runs one engine over the whole graph. Deterministic engines ignore `seed`.
pub fn compute_layout(kind: LayoutKind, graph: &CastGraph, seed: u64) -> PositionMap {
    match kind {
        LayoutKind::Manual => fixed_layout(graph),
        LayoutKind::Columns => column_layout(graph, &ColumnParams::default()),
        LayoutKind::Force => force_layout(graph, &ForceParams::standard(), seed),
        LayoutKind::Prominence => force_layout(graph, &ForceParams::prominence(), seed),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::cast::fixtures::{node, weighted_graph};
    use crate::cast::{CastGraph, Faction};

    #[test]
    fn every_engine_returns_empty_map_for_empty_graph() {
        let graph = CastGraph::new(Vec::new(), Vec::new(), HashMap::new()).expect("empty graph");
        for kind in LayoutKind::ALL {
            assert!(compute_layout(kind, &graph, 7).is_empty(), "{kind} was not empty");
        }
    }

    #[test]
    fn every_engine_positions_every_node() {
        let graph = crate::cast::fixtures::triangle();
        for kind in LayoutKind::ALL {
            let positions = compute_layout(kind, &graph, 11);
            assert_eq!(positions.len(), 3, "{kind}");
            for node in &graph.nodes {
                let position = positions.get(&node.id).copied();
                assert!(position.is_some_and(|p| p.x.is_finite() && p.y.is_finite()));
            }
        }
    }

    #[test]
    fn prominence_radius_follows_importance() {
        let graph = weighted_graph(
            vec![
                node("hero", Faction::Party, 1, 0.0, 0.0),
                node("extra", Faction::Party, 1, 0.0, 0.0),
            ],
            Vec::new(),
            &[("hero", 10.0)],
        );
        let hero = graph.node("hero").expect("hero");
        let extra = graph.node("extra").expect("extra");

        assert!(
            LayoutKind::Prominence.node_radius(&graph, hero)
                > LayoutKind::Prominence.node_radius(&graph, extra)
        );
        assert_eq!(
            LayoutKind::Force.node_radius(&graph, hero),
            LayoutKind::Force.node_radius(&graph, extra)
        );
    }
}
