use std::collections::HashMap;

use anyhow::{Context, Result};
use eframe::egui::pos2;
use serde::Deserialize;

use super::graph::{CastGraph, CharacterNode, Faction, Relation, RelationKind};

#[derive(Clone, Debug, Deserialize)]
struct RawDataset {
    nodes: Vec<RawNode>,
    #[serde(default)]
    edges: Vec<RawEdge>,
    #[serde(default)]
    importance: HashMap<String, f32>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawNode {
    id: String,
    label: String,
    book: u32,
    faction: Faction,
    x: f32,
    y: f32,
    #[serde(default)]
    role: Option<String>,
    #[serde(default, alias = "desc")]
    description: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawEdge {
    from: String,
    to: String,
    #[serde(rename = "type")]
    kind: RelationKind,
    #[serde(default)]
    label: String,
}

pub fn parse_dataset(raw: &str) -> Result<CastGraph> {
    let dataset: RawDataset = serde_json::from_str(raw).context("invalid dataset JSON")?;

    let nodes = dataset
        .nodes
        .into_iter()
        .map(|node| CharacterNode {
            id: node.id,
            label: node.label,
            faction: node.faction,
            book: node.book,
            role: node.role.filter(|role| !role.is_empty()),
            description: node.description.filter(|text| !text.is_empty()),
            reference: pos2(node.x, node.y),
        })
        .collect::<Vec<_>>();

    let edges = dataset
        .edges
        .into_iter()
        .map(|edge| {
            let label = if edge.label.is_empty() {
                edge.kind.label().to_owned()
            } else {
                edge.label
            };
            Relation {
                from: edge.from,
                to: edge.to,
                kind: edge.kind,
                label,
            }
        })
        .collect::<Vec<_>>();

    CastGraph::new(nodes, edges, dataset.importance).context("dataset failed validation")
}
