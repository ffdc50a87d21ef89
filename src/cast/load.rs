use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};

use super::graph::CastGraph;
use super::parse::parse_dataset;

const BUNDLED_DATASET: &str = include_str!("../../data/cast.json");

pub fn load_cast_graph(dataset_path: Option<&Path>) -> Result<CastGraph> {
    let graph = match dataset_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read dataset {}", path.display()))?;
            parse_dataset(&raw).with_context(|| format!("failed to load {}", path.display()))?
        }
        None => parse_dataset(BUNDLED_DATASET).context("bundled dataset is invalid")?,
    };

    let dangling = graph.dangling_edge_count();
    if dangling > 0 {
        warn!("{dangling} relation(s) reference unknown characters and will not be drawn");
    }

    info!(
        "loaded {} characters and {} relations",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cast::Faction;

    #[test]
    fn bundled_dataset_is_valid() {
        let graph = load_cast_graph(None).expect("bundled dataset loads");
        assert_eq!(graph.node_count(), 37);
        assert_eq!(graph.edge_count(), 59);
        assert_eq!(graph.dangling_edge_count(), 0);
        assert_eq!(graph.books(), vec![1, 2]);
        assert!(Faction::ALL.iter().all(|&faction| graph.faction_count(faction) > 0));
        assert!(graph.importance("carl") > graph.importance("jack"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = load_cast_graph(Some(Path::new("/definitely/not/here.json")));
        assert!(result.is_err());
    }
}
