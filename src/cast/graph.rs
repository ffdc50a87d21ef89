use std::collections::{HashMap, HashSet};

use anyhow::{Result, anyhow, bail};
use eframe::egui::Pos2;
use serde::Deserialize;

pub const DEFAULT_IMPORTANCE: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Faction {
    Party,
    Meadowlark,
    Crawlers,
    Antagonists,
    System,
    Media,
    Npcs,
    Backstory,
}

impl Faction {
    /// Fixed category ordering shared by the column layout and the legend.
    pub const ALL: [Faction; 8] = [
        Self::Party,
        Self::Meadowlark,
        Self::Crawlers,
        Self::Antagonists,
        Self::System,
        Self::Media,
        Self::Npcs,
        Self::Backstory,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Party => "Carl's Party",
            Self::Meadowlark => "Meadow Lark",
            Self::Crawlers => "Other Crawlers",
            Self::Antagonists => "Antagonists",
            Self::System => "System / Borant",
            Self::Media => "Galactic Media",
            Self::Npcs => "Dungeon NPCs/Elites",
            Self::Backstory => "Pre-Dungeon",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    Party,
    Trains,
    Allied,
    Protected,
    Killed,
    Kills,
    Antagonizes,
    Hunts,
    Controls,
    Employs,
    Manages,
    Hosts,
    Rescued,
    Companion,
    Causes,
    Exgf,
    Leads,
    Puppet,
    Connected,
    Quest,
    Joined,
    Brokers,
    Coerces,
    Loved,
}

impl RelationKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Party => "Party",
            Self::Trains => "Trains/Manages",
            Self::Allied => "Allied",
            Self::Protected => "Protects",
            Self::Killed | Self::Kills => "Kills",
            Self::Antagonizes => "Antagonizes",
            Self::Hunts => "Hunts",
            Self::Controls => "Controls",
            Self::Employs => "Employs",
            Self::Manages => "PR manages",
            Self::Hosts => "Hosts",
            Self::Rescued => "Rescued",
            Self::Companion => "Companion",
            Self::Causes => "Causes event",
            Self::Exgf => "Ex-girlfriend of",
            Self::Leads => "Leads",
            Self::Puppet => "Mind-controls",
            Self::Connected => "Connected",
            Self::Quest => "Quest link",
            Self::Joined => "Joins party",
            Self::Brokers => "Brokers deal",
            Self::Coerces => "Coerces",
            Self::Loved => "Loved (past)",
        }
    }
}

#[derive(Clone, Debug)]
pub struct CharacterNode {
    pub id: String,
    pub label: String,
    pub faction: Faction,
    pub book: u32,
    pub role: Option<String>,
    pub description: Option<String>,
    /// Authorial placement, used verbatim by the manual layout.
    pub reference: Pos2,
}

#[derive(Clone, Debug)]
pub struct Relation {
    pub from: String,
    pub to: String,
    pub kind: RelationKind,
    pub label: String,
}

impl Relation {
    pub fn touches(&self, id: &str) -> bool {
        self.from == id || self.to == id
    }

    /// The endpoint on the other side of `id`, if `id` is an endpoint.
    pub fn other_end(&self, id: &str) -> Option<&str> {
        if self.from == id {
            Some(self.to.as_str())
        } else if self.to == id {
            Some(self.from.as_str())
        } else {
            None
        }
    }
}

#[derive(Clone, Debug)]
pub struct CastGraph {
    pub nodes: Vec<CharacterNode>,
    pub edges: Vec<Relation>,
    pub index_by_id: HashMap<String, usize>,
    importance: HashMap<String, f32>,
}

impl CastGraph {
    pub fn new(
        nodes: Vec<CharacterNode>,
        edges: Vec<Relation>,
        importance: HashMap<String, f32>,
    ) -> Result<Self> {
        let mut index_by_id = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            if node.id.is_empty() {
                bail!("node #{index} has an empty id");
            }
            if node.book == 0 {
                bail!("node {} has book 0; books start at 1", node.id);
            }
            if index_by_id.insert(node.id.clone(), index).is_some() {
                bail!("duplicate node id {}", node.id);
            }
        }

        for (id, weight) in &importance {
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(anyhow!("importance for {id} must be positive, got {weight}"));
            }
        }

        Ok(Self {
            nodes,
            edges,
            index_by_id,
            importance,
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: &str) -> Option<&CharacterNode> {
        self.index_by_id.get(id).map(|&index| &self.nodes[index])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }

    pub fn importance(&self, id: &str) -> f32 {
        self.importance
            .get(id)
            .copied()
            .unwrap_or(DEFAULT_IMPORTANCE)
    }

    pub fn is_dangling(&self, edge: &Relation) -> bool {
        !self.contains(&edge.from) || !self.contains(&edge.to)
    }

    pub fn dangling_edge_count(&self) -> usize {
        self.edges.iter().filter(|edge| self.is_dangling(edge)).count()
    }

    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Relation> + 'a {
        self.edges.iter().filter(move |edge| edge.from == id)
    }

    pub fn incoming<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Relation> + 'a {
        self.edges.iter().filter(move |edge| edge.to == id)
    }

    /// Distinct books in ascending order.
    pub fn books(&self) -> Vec<u32> {
        let mut books = self
            .nodes
            .iter()
            .map(|node| node.book)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();
        books.sort_unstable();
        books
    }

    pub fn faction_count(&self, faction: Faction) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.faction == faction)
            .count()
    }
}
