use std::collections::{HashMap, HashSet};

use eframe::egui::Pos2;

use super::{LayoutKind, PositionMap};

/// Computed maps per engine plus the user's drag overrides on top of them.
///
/// Overrides are scoped to the engine they were made under and are discarded
/// whenever that engine's map is recomputed.
#[derive(Default)]
pub(in crate::app) struct LayoutStore {
    computed: HashMap<LayoutKind, PositionMap>,
    computing: HashSet<LayoutKind>,
    generations: HashMap<LayoutKind, u64>,
    overrides: HashMap<LayoutKind, PositionMap>,
}

impl LayoutStore {
    pub fn is_computed(&self, kind: LayoutKind) -> bool {
        self.computed.contains_key(&kind)
    }

    pub fn is_computing(&self, kind: LayoutKind) -> bool {
        self.computing.contains(&kind)
    }

    pub fn generation(&self, kind: LayoutKind) -> u64 {
        self.generations.get(&kind).copied().unwrap_or(0)
    }

    /// Marks `kind` as in flight and returns the generation its result must carry.
    pub fn begin(&mut self, kind: LayoutKind) -> u64 {
        self.computing.insert(kind);
        self.generation(kind)
    }

    /// Stores a finished map. Results from an older generation are dropped.
    pub fn complete(
        &mut self,
        kind: LayoutKind,
        generation: u64,
        positions: PositionMap,
    ) -> bool {
        if generation != self.generation(kind) {
            log::warn!(
                "dropping stale {kind} layout (generation {generation}, current {})",
                self.generation(kind)
            );
            return false;
        }

        self.computing.remove(&kind);
        self.overrides.remove(&kind);
        self.computed.insert(kind, positions);
        true
    }

    /// Forgets the map and overrides for `kind`; anything still in flight
    /// for it becomes stale.
    pub fn invalidate(&mut self, kind: LayoutKind) {
        self.computed.remove(&kind);
        self.overrides.remove(&kind);
        self.computing.remove(&kind);
        *self.generations.entry(kind).or_insert(0) += 1;
    }

    /// Records a dragged position. Ignored before the engine has produced a
    /// map and for nodes the map does not know.
    pub fn record_override(&mut self, kind: LayoutKind, id: &str, position: Pos2) -> bool {
        let known = self
            .computed
            .get(&kind)
            .is_some_and(|positions| positions.contains_key(id));
        if !known {
            return false;
        }

        self.overrides
            .entry(kind)
            .or_default()
            .insert(id.to_owned(), position);
        true
    }

    pub fn override_count(&self, kind: LayoutKind) -> usize {
        self.overrides.get(&kind).map_or(0, HashMap::len)
    }

    pub fn resolve(&self, kind: LayoutKind, id: &str) -> Option<Pos2> {
        self.overrides
            .get(&kind)
            .and_then(|overrides| overrides.get(id))
            .or_else(|| self.computed.get(&kind).and_then(|positions| positions.get(id)))
            .copied()
    }

    /// The effective map for `kind`: base positions with overrides applied.
    pub fn resolved_positions(&self, kind: LayoutKind) -> PositionMap {
        let mut positions = self.computed.get(&kind).cloned().unwrap_or_default();
        if let Some(overrides) = self.overrides.get(&kind) {
            positions.extend(overrides.iter().map(|(id, point)| (id.clone(), *point)));
        }
        positions
    }
}
