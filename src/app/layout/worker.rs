use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use eframe::egui::Pos2;

use crate::cast::{CastGraph, CharacterNode};

use super::{LayoutKind, LayoutStore, PositionMap, compute_layout};

struct LayoutResult {
    kind: LayoutKind,
    generation: u64,
    positions: PositionMap,
    elapsed: Duration,
}

enum SeedSource {
    Random,
    Pinned { base: u64, draws: u64 },
}

impl SeedSource {
    fn next(&mut self) -> u64 {
        match self {
            Self::Random => rand::random::<u64>(),
            Self::Pinned { base, draws } => {
                let seed = base.wrapping_add(*draws);
                *draws += 1;
                seed
            }
        }
    }
}

/// Owns the active engine and runs engine computations off the UI thread.
pub(in crate::app) struct LayoutSelector {
    graph: Arc<CastGraph>,
    store: LayoutStore,
    active: LayoutKind,
    seeds: SeedSource,
    tx: Sender<LayoutResult>,
    rx: Receiver<LayoutResult>,
}

impl LayoutSelector {
    /// Computes `initial` on the calling thread so the first frame has positions.
    pub fn new(graph: Arc<CastGraph>, initial: LayoutKind, seed: Option<u64>) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut selector = Self {
            graph,
            store: LayoutStore::default(),
            active: initial,
            seeds: seed.map_or(SeedSource::Random, |base| SeedSource::Pinned { base, draws: 0 }),
            tx,
            rx,
        };

        let generation = selector.store.begin(initial);
        let seed = selector.seeds.next();
        let started = Instant::now();
        let positions = compute_layout(initial, &selector.graph, seed);
        selector.accept(LayoutResult {
            kind: initial,
            generation,
            positions,
            elapsed: started.elapsed(),
        });
        selector
    }

    pub fn active(&self) -> LayoutKind {
        self.active
    }

    /// Switches engines. Returns true when the engine's map is already cached.
    pub fn select(&mut self, kind: LayoutKind) -> bool {
        if kind != self.active {
            log::info!("switching layout {} -> {kind}", self.active);
        }
        self.active = kind;

        if self.store.is_computed(kind) {
            log::debug!("{kind} layout served from cache");
            return true;
        }
        if !self.store.is_computing(kind) {
            self.spawn(kind);
        }
        false
    }

    /// Throws away the active engine's map and overrides and recomputes it.
    pub fn reshuffle(&mut self) {
        let kind = self.active;
        log::info!("reshuffling {kind} layout");
        self.store.invalidate(kind);
        self.spawn(kind);
    }

    fn spawn(&mut self, kind: LayoutKind) {
        let generation = self.store.begin(kind);
        let seed = self.seeds.next();
        let graph = Arc::clone(&self.graph);
        let tx = self.tx.clone();

        thread::spawn(move || {
            let started = Instant::now();
            let positions = compute_layout(kind, &graph, seed);
            let _ = tx.send(LayoutResult {
                kind,
                generation,
                positions,
                elapsed: started.elapsed(),
            });
        });
    }

    fn accept(&mut self, result: LayoutResult) -> bool {
        let LayoutResult {
            kind,
            generation,
            positions,
            elapsed,
        } = result;
        let node_count = positions.len();
        if !self.store.complete(kind, generation, positions) {
            return false;
        }
        log::info!(
            "{kind} layout ready: {node_count} nodes in {:.1} ms",
            elapsed.as_secs_f64() * 1000.0
        );
        true
    }

    /// Drains finished computations. Returns true when the active engine's map
    /// changed.
    pub fn poll(&mut self) -> bool {
        let mut active_updated = false;
        while let Ok(result) = self.rx.try_recv() {
            let kind = result.kind;
            if self.accept(result) && kind == self.active {
                active_updated = true;
            }
        }
        active_updated
    }

    pub fn is_computing(&self) -> bool {
        self.store.is_computing(self.active)
    }

    pub fn any_computing(&self) -> bool {
        LayoutKind::ALL
            .into_iter()
            .any(|kind| self.store.is_computing(kind))
    }

    pub fn resolve(&self, id: &str) -> Option<Pos2> {
        self.store.resolve(self.active, id)
    }

    pub fn resolved_positions(&self) -> PositionMap {
        self.store.resolved_positions(self.active)
    }

    pub fn override_count(&self) -> usize {
        self.store.override_count(self.active)
    }

    pub fn record_drag(&mut self, id: &str, position: Pos2) -> bool {
        let recorded = self.store.record_override(self.active, id, position);
        if recorded {
            log::debug!(
                "{} override for {id} at ({:.0}, {:.0})",
                self.active,
                position.x,
                position.y
            );
        }
        recorded
    }

    pub fn node_radius(&self, node: &CharacterNode) -> f32 {
        self.active.node_radius(&self.graph, node)
    }
}

#[cfg(test)]
impl LayoutSelector {
    /// Blocks until `kind` has a map or `timeout` passes.
    fn wait_for(&mut self, kind: LayoutKind, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.store.is_computing(kind) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(result) => {
                    self.accept(result);
                }
                Err(_) => return false,
            }
        }
        self.store.is_computed(kind)
    }
}
