use std::collections::HashMap;

use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cast::{CastGraph, Faction};

use super::PositionMap;

/// Sizes nodes by importance for the prominence variant.
#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct ProminenceSizing {
    pub base_radius: f32,
    pub weight_scale: f32,
    pub min_radius: f32,
    /// Extra clearance added to the sum of two radii.
    pub padding: f32,
}

impl ProminenceSizing {
    pub fn radius(&self, weight: f32) -> f32 {
        (self.base_radius + weight * self.weight_scale).max(self.min_radius)
    }
}

/// Tuning for the force simulation. The numbers are visual starting points,
/// not derived constants.
#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct ForceParams {
    pub iterations: usize,
    /// Hard walls; positions are clamped into this box after every step.
    pub canvas: Rect,
    pub jitter: f32,
    /// Distances below this are treated as this value in the repulsion term.
    pub min_distance: f32,
    pub repulsion: f32,
    pub spring_length: f32,
    pub spring_strength: f32,
    pub gravity: f32,
    /// Lower bound on the temperature factor applied to gravity.
    pub gravity_floor: f32,
    pub damping: f32,
    pub max_speed: f32,
    pub min_temperature: f32,
    /// Spread of faction homes around the canvas centre relative to the
    /// reference layout.
    pub home_scale: f32,
    pub sizing: Option<ProminenceSizing>,
}

impl ForceParams {
    pub fn standard() -> Self {
        Self {
            iterations: 300,
            canvas: Rect::from_min_max(pos2(60.0, 40.0), pos2(1000.0, 720.0)),
            jitter: 40.0,
            min_distance: 1.0,
            repulsion: 1.0,
            spring_length: 110.0,
            spring_strength: 0.02,
            gravity: 0.03,
            gravity_floor: 0.3,
            damping: 0.8,
            max_speed: 30.0,
            min_temperature: 0.05,
            home_scale: 1.0,
            sizing: None,
        }
    }

    pub fn prominence() -> Self {
        Self {
            iterations: 300,
            canvas: Rect::from_min_max(pos2(0.0, 0.0), pos2(1400.0, 1000.0)),
            jitter: 60.0,
            min_distance: 1.0,
            repulsion: 4.0,
            spring_length: 150.0,
            spring_strength: 0.02,
            gravity: 0.025,
            gravity_floor: 0.3,
            damping: 0.8,
            max_speed: 36.0,
            min_temperature: 0.05,
            home_scale: 1.4,
            sizing: Some(ProminenceSizing {
                base_radius: 14.0,
                weight_scale: 3.0,
                min_radius: 12.0,
                padding: 20.0,
            }),
        }
    }

    /// Velocity cap once the schedule has reached its floor.
    pub fn final_speed_limit(&self) -> f32 {
        self.max_speed * self.min_temperature
    }
}

pub(in crate::app) struct ForceSimulation {
    params: ForceParams,
    ids: Vec<String>,
    positions: Vec<Pos2>,
    velocities: Vec<Vec2>,
    homes: Vec<Pos2>,
    radii: Vec<f32>,
    springs: Vec<(usize, usize)>,
    spacing_sq: f32,
    iteration: usize,
    last_max_displacement: f32,
}

impl ForceSimulation {
    pub fn new(graph: &CastGraph, params: ForceParams, seed: u64) -> Self {
        let node_count = graph.node_count();
        let homes_by_faction = faction_homes(graph, &params);
        let mut rng = StdRng::seed_from_u64(seed);

        let mut ids = Vec::with_capacity(node_count);
        let mut positions = Vec::with_capacity(node_count);
        let mut homes = Vec::with_capacity(node_count);
        let mut radii = Vec::with_capacity(node_count);
        for node in &graph.nodes {
            let home = homes_by_faction
                .get(&node.faction)
                .copied()
                .unwrap_or_else(|| params.canvas.center());
            let jitter = if params.jitter > 0.0 {
                vec2(
                    rng.gen_range(-params.jitter..=params.jitter),
                    rng.gen_range(-params.jitter..=params.jitter),
                )
            } else {
                Vec2::ZERO
            };

            ids.push(node.id.clone());
            homes.push(home);
            positions.push(params.canvas.clamp(home + jitter));
            radii.push(
                params
                    .sizing
                    .map(|sizing| sizing.radius(graph.importance(&node.id)))
                    .unwrap_or(0.0),
            );
        }

        let springs = graph
            .edges
            .iter()
            .filter_map(|edge| {
                let from = graph.index_by_id.get(&edge.from).copied()?;
                let to = graph.index_by_id.get(&edge.to).copied()?;
                (from != to).then_some((from, to))
            })
            .collect();

        let spacing_sq = if node_count > 0 {
            params.canvas.area() / node_count as f32
        } else {
            0.0
        };

        Self {
            params,
            ids,
            velocities: vec![Vec2::ZERO; positions.len()],
            positions,
            homes,
            radii,
            springs,
            spacing_sq,
            iteration: 0,
            last_max_displacement: 0.0,
        }
    }

    /// Linear cooling from 1 towards `min_temperature`.
    pub fn temperature(&self) -> f32 {
        let progress = self.iteration as f32 / self.params.iterations.max(1) as f32;
        (1.0 - progress).max(self.params.min_temperature)
    }

    pub fn last_max_displacement(&self) -> f32 {
        self.last_max_displacement
    }

    /// Repulsion numerator for a pair; the force is this over distance squared.
    fn pair_repulsion(&self, first: usize, second: usize) -> f32 {
        match self.params.sizing {
            Some(sizing) => {
                let min_separation = self.radii[first] + self.radii[second] + sizing.padding;
                self.params.repulsion * min_separation * min_separation
            }
            None => self.params.repulsion * self.spacing_sq,
        }
    }

    fn rest_length(&self, from: usize, to: usize) -> f32 {
        match self.params.sizing {
            Some(_) => self.params.spring_length + self.radii[from] + self.radii[to],
            None => self.params.spring_length,
        }
    }

    pub fn step(&mut self) {
        let node_count = self.positions.len();
        let temperature = self.temperature();
        let mut forces = vec![Vec2::ZERO; node_count];

        for i in 0..node_count {
            for j in (i + 1)..node_count {
                let delta = self.positions[i] - self.positions[j];
                let length = delta.length();
                let direction = if length > 0.0001 {
                    delta / length
                } else {
                    let angle =
                        ((i as f32) * 0.618_034 + (j as f32) * 0.414_214) * std::f32::consts::TAU;
                    vec2(angle.cos(), angle.sin())
                };
                let distance = length.max(self.params.min_distance);
                let push = direction * (self.pair_repulsion(i, j) / (distance * distance));

                forces[i] += push;
                forces[j] -= push;
            }
        }

        for &(from, to) in &self.springs {
            let delta = self.positions[to] - self.positions[from];
            let length = delta.length();
            if length <= 0.0001 {
                continue;
            }
            let direction = delta / length;
            let stretch = length - self.rest_length(from, to);
            let pull = direction * (stretch * self.params.spring_strength);

            forces[from] += pull;
            forces[to] -= pull;
        }

        let gravity = self.params.gravity * temperature.max(self.params.gravity_floor);
        for (index, force) in forces.iter_mut().enumerate() {
            *force += (self.homes[index] - self.positions[index]) * gravity;
        }

        let speed_limit = self.params.max_speed * temperature;
        let mut max_displacement = 0.0_f32;
        for (index, force) in forces.into_iter().enumerate() {
            let mut velocity = (self.velocities[index] + force) * self.params.damping;
            let speed = velocity.length();
            if speed > speed_limit {
                velocity *= speed_limit / speed;
            }

            let before = self.positions[index];
            let after = self.params.canvas.clamp(before + velocity);
            self.velocities[index] = velocity;
            self.positions[index] = after;
            max_displacement = max_displacement.max((after - before).length());
        }

        self.last_max_displacement = max_displacement;
        self.iteration += 1;
    }

    pub fn positions(&self) -> PositionMap {
        self.ids
            .iter()
            .cloned()
            .zip(self.positions.iter().copied())
            .collect()
    }

    pub fn run(mut self) -> PositionMap {
        for _ in 0..self.params.iterations {
            self.step();
        }
        log::debug!(
            "force layout settled after {} steps; last step moved {:.3} (limit {:.3})",
            self.iteration,
            self.last_max_displacement(),
            self.params.final_speed_limit()
        );
        self.positions()
    }
}

/// Faction centroids of the reference layout, shifted so the overall centroid
/// lands on the canvas centre and spread apart by `home_scale` (1.4 for the
/// prominence preset).
fn faction_homes(graph: &CastGraph, params: &ForceParams) -> HashMap<Faction, Pos2> {
    if graph.nodes.is_empty() {
        return HashMap::new();
    }

    let mut sums: HashMap<Faction, (Vec2, usize)> = HashMap::new();
    let mut total = Vec2::ZERO;
    for node in &graph.nodes {
        let entry = sums.entry(node.faction).or_insert((Vec2::ZERO, 0));
        entry.0 += node.reference.to_vec2();
        entry.1 += 1;
        total += node.reference.to_vec2();
    }
    let reference_center = total / graph.node_count() as f32;

    sums.into_iter()
        .map(|(faction, (sum, count))| {
            let centroid = sum / count as f32;
            let home =
                params.canvas.center() + (centroid - reference_center) * params.home_scale;
            (faction, params.canvas.clamp(home))
        })
        .collect()
}

pub(in crate::app) fn force_layout(
    graph: &CastGraph,
    params: &ForceParams,
    seed: u64,
) -> PositionMap {
    if graph.nodes.is_empty() {
        return PositionMap::new();
    }
    ForceSimulation::new(graph, *params, seed).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cast::fixtures::{edge, graph, node, triangle, weighted_graph};

    fn clusters() -> CastGraph {
        graph(
            vec![
                node("p1", Faction::Party, 1, 180.0, 180.0),
                node("p2", Faction::Party, 1, 220.0, 200.0),
                node("p3", Faction::Party, 1, 200.0, 230.0),
                node("m1", Faction::Media, 1, 780.0, 580.0),
                node("m2", Faction::Media, 1, 820.0, 600.0),
                node("m3", Faction::Media, 1, 800.0, 630.0),
            ],
            vec![edge("p1", "p2"), edge("m1", "m2"), edge("p3", "m3")],
        )
    }

    fn mean(positions: &PositionMap, ids: &[&str]) -> Pos2 {
        let sum = ids
            .iter()
            .map(|id| positions[*id].to_vec2())
            .fold(Vec2::ZERO, |acc, point| acc + point);
        (sum / ids.len() as f32).to_pos2()
    }

    #[test]
    fn empty_graph_short_circuits() {
        let graph = graph(Vec::new(), Vec::new());
        assert!(force_layout(&graph, &ForceParams::standard(), 1).is_empty());
        assert!(force_layout(&graph, &ForceParams::prominence(), 1).is_empty());
    }

    #[test]
    fn final_step_respects_cooled_speed_limit() {
        for params in [ForceParams::standard(), ForceParams::prominence()] {
            let mut simulation = ForceSimulation::new(&clusters(), params, 42);
            for _ in 0..params.iterations {
                simulation.step();
            }
            assert!(
                simulation.last_max_displacement() <= params.final_speed_limit() + 1e-3,
                "moved {} with limit {}",
                simulation.last_max_displacement(),
                params.final_speed_limit()
            );
        }
    }

    #[test]
    fn temperature_cools_linearly_to_floor() {
        let params = ForceParams::standard();
        let mut simulation = ForceSimulation::new(&triangle(), params, 3);
        assert_eq!(simulation.temperature(), 1.0);

        let mut previous = simulation.temperature();
        for _ in 0..params.iterations {
            simulation.step();
            let current = simulation.temperature();
            assert!(current <= previous);
            previous = current;
        }
        assert_eq!(simulation.temperature(), params.min_temperature);
    }

    #[test]
    fn pinned_seed_is_reproducible() {
        let graph = clusters();
        let params = ForceParams::standard();
        assert_eq!(force_layout(&graph, &params, 9), force_layout(&graph, &params, 9));
        assert_ne!(force_layout(&graph, &params, 9), force_layout(&graph, &params, 10));
    }

    #[test]
    fn stays_inside_canvas() {
        let graph = clusters();
        for params in [ForceParams::standard(), ForceParams::prominence()] {
            let positions = force_layout(&graph, &params, 5);
            assert!(positions.values().all(|point| params.canvas.contains(*point)));
        }
    }

    #[test]
    fn factions_settle_near_their_own_home() {
        let graph = clusters();
        let params = ForceParams::standard();
        let homes = faction_homes(&graph, &params);
        let positions = force_layout(&graph, &params, 17);

        let party = mean(&positions, &["p1", "p2", "p3"]);
        let media = mean(&positions, &["m1", "m2", "m3"]);
        let party_home = homes[&Faction::Party];
        let media_home = homes[&Faction::Media];

        assert!(party.distance(party_home) < party.distance(media_home));
        assert!(media.distance(media_home) < media.distance(party_home));
    }

    #[test]
    fn coincident_nodes_are_pushed_apart() {
        let graph = graph(
            vec![
                node("a", Faction::Party, 1, 300.0, 300.0),
                node("b", Faction::Party, 1, 300.0, 300.0),
            ],
            Vec::new(),
        );
        let params = ForceParams {
            jitter: 0.0,
            ..ForceParams::standard()
        };
        let positions = force_layout(&graph, &params, 0);
        assert!(positions["a"].distance(positions["b"]) > 10.0);
    }

    #[test]
    fn heavy_pairs_repel_harder_than_light_pairs() {
        let graph = weighted_graph(
            vec![
                node("h1", Faction::Party, 1, 0.0, 0.0),
                node("h2", Faction::Party, 1, 0.0, 0.0),
                node("l1", Faction::Party, 1, 0.0, 0.0),
                node("l2", Faction::Party, 1, 0.0, 0.0),
            ],
            Vec::new(),
            &[("h1", 10.0), ("h2", 10.0)],
        );
        let simulation = ForceSimulation::new(&graph, ForceParams::prominence(), 1);
        assert!(simulation.pair_repulsion(0, 1) > simulation.pair_repulsion(2, 3));
        assert!(simulation.rest_length(0, 1) > simulation.rest_length(2, 3));
    }

    #[test]
    fn low_weights_keep_minimum_radius() {
        let sizing = ProminenceSizing {
            base_radius: 4.0,
            weight_scale: 3.0,
            min_radius: 12.0,
            padding: 20.0,
        };
        assert_eq!(sizing.radius(0.5), 12.0);
        assert_eq!(sizing.radius(4.0), 16.0);

        let prominence = ForceParams::prominence().sizing.expect("prominence sizes nodes");
        assert!(prominence.radius(0.0001) >= prominence.min_radius);
    }
}
