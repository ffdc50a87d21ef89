use eframe::egui::{Pos2, pos2};

use crate::cast::{CastGraph, CharacterNode, Faction};

use super::PositionMap;

/// Groups larger than this are split into two side-by-side lanes.
const SINGLE_LANE_LIMIT: usize = 2;

#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct ColumnParams {
    pub origin: Pos2,
    pub column_pitch: f32,
    /// Horizontal distance from the column centre to each sub-lane.
    pub lane_offset: f32,
    pub row_pitch: f32,
    pub group_gap: f32,
}

impl Default for ColumnParams {
    fn default() -> Self {
        Self {
            origin: pos2(120.0, 80.0),
            column_pitch: 260.0,
            lane_offset: 45.0,
            row_pitch: 80.0,
            group_gap: 50.0,
        }
    }
}

/// One column per book (ascending), factions stacked top to bottom in
/// [`Faction::ALL`] order. Members keep dataset order inside their group.
pub(in crate::app) fn column_layout(graph: &CastGraph, params: &ColumnParams) -> PositionMap {
    let mut positions = PositionMap::with_capacity(graph.node_count());

    for (column, book) in graph.books().into_iter().enumerate() {
        let column_x = params.origin.x + column as f32 * params.column_pitch;
        let mut cursor_y = params.origin.y;

        for faction in Faction::ALL {
            let members = graph
                .nodes
                .iter()
                .filter(|node| node.book == book && node.faction == faction)
                .collect::<Vec<&CharacterNode>>();
            if members.is_empty() {
                continue;
            }

            let split = members.len() > SINGLE_LANE_LIMIT;
            for (slot, member) in members.iter().enumerate() {
                let (x, row) = if split {
                    let side = if slot % 2 == 0 { -1.0 } else { 1.0 };
                    (column_x + side * params.lane_offset, slot / 2)
                } else {
                    (column_x, slot)
                };
                positions.insert(
                    member.id.clone(),
                    pos2(x, cursor_y + row as f32 * params.row_pitch),
                );
            }

            let rows = if split {
                members.len().div_ceil(2)
            } else {
                members.len()
            };
            cursor_y += rows as f32 * params.row_pitch + params.group_gap;
        }
    }

    positions
}
