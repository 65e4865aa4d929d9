//! Risk-weighted A* pathfinding over the world grid
//!
//! Cost of entering a cell is `1 + risk * risk_weight`, so routes prefer
//! safer cells even when that means a longer walk. The Manhattan heuristic
//! is admissible because every step costs at least 1.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use ordered_float::OrderedFloat;

use crate::core::config::config;
use crate::core::types::GridPos;
use crate::world::map::WorldMap;

/// Node in the A* open set
#[derive(Debug, Clone, Copy)]
struct PathNode {
    pos: GridPos,
    f_cost: OrderedFloat<f32>,
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.f_cost == other.f_cost && self.pos == other.pos
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for a min-heap; ties fall through to lexicographic
        // coordinates so equal-priority pops are deterministic.
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| (other.pos.x, other.pos.y).cmp(&(self.pos.x, self.pos.y)))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find the cheapest path from `start` to `goal`
///
/// Returns the cell sequence excluding `start` and including `goal`
/// (empty when they coincide). `None` means no path exists; callers fall
/// back to naive straight-line stepping rather than treating it as fatal.
pub fn find_path(world: &WorldMap, start: GridPos, goal: GridPos) -> Option<Vec<GridPos>> {
    if !world.in_bounds(start) || !world.in_bounds(goal) {
        return None;
    }
    if start == goal {
        return Some(Vec::new());
    }

    let risk_weight = config().risk_weight;

    let mut open_set = BinaryHeap::new();
    let mut came_from: HashMap<GridPos, GridPos> = HashMap::new();
    let mut g_scores: HashMap<GridPos, f32> = HashMap::new();

    g_scores.insert(start, 0.0);
    open_set.push(PathNode {
        pos: start,
        f_cost: OrderedFloat(start.distance(&goal) as f32),
    });

    while let Some(current) = open_set.pop() {
        if current.pos == goal {
            return Some(reconstruct_path(&came_from, current.pos, start));
        }

        let current_g = *g_scores.get(&current.pos).unwrap_or(&f32::INFINITY);

        for neighbor in current.pos.neighbors() {
            if !world.in_bounds(neighbor) {
                continue;
            }

            let step_cost = 1.0 + world.risk_at(neighbor) * risk_weight;
            let tentative_g = current_g + step_cost;
            let neighbor_g = *g_scores.get(&neighbor).unwrap_or(&f32::INFINITY);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.pos);
                g_scores.insert(neighbor, tentative_g);
                open_set.push(PathNode {
                    pos: neighbor,
                    f_cost: OrderedFloat(tentative_g + neighbor.distance(&goal) as f32),
                });
            }
        }
    }

    None
}

/// Walk the came-from chain back to (but not including) the start cell
fn reconstruct_path(
    came_from: &HashMap<GridPos, GridPos>,
    mut current: GridPos,
    start: GridPos,
) -> Vec<GridPos> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        if prev == start {
            break;
        }
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Cumulative traversal cost of a path
pub fn path_cost(world: &WorldMap, path: &[GridPos]) -> f32 {
    let risk_weight = config().risk_weight;
    path.iter()
        .map(|pos| 1.0 + world.risk_at(*pos) * risk_weight)
        .sum()
}
