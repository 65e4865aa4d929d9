//! World grid: terrain, per-cell risk, resource nodes and the day clock
//!
//! The map is a fixed rectangle of tiles. Each tile carries a risk scalar
//! in `[0, 1]` that the pathfinder turns into traversal cost. The square
//! camp region centered on the camp anchor is always risk 0.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::config;
use crate::core::types::{Day, GridPos};
use crate::world::resource::{ResourceKind, ResourceNode};

/// What occupies a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terrain {
    Open,
    Camp,
    Node(ResourceKind),
}

/// A single world cell
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: Terrain,
    /// Danger scalar in [0, 1]; the pathfinder weighs it into step cost
    pub risk: f32,
}

/// Per-kind node placement parameters: (count, stock, respawn days, risk)
const NODE_PLACEMENTS: [(ResourceKind, usize, u32, u32, f32); 6] = [
    (ResourceKind::Wood, 10, 50, 3, 0.2),
    (ResourceKind::Stone, 8, 40, 4, 0.3),
    (ResourceKind::Food, 6, 30, 2, 0.1),
    (ResourceKind::Water, 1, 100, 1, 0.05),
    (ResourceKind::Fiber, 6, 35, 3, 0.1),
    (ResourceKind::Metal, 4, 20, 5, 0.5),
];

/// Baseline risk for open terrain before jitter
const OPEN_RISK: f32 = 0.1;

/// Seeded risk jitter applied to non-camp tiles
const RISK_JITTER: f32 = 0.05;

/// The authoritative world state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldMap {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Tile>,
    pub resource_nodes: Vec<ResourceNode>,
    /// Center of the camp square
    pub camp_center: GridPos,
    pub day: Day,
}

impl WorldMap {
    /// Generate a world from the injected RNG
    ///
    /// Node placement and per-tile risk jitter consume the RNG, so two maps
    /// generated from equal seeds are identical.
    pub fn generate(rng: &mut ChaCha8Rng) -> Self {
        let cfg = config();
        let width = cfg.map_width;
        let height = cfg.map_height;
        let camp_center = GridPos::new(width / 2, height / 2);

        let mut world = Self {
            width,
            height,
            tiles: vec![
                Tile {
                    terrain: Terrain::Open,
                    risk: OPEN_RISK,
                };
                (width * height) as usize
            ],
            resource_nodes: Vec::new(),
            camp_center,
            day: 0,
        };

        // Jitter open-terrain risk, then carve the safe camp square
        for y in 0..height {
            for x in 0..width {
                let jitter = rng.gen_range(-RISK_JITTER..=RISK_JITTER);
                let pos = GridPos::new(x, y);
                if let Some(tile) = world.tile_mut(pos) {
                    tile.risk = (OPEN_RISK + jitter).clamp(0.0, 1.0);
                }
            }
        }
        for pos in world.camp_cells() {
            if let Some(tile) = world.tile_mut(pos) {
                tile.terrain = Terrain::Camp;
                tile.risk = 0.0;
            }
        }

        // Scatter resource nodes on free open tiles
        for (kind, count, stock, respawn, base_risk) in NODE_PLACEMENTS {
            let mut placed = 0;
            let mut attempts = 0;
            while placed < count && attempts < 200 {
                attempts += 1;
                let pos = GridPos::new(rng.gen_range(0..width), rng.gen_range(0..height));
                let free = matches!(
                    world.tile(pos).map(|t| t.terrain),
                    Some(Terrain::Open)
                );
                if !free {
                    continue;
                }
                let jitter = rng.gen_range(-RISK_JITTER..=RISK_JITTER);
                if let Some(tile) = world.tile_mut(pos) {
                    tile.terrain = Terrain::Node(kind);
                    tile.risk = (base_risk + jitter).clamp(0.0, 1.0);
                }
                world
                    .resource_nodes
                    .push(ResourceNode::new(kind, pos, stock, respawn));
                placed += 1;
            }
        }

        world
    }

    /// Build a bare map with uniform risk and no resource nodes
    ///
    /// Useful for scripted scenarios where generation noise would get in
    /// the way; the camp square is still positioned at the center.
    pub fn flat(width: i32, height: i32, risk: f32) -> Self {
        Self {
            width,
            height,
            tiles: vec![
                Tile {
                    terrain: Terrain::Open,
                    risk: risk.clamp(0.0, 1.0),
                };
                (width * height) as usize
            ],
            resource_nodes: Vec::new(),
            camp_center: GridPos::new(width / 2, height / 2),
            day: 0,
        }
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    fn tile_index(&self, pos: GridPos) -> Option<usize> {
        if self.in_bounds(pos) {
            Some((pos.y * self.width + pos.x) as usize)
        } else {
            None
        }
    }

    pub fn tile(&self, pos: GridPos) -> Option<&Tile> {
        self.tile_index(pos).and_then(|i| self.tiles.get(i))
    }

    fn tile_mut(&mut self, pos: GridPos) -> Option<&mut Tile> {
        self.tile_index(pos).and_then(|i| self.tiles.get_mut(i))
    }

    /// Risk of a cell; out-of-bounds cells report maximum risk
    pub fn risk_at(&self, pos: GridPos) -> f32 {
        self.tile(pos).map_or(1.0, |t| t.risk)
    }

    /// Cells of the fixed square camp region
    pub fn camp_cells(&self) -> Vec<GridPos> {
        let cfg = config();
        let half = cfg.camp_size / 2;
        let origin = GridPos::new(self.camp_center.x - half, self.camp_center.y - half);
        let mut cells = Vec::with_capacity((cfg.camp_size * cfg.camp_size) as usize);
        for cy in 0..cfg.camp_size {
            for cx in 0..cfg.camp_size {
                let pos = GridPos::new(origin.x + cx, origin.y + cy);
                if self.in_bounds(pos) {
                    cells.push(pos);
                }
            }
        }
        cells
    }

    /// Origin (top-left) of the camp square, for camp-local coordinates
    pub fn camp_origin(&self) -> GridPos {
        let half = config().camp_size / 2;
        GridPos::new(self.camp_center.x - half, self.camp_center.y - half)
    }

    /// True iff the cell lies within the camp square
    pub fn is_in_camp(&self, pos: GridPos) -> bool {
        let cfg = config();
        let origin = self.camp_origin();
        pos.x >= origin.x
            && pos.x < origin.x + cfg.camp_size
            && pos.y >= origin.y
            && pos.y < origin.y + cfg.camp_size
    }

    /// Closest live node of a kind by Manhattan distance
    ///
    /// Ties break by insertion order (first placed wins), which keeps the
    /// search deterministic.
    pub fn find_closest_resource(&self, from: GridPos, kind: ResourceKind) -> Option<&ResourceNode> {
        let mut best: Option<(&ResourceNode, i32)> = None;
        for node in &self.resource_nodes {
            if node.kind != kind || node.depleted {
                continue;
            }
            let dist = node.pos.distance(&from);
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((node, dist)),
            }
        }
        best.map(|(node, _)| node)
    }

    /// Live node at an exact cell, mutable for harvesting
    pub fn node_at_mut(&mut self, pos: GridPos) -> Option<&mut ResourceNode> {
        self.resource_nodes
            .iter_mut()
            .find(|n| n.pos == pos && !n.depleted)
    }

    /// Advance the day counter and tick node respawns
    pub fn advance_day(&mut self) {
        self.day += 1;
        for node in &mut self.resource_nodes {
            node.advance_day();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn world(seed: u64) -> WorldMap {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        WorldMap::generate(&mut rng)
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = world(11);
        let b = world(11);
        assert_eq!(a.resource_nodes.len(), b.resource_nodes.len());
        for (na, nb) in a.resource_nodes.iter().zip(&b.resource_nodes) {
            assert_eq!(na.pos, nb.pos);
            assert_eq!(na.kind, nb.kind);
        }
        for y in 0..a.height {
            for x in 0..a.width {
                let pos = GridPos::new(x, y);
                assert_eq!(a.risk_at(pos), b.risk_at(pos));
            }
        }
    }

    #[test]
    fn test_camp_square_is_safe() {
        let w = world(3);
        for pos in w.camp_cells() {
            assert!(w.is_in_camp(pos));
            assert_eq!(w.risk_at(pos), 0.0);
        }
        assert!(!w.is_in_camp(GridPos::new(0, 0)));
    }

    #[test]
    fn test_nodes_never_land_in_camp() {
        let w = world(17);
        for node in &w.resource_nodes {
            assert!(!w.is_in_camp(node.pos), "node at {:?} inside camp", node.pos);
        }
    }

    #[test]
    fn test_closest_resource_picks_minimum_distance() {
        let mut w = world(5);
        w.resource_nodes.clear();
        w.resource_nodes
            .push(ResourceNode::new(ResourceKind::Wood, GridPos::new(1, 1), 10, 3));
        w.resource_nodes
            .push(ResourceNode::new(ResourceKind::Wood, GridPos::new(5, 5), 10, 3));

        let found = w
            .find_closest_resource(GridPos::new(6, 6), ResourceKind::Wood)
            .unwrap();
        assert_eq!(found.pos, GridPos::new(5, 5));
    }

    #[test]
    fn test_depleted_nodes_excluded_until_respawn() {
        let mut w = world(5);
        w.resource_nodes.clear();
        w.resource_nodes
            .push(ResourceNode::new(ResourceKind::Food, GridPos::new(2, 2), 2, 1));

        let pos = GridPos::new(2, 2);
        w.node_at_mut(pos).unwrap().harvest(5);
        assert!(w.find_closest_resource(pos, ResourceKind::Food).is_none());
        assert!(w.node_at_mut(pos).is_none());

        w.advance_day();
        assert!(w.find_closest_resource(pos, ResourceKind::Food).is_some());
    }

    #[test]
    fn test_closest_resource_tie_breaks_by_insertion() {
        let mut w = world(5);
        w.resource_nodes.clear();
        w.resource_nodes
            .push(ResourceNode::new(ResourceKind::Stone, GridPos::new(0, 4), 5, 3));
        w.resource_nodes
            .push(ResourceNode::new(ResourceKind::Stone, GridPos::new(4, 0), 5, 3));

        // Both are distance 4 from the origin corner
        let found = w
            .find_closest_resource(GridPos::new(0, 0), ResourceKind::Stone)
            .unwrap();
        assert_eq!(found.pos, GridPos::new(0, 4));
    }

    #[test]
    fn test_out_of_bounds_risk_is_max() {
        let w = world(5);
        assert_eq!(w.risk_at(GridPos::new(-1, 0)), 1.0);
        assert_eq!(w.risk_at(GridPos::new(w.width, 0)), 1.0);
    }
}
