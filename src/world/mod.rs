//! World state: grid map, resource nodes, pathfinding and hostiles

pub mod hostiles;
pub mod map;
pub mod pathfinding;
pub mod resource;

pub use map::WorldMap;
pub use resource::{ResourceKind, ResourceNode};
