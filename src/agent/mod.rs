//! Agent state: stats, needs, inventory, equipment, camp and progression

pub mod camp;
pub mod crafting;
pub mod equipment;
pub mod inventory;
pub mod needs;
pub mod perks;
pub mod state;
pub mod stats;

pub use state::AgentState;
