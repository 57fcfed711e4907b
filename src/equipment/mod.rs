//! Equipment stat application and crafting.

pub mod system;

pub use system::{CraftOutcome, EquipmentSystem};
