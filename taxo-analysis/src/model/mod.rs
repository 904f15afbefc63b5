//! Data model: equipment-type groups, the id-addressed arena, and the
//! facility-to-code lookup contract.

pub mod arena;
pub mod group;
pub mod lookup;

pub use arena::GroupArena;
pub use group::{EquipmentType, SeedGroup};
pub use lookup::{CodeLookup, CodeObservation};
