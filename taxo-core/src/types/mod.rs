//! Core type definitions.

pub mod collections;
pub mod ids;

pub use ids::{CodeId, FacilityId, GroupId};
