//! Report artifacts over the final consolidated state.

pub mod records;
pub mod tree;

pub use records::{to_json, to_records, CodeEntry, GroupRecord};
pub use tree::{render_tree, write_tree};
