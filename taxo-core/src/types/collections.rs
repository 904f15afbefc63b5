//! Fast hash collection aliases.
//!
//! FxHash is not DoS-resistant, which is fine here: keys are internal
//! group ids and dataset identifiers, never attacker-controlled input.

pub use rustc_hash::{FxHashMap, FxHashSet};
