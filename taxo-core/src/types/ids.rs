//! Stable identifiers for groups, facilities, and discriminating codes.
//!
//! Group ids are assigned once at seed creation and never reused, even
//! after the group is merged away. All group storage is addressed by
//! `GroupId` through the arena, never by direct reference.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable integer identifier for an equipment-type group.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GroupId(pub u32);

impl GroupId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for GroupId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Facility identifier as it appears in the source dataset.
pub type FacilityId = String;

/// Discriminating code (UDC) identifier from the validation dataset.
pub type CodeId = String;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_id_ordering() {
        assert!(GroupId(1) < GroupId(2));
        assert_eq!(GroupId(7), GroupId::from(7));
    }

    #[test]
    fn test_group_id_serde_transparent() {
        let json = serde_json::to_string(&GroupId(42)).unwrap();
        assert_eq!(json, "42");
        let back: GroupId = serde_json::from_str("42").unwrap();
        assert_eq!(back, GroupId(42));
    }
}
