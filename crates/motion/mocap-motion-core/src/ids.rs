//! Identifiers and simple allocators for core entities.

use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable, serializable id of a motion table.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(String);

impl TableId {
    /// Fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Id of a target body owned by the host scene.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyId(String);

impl BodyId {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! string_id_conversions {
    ($ty:ident) => {
        impl From<&str> for $ty {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $ty {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id_conversions!(TableId);
string_id_conversions!(BodyId);

/// Process-local identity of a binding inside its group.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct BindingId(pub u32);

/// Process-local identity of a binding group inside a manager.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub u32);

/// Bindings and groups are built outside any manager, so their ids are
/// handed out process-wide and never collide.
static NEXT_BINDING: AtomicU32 = AtomicU32::new(0);
static NEXT_GROUP: AtomicU32 = AtomicU32::new(0);

impl BindingId {
    pub(crate) fn next() -> Self {
        Self(NEXT_BINDING.fetch_add(1, Ordering::Relaxed))
    }
}

impl GroupId {
    pub(crate) fn next() -> Self {
        Self(NEXT_GROUP.fetch_add(1, Ordering::Relaxed))
    }
}
