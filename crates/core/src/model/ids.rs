//! Stable arena indices.
//!
//! Every entity of an import batch lives in a slot of one of the graph's
//! arenas. Holders capture the index, never a reference, so a slot can go from
//! placeholder to complete without invalidating anyone who looked it up early.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

arena_id!(
    /// One per fully qualified name per batch.
    ClassId,
    "class"
);
arena_id!(MemberId, "member");
arena_id!(TypeVarId, "tvar");
arena_id!(AccessId, "access");
