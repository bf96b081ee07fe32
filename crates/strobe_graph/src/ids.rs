//! Opaque ID newtypes for design-graph entities.
//!
//! Each ID wraps a `u32` arena slot and is `Copy` and `Hash`, so references
//! between graph nodes stay cheap and acyclic.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Wraps a raw slot index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Unwraps the raw slot index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// ID of a value symbol (net or parameter) in the design.
    SymbolId
);

define_id!(
    /// ID of an elaborated module instance in the design.
    InstanceId
);
