//! Value symbols and ports.
//!
//! A [`ValueSymbol`] is any named value declared in an instance body: a net
//! holding a simulated value, or a parameter already folded to a constant by
//! elaboration. Ports expose a symbol at an instance boundary.

use crate::expr::Expr;
use crate::ids::SymbolId;
use serde::{Deserialize, Serialize};

/// What a [`ValueSymbol`] stands for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SymbolKind {
    /// A named net of a declared bit width.
    Net {
        /// The declared width in bits. Valid designs use 1 through 64.
        width: u32,
        /// An optional initializer evaluated before simulation starts.
        init: Option<Expr>,
    },
    /// An elaborated parameter folded to a constant integer.
    Param {
        /// The constant value.
        value: u64,
    },
}

/// A named value declared in an instance body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSymbol {
    /// The declared name.
    pub name: String,
    /// Net or parameter.
    pub kind: SymbolKind,
}

impl ValueSymbol {
    /// Creates a net symbol without an initializer.
    pub fn net(name: impl Into<String>, width: u32) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Net { width, init: None },
        }
    }

    /// Creates a parameter symbol with a folded constant value.
    pub fn param(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Param { value },
        }
    }
}

/// The direction of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Data flows into the instance.
    In,
    /// Data flows out of the instance.
    Out,
    /// Bidirectional.
    InOut,
    /// A reference port.
    Ref,
}

/// A port in an instance's external interface.
///
/// The port's `internal` symbol is the net the instance body reads and
/// writes; binding a connection makes that symbol an alias of the outer net.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// The port name.
    pub name: String,
    /// The direction of data flow.
    pub direction: PortDirection,
    /// The symbol inside the instance body that backs this port.
    pub internal: SymbolId,
}
