//! Elaborated module instances.
//!
//! The front-end elaborates the module hierarchy into a tree of [`Instance`]s.
//! Instances of the same module definition each appear as their own node, so
//! the graph never shares bodies between instantiations.

use crate::expr::Expr;
use crate::ids::{InstanceId, SymbolId};
use crate::stmt::Statement;
use crate::symbol::Port;
use serde::{Deserialize, Serialize};

/// The kind of a procedural block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// A testbench `initial` block, executed once along the time axis.
    Initial,
    /// Combinational logic sensitive to everything it reads.
    AlwaysComb,
    /// Edge-triggered sequential logic.
    AlwaysFF,
}

/// A procedural block in an instance body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProceduralBlock {
    /// The block kind.
    pub kind: BlockKind,
    /// The block body.
    pub body: Statement,
}

/// A continuous assignment (`assign lhs = rhs;`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousAssign {
    /// The assignment expression; always [`Expr::Assignment`] in valid graphs.
    pub assign: Expr,
}

/// One port connection of a child instantiation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortConnection {
    /// The name of the connected port on the child.
    pub port: String,
    /// The outer actual expression, or `None` for an unconnected port.
    pub actual: Option<Expr>,
}

/// A child instantiation inside an instance body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildInstance {
    /// The instantiation name.
    pub name: String,
    /// The instantiated child.
    pub instance: InstanceId,
    /// The port connections.
    pub connections: Vec<PortConnection>,
}

/// One elaborated module instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// The name of the module definition this instance was elaborated from.
    pub def_name: String,
    /// The value symbols declared in this instance's body, in source order.
    pub symbols: Vec<SymbolId>,
    /// The external port interface.
    pub ports: Vec<Port>,
    /// Continuous assignments in the body.
    pub assigns: Vec<ContinuousAssign>,
    /// Procedural blocks in the body.
    pub blocks: Vec<ProceduralBlock>,
    /// Child instantiations.
    pub children: Vec<ChildInstance>,
}

impl Instance {
    /// Creates an empty instance for the given definition name.
    pub fn new(def_name: impl Into<String>) -> Self {
        Self {
            def_name: def_name.into(),
            symbols: Vec::new(),
            ports: Vec::new(),
            assigns: Vec::new(),
            blocks: Vec::new(),
            children: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_instance_is_empty() {
        let inst = Instance::new("adder");
        assert_eq!(inst.def_name, "adder");
        assert!(inst.symbols.is_empty());
        assert!(inst.ports.is_empty());
        assert!(inst.blocks.is_empty());
        assert!(inst.children.is_empty());
    }

    #[test]
    fn block_kinds_distinct() {
        assert_ne!(BlockKind::Initial, BlockKind::AlwaysComb);
        assert_ne!(BlockKind::AlwaysComb, BlockKind::AlwaysFF);
        assert_ne!(BlockKind::Initial, BlockKind::AlwaysFF);
    }

    #[test]
    fn unconnected_port_has_no_actual() {
        let conn = PortConnection {
            port: "sum".to_string(),
            actual: None,
        };
        assert!(conn.actual.is_none());
    }

    #[test]
    fn serde_roundtrip() {
        let mut inst = Instance::new("top");
        inst.symbols.push(SymbolId::from_raw(0));
        inst.children.push(ChildInstance {
            name: "u0".to_string(),
            instance: InstanceId::from_raw(1),
            connections: vec![PortConnection {
                port: "clk".to_string(),
                actual: Some(Expr::Named(SymbolId::from_raw(0))),
            }],
        });
        let json = serde_json::to_string(&inst).unwrap();
        let back: Instance = serde_json::from_str(&json).unwrap();
        assert_eq!(back, inst);
    }
}
