//! Top-level design container.
//!
//! A [`Design`] is the complete output of the front-end: every value symbol
//! and every elaborated instance, plus the ID of the top instance. Symbols
//! live in a single design-wide arena so a symbol can be re-bound to an outer
//! net without touching the instance that declared it.

use crate::arena::Arena;
use crate::ids::{InstanceId, SymbolId};
use crate::instance::Instance;
use crate::symbol::ValueSymbol;
use serde::{Deserialize, Serialize};

/// A complete elaborated design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Design {
    /// All value symbols across all instances.
    pub symbols: Arena<SymbolId, ValueSymbol>,
    /// All elaborated instances.
    pub instances: Arena<InstanceId, Instance>,
    /// The top instance, usually the testbench.
    pub top: InstanceId,
}

impl Design {
    /// Creates a design containing a single empty top instance.
    pub fn new(top_def_name: impl Into<String>) -> Self {
        let mut instances = Arena::new();
        let top = instances.alloc(Instance::new(top_def_name));
        Self {
            symbols: Arena::new(),
            instances,
            top,
        }
    }

    /// Returns the top instance.
    pub fn top_instance(&self) -> &Instance {
        &self.instances[self.top]
    }

    /// Declares a symbol in the given instance's body and returns its ID.
    pub fn declare(&mut self, instance: InstanceId, symbol: ValueSymbol) -> SymbolId {
        let id = self.symbols.alloc(symbol);
        self.instances[instance].symbols.push(id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolKind;

    #[test]
    fn new_design_has_empty_top() {
        let design = Design::new("tb");
        assert_eq!(design.instances.len(), 1);
        assert_eq!(design.top_instance().def_name, "tb");
    }

    #[test]
    fn declare_registers_symbol_in_instance() {
        let mut design = Design::new("tb");
        let top = design.top;
        let clk = design.declare(top, ValueSymbol::net("clk", 1));
        assert_eq!(design.top_instance().symbols, vec![clk]);
        assert!(matches!(
            design.symbols[clk].kind,
            SymbolKind::Net { width: 1, .. }
        ));
    }

    #[test]
    fn declare_in_child_instance() {
        let mut design = Design::new("tb");
        let child = design.instances.alloc(Instance::new("dut"));
        let a = design.declare(child, ValueSymbol::net("a", 8));
        assert!(design.top_instance().symbols.is_empty());
        assert_eq!(design.instances[child].symbols, vec![a]);
    }

    #[test]
    fn serde_roundtrip() {
        let mut design = Design::new("tb");
        let top = design.top;
        design.declare(top, ValueSymbol::net("clk", 1));
        design.declare(top, ValueSymbol::param("PERIOD", 10));
        let json = serde_json::to_string(&design).unwrap();
        let back: Design = serde_json::from_str(&json).unwrap();
        assert_eq!(back.symbols.len(), 2);
        assert_eq!(back.top, design.top);
    }
}
