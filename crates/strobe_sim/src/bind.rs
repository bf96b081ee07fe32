//! The symbol binding produced by the elaboration binder.
//!
//! [`Binding`] maps every design-graph symbol to what it means at runtime:
//! a runtime signal for nets, or a folded constant for parameters. Port
//! aliasing is nothing more than binding a child's internal port symbol to
//! the outer net's signal, so reads and writes cross the hierarchy without
//! copying values.

use crate::signal::SignalId;
use strobe_graph::{Expr, Statement, SymbolId, TimingControl};

/// What a symbol resolves to at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// A runtime signal.
    Net(SignalId),
    /// A parameter's constant value.
    Const(u64),
}

/// The symbol-to-signal map for one simulation.
#[derive(Debug, Clone, Default)]
pub struct Binding {
    slots: Vec<Option<Bound>>,
}

impl Binding {
    /// Creates an empty binding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `symbol`, replacing any earlier binding.
    pub fn bind(&mut self, symbol: SymbolId, bound: Bound) {
        let index = symbol.as_raw() as usize;
        if index >= self.slots.len() {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(bound);
    }

    /// Looks up a symbol.
    pub fn get(&self, symbol: SymbolId) -> Option<Bound> {
        self.slots.get(symbol.as_raw() as usize).copied().flatten()
    }

    /// Looks up a symbol, returning its signal if it is bound to a net.
    pub fn net(&self, symbol: SymbolId) -> Option<SignalId> {
        match self.get(symbol) {
            Some(Bound::Net(signal)) => Some(signal),
            _ => None,
        }
    }
}

/// Collects the signals an expression reads, in first-read order without
/// duplicates. The left-hand side of an assignment is a write, not a read.
pub fn expr_reads(expr: &Expr, binding: &Binding) -> Vec<SignalId> {
    let mut reads = Vec::new();
    collect_expr(expr, binding, &mut reads);
    reads
}

/// Collects the signals a statement tree reads, in first-read order without
/// duplicates.
pub fn stmt_reads(stmt: &Statement, binding: &Binding) -> Vec<SignalId> {
    let mut reads = Vec::new();
    collect_stmt(stmt, binding, &mut reads);
    reads
}

fn collect_expr(expr: &Expr, binding: &Binding, out: &mut Vec<SignalId>) {
    match expr {
        Expr::Named(symbol) => {
            // Parameters are constants, not dependencies.
            if let Some(signal) = binding.net(*symbol) {
                if !out.contains(&signal) {
                    out.push(signal);
                }
            }
        }
        Expr::Unary { operand, .. } | Expr::Conversion { operand, .. } => {
            collect_expr(operand, binding, out);
        }
        Expr::Binary { lhs, rhs, .. } => {
            collect_expr(lhs, binding, out);
            collect_expr(rhs, binding, out);
        }
        Expr::Assignment { rhs, .. } => collect_expr(rhs, binding, out),
        Expr::Call { args, .. } => {
            for arg in args {
                collect_expr(arg, binding, out);
            }
        }
        Expr::IntLiteral { .. } | Expr::UnsizedLiteral { .. } | Expr::StringLiteral(_) => {}
    }
}

fn collect_stmt(stmt: &Statement, binding: &Binding, out: &mut Vec<SignalId>) {
    match stmt {
        Statement::Block(body) => collect_stmt(body, binding, out),
        Statement::List(stmts) => {
            for s in stmts {
                collect_stmt(s, binding, out);
            }
        }
        Statement::Conditional {
            condition,
            if_true,
            if_false,
        } => {
            collect_expr(condition, binding, out);
            collect_stmt(if_true, binding, out);
            if let Some(if_false) = if_false {
                collect_stmt(if_false, binding, out);
            }
        }
        Statement::Timed { control, body } => {
            if let TimingControl::Delay(delay) = control {
                collect_expr(delay, binding, out);
            }
            collect_stmt(body, binding, out);
        }
        Statement::Expr(expr) => collect_expr(expr, binding, out),
        Statement::Forever(_) | Statement::Empty => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(raw: u32) -> SignalId {
        SignalId::from_raw(raw)
    }

    fn sym(raw: u32) -> SymbolId {
        SymbolId::from_raw(raw)
    }

    #[test]
    fn bind_and_lookup() {
        let mut binding = Binding::new();
        binding.bind(sym(2), Bound::Net(sid(0)));
        binding.bind(sym(5), Bound::Const(10));
        assert_eq!(binding.net(sym(2)), Some(sid(0)));
        assert_eq!(binding.get(sym(5)), Some(Bound::Const(10)));
        assert_eq!(binding.get(sym(3)), None);
    }

    #[test]
    fn rebind_replaces() {
        // Port aliasing re-points an inner symbol at the outer net.
        let mut binding = Binding::new();
        binding.bind(sym(0), Bound::Net(sid(7)));
        binding.bind(sym(0), Bound::Net(sid(1)));
        assert_eq!(binding.net(sym(0)), Some(sid(1)));
    }

    #[test]
    fn const_is_not_a_net() {
        let mut binding = Binding::new();
        binding.bind(sym(0), Bound::Const(42));
        assert_eq!(binding.net(sym(0)), None);
    }

    #[test]
    fn expr_reads_dedups_in_order() {
        let mut binding = Binding::new();
        binding.bind(sym(0), Bound::Net(sid(10)));
        binding.bind(sym(1), Bound::Net(sid(11)));
        // a + (b + a)
        let expr = Expr::Binary {
            op: strobe_graph::BinaryOp::Add,
            lhs: Box::new(Expr::Named(sym(0))),
            rhs: Box::new(Expr::Binary {
                op: strobe_graph::BinaryOp::Add,
                lhs: Box::new(Expr::Named(sym(1))),
                rhs: Box::new(Expr::Named(sym(0))),
                width: None,
            }),
            width: None,
        };
        assert_eq!(expr_reads(&expr, &binding), vec![sid(10), sid(11)]);
    }

    #[test]
    fn assignment_lhs_is_not_a_read() {
        let mut binding = Binding::new();
        binding.bind(sym(0), Bound::Net(sid(0)));
        binding.bind(sym(1), Bound::Net(sid(1)));
        let assign = Expr::Assignment {
            lhs: Box::new(Expr::Named(sym(0))),
            rhs: Box::new(Expr::Named(sym(1))),
            non_blocking: false,
        };
        assert_eq!(expr_reads(&assign, &binding), vec![sid(1)]);
    }

    #[test]
    fn params_are_not_reads() {
        let mut binding = Binding::new();
        binding.bind(sym(0), Bound::Const(8));
        let expr = Expr::Named(sym(0));
        assert!(expr_reads(&expr, &binding).is_empty());
    }

    #[test]
    fn stmt_reads_covers_conditionals() {
        let mut binding = Binding::new();
        binding.bind(sym(0), Bound::Net(sid(0)));
        binding.bind(sym(1), Bound::Net(sid(1)));
        binding.bind(sym(2), Bound::Net(sid(2)));
        let stmt = Statement::Conditional {
            condition: Expr::Named(sym(0)),
            if_true: Box::new(Statement::Expr(Expr::Assignment {
                lhs: Box::new(Expr::Named(sym(2))),
                rhs: Box::new(Expr::Named(sym(1))),
                non_blocking: true,
            })),
            if_false: None,
        };
        assert_eq!(stmt_reads(&stmt, &binding), vec![sid(0), sid(1)]);
    }
}
