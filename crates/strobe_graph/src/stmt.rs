//! Behavioral statements and timing controls.
//!
//! Statements appear in procedural blocks (`initial`, `always_comb`,
//! `always_ff`). The front-end elaborates loops and generate constructs away,
//! except for `forever`, which testbenches use for clock generation.

use crate::expr::Expr;
use serde::{Deserialize, Serialize};

/// The edge of a signal event in a sensitivity specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Any change of the observed value.
    Any,
    /// A rising edge.
    Pos,
    /// A falling edge.
    Neg,
}

/// A timing control attached to a [`Statement::Timed`] statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TimingControl {
    /// A delay (`#expr`) in ticks.
    Delay(Expr),
    /// A signal event (`@(posedge expr)` and friends).
    SignalEvent {
        /// The observed expression; must resolve to a net symbol.
        expr: Expr,
        /// The triggering edge.
        edge: EdgeKind,
    },
    /// A list of events (`@(posedge clk or negedge rstn)`).
    EventList(Vec<TimingControl>),
}

/// A behavioral statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// A `begin ... end` block wrapping a body.
    Block(Box<Statement>),
    /// A sequence of statements in source order.
    List(Vec<Statement>),
    /// An if/else statement.
    Conditional {
        /// The branch condition.
        condition: Expr,
        /// Executed when the condition is nonzero.
        if_true: Box<Statement>,
        /// Executed otherwise, when present.
        if_false: Option<Box<Statement>>,
    },
    /// A statement guarded by a timing control (`#5 x = 1;`, `@(posedge clk) ...`).
    Timed {
        /// The timing control.
        control: TimingControl,
        /// The guarded statement.
        body: Box<Statement>,
    },
    /// An expression evaluated for its effect (assignment or call).
    Expr(Expr),
    /// An infinite loop. Testbenches use it for periodic clocks.
    Forever(Box<Statement>),
    /// An empty statement.
    Empty,
}

impl Statement {
    /// Looks through `begin ... end` wrappers and single-statement lists.
    pub fn strip_blocks(&self) -> &Statement {
        let mut current = self;
        loop {
            match current {
                Statement::Block(inner) => current = inner,
                Statement::List(items) if items.len() == 1 => current = &items[0],
                _ => return current,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_blocks_unwraps_nesting() {
        let stmt = Statement::Block(Box::new(Statement::List(vec![Statement::Block(Box::new(
            Statement::Empty,
        ))])));
        assert_eq!(*stmt.strip_blocks(), Statement::Empty);
    }

    #[test]
    fn strip_blocks_keeps_multi_statement_lists() {
        let stmt = Statement::Block(Box::new(Statement::List(vec![
            Statement::Empty,
            Statement::Empty,
        ])));
        assert!(matches!(stmt.strip_blocks(), Statement::List(items) if items.len() == 2));
    }

    #[test]
    fn strip_blocks_on_leaf_is_identity() {
        let stmt = Statement::Empty;
        assert_eq!(*stmt.strip_blocks(), Statement::Empty);
    }

    #[test]
    fn timed_statement_holds_control() {
        let stmt = Statement::Timed {
            control: TimingControl::Delay(Expr::IntLiteral {
                value: 5,
                width: None,
            }),
            body: Box::new(Statement::Empty),
        };
        assert!(matches!(
            stmt,
            Statement::Timed {
                control: TimingControl::Delay(_),
                ..
            }
        ));
    }

    #[test]
    fn edge_kinds_distinct() {
        assert_ne!(EdgeKind::Any, EdgeKind::Pos);
        assert_ne!(EdgeKind::Pos, EdgeKind::Neg);
        assert_ne!(EdgeKind::Any, EdgeKind::Neg);
    }

    #[test]
    fn serde_roundtrip() {
        let stmt = Statement::Conditional {
            condition: Expr::IntLiteral {
                value: 1,
                width: Some(1),
            },
            if_true: Box::new(Statement::Empty),
            if_false: None,
        };
        let json = serde_json::to_string(&stmt).unwrap();
        let back: Statement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stmt);
    }
}
