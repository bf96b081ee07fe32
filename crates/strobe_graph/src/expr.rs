//! Expression trees of the elaborated design graph.
//!
//! Expressions are produced by the front-end with all names resolved to
//! [`SymbolId`]s and all types folded down to an optional bit width. A width
//! of `None` means the elaborated type carries no width information; consumers
//! treat such expressions as 64 bits wide.

use crate::ids::SymbolId;
use serde::{Deserialize, Serialize};

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Bitwise complement (`~`).
    BitNot,
    /// Logical negation (`!`).
    LogicNot,
    /// Arithmetic negation (`-`).
    Neg,
    /// Reduction AND (`&`).
    RedAnd,
    /// Reduction OR (`|`).
    RedOr,
    /// Reduction XOR (`^`).
    RedXor,
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Addition (`+`).
    Add,
    /// Subtraction (`-`).
    Sub,
    /// Multiplication (`*`).
    Mul,
    /// Division (`/`).
    Div,
    /// Modulo (`%`).
    Mod,
    /// Exponentiation (`**`).
    Pow,
    /// Bitwise AND (`&`).
    And,
    /// Bitwise OR (`|`).
    Or,
    /// Bitwise XOR (`^`).
    Xor,
    /// Left shift (`<<`).
    Shl,
    /// Right shift (`>>`).
    Shr,
    /// Equality (`==`).
    Eq,
    /// Inequality (`!=`).
    Ne,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Le,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Ge,
    /// Logical AND (`&&`).
    LogicAnd,
    /// Logical OR (`||`).
    LogicOr,
}

/// An expression in the elaborated design graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A sized integer literal.
    IntLiteral {
        /// The literal value.
        value: u64,
        /// The elaborated bit width, if the type carries one.
        width: Option<u32>,
    },
    /// An unbased, unsized literal (`'0`, `'1`), already folded to an integer.
    UnsizedLiteral {
        /// The folded value.
        value: u64,
        /// The context-determined bit width, if known.
        width: Option<u32>,
    },
    /// A resolved reference to a net or parameter.
    Named(SymbolId),
    /// A string literal. Only meaningful as a system-call argument.
    StringLiteral(String),
    /// A unary operation.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
        /// The elaborated result width, if the type carries one.
        width: Option<u32>,
    },
    /// A binary operation.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// The left operand.
        lhs: Box<Expr>,
        /// The right operand.
        rhs: Box<Expr>,
        /// The elaborated result width, if the type carries one.
        width: Option<u32>,
    },
    /// An assignment (`lhs = rhs` or `lhs <= rhs`) used as a statement.
    Assignment {
        /// The target expression; must resolve to a net symbol.
        lhs: Box<Expr>,
        /// The driven value.
        rhs: Box<Expr>,
        /// `true` for a non-blocking assignment (`<=`).
        non_blocking: bool,
    },
    /// A function or system-task call such as `$time` or `$finish`.
    Call {
        /// The callee name, including the `$` prefix for system calls.
        name: String,
        /// The argument expressions.
        args: Vec<Expr>,
        /// `true` if this is a system call.
        system: bool,
    },
    /// A width or sign conversion. Evaluation passes straight through.
    Conversion {
        /// The converted operand.
        operand: Box<Expr>,
        /// The conversion's target width, if the type carries one.
        width: Option<u32>,
    },
}

impl Expr {
    /// Returns the symbol a plain reference resolves to, looking through
    /// conversions. `None` for anything that is not a simple name.
    pub fn symbol(&self) -> Option<SymbolId> {
        match self {
            Expr::Named(sym) => Some(*sym),
            Expr::Conversion { operand, .. } => operand.symbol(),
            _ => None,
        }
    }

    /// Returns `true` if this is a call to the named system task or function.
    pub fn is_system_call(&self, callee: &str) -> bool {
        matches!(self, Expr::Call { name, system: true, .. } if name == callee)
    }
}
