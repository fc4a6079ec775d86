//! Expression evaluation.
//!
//! | kind            | value                                        |
//! |-----------------|----------------------------------------------|
//! | literal         | the literal                                  |
//! | paren, cast     | the inner value, unchanged                   |
//! | identifier      | the binding (an address for arrays)          |
//! | `+x`, `-x`      | identity, wrapping negation                  |
//! | `*p`            | heap word at `p`                             |
//! | `sizeof(T)`     | fixed per type category                      |
//! | `a + b` etc.    | both sides left to right, then the operator  |
//! | `lhs = rhs`     | `rhs` first, then the store; yields `rhs`    |
//! | `a[i]`          | heap word at `a + i * WORD_SIZE`             |

use cwalk_ir::{BinaryOp, NodeId, NodeKind, UnaryOp, WORD_SIZE};

use super::Interpreter;
use crate::errors::{malformed_ast, unsupported_operator};
use crate::stack::ensure_sufficient_stack;
use crate::{EvalErrorKind, EvalResult, Value};

impl Interpreter<'_> {
    /// Evaluate an expression node with stack safety.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn eval(&mut self, node: NodeId) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(node))
    }

    fn eval_inner(&mut self, id: NodeId) -> EvalResult {
        self.stats.count_expression();
        let node = *self.program().node(id);
        match node.kind {
            NodeKind::IntLit(value) | NodeKind::CharLit(value) => Ok(value),
            NodeKind::Paren(inner) | NodeKind::Cast(inner) => self.eval(inner),
            NodeKind::DeclRef(decl) => self.env.get_value(decl),
            NodeKind::Unary { op, operand } => {
                let value = self.eval(operand)?;
                self.eval_unary(op, value)
            }
            NodeKind::SizeOf(ty) => Ok(ty.size_of()),
            NodeKind::Binary {
                op: BinaryOp::Assign,
                left,
                right,
            } => self.eval_assign(left, right),
            NodeKind::Binary { op, left, right } => {
                let lhs = self.eval(left)?;
                let rhs = self.eval(right)?;
                evaluate_binary(op, lhs, rhs)
            }
            NodeKind::Subscript { base, index } => {
                let address = self.element_address(base, index)?;
                Ok(self.heap.read(address)?)
            }
            NodeKind::Call { callee, args } => self.eval_call(id, callee, args),
            NodeKind::Block(_)
            | NodeKind::DeclStmt(_)
            | NodeKind::If { .. }
            | NodeKind::While { .. }
            | NodeKind::For { .. }
            | NodeKind::Return(_)
            | NodeKind::Empty => Err(malformed_ast(id, "statement in expression position")),
        }
    }

    fn eval_unary(&mut self, op: UnaryOp, value: Value) -> EvalResult {
        match op {
            UnaryOp::Plus => Ok(value),
            UnaryOp::Minus => Ok(value.wrapping_neg()),
            UnaryOp::Deref => Ok(self.heap.read(value)?),
            UnaryOp::Not | UnaryOp::BitNot | UnaryOp::AddrOf => {
                Err(unsupported_operator(op.as_symbol()))
            }
        }
    }

    /// `left = right`: evaluate the right side, then store through the
    /// target's own kind.
    fn eval_assign(&mut self, left: NodeId, right: NodeId) -> EvalResult {
        let value = self.eval(right)?;
        self.store(left, value)?;
        Ok(value)
    }

    fn store(&mut self, target: NodeId, value: Value) -> EvalResult<()> {
        match self.program().node(target).kind {
            NodeKind::DeclRef(decl) => self.env.set_value(decl, value),
            NodeKind::Subscript { base, index } => {
                let address = self.element_address(base, index)?;
                Ok(self.heap.write(address, value)?)
            }
            NodeKind::Unary {
                op: UnaryOp::Deref,
                operand,
            } => {
                let address = self.eval(operand)?;
                Ok(self.heap.write(address, value)?)
            }
            NodeKind::Paren(inner) => self.store(inner, value),
            _ => Err(EvalErrorKind::InvalidAssignmentTarget { node: target }.into()),
        }
    }

    /// Address of `base[index]`. The stride is `WORD_SIZE` for every
    /// element type, `char` included.
    fn element_address(&mut self, base: NodeId, index: NodeId) -> EvalResult {
        let base = self.eval(base)?;
        let index = self.eval(index)?;
        Ok(base.wrapping_add(index.wrapping_mul(WORD_SIZE)))
    }
}

/// Apply a non-assignment binary operator to two evaluated operands.
///
/// Arithmetic wraps on overflow; comparisons yield 0 or 1.
pub fn evaluate_binary(op: BinaryOp, lhs: Value, rhs: Value) -> EvalResult {
    let value = match op {
        BinaryOp::Add => lhs.wrapping_add(rhs),
        BinaryOp::Sub => lhs.wrapping_sub(rhs),
        BinaryOp::Mul => lhs.wrapping_mul(rhs),
        BinaryOp::Lt => Value::from(lhs < rhs),
        BinaryOp::Gt => Value::from(lhs > rhs),
        BinaryOp::LtEq => Value::from(lhs <= rhs),
        BinaryOp::GtEq => Value::from(lhs >= rhs),
        BinaryOp::Eq => Value::from(lhs == rhs),
        BinaryOp::NotEq => Value::from(lhs != rhs),
        BinaryOp::Div
        | BinaryOp::Mod
        | BinaryOp::And
        | BinaryOp::Or
        | BinaryOp::BitAnd
        | BinaryOp::BitOr
        | BinaryOp::BitXor
        | BinaryOp::Shl
        | BinaryOp::Shr
        | BinaryOp::Assign => return Err(unsupported_operator(op.as_symbol())),
    };
    Ok(value)
}
