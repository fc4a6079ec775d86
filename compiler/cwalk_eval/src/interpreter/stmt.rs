//! Statement execution and control flow.

use cwalk_ir::{DeclId, DeclKind, NodeId, NodeKind};

use super::{array_storage, Interpreter};
use crate::stack::ensure_sufficient_stack;
use crate::EvalResult;

impl Interpreter<'_> {
    /// Execute a statement node with stack safety.
    ///
    /// Any expression node is accepted as an expression statement.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn exec(&mut self, node: NodeId) -> EvalResult<()> {
        ensure_sufficient_stack(|| self.exec_inner(node))
    }

    /// Whether the active invocation has taken a return.
    #[inline]
    fn returning(&self) -> bool {
        self.env.stack().returning()
    }

    fn exec_inner(&mut self, id: NodeId) -> EvalResult<()> {
        self.stats.count_statement();
        self.env.stack_mut().current_mut()?.set_statement(id);
        let program = self.program();
        match program.node(id).kind {
            NodeKind::Block(members) => {
                for &member in program.node_list(members) {
                    self.exec(member)?;
                    if self.returning() {
                        break;
                    }
                }
            }
            NodeKind::DeclStmt(decls) => {
                for &decl in program.decl_list(decls) {
                    self.declare(decl)?;
                }
            }
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval(cond)? != 0 {
                    self.exec(then_branch)?;
                } else if let Some(else_branch) = else_branch {
                    self.exec(else_branch)?;
                }
            }
            NodeKind::While { cond, body } => {
                while self.eval(cond)? != 0 {
                    self.exec(body)?;
                    if self.returning() {
                        break;
                    }
                }
            }
            NodeKind::For {
                init,
                cond,
                step,
                body,
            } => {
                if let Some(init) = init {
                    self.exec(init)?;
                }
                loop {
                    if let Some(cond) = cond {
                        if self.eval(cond)? == 0 {
                            break;
                        }
                    }
                    self.exec(body)?;
                    if self.returning() {
                        break;
                    }
                    if let Some(step) = step {
                        self.exec(step)?;
                    }
                }
            }
            NodeKind::Return(value) => {
                let value = match value {
                    Some(value) => self.eval(value)?,
                    None => 0,
                };
                self.env.stack_mut().current_mut()?.set_returned(value);
            }
            NodeKind::Empty => {}
            NodeKind::IntLit(_)
            | NodeKind::CharLit(_)
            | NodeKind::Paren(_)
            | NodeKind::DeclRef(_)
            | NodeKind::Unary { .. }
            | NodeKind::SizeOf(_)
            | NodeKind::Cast(_)
            | NodeKind::Binary { .. }
            | NodeKind::Subscript { .. }
            | NodeKind::Call { .. } => {
                self.eval(id)?;
            }
        }
        Ok(())
    }

    /// Bind one variable of a declaration statement in the active scope.
    ///
    /// Uninitialized arrays get a fresh zero-filled heap block and bind to its
    /// base address.
    fn declare(&mut self, id: DeclId) -> EvalResult<()> {
        let DeclKind::Var { ty, init, .. } = self.program().decl(id).kind else {
            // Local function prototypes bind nothing.
            return Ok(());
        };
        let value = match init {
            Some(init) => self.eval(init)?,
            None if ty.is_array() => {
                let size = array_storage(ty)?;
                self.heap.allocate(size)?
            }
            None => 0,
        };
        self.env.define(id, value)
    }
}
