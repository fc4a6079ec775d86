//! Call protocol.
//!
//! Arguments are evaluated in the caller's frame, left to right, before any
//! callee state exists. Builtins then run inline. A user function gets a
//! fresh frame with parameters bound positionally, its body executes, and the
//! frame is popped whether the body returned, ran off its end, or failed.

use cwalk_ir::{DeclId, DeclKind, NodeId, NodeRange};
use smallvec::SmallVec;

use super::Interpreter;
use crate::call_stack::Frame;
use crate::errors::{arity_mismatch, malformed_ast, unbound_declaration};
use crate::{Builtin, EvalErrorKind, EvalResult, Value};

impl Interpreter<'_> {
    pub(super) fn eval_call(&mut self, call: NodeId, callee: DeclId, args: NodeRange) -> EvalResult {
        let program = self.program();
        let mut values: SmallVec<[Value; 4]> = SmallVec::new();
        for &arg in program.node_list(args) {
            values.push(self.eval(arg)?);
        }
        match self.env.builtin(callee) {
            Some(builtin) => self.call_builtin(builtin, &values),
            None => self.call_function(callee, &values, Some(call)),
        }
    }

    /// Invoke a user function with already-evaluated arguments.
    ///
    /// `call_site` is `None` for the entry point.
    pub fn call_function(
        &mut self,
        function: DeclId,
        args: &[Value],
        call_site: Option<NodeId>,
    ) -> EvalResult {
        let program = self.program();
        let decl = program
            .get_decl(function)
            .ok_or_else(|| unbound_declaration("<unknown>", function))?;
        let DeclKind::Function { params, body, .. } = decl.kind else {
            return Err(malformed_ast(
                call_site.unwrap_or(NodeId::INVALID),
                "call target is not a function",
            ));
        };
        let body = body.ok_or_else(|| EvalErrorKind::MissingBody {
            name: decl.name.clone(),
        })?;
        let params = program.decl_list(params);
        if params.len() != args.len() {
            return Err(arity_mismatch(&decl.name, params.len(), args.len()));
        }

        let mut frame = Frame::new(function, call_site);
        for (&param, &value) in params.iter().zip(args) {
            frame.bind(param, value);
        }
        if let Err(err) = self.env.push_frame(frame) {
            return Err(self.env.stack().attach_backtrace(err, program));
        }
        let depth = self.env.stack().depth();
        self.stats.count_user_call();
        self.stats.record_depth(depth);
        tracing::debug!(function = %decl.name, depth, "call");

        let outcome = self
            .exec(body)
            .map_err(|err| self.env.stack().attach_backtrace(err, program));
        let frame = self.env.pop_frame();
        outcome?;

        let value = frame.map_or(0, |frame| frame.result());
        tracing::debug!(function = %decl.name, value, "return");
        Ok(value)
    }

    fn call_builtin(&mut self, builtin: Builtin, args: &[Value]) -> EvalResult {
        if args.len() != builtin.arity() {
            return Err(arity_mismatch(builtin.name(), builtin.arity(), args.len()));
        }
        self.stats.count_builtin_call();
        tracing::debug!(builtin = builtin.name(), ?args, "builtin call");
        match (builtin, args) {
            (Builtin::Get, []) => Ok(self.input_handler.read_int()?),
            (Builtin::Print, &[value]) => {
                self.print_handler.print_value(value);
                Ok(0)
            }
            (Builtin::Malloc, &[size]) => Ok(self.heap.allocate(size)?),
            (Builtin::Free, &[address]) => {
                self.heap.free(address)?;
                Ok(0)
            }
            _ => Err(arity_mismatch(builtin.name(), builtin.arity(), args.len())),
        }
    }
}
