//! Variable bindings: the global store plus routing into call frames.
//!
//! `Environment::initialize` scans the top-level declarations once. It picks
//! out the entry point and the builtin prototypes by name, and binds every
//! global variable. Afterwards names no longer matter: lookups go by
//! `DeclId`, routed by the declaration's storage class.
//!
//! - locals and parameters: the active call frame
//! - everything else: the global store, which lives as long as the
//!   environment and is never popped

use cwalk_ir::{DeclId, DeclKind, NodeKind, Program};
use rustc_hash::FxHashMap;

use crate::builtins::ENTRY_POINT;
use crate::call_stack::{CallStack, Frame};
use crate::errors::unbound_declaration;
use crate::{Builtin, EvalResult, LoadError, Value};

/// Bindings of declarations that are not locals or parameters.
#[derive(Clone, Debug, Default)]
pub struct GlobalStore {
    bindings: FxHashMap<DeclId, Value>,
}

impl GlobalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, decl: DeclId, value: Value) {
        self.bindings.insert(decl, value);
    }

    pub fn lookup(&self, decl: DeclId) -> Option<Value> {
        self.bindings.get(&decl).copied()
    }

    /// Overwrite an existing binding. Returns `false` if `decl` is unbound.
    pub fn assign(&mut self, decl: DeclId, value: Value) -> bool {
        match self.bindings.get_mut(&decl) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Global store, call stack and the reserved function identities of one run.
pub struct Environment<'p> {
    program: &'p Program,
    globals: GlobalStore,
    stack: CallStack,
    builtins: FxHashMap<DeclId, Builtin>,
    entry: DeclId,
}

impl<'p> Environment<'p> {
    /// Scan `program`'s top-level declarations and bind its globals.
    ///
    /// Rejects programs with dangling ids, without a defined `main`, or with
    /// a global initialized by anything other than an integer or character
    /// literal.
    pub fn initialize(program: &'p Program, max_depth: Option<usize>) -> Result<Self, LoadError> {
        program.validate().map_err(LoadError::Malformed)?;

        let mut globals = GlobalStore::new();
        let mut builtins = FxHashMap::default();
        let mut entry = None;
        let mut entry_declared = false;

        for &id in program.top_level() {
            let decl = program.decl(id);
            match decl.kind {
                DeclKind::Function { body, .. } => {
                    if decl.name == ENTRY_POINT {
                        entry_declared = true;
                        if body.is_some() {
                            entry = Some(id);
                        }
                    } else if let Some(builtin) = Builtin::from_name(&decl.name) {
                        builtins.insert(id, builtin);
                    }
                }
                DeclKind::Var { storage, init, .. } if !storage.is_local() => {
                    let value = match init.map(|node| program.node(node).kind) {
                        None => 0,
                        Some(NodeKind::IntLit(value) | NodeKind::CharLit(value)) => value,
                        Some(_) => {
                            return Err(LoadError::UnsupportedGlobalInitializer {
                                name: decl.name.clone(),
                            })
                        }
                    };
                    tracing::debug!(name = %decl.name, value, "bind global");
                    globals.define(id, value);
                }
                DeclKind::Var { .. } => {}
            }
        }

        let entry = match entry {
            Some(entry) => entry,
            None if entry_declared => return Err(LoadError::EntryWithoutBody),
            None => return Err(LoadError::MissingEntryPoint),
        };

        Ok(Environment {
            program,
            globals,
            stack: CallStack::new(max_depth),
            builtins,
            entry,
        })
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    /// The `main` function found at initialization.
    pub fn entry(&self) -> DeclId {
        self.entry
    }

    /// Which builtin, if any, `function` was recognised as.
    pub fn builtin(&self, function: DeclId) -> Option<Builtin> {
        self.builtins.get(&function).copied()
    }

    pub fn globals(&self) -> &GlobalStore {
        &self.globals
    }

    /// Global bindings, writable without an active frame.
    pub fn globals_mut(&mut self) -> &mut GlobalStore {
        &mut self.globals
    }

    pub fn stack(&self) -> &CallStack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut CallStack {
        &mut self.stack
    }

    pub fn push_frame(&mut self, frame: Frame) -> EvalResult<()> {
        self.stack.push(frame)
    }

    pub fn pop_frame(&mut self) -> Option<Frame> {
        self.stack.pop()
    }

    /// Current value of `decl`.
    pub fn get_value(&self, decl: DeclId) -> EvalResult {
        let found = if self.is_local(decl) {
            self.stack.current()?.lookup(decl)
        } else {
            self.globals.lookup(decl)
        };
        found.ok_or_else(|| self.unbound(decl))
    }

    /// Overwrite the existing binding of `decl`.
    pub fn set_value(&mut self, decl: DeclId, value: Value) -> EvalResult<()> {
        let bound = if self.is_local(decl) {
            self.stack.current_mut()?.assign(decl, value)
        } else {
            self.globals.assign(decl, value)
        };
        if bound {
            Ok(())
        } else {
            Err(self.unbound(decl))
        }
    }

    /// Create a binding for `decl`, shadowing any earlier one in the same
    /// table.
    pub fn define(&mut self, decl: DeclId, value: Value) -> EvalResult<()> {
        if self.is_local(decl) {
            self.stack.current_mut()?.bind(decl, value);
        } else {
            self.globals.define(decl, value);
        }
        Ok(())
    }

    fn is_local(&self, decl: DeclId) -> bool {
        self.program.get_decl(decl).is_some_and(cwalk_ir::Decl::is_local)
    }

    fn unbound(&self, decl: DeclId) -> crate::EvalError {
        let name = self
            .program
            .get_decl(decl)
            .map_or("<unknown>", |d| d.name.as_str());
        unbound_declaration(name, decl)
    }
}
