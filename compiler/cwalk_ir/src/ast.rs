//! Nodes, declarations and the program arena.
//!
//! Expressions and statements share one `NodeKind` enum: any expression is
//! also a statement, and the evaluator decides by position which dispatch
//! applies. `NodeKind` is `Copy` so the evaluator can copy a kind out of the
//! arena and recurse without holding a borrow.

use crate::{BinaryOp, DeclId, DeclRange, NodeId, NodeRange, Ty, UnaryOp};

/// Kind-specific payload of a node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    // Expressions
    IntLit(i64),
    CharLit(i64),
    Paren(NodeId),
    DeclRef(DeclId),
    Unary {
        op: UnaryOp,
        operand: NodeId,
    },
    /// `sizeof(T)` on a type operand.
    SizeOf(Ty),
    /// Implicit or explicit conversion; the target type is the node's type.
    Cast(NodeId),
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    Subscript {
        base: NodeId,
        index: NodeId,
    },
    Call {
        callee: DeclId,
        args: NodeRange,
    },

    // Statements
    Block(NodeRange),
    DeclStmt(DeclRange),
    If {
        cond: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    },
    While {
        cond: NodeId,
        body: NodeId,
    },
    For {
        init: Option<NodeId>,
        cond: Option<NodeId>,
        step: Option<NodeId>,
        body: NodeId,
    },
    Return(Option<NodeId>),
    Empty,
}

impl NodeKind {
    /// Whether this kind only makes sense in statement position.
    pub const fn is_statement_only(&self) -> bool {
        matches!(
            self,
            NodeKind::Block(_)
                | NodeKind::DeclStmt(_)
                | NodeKind::If { .. }
                | NodeKind::While { .. }
                | NodeKind::For { .. }
                | NodeKind::Return(_)
                | NodeKind::Empty
        )
    }
}

/// One expression or statement with its resolved type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub kind: NodeKind,
    pub ty: Ty,
}

/// Where a variable lives.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Storage {
    /// File-scope variable, bound in the global store.
    Global,
    /// Block-scope variable, bound in the active call frame.
    Local,
    /// Function parameter, bound in the callee's frame at call entry.
    Param,
}

impl Storage {
    /// Local variables and parameters route to the active frame.
    #[inline]
    pub const fn is_local(self) -> bool {
        matches!(self, Storage::Local | Storage::Param)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeclKind {
    Var {
        ty: Ty,
        storage: Storage,
        init: Option<NodeId>,
    },
    Function {
        ret: Ty,
        params: DeclRange,
        /// `None` for prototypes, builtins included.
        body: Option<NodeId>,
    },
}

/// A named entity resolved by the front end.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decl {
    pub name: String,
    pub kind: DeclKind,
}

impl Decl {
    pub fn is_function(&self) -> bool {
        matches!(self.kind, DeclKind::Function { .. })
    }

    /// Whether bindings of this declaration live in a call frame.
    pub fn is_local(&self) -> bool {
        matches!(self.kind, DeclKind::Var { storage, .. } if storage.is_local())
    }

    /// Declared type of a variable, or return type of a function.
    pub fn ty(&self) -> Ty {
        match self.kind {
            DeclKind::Var { ty, .. } => ty,
            DeclKind::Function { ret, .. } => ret,
        }
    }
}

/// A whole translation unit: arenas plus the ordered top-level declarations.
///
/// Produced by [`ProgramBuilder`](crate::ProgramBuilder); read-only afterwards.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Program {
    pub(crate) nodes: Vec<Node>,
    pub(crate) node_lists: Vec<NodeId>,
    pub(crate) decls: Vec<Decl>,
    pub(crate) decl_lists: Vec<DeclId>,
    pub(crate) top_level: Vec<DeclId>,
}

impl Program {
    /// Look up a node. Ids come from this program's builder.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.index()]
    }

    /// Checked node lookup, for ids of unknown provenance.
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Checked declaration lookup, for ids of unknown provenance.
    pub fn get_decl(&self, id: DeclId) -> Option<&Decl> {
        self.decls.get(id.index())
    }

    pub fn node_list(&self, range: NodeRange) -> &[NodeId] {
        let (start, end) = range.bounds();
        &self.node_lists[start..end]
    }

    pub fn decl_list(&self, range: DeclRange) -> &[DeclId] {
        let (start, end) = range.bounds();
        &self.decl_lists[start..end]
    }

    /// Top-level declarations in source order.
    pub fn top_level(&self) -> &[DeclId] {
        &self.top_level
    }

    /// Parameters of a function declaration; empty for variables.
    pub fn params(&self, function: DeclId) -> &[DeclId] {
        match self.decl(function).kind {
            DeclKind::Function { params, .. } => self.decl_list(params),
            DeclKind::Var { .. } => &[],
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    /// Check that every id and range refers into this program's arenas.
    ///
    /// Builder output always passes; this guards programs that arrive
    /// deserialized from elsewhere.
    pub fn validate(&self) -> Result<(), DanglingId> {
        let node_ok = |id: NodeId| id.index() < self.nodes.len();
        let decl_ok = |id: DeclId| id.index() < self.decls.len();
        let check_node = |id: NodeId| {
            if node_ok(id) {
                Ok(())
            } else {
                Err(DanglingId::Node(id))
            }
        };
        let check_decl = |id: DeclId| {
            if decl_ok(id) {
                Ok(())
            } else {
                Err(DanglingId::Decl(id))
            }
        };
        let check_nodes = |range: NodeRange| {
            let (start, end) = range.bounds();
            if end <= self.node_lists.len() {
                Ok(())
            } else {
                Err(DanglingId::NodeList { start, end })
            }
        };
        let check_decls = |range: DeclRange| {
            let (start, end) = range.bounds();
            if end <= self.decl_lists.len() {
                Ok(())
            } else {
                Err(DanglingId::DeclList { start, end })
            }
        };

        for &id in &self.node_lists {
            check_node(id)?;
        }
        for &id in self.decl_lists.iter().chain(&self.top_level) {
            check_decl(id)?;
        }
        for node in &self.nodes {
            match node.kind {
                NodeKind::IntLit(_)
                | NodeKind::CharLit(_)
                | NodeKind::SizeOf(_)
                | NodeKind::Empty
                | NodeKind::Return(None) => {}
                NodeKind::Paren(inner)
                | NodeKind::Cast(inner)
                | NodeKind::Unary { operand: inner, .. }
                | NodeKind::Return(Some(inner)) => check_node(inner)?,
                NodeKind::DeclRef(decl) => check_decl(decl)?,
                NodeKind::Binary { left, right, .. } => {
                    check_node(left)?;
                    check_node(right)?;
                }
                NodeKind::Subscript { base, index } => {
                    check_node(base)?;
                    check_node(index)?;
                }
                NodeKind::Call { callee, args } => {
                    check_decl(callee)?;
                    check_nodes(args)?;
                }
                NodeKind::Block(members) => check_nodes(members)?,
                NodeKind::DeclStmt(decls) => check_decls(decls)?,
                NodeKind::If {
                    cond,
                    then_branch,
                    else_branch,
                } => {
                    check_node(cond)?;
                    check_node(then_branch)?;
                    else_branch.map_or(Ok(()), check_node)?;
                }
                NodeKind::While { cond, body } => {
                    check_node(cond)?;
                    check_node(body)?;
                }
                NodeKind::For {
                    init,
                    cond,
                    step,
                    body,
                } => {
                    for id in [init, cond, step].into_iter().flatten() {
                        check_node(id)?;
                    }
                    check_node(body)?;
                }
            }
        }
        for decl in &self.decls {
            match decl.kind {
                DeclKind::Var { init, .. } => init.map_or(Ok(()), check_node)?,
                DeclKind::Function { params, body, .. } => {
                    check_decls(params)?;
                    body.map_or(Ok(()), check_node)?;
                }
            }
        }
        Ok(())
    }
}

/// An id or range in a [`Program`] that points outside its arenas.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum DanglingId {
    Node(NodeId),
    Decl(DeclId),
    NodeList { start: usize, end: usize },
    DeclList { start: usize, end: usize },
}

impl std::fmt::Display for DanglingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Node(id) => write!(f, "dangling node id {id:?}"),
            Self::Decl(id) => write!(f, "dangling declaration id {id:?}"),
            Self::NodeList { start, end } => write!(f, "node list {start}..{end} out of range"),
            Self::DeclList { start, end } => {
                write!(f, "declaration list {start}..{end} out of range")
            }
        }
    }
}
