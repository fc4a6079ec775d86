//! `ProgramBuilder` for constructing already-typed programs.
//!
//! A front end (or a test) declares globals, functions and locals, then
//! builds expression and statement nodes bottom-up. Each node's static type
//! is inferred the way a C front end resolves it, so callers only spell out
//! types at declarations, casts and `sizeof`.

use crate::{
    BinaryOp, Decl, DeclId, DeclKind, DeclRange, Node, NodeId, NodeKind, NodeRange, Program,
    Scalar, Storage, Ty, UnaryOp,
};

#[expect(
    clippy::cast_possible_truncation,
    reason = "arena sizes are bounded well below u32::MAX"
)]
#[inline]
fn arena_index(len: usize) -> u32 {
    len as u32
}

/// Incremental builder for a [`Program`].
#[derive(Default)]
pub struct ProgramBuilder {
    program: Program,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish building and hand over the program.
    pub fn finish(self) -> Program {
        self.program
    }

    /// Type of an already-built node.
    pub fn ty_of(&self, node: NodeId) -> Ty {
        self.program.node(node).ty
    }

    /// Parameters of a declared function, in order.
    pub fn params(&self, function: DeclId) -> Vec<DeclId> {
        self.program.params(function).to_vec()
    }

    fn push_node(&mut self, kind: NodeKind, ty: Ty) -> NodeId {
        let id = NodeId::new(arena_index(self.program.nodes.len()));
        self.program.nodes.push(Node { kind, ty });
        id
    }

    fn push_decl(&mut self, name: &str, kind: DeclKind) -> DeclId {
        let id = DeclId::new(arena_index(self.program.decls.len()));
        self.program.decls.push(Decl {
            name: name.to_owned(),
            kind,
        });
        id
    }

    fn push_node_list(&mut self, ids: &[NodeId]) -> NodeRange {
        let start = arena_index(self.program.node_lists.len());
        self.program.node_lists.extend_from_slice(ids);
        NodeRange::new(start, arena_index(ids.len()))
    }

    fn push_decl_list(&mut self, ids: &[DeclId]) -> DeclRange {
        let start = arena_index(self.program.decl_lists.len());
        self.program.decl_lists.extend_from_slice(ids);
        DeclRange::new(start, arena_index(ids.len()))
    }

    // Declarations

    /// File-scope variable. `init`, when present, should be a literal.
    pub fn global(&mut self, name: &str, ty: Ty, init: Option<NodeId>) -> DeclId {
        let id = self.push_decl(
            name,
            DeclKind::Var {
                ty,
                storage: Storage::Global,
                init,
            },
        );
        self.program.top_level.push(id);
        id
    }

    /// Function declaration without a body. Add one with [`Self::define`].
    pub fn function(&mut self, name: &str, ret: Ty, params: &[(&str, Ty)]) -> DeclId {
        let param_ids: Vec<DeclId> = params
            .iter()
            .map(|&(param_name, ty)| {
                self.push_decl(
                    param_name,
                    DeclKind::Var {
                        ty,
                        storage: Storage::Param,
                        init: None,
                    },
                )
            })
            .collect();
        let params = self.push_decl_list(&param_ids);
        let id = self.push_decl(
            name,
            DeclKind::Function {
                ret,
                params,
                body: None,
            },
        );
        self.program.top_level.push(id);
        id
    }

    /// Attach a body to a function declared with [`Self::function`].
    pub fn define(&mut self, function: DeclId, body: NodeId) {
        if let DeclKind::Function { body: slot, .. } =
            &mut self.program.decls[function.index()].kind
        {
            *slot = Some(body);
        }
    }

    /// Declare the four builtin prototypes `GET`, `PRINT`, `MALLOC`, `FREE`.
    pub fn builtins(&mut self) -> Builtins {
        Builtins {
            get: self.function("GET", Ty::Int, &[]),
            print: self.function("PRINT", Ty::Void, &[("value", Ty::Int)]),
            malloc: self.function(
                "MALLOC",
                Ty::Pointer(Scalar::Int),
                &[("size", Ty::Int)],
            ),
            free: self.function("FREE", Ty::Void, &[("ptr", Ty::Pointer(Scalar::Int))]),
        }
    }

    /// Block-scope variable, to be listed in a [`Self::decl_stmt`].
    pub fn local(&mut self, name: &str, ty: Ty, init: Option<NodeId>) -> DeclId {
        self.push_decl(
            name,
            DeclKind::Var {
                ty,
                storage: Storage::Local,
                init,
            },
        )
    }

    // Expressions

    pub fn int(&mut self, value: i64) -> NodeId {
        self.push_node(NodeKind::IntLit(value), Ty::Int)
    }

    pub fn char(&mut self, value: u8) -> NodeId {
        self.push_node(NodeKind::CharLit(i64::from(value)), Ty::Char)
    }

    pub fn paren(&mut self, inner: NodeId) -> NodeId {
        let ty = self.ty_of(inner);
        self.push_node(NodeKind::Paren(inner), ty)
    }

    /// Reference to a declared variable.
    pub fn var(&mut self, decl: DeclId) -> NodeId {
        let ty = self.program.decl(decl).ty();
        self.push_node(NodeKind::DeclRef(decl), ty)
    }

    pub fn unary(&mut self, op: UnaryOp, operand: NodeId) -> NodeId {
        let operand_ty = self.ty_of(operand);
        let ty = match op {
            UnaryOp::Deref => operand_ty.element().map_or(Ty::Int, Scalar::to_ty),
            UnaryOp::Not => Ty::Int,
            UnaryOp::AddrOf => Ty::Pointer(match operand_ty {
                Ty::Char => Scalar::Char,
                Ty::Pointer(_) => Scalar::Pointer,
                _ => Scalar::Int,
            }),
            UnaryOp::Plus | UnaryOp::Minus | UnaryOp::BitNot => operand_ty,
        };
        self.push_node(NodeKind::Unary { op, operand }, ty)
    }

    pub fn deref(&mut self, operand: NodeId) -> NodeId {
        self.unary(UnaryOp::Deref, operand)
    }

    pub fn neg(&mut self, operand: NodeId) -> NodeId {
        self.unary(UnaryOp::Minus, operand)
    }

    pub fn size_of(&mut self, ty: Ty) -> NodeId {
        self.push_node(NodeKind::SizeOf(ty), Ty::Int)
    }

    pub fn cast(&mut self, ty: Ty, inner: NodeId) -> NodeId {
        self.push_node(NodeKind::Cast(inner), ty)
    }

    pub fn binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId) -> NodeId {
        let left_ty = self.ty_of(left);
        let right_ty = self.ty_of(right);
        let ty = if op.is_comparison() || matches!(op, BinaryOp::And | BinaryOp::Or) {
            Ty::Int
        } else if op.is_assignment() || left_ty.is_address() || !right_ty.is_address() {
            left_ty
        } else {
            right_ty
        };
        self.push_node(NodeKind::Binary { op, left, right }, ty)
    }

    pub fn assign(&mut self, target: NodeId, value: NodeId) -> NodeId {
        self.binary(BinaryOp::Assign, target, value)
    }

    pub fn index(&mut self, base: NodeId, index: NodeId) -> NodeId {
        let ty = self.ty_of(base).element().map_or(Ty::Int, Scalar::to_ty);
        self.push_node(NodeKind::Subscript { base, index }, ty)
    }

    pub fn call(&mut self, callee: DeclId, args: &[NodeId]) -> NodeId {
        let ty = self.program.decl(callee).ty();
        let args = self.push_node_list(args);
        self.push_node(NodeKind::Call { callee, args }, ty)
    }

    // Statements

    pub fn block(&mut self, statements: &[NodeId]) -> NodeId {
        let members = self.push_node_list(statements);
        self.push_node(NodeKind::Block(members), Ty::Void)
    }

    pub fn decl_stmt(&mut self, decls: &[DeclId]) -> NodeId {
        let decls = self.push_decl_list(decls);
        self.push_node(NodeKind::DeclStmt(decls), Ty::Void)
    }

    pub fn if_stmt(
        &mut self,
        cond: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    ) -> NodeId {
        self.push_node(
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            },
            Ty::Void,
        )
    }

    pub fn while_stmt(&mut self, cond: NodeId, body: NodeId) -> NodeId {
        self.push_node(NodeKind::While { cond, body }, Ty::Void)
    }

    pub fn for_stmt(
        &mut self,
        init: Option<NodeId>,
        cond: Option<NodeId>,
        step: Option<NodeId>,
        body: NodeId,
    ) -> NodeId {
        self.push_node(
            NodeKind::For {
                init,
                cond,
                step,
                body,
            },
            Ty::Void,
        )
    }

    pub fn ret(&mut self, value: Option<NodeId>) -> NodeId {
        self.push_node(NodeKind::Return(value), Ty::Void)
    }

    pub fn empty(&mut self) -> NodeId {
        self.push_node(NodeKind::Empty, Ty::Void)
    }
}

/// Declaration ids of the builtin prototypes.
#[derive(Copy, Clone, Debug)]
pub struct Builtins {
    pub get: DeclId,
    pub print: DeclId,
    pub malloc: DeclId,
    pub free: DeclId,
}
