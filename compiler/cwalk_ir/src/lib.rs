//! cwalk IR - the typed AST contract consumed by the evaluator.
//!
//! This crate contains the data structures a front end produces for a small,
//! statically typed C subset:
//! - `NodeId` / `DeclId` arena indices and id ranges
//! - `Ty` type categories and the fixed word size
//! - `UnaryOp` / `BinaryOp` operators
//! - `Node`, `Decl` and the `Program` arena
//! - `ProgramBuilder` for constructing programs
//!
//! # Design
//!
//! - **Flatten everything**: no `Box<Node>`; children are `NodeId(u32)`
//!   indices into one arena, lists are ranges into a flattened id list.
//! - **Ids are identities**: two occurrences of the same identifier in
//!   different scopes are distinct `DeclId`s, and binding tables key on them.
//! - **No source text**: lexing, parsing and type resolution happen upstream.

mod ast;
mod builder;
mod ids;
mod operators;
mod ty;

pub use ast::{DanglingId, Decl, DeclKind, Node, NodeKind, Program, Storage};
pub use builder::{Builtins, ProgramBuilder};
pub use ids::{DeclId, DeclRange, NodeId, NodeRange};
pub use operators::{BinaryOp, UnaryOp};
pub use ty::{Scalar, Ty, CHAR_SIZE, WORD_SIZE};
