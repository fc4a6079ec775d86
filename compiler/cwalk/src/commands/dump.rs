//! The `dump` command: render a program file as an indented tree.

use std::fmt::Write;
use std::path::Path;

use cwalk_eval::ensure_sufficient_stack;
use cwalk_ir::{DeclId, DeclKind, NodeId, NodeKind, Program, Scalar, Storage, Ty};

use super::{load_program, DriverError};

/// Load a program file and render it.
pub fn dump_file(path: &Path) -> Result<String, DriverError> {
    let program = load_program(path)?;
    Ok(render_program(&program))
}

/// One line per top-level declaration, with bodies and initializers
/// indented beneath it. Node ids are shown so runtime backtraces can be
/// matched against the tree.
pub fn render_program(program: &Program) -> String {
    let mut printer = Printer {
        program,
        out: String::new(),
    };
    for &decl in program.top_level() {
        printer.decl(decl, 0);
    }
    printer.out
}

struct Printer<'p> {
    program: &'p Program,
    out: String,
}

impl Printer<'_> {
    fn line(&mut self, depth: usize, text: &str) {
        let _ = writeln!(self.out, "{:indent$}{text}", "", indent = depth * 2);
    }

    fn decl(&mut self, id: DeclId, depth: usize) {
        let program = self.program;
        let decl = program.decl(id);
        match decl.kind {
            DeclKind::Var { ty, storage, init } => {
                let storage = match storage {
                    Storage::Global => "global",
                    Storage::Local => "local",
                    Storage::Param => "param",
                };
                self.line(
                    depth,
                    &format!("{storage} {} {} {id}", ty_name(ty), decl.name),
                );
                if let Some(init) = init {
                    self.node(init, depth + 1);
                }
            }
            DeclKind::Function { ret, body, .. } => {
                let params = program
                    .params(id)
                    .iter()
                    .map(|&param| {
                        let param = program.decl(param);
                        format!("{} {}", ty_name(param.ty()), param.name)
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                let suffix = if body.is_some() { "" } else { ";" };
                self.line(
                    depth,
                    &format!("fn {} {}({params}){suffix} {id}", ty_name(ret), decl.name),
                );
                if let Some(body) = body {
                    self.node(body, depth + 1);
                }
            }
        }
    }

    fn node(&mut self, id: NodeId, depth: usize) {
        ensure_sufficient_stack(|| self.node_inner(id, depth));
    }

    fn node_inner(&mut self, id: NodeId, depth: usize) {
        let program = self.program;
        let node = program.node(id);
        let child = depth + 1;
        let head = match node.kind {
            NodeKind::IntLit(value) => format!("int {value}"),
            NodeKind::CharLit(value) => format!("char {value}"),
            NodeKind::Paren(_) => "paren".to_owned(),
            NodeKind::DeclRef(decl) => format!("ref {} {decl}", program.decl(decl).name),
            NodeKind::Unary { op, .. } => format!("unary {}", op.as_symbol()),
            NodeKind::SizeOf(ty) => format!("sizeof {}", ty_name(ty)),
            NodeKind::Cast(_) => format!("cast {}", ty_name(node.ty)),
            NodeKind::Binary { op, .. } => format!("binary {}", op.as_symbol()),
            NodeKind::Subscript { .. } => "subscript".to_owned(),
            NodeKind::Call { callee, .. } => format!("call {}", program.decl(callee).name),
            NodeKind::Block(_) => "block".to_owned(),
            NodeKind::DeclStmt(_) => "decl".to_owned(),
            NodeKind::If { .. } => "if".to_owned(),
            NodeKind::While { .. } => "while".to_owned(),
            NodeKind::For { .. } => "for".to_owned(),
            NodeKind::Return(_) => "return".to_owned(),
            NodeKind::Empty => "empty".to_owned(),
        };
        self.line(depth, &format!("{head} {id}"));

        match node.kind {
            NodeKind::IntLit(_)
            | NodeKind::CharLit(_)
            | NodeKind::DeclRef(_)
            | NodeKind::SizeOf(_)
            | NodeKind::Empty
            | NodeKind::Return(None) => {}
            NodeKind::Paren(inner)
            | NodeKind::Cast(inner)
            | NodeKind::Unary { operand: inner, .. }
            | NodeKind::Return(Some(inner)) => self.node(inner, child),
            NodeKind::Binary { left, right, .. } => {
                self.node(left, child);
                self.node(right, child);
            }
            NodeKind::Subscript { base, index } => {
                self.node(base, child);
                self.node(index, child);
            }
            NodeKind::Call { args, .. } => {
                for &arg in program.node_list(args) {
                    self.node(arg, child);
                }
            }
            NodeKind::Block(members) => {
                for &member in program.node_list(members) {
                    self.node(member, child);
                }
            }
            NodeKind::DeclStmt(decls) => {
                for &decl in program.decl_list(decls) {
                    self.decl(decl, child);
                }
            }
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.node(cond, child);
                self.node(then_branch, child);
                if let Some(else_branch) = else_branch {
                    self.line(depth, "else");
                    self.node(else_branch, child);
                }
            }
            NodeKind::While { cond, body } => {
                self.node(cond, child);
                self.node(body, child);
            }
            NodeKind::For {
                init,
                cond,
                step,
                body,
            } => {
                for (label, clause) in [("init", init), ("cond", cond), ("step", step)] {
                    match clause {
                        Some(clause) => {
                            self.line(child, label);
                            self.node(clause, child + 1);
                        }
                        None => self.line(child, &format!("{label} none")),
                    }
                }
                self.node(body, child);
            }
        }
    }
}

fn scalar_name(scalar: Scalar) -> &'static str {
    match scalar {
        Scalar::Int => "int",
        Scalar::Char => "char",
        Scalar::Pointer => "ptr",
    }
}

fn ty_name(ty: Ty) -> String {
    match ty {
        Ty::Void => "void".to_owned(),
        Ty::Int => "int".to_owned(),
        Ty::Char => "char".to_owned(),
        Ty::Pointer(pointee) => format!("{}*", scalar_name(pointee)),
        Ty::Array { elem, len } => format!("{}[{len}]", scalar_name(elem)),
    }
}
