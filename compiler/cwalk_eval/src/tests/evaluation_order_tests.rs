use cwalk_ir::{BinaryOp, DeclId, ProgramBuilder, Scalar, Ty};
use pretty_assertions::assert_eq;

use super::{main_program, print, print_var, run_with_input};

#[test]
fn assignment_evaluates_value_before_target() {
    // int a[2]; a[GET()] = GET(); PRINT(a[1]); PRINT(a[0]);
    let program = main_program(|b, builtins| {
        let a = b.local(
            "a",
            Ty::Array {
                elem: Scalar::Int,
                len: 2,
            },
            None,
        );
        let decl = b.decl_stmt(&[a]);
        let store = {
            let a_ref = b.var(a);
            let index = b.call(builtins.get, &[]);
            let slot = b.index(a_ref, index);
            let value = b.call(builtins.get, &[]);
            b.assign(slot, value)
        };
        let mut statements = vec![decl, store];
        for index in [1, 0] {
            let a_ref = b.var(a);
            let idx = b.int(index);
            let elem = b.index(a_ref, idx);
            statements.push(print(b, builtins, elem));
        }
        statements
    });
    // The value reads 7, then the index reads 1.
    let outcome = run_with_input(&program, "7 1");
    assert_eq!(outcome.output, "7\n0\n");
    assert_eq!(outcome.result, Ok(0));
}

#[test]
fn call_arguments_are_evaluated_left_to_right() {
    // int sub(int x, int y) { return x - y; }  main: PRINT(sub(GET(), GET()));
    let mut b = ProgramBuilder::new();
    let builtins = b.builtins();
    let sub = b.function("sub", Ty::Int, &[("x", Ty::Int), ("y", Ty::Int)]);
    let params = b.params(sub);
    let sub_body = {
        let x = b.var(params[0]);
        let y = b.var(params[1]);
        let diff = b.binary(BinaryOp::Sub, x, y);
        b.ret(Some(diff))
    };
    b.define(sub, sub_body);
    let main = b.function("main", Ty::Int, &[]);
    let first = b.call(builtins.get, &[]);
    let second = b.call(builtins.get, &[]);
    let call = b.call(sub, &[first, second]);
    let show = print(&mut b, builtins, call);
    b.define(main, show);

    assert_eq!(run_with_input(&b.finish(), "10 3").output, "7\n");
}

/// `count = count + 1; return count;`
fn counting_function(b: &mut ProgramBuilder, count: DeclId) -> DeclId {
    let bump = b.function("bump", Ty::Int, &[]);
    let current = b.var(count);
    let one = b.int(1);
    let next = b.binary(BinaryOp::Add, current, one);
    let target = b.var(count);
    let store = b.assign(target, next);
    let result = b.var(count);
    let ret = b.ret(Some(result));
    let body = b.block(&[store, ret]);
    b.define(bump, body);
    bump
}

#[test]
fn conditions_are_evaluated_once_per_test() {
    // int count;
    // if (bump()) PRINT(1); else PRINT(2);
    // if (bump() == 5) PRINT(3); else PRINT(4);
    // PRINT(count);
    // while (bump() < 5) ;
    // PRINT(count);
    let mut b = ProgramBuilder::new();
    let builtins = b.builtins();
    let count = b.global("count", Ty::Int, None);
    let bump = counting_function(&mut b, count);

    let main = b.function("main", Ty::Int, &[]);
    let first_if = {
        let cond = b.call(bump, &[]);
        let one = b.int(1);
        let then = print(&mut b, builtins, one);
        let two = b.int(2);
        let otherwise = print(&mut b, builtins, two);
        b.if_stmt(cond, then, Some(otherwise))
    };
    let second_if = {
        let call = b.call(bump, &[]);
        let five = b.int(5);
        let cond = b.binary(BinaryOp::Eq, call, five);
        let three = b.int(3);
        let then = print(&mut b, builtins, three);
        let four = b.int(4);
        let otherwise = print(&mut b, builtins, four);
        b.if_stmt(cond, then, Some(otherwise))
    };
    let show_after_ifs = print_var(&mut b, builtins, count);
    let spin = {
        let call = b.call(bump, &[]);
        let five = b.int(5);
        let cond = b.binary(BinaryOp::Lt, call, five);
        let body = b.empty();
        b.while_stmt(cond, body)
    };
    let show_after_loop = print_var(&mut b, builtins, count);
    let body = b.block(&[first_if, second_if, show_after_ifs, spin, show_after_loop]);
    b.define(main, body);

    assert_eq!(run_with_input(&b.finish(), "").output, "1\n4\n2\n5\n");
}
