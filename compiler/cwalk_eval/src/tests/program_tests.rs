use cwalk_ir::{BinaryOp, ProgramBuilder, Scalar, Ty};
use pretty_assertions::assert_eq;

use super::{assign_int, main_program, print, print_var, run};
use crate::{EvalErrorKind, HeapError, HEAP_BASE};

#[test]
fn global_argument_to_user_function_prints_eleven() {
    // int g = 10;
    // int inc(int x) { return x + 1; }
    // int main() { int y = inc(g); PRINT(y); return 0; }
    let mut b = ProgramBuilder::new();
    let builtins = b.builtins();
    let ten = b.int(10);
    let g = b.global("g", Ty::Int, Some(ten));

    let inc = b.function("inc", Ty::Int, &[("x", Ty::Int)]);
    let x = b.params(inc)[0];
    let inc_body = {
        let x_ref = b.var(x);
        let one = b.int(1);
        let sum = b.binary(BinaryOp::Add, x_ref, one);
        let ret = b.ret(Some(sum));
        b.block(&[ret])
    };
    b.define(inc, inc_body);

    let main = b.function("main", Ty::Int, &[]);
    let call = {
        let g_ref = b.var(g);
        b.call(inc, &[g_ref])
    };
    let y = b.local("y", Ty::Int, Some(call));
    let decl = b.decl_stmt(&[y]);
    let show = print_var(&mut b, builtins, y);
    let zero = b.int(0);
    let ret = b.ret(Some(zero));
    let main_body = b.block(&[decl, show, ret]);
    b.define(main, main_body);

    let outcome = run(&b.finish());
    assert_eq!(outcome.output, "11\n");
    assert_eq!(outcome.result, Ok(0));
}

#[test]
fn scalar_declarations_default_to_zero_or_initializer() {
    // int x; int y = 5; PRINT(x); PRINT(y);
    let program = main_program(|b, builtins| {
        let x = b.local("x", Ty::Int, None);
        let five = b.int(5);
        let y = b.local("y", Ty::Int, Some(five));
        let decl = b.decl_stmt(&[x, y]);
        let show_x = print_var(b, builtins, x);
        let show_y = print_var(b, builtins, y);
        vec![decl, show_x, show_y]
    });
    assert_eq!(run(&program).output, "0\n5\n");
}

#[test]
fn local_array_is_zeroed_and_indexable() {
    // int a[4]; a[2] = 7; PRINT(a[0]); ... PRINT(a[3]);
    let program = main_program(|b, builtins| {
        let a = b.local(
            "a",
            Ty::Array {
                elem: Scalar::Int,
                len: 4,
            },
            None,
        );
        let decl = b.decl_stmt(&[a]);
        let store = {
            let a_ref = b.var(a);
            let two = b.int(2);
            let slot = b.index(a_ref, two);
            let seven = b.int(7);
            b.assign(slot, seven)
        };
        let mut statements = vec![decl, store];
        for i in 0..4 {
            let a_ref = b.var(a);
            let idx = b.int(i);
            let elem = b.index(a_ref, idx);
            statements.push(print(b, builtins, elem));
        }
        statements
    });
    assert_eq!(run(&program).output, "0\n0\n7\n0\n");
}

#[test]
fn pointer_deref_and_use_after_free() {
    // int *p = MALLOC(4); *p = 9; PRINT(*p); FREE(p); PRINT(*p);
    let program = main_program(|b, builtins| {
        let four = b.int(4);
        let alloc = b.call(builtins.malloc, &[four]);
        let p = b.local("p", Ty::Pointer(Scalar::Int), Some(alloc));
        let decl = b.decl_stmt(&[p]);
        let store = {
            let p_ref = b.var(p);
            let target = b.deref(p_ref);
            let nine = b.int(9);
            b.assign(target, nine)
        };
        let show = {
            let p_ref = b.var(p);
            let value = b.deref(p_ref);
            print(b, builtins, value)
        };
        let free = {
            let p_ref = b.var(p);
            b.call(builtins.free, &[p_ref])
        };
        let show_again = {
            let p_ref = b.var(p);
            let value = b.deref(p_ref);
            print(b, builtins, value)
        };
        vec![decl, store, show, free, show_again]
    });

    let outcome = run(&program);
    assert_eq!(outcome.output, "9\n");
    assert_eq!(
        outcome.result.unwrap_err().kind,
        EvalErrorKind::Heap(HeapError::UseAfterFree { address: HEAP_BASE })
    );
}

#[test]
fn callee_locals_are_not_visible_after_return() {
    // int f(int n) { return n * 2; }
    // main: PRINT(f(5)); PRINT(n);
    let mut b = ProgramBuilder::new();
    let builtins = b.builtins();
    let f = b.function("f", Ty::Int, &[("n", Ty::Int)]);
    let n = b.params(f)[0];
    let f_body = {
        let n_ref = b.var(n);
        let two = b.int(2);
        let product = b.binary(BinaryOp::Mul, n_ref, two);
        b.ret(Some(product))
    };
    b.define(f, f_body);

    let main = b.function("main", Ty::Int, &[]);
    let show_call = {
        let five = b.int(5);
        let call = b.call(f, &[five]);
        print(&mut b, builtins, call)
    };
    let show_param = print_var(&mut b, builtins, n);
    let main_body = b.block(&[show_call, show_param]);
    b.define(main, main_body);

    let outcome = run(&b.finish());
    assert_eq!(outcome.output, "10\n");
    assert_eq!(
        outcome.result.unwrap_err().kind,
        EvalErrorKind::UnboundDeclaration {
            name: "n".to_owned(),
            decl: n
        }
    );
}

#[test]
fn while_false_never_runs_its_body() {
    // while (0) { PRINT(1); }
    let program = main_program(|b, builtins| {
        let zero = b.int(0);
        let one = b.int(1);
        let show = print(b, builtins, one);
        let body = b.block(&[show]);
        vec![b.while_stmt(zero, body)]
    });
    let outcome = run(&program);
    assert_eq!(outcome.output, "");
    assert_eq!(outcome.result, Ok(0));
}

#[test]
fn for_init_runs_once_even_when_condition_is_false() {
    // int count;
    // int bump() { count = count + 1; return 0; }
    // main: int i; for (i = bump(); i < 0; i = i + 1) PRINT(99); PRINT(count);
    let mut b = ProgramBuilder::new();
    let builtins = b.builtins();
    let count = b.global("count", Ty::Int, None);
    let bump = b.function("bump", Ty::Int, &[]);
    let bump_body = {
        let count_ref = b.var(count);
        let one = b.int(1);
        let sum = b.binary(BinaryOp::Add, count_ref, one);
        let target = b.var(count);
        let store = b.assign(target, sum);
        let zero = b.int(0);
        let ret = b.ret(Some(zero));
        b.block(&[store, ret])
    };
    b.define(bump, bump_body);

    let main = b.function("main", Ty::Int, &[]);
    let i = b.local("i", Ty::Int, None);
    let decl = b.decl_stmt(&[i]);
    let init = {
        let target = b.var(i);
        let call = b.call(bump, &[]);
        b.assign(target, call)
    };
    let cond = {
        let i_ref = b.var(i);
        let zero = b.int(0);
        b.binary(BinaryOp::Lt, i_ref, zero)
    };
    let step = {
        let i_ref = b.var(i);
        let one = b.int(1);
        let next = b.binary(BinaryOp::Add, i_ref, one);
        let target = b.var(i);
        b.assign(target, next)
    };
    let body = {
        let marker = b.int(99);
        print(&mut b, builtins, marker)
    };
    let for_stmt = b.for_stmt(Some(init), Some(cond), Some(step), body);
    let show = print_var(&mut b, builtins, count);
    let main_body = b.block(&[decl, for_stmt, show]);
    b.define(main, main_body);

    assert_eq!(run(&b.finish()).output, "1\n");
}

#[test]
fn malloc_pointer_used_as_array_prints_in_write_order() {
    // int *p = MALLOC(8); p[0] = 3; p[1] = 4; PRINT(p[0]); PRINT(p[1]);
    let program = main_program(|b, builtins| {
        let eight = b.int(8);
        let alloc = b.call(builtins.malloc, &[eight]);
        let p = b.local("p", Ty::Pointer(Scalar::Int), Some(alloc));
        let decl = b.decl_stmt(&[p]);
        let mut statements = vec![decl];
        for (index, value) in [(0, 3), (1, 4)] {
            let p_ref = b.var(p);
            let idx = b.int(index);
            let slot = b.index(p_ref, idx);
            let value = b.int(value);
            statements.push(b.assign(slot, value));
        }
        for index in [0, 1] {
            let p_ref = b.var(p);
            let idx = b.int(index);
            let elem = b.index(p_ref, idx);
            statements.push(print(b, builtins, elem));
        }
        statements
    });
    assert_eq!(run(&program).output, "3\n4\n");
}

#[test]
fn global_array_is_backed_by_the_heap() {
    // int ga[2]; main: ga[1] = 5; PRINT(ga[1]); PRINT(ga[0]);
    let program = main_program(|b, builtins| {
        let ga = b.global(
            "ga",
            Ty::Array {
                elem: Scalar::Int,
                len: 2,
            },
            None,
        );
        let store = {
            let ga_ref = b.var(ga);
            let one = b.int(1);
            let slot = b.index(ga_ref, one);
            let five = b.int(5);
            b.assign(slot, five)
        };
        let mut statements = vec![store];
        for index in [1, 0] {
            let ga_ref = b.var(ga);
            let idx = b.int(index);
            let elem = b.index(ga_ref, idx);
            statements.push(print(b, builtins, elem));
        }
        statements
    });
    assert_eq!(run(&program).output, "5\n0\n");
}

#[test]
fn globals_are_shared_between_functions() {
    // int g; void set() { g = 42; } main: set(); PRINT(g);
    let mut b = ProgramBuilder::new();
    let builtins = b.builtins();
    let g = b.global("g", Ty::Int, None);
    let set = b.function("set", Ty::Void, &[]);
    let set_body = assign_int(&mut b, g, 42);
    b.define(set, set_body);

    let main = b.function("main", Ty::Int, &[]);
    let call = b.call(set, &[]);
    let show = print_var(&mut b, builtins, g);
    let main_body = b.block(&[call, show]);
    b.define(main, main_body);

    assert_eq!(run(&b.finish()).output, "42\n");
}
