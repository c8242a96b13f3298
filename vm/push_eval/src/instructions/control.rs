//! Control-flow combinators and code-stack instructions.
//!
//! The iteration combinators never recurse on the host stack: each step
//! builds a continuation program and pushes it back onto the exec stack, so
//! a runaway loop is bounded by the interpreter's step budget.

use rand::Rng;

use push_ir::{Atom, Program};
use push_stack::TypedStack;

use crate::interpreter::Interpreter;

/// Which object stack a combinator reads its code operand from. The `code`
/// and `exec` variants of `if`, `=`, and the `do*` family differ only in
/// this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CodeSource {
    Code,
    Exec,
}

fn source_stack(interpreter: &Interpreter, source: CodeSource) -> &TypedStack<Atom> {
    match source {
        CodeSource::Code => interpreter.code_stack(),
        CodeSource::Exec => interpreter.exec_stack(),
    }
}

fn source_stack_mut(interpreter: &mut Interpreter, source: CodeSource) -> &mut TypedStack<Atom> {
    match source {
        CodeSource::Code => interpreter.code_stack_mut(),
        CodeSource::Exec => interpreter.exec_stack_mut(),
    }
}

/// `code.quote`: move the next exec atom onto the code stack unexecuted.
pub(crate) fn quote(interpreter: &mut Interpreter) {
    if interpreter.exec_stack().is_empty() {
        return;
    }
    let atom = interpreter.exec_stack_mut().pop();
    interpreter.code_stack_mut().push(atom);
}

/// `code.=` / `exec.=`: deep equality of the two topmost atoms.
pub(crate) fn object_equals(source: CodeSource) -> impl Fn(&mut Interpreter) + 'static {
    move |interpreter: &mut Interpreter| {
        if source_stack(interpreter, source).len() < 2 {
            return;
        }
        let first = source_stack_mut(interpreter, source).pop();
        let second = source_stack_mut(interpreter, source).pop();
        interpreter.bool_stack_mut().push(first == second);
    }
}

/// `code.if` / `exec.if`: pop a boolean and two branches (`iftrue` on top),
/// then push the taken branch onto exec.
pub(crate) fn if_instruction(source: CodeSource) -> impl Fn(&mut Interpreter) + 'static {
    move |interpreter: &mut Interpreter| {
        if source_stack(interpreter, source).len() < 2 || interpreter.bool_stack().is_empty() {
            return;
        }
        let condition = interpreter.bool_stack_mut().pop();
        let if_true = source_stack_mut(interpreter, source).pop();
        let if_false = source_stack_mut(interpreter, source).pop();
        let taken = if condition { if_true } else { if_false };
        interpreter.exec_stack_mut().push(taken);
    }
}

/// `exec.k`: drop the second exec element, keeping the top.
pub(crate) fn exec_k(interpreter: &mut Interpreter) {
    if interpreter.exec_stack().len() < 2 {
        return;
    }
    interpreter.exec_stack_mut().swap();
    interpreter.exec_stack_mut().pop();
}

/// `exec.s`: pop `a b c`, push the list `( b c )`, then `c`, then `a` - a
/// no-op when the list would exceed the configured point budget.
pub(crate) fn exec_s(interpreter: &mut Interpreter) {
    if interpreter.exec_stack().len() < 3 {
        return;
    }
    let a = interpreter.exec_stack_mut().pop();
    let b = interpreter.exec_stack_mut().pop();
    let c = interpreter.exec_stack_mut().pop();
    let mut pair = Program::new();
    pair.push(b.clone());
    pair.push(c.clone());
    if pair.points() > interpreter.config.max_points_in_program {
        interpreter.exec_stack_mut().push(c);
        interpreter.exec_stack_mut().push(b);
        interpreter.exec_stack_mut().push(a);
    } else {
        interpreter.exec_stack_mut().push(Atom::Program(pair));
        interpreter.exec_stack_mut().push(c);
        interpreter.exec_stack_mut().push(a);
    }
}

/// `exec.y`: pop `a`, push `( exec.y a )`, then `a` - bounded
/// self-recursion via the step budget.
pub(crate) fn exec_y(interpreter: &mut Interpreter) {
    if interpreter.exec_stack().is_empty() {
        return;
    }
    let a = interpreter.exec_stack_mut().pop();
    let mut recursion = Program::new();
    recursion.push("exec.y");
    recursion.push(a.clone());
    interpreter.exec_stack_mut().push(Atom::Program(recursion));
    interpreter.exec_stack_mut().push(a);
}

/// `exec.yield`: halt the step loop even with exec atoms remaining.
pub(crate) fn exec_yield(interpreter: &mut Interpreter) {
    interpreter.yield_execution();
}

/// `code.do*range` / `exec.do*range`: execute the body once per index from
/// `start` toward `stop` inclusive, pushing the current index before each
/// iteration. Advancing is encoded as a freshly-built continuation program.
pub(crate) fn do_range(source: CodeSource) -> impl Fn(&mut Interpreter) + 'static {
    move |interpreter: &mut Interpreter| {
        if source_stack(interpreter, source).is_empty() || interpreter.int_stack().len() < 2 {
            return;
        }
        let stop = interpreter.int_stack_mut().pop();
        let start = interpreter.int_stack_mut().pop();
        let code = source_stack_mut(interpreter, source).pop();
        interpreter.int_stack_mut().push(start);
        if start == stop {
            interpreter.exec_stack_mut().push(code);
        } else {
            let next = if start < stop { start + 1 } else { start - 1 };
            let mut continuation = Program::new();
            continuation.push(next);
            continuation.push(stop);
            match source {
                CodeSource::Exec => {
                    continuation.push("exec.do*range");
                    continuation.push(code.clone());
                }
                CodeSource::Code => {
                    continuation.push("code.quote");
                    continuation.push(code.clone());
                    continuation.push("code.do*range");
                }
            }
            interpreter.exec_stack_mut().push(Atom::Program(continuation));
            interpreter.exec_stack_mut().push(code);
        }
    }
}

/// `code.do*times` / `exec.do*times`: run the body `count` times,
/// discarding the loop counter by prefixing the body with `integer.pop` and
/// delegating to `do*range(0, count - 1)`.
pub(crate) fn do_times(source: CodeSource) -> impl Fn(&mut Interpreter) + 'static {
    move |interpreter: &mut Interpreter| {
        if source_stack(interpreter, source).is_empty()
            || interpreter.int_stack().is_empty()
            || interpreter.int_stack().top() <= 0
        {
            return;
        }
        let body = source_stack_mut(interpreter, source).pop();
        let body = wrap_with_counter_discard(body);
        let stop = interpreter.int_stack_mut().pop() - 1;
        push_range_macro(interpreter, source, stop, body);
    }
}

/// `code.do*count` / `exec.do*count`: run the body `count` times with the
/// loop index left on the integer stack for each iteration.
pub(crate) fn do_count(source: CodeSource) -> impl Fn(&mut Interpreter) + 'static {
    move |interpreter: &mut Interpreter| {
        if source_stack(interpreter, source).is_empty()
            || interpreter.int_stack().is_empty()
            || interpreter.int_stack().top() <= 0
        {
            return;
        }
        let stop = interpreter.int_stack_mut().pop() - 1;
        let body = source_stack_mut(interpreter, source).pop();
        push_range_macro(interpreter, source, stop, body);
    }
}

fn wrap_with_counter_discard(body: Atom) -> Atom {
    match body {
        Atom::Program(mut program) => {
            program.prepend("integer.pop");
            Atom::Program(program)
        }
        other => {
            let mut program = Program::new();
            program.push("integer.pop");
            program.push(other);
            Atom::Program(program)
        }
    }
}

fn push_range_macro(interpreter: &mut Interpreter, source: CodeSource, stop: i32, body: Atom) {
    let mut range_macro = Program::new();
    range_macro.push(0);
    range_macro.push(stop);
    match source {
        CodeSource::Exec => {
            range_macro.push("exec.do*range");
            range_macro.push(body);
        }
        CodeSource::Code => {
            range_macro.push("code.quote");
            range_macro.push(body);
            range_macro.push("code.do*range");
        }
    }
    interpreter.exec_stack_mut().push(Atom::Program(range_macro));
}

/// `code.rand` / `exec.rand`: pop a point bound and push a random program
/// of 2 up to `min(|bound|, max_random_code_size) + 1` points.
pub(crate) fn random_code_instruction(source: CodeSource) -> impl Fn(&mut Interpreter) + 'static {
    move |interpreter: &mut Interpreter| {
        if interpreter.int_stack().is_empty() {
            return;
        }
        let bound = interpreter.int_stack_mut().pop();
        let max_points =
            (bound.unsigned_abs() as usize).min(interpreter.config.max_random_code_size);
        let size = if max_points > 0 {
            interpreter.rng.gen_range(0..max_points) + 2
        } else {
            2
        };
        let program = interpreter.random_code(size);
        source_stack_mut(interpreter, source).push(Atom::Program(program));
    }
}
