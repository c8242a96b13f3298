//! The default instruction set.
//!
//! Instructions are arity-typed functions over one or more typed stacks.
//! The [`unary`] and [`binary`] combinators enforce the underflow contract
//! once: insufficient depth is a silent no-op with no partial pops, and a
//! binary instruction pops its top operand second-to-apply, so `a b op`
//! computes `op(a, b)`.

pub(crate) mod control;
pub(crate) mod input;
pub(crate) mod stackops;

use push_ir::Atom;
use push_stack::TypedStack;

use crate::arith;
use crate::interpreter::{Interpreter, StackId};
use crate::random_program::AtomGenerator;

/// Maps a scalar operand type to its stack on the interpreter.
pub(crate) trait StackType: Clone + Default + PartialEq + 'static {
    fn stack(interpreter: &Interpreter) -> &TypedStack<Self>;
    fn stack_mut(interpreter: &mut Interpreter) -> &mut TypedStack<Self>;
}

impl StackType for i32 {
    fn stack(interpreter: &Interpreter) -> &TypedStack<i32> {
        interpreter.int_stack()
    }
    fn stack_mut(interpreter: &mut Interpreter) -> &mut TypedStack<i32> {
        interpreter.int_stack_mut()
    }
}

impl StackType for f32 {
    fn stack(interpreter: &Interpreter) -> &TypedStack<f32> {
        interpreter.float_stack()
    }
    fn stack_mut(interpreter: &mut Interpreter) -> &mut TypedStack<f32> {
        interpreter.float_stack_mut()
    }
}

impl StackType for bool {
    fn stack(interpreter: &Interpreter) -> &TypedStack<bool> {
        interpreter.bool_stack()
    }
    fn stack_mut(interpreter: &mut Interpreter) -> &mut TypedStack<bool> {
        interpreter.bool_stack_mut()
    }
}

impl StackType for String {
    fn stack(interpreter: &Interpreter) -> &TypedStack<String> {
        interpreter.name_stack()
    }
    fn stack_mut(interpreter: &mut Interpreter) -> &mut TypedStack<String> {
        interpreter.name_stack_mut()
    }
}

/// A one-operand instruction reading from `A`'s stack and pushing onto
/// `R`'s (they may differ, enabling cross-type conversions).
pub(crate) fn unary<A, R>(f: impl Fn(A) -> R + 'static) -> impl Fn(&mut Interpreter) + 'static
where
    A: StackType,
    R: StackType,
{
    move |interpreter: &mut Interpreter| {
        if A::stack(interpreter).is_empty() {
            return;
        }
        let a = A::stack_mut(interpreter).pop();
        let result = f(a);
        R::stack_mut(interpreter).push(result);
    }
}

/// A two-operand instruction over `A`'s stack, pushing onto `R`'s. For
/// operands pushed `a` then `b`, computes `f(a, b)`.
pub(crate) fn binary<A, R>(f: impl Fn(A, A) -> R + 'static) -> impl Fn(&mut Interpreter) + 'static
where
    A: StackType,
    R: StackType,
{
    move |interpreter: &mut Interpreter| {
        if A::stack(interpreter).len() < 2 {
            return;
        }
        let second = A::stack_mut(interpreter).pop();
        let first = A::stack_mut(interpreter).pop();
        let result = f(first, second);
        R::stack_mut(interpreter).push(result);
    }
}

/// Register the full default instruction set and the ERC generators.
pub(crate) fn install(interpreter: &mut Interpreter) {
    use self::control::CodeSource::{Code, Exec};

    // Integer arithmetic saturates rather than wrapping; division and
    // modulus by zero yield 0.
    interpreter.define_instruction("integer.+", binary(|a: i32, b: i32| a.saturating_add(b)));
    interpreter.define_instruction("integer.-", binary(|a: i32, b: i32| a.saturating_sub(b)));
    interpreter.define_instruction("integer.*", binary(|a: i32, b: i32| a.saturating_mul(b)));
    interpreter.define_instruction("integer./", binary(arith::int_div));
    interpreter.define_instruction("integer.%", binary(arith::int_mod));
    interpreter.define_instruction(
        "integer.pow",
        binary(|a: i32, b: i32| arith::int_from_f64(f64::from(a).powf(f64::from(b)))),
    );
    interpreter.define_instruction(
        "integer.log",
        binary(|a: i32, b: i32| arith::int_from_f64(f64::from(a).log(f64::from(b)))),
    );
    interpreter.define_instruction("integer.=", binary(|a: i32, b: i32| a == b));
    interpreter.define_instruction("integer.>", binary(|a: i32, b: i32| a > b));
    interpreter.define_instruction("integer.<", binary(|a: i32, b: i32| a < b));
    interpreter.define_instruction("integer.min", binary(|a: i32, b: i32| a.min(b)));
    interpreter.define_instruction("integer.max", binary(|a: i32, b: i32| a.max(b)));
    interpreter.define_instruction("integer.abs", unary(arith::int_abs));
    interpreter.define_instruction("integer.neg", unary(arith::int_neg));
    interpreter.define_instruction(
        "integer.ln",
        unary(|a: i32| arith::int_from_f64(f64::from(a).ln())),
    );
    interpreter.define_instruction("integer.fromfloat", unary(|a: f32| a as i32));
    interpreter.define_instruction("integer.fromboolean", unary(|a: bool| i32::from(a)));
    interpreter.define_instruction("integer.rand", |i: &mut Interpreter| {
        let value = i.random_int_erc();
        i.int_stack_mut().push(value);
    });
    interpreter.define_instruction("integer.define", |i: &mut Interpreter| {
        if i.int_stack().is_empty() || i.name_stack().is_empty() {
            return;
        }
        let name = i.name_stack_mut().pop();
        let value = i.int_stack_mut().pop();
        i.define_instruction(&name, move |i: &mut Interpreter| {
            i.int_stack_mut().push(value);
        });
    });

    // Float results are coerced away from NaN and infinity.
    interpreter.define_instruction("float.+", binary(|a: f32, b: f32| arith::sat_f32(a + b)));
    interpreter.define_instruction("float.-", binary(|a: f32, b: f32| arith::sat_f32(a - b)));
    interpreter.define_instruction("float.*", binary(|a: f32, b: f32| arith::sat_f32(a * b)));
    interpreter.define_instruction(
        "float./",
        binary(|a: f32, b: f32| if b == 0.0 { 0.0 } else { arith::sat_f32(a / b) }),
    );
    interpreter.define_instruction(
        "float.%",
        binary(|a: f32, b: f32| if b == 0.0 { 0.0 } else { arith::sat_f32(a % b) }),
    );
    interpreter.define_instruction(
        "float.pow",
        binary(|a: f32, b: f32| arith::sat_f32(a.powf(b))),
    );
    interpreter.define_instruction(
        "float.log",
        binary(|a: f32, b: f32| arith::sat_f32(a.log(b))),
    );
    interpreter.define_instruction("float.=", binary(|a: f32, b: f32| a == b));
    interpreter.define_instruction("float.>", binary(|a: f32, b: f32| a > b));
    interpreter.define_instruction("float.<", binary(|a: f32, b: f32| a < b));
    interpreter.define_instruction(
        "float.min",
        binary(|a: f32, b: f32| if a < b { a } else { b }),
    );
    interpreter.define_instruction(
        "float.max",
        binary(|a: f32, b: f32| if a > b { a } else { b }),
    );
    interpreter.define_instruction("float.sin", unary(|a: f32| arith::sat_f32(a.sin())));
    interpreter.define_instruction("float.cos", unary(|a: f32| arith::sat_f32(a.cos())));
    interpreter.define_instruction("float.tan", unary(|a: f32| arith::sat_f32(a.tan())));
    interpreter.define_instruction("float.exp", unary(|a: f32| arith::sat_f32(a.exp())));
    interpreter.define_instruction("float.ln", unary(|a: f32| arith::sat_f32(a.ln())));
    interpreter.define_instruction("float.abs", unary(|a: f32| if a < 0.0 { -a } else { a }));
    interpreter.define_instruction("float.neg", unary(|a: f32| -a));
    interpreter.define_instruction("float.frominteger", unary(|a: i32| a as f32));
    interpreter.define_instruction(
        "float.fromboolean",
        unary(|a: bool| if a { 1.0f32 } else { 0.0 }),
    );
    interpreter.define_instruction("float.rand", |i: &mut Interpreter| {
        let value = i.random_float_erc();
        i.float_stack_mut().push(value);
    });
    interpreter.define_instruction("float.define", |i: &mut Interpreter| {
        if i.float_stack().is_empty() || i.name_stack().is_empty() {
            return;
        }
        let name = i.name_stack_mut().pop();
        let value = i.float_stack_mut().pop();
        i.define_instruction(&name, move |i: &mut Interpreter| {
            i.float_stack_mut().push(value);
        });
    });

    interpreter.define_instruction("boolean.=", binary(|a: bool, b: bool| a == b));
    interpreter.define_instruction("boolean.not", unary(|a: bool| !a));
    interpreter.define_instruction("boolean.and", binary(|a: bool, b: bool| a & b));
    interpreter.define_instruction("boolean.or", binary(|a: bool, b: bool| a | b));
    interpreter.define_instruction("boolean.xor", binary(|a: bool, b: bool| a ^ b));
    interpreter.define_instruction("boolean.frominteger", unary(|a: i32| a != 0));
    interpreter.define_instruction("boolean.fromfloat", unary(|a: f32| a != 0.0));
    interpreter.define_instruction("boolean.rand", |i: &mut Interpreter| {
        let value = i.random_bool_erc();
        i.bool_stack_mut().push(value);
    });
    interpreter.define_instruction("boolean.define", |i: &mut Interpreter| {
        if i.bool_stack().is_empty() || i.name_stack().is_empty() {
            return;
        }
        let name = i.name_stack_mut().pop();
        let value = i.bool_stack_mut().pop();
        i.define_instruction(&name, move |i: &mut Interpreter| {
            i.bool_stack_mut().push(value);
        });
    });

    interpreter.define_instruction("name.=", binary(|a: String, b: String| a == b));
    interpreter.define_instruction("name.+", binary(|a: String, b: String| format!("{a}{b}")));
    interpreter.define_instruction("name.quote", |i: &mut Interpreter| {
        i.quoting = true;
    });

    interpreter.define_instruction("code.quote", control::quote);
    interpreter.define_instruction("code.fromboolean", |i: &mut Interpreter| {
        if i.bool_stack().is_empty() {
            return;
        }
        let value = i.bool_stack_mut().pop();
        i.code_stack_mut().push(Atom::Bool(value));
    });
    interpreter.define_instruction("code.frominteger", |i: &mut Interpreter| {
        if i.int_stack().is_empty() {
            return;
        }
        let value = i.int_stack_mut().pop();
        i.code_stack_mut().push(Atom::Int(value));
    });
    interpreter.define_instruction("code.fromfloat", |i: &mut Interpreter| {
        if i.float_stack().is_empty() {
            return;
        }
        let value = i.float_stack_mut().pop();
        i.code_stack_mut().push(Atom::Float(value));
    });
    interpreter.define_instruction("code.noop", |_: &mut Interpreter| {});
    interpreter.define_instruction("code.=", control::object_equals(Code));
    interpreter.define_instruction("code.if", control::if_instruction(Code));
    interpreter.define_instruction("code.rand", control::random_code_instruction(Code));
    interpreter.define_instruction("code.do*range", control::do_range(Code));
    interpreter.define_instruction("code.do*times", control::do_times(Code));
    interpreter.define_instruction("code.do*count", control::do_count(Code));

    interpreter.define_instruction("exec.k", control::exec_k);
    interpreter.define_instruction("exec.s", control::exec_s);
    interpreter.define_instruction("exec.y", control::exec_y);
    interpreter.define_instruction("exec.yield", control::exec_yield);
    interpreter.define_instruction("exec.noop", |_: &mut Interpreter| {});
    interpreter.define_instruction("exec.=", control::object_equals(Exec));
    interpreter.define_instruction("exec.if", control::if_instruction(Exec));
    interpreter.define_instruction("exec.rand", control::random_code_instruction(Exec));
    interpreter.define_instruction("exec.do*range", control::do_range(Exec));
    interpreter.define_instruction("exec.do*times", control::do_times(Exec));
    interpreter.define_instruction("exec.do*count", control::do_count(Exec));

    interpreter.define_instruction("true", |i: &mut Interpreter| i.bool_stack_mut().push(true));
    interpreter.define_instruction("false", |i: &mut Interpreter| i.bool_stack_mut().push(false));

    interpreter.define_instruction("input.index", input::input_index);
    interpreter.define_instruction("input.inall", input::input_in_all);
    interpreter.define_instruction("input.inallrev", input::input_in_all_rev);
    interpreter.define_instruction("input.stackdepth", |i: &mut Interpreter| {
        let depth = i.input_stack().len() as i32;
        i.int_stack_mut().push(depth);
    });

    interpreter.define_instruction("frame.push", |i: &mut Interpreter| i.push_frame());
    interpreter.define_instruction("frame.pop", |i: &mut Interpreter| i.pop_frame());

    for (prefix, id) in [
        ("integer", StackId::Integer),
        ("float", StackId::Float),
        ("boolean", StackId::Boolean),
        ("name", StackId::Name),
        ("code", StackId::Code),
        ("exec", StackId::Exec),
    ] {
        stackops::define_stack_instructions(interpreter, prefix, id);
    }

    // ERCs live only in the generator table; they are not executable.
    interpreter.register_generator("integer.erc", AtomGenerator::IntErc);
    interpreter.register_generator("float.erc", AtomGenerator::FloatErc);
    interpreter.register_generator("boolean.erc", AtomGenerator::BoolErc);
}
