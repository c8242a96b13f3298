//! Instructions over the input stack.
//!
//! These delegate the actual typed dispatch to the injected
//! [`crate::InputPusher`]; slot indices count from the bottom, so slot 0 is
//! the first input pushed.

use crate::input::InputPusher;
use crate::interpreter::Interpreter;

/// `input.inN`: push input slot `index` unconditionally.
pub(crate) fn input_in_n(index: usize) -> impl Fn(&mut Interpreter) + 'static {
    move |interpreter: &mut Interpreter| {
        let pusher = interpreter.input_pusher();
        pusher.push_input(interpreter, index);
    }
}

/// `input.index`: pop a slot index from the integer stack (clamped) and
/// push that input.
pub(crate) fn input_index(interpreter: &mut Interpreter) {
    if interpreter.int_stack().is_empty() || interpreter.input_stack().is_empty() {
        return;
    }
    let index = interpreter.int_stack_mut().pop();
    let slot = (index.max(0) as usize).min(interpreter.input_stack().len() - 1);
    let pusher = interpreter.input_pusher();
    pusher.push_input(interpreter, slot);
}

/// `input.inall`: push every input slot, first-pushed first.
pub(crate) fn input_in_all(interpreter: &mut Interpreter) {
    let pusher = interpreter.input_pusher();
    for slot in 0..interpreter.input_stack().len() {
        pusher.push_input(interpreter, slot);
    }
}

/// `input.inallrev`: push every input slot, last-pushed first.
pub(crate) fn input_in_all_rev(interpreter: &mut Interpreter) {
    let pusher = interpreter.input_pusher();
    for slot in (0..interpreter.input_stack().len()).rev() {
        pusher.push_input(interpreter, slot);
    }
}
