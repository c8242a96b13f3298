//! The generic stack-manipulation instructions.
//!
//! Every stack (core or custom) gets the same nine instructions under its
//! name prefix. The indexed operations take their index from the integer
//! stack; if the target stack turns out to be empty the index is pushed
//! back, so the net effect is a no-op.

use push_stack::StackOps;

use crate::interpreter::{Interpreter, StackId};

/// Define `<prefix>.pop`, `.swap`, `.rot`, `.flush`, `.dup`, `.stackdepth`,
/// `.shove`, `.yank`, and `.yankdup` against the stack identified by `id`.
pub(crate) fn define_stack_instructions(interpreter: &mut Interpreter, prefix: &str, id: StackId) {
    interpreter.define_instruction(&format!("{prefix}.pop"), move |i: &mut Interpreter| {
        if let Some(stack) = i.stack_ops_mut(id) {
            stack.popdiscard();
        }
    });
    interpreter.define_instruction(&format!("{prefix}.swap"), move |i: &mut Interpreter| {
        if let Some(stack) = i.stack_ops_mut(id) {
            stack.swap();
        }
    });
    interpreter.define_instruction(&format!("{prefix}.rot"), move |i: &mut Interpreter| {
        if let Some(stack) = i.stack_ops_mut(id) {
            stack.rot();
        }
    });
    interpreter.define_instruction(&format!("{prefix}.flush"), move |i: &mut Interpreter| {
        if let Some(stack) = i.stack_ops_mut(id) {
            stack.clear();
        }
    });
    interpreter.define_instruction(&format!("{prefix}.dup"), move |i: &mut Interpreter| {
        if let Some(stack) = i.stack_ops_mut(id) {
            stack.dup();
        }
    });
    interpreter.define_instruction(&format!("{prefix}.stackdepth"), move |i: &mut Interpreter| {
        let Some(depth) = i.stack_ops_mut(id).map(|stack| stack.depth()) else {
            return;
        };
        i.int_stack_mut().push(depth as i32);
    });
    interpreter.define_instruction(&format!("{prefix}.shove"), move |i: &mut Interpreter| {
        with_popped_index(i, id, |stack, index| stack.shove(index));
    });
    interpreter.define_instruction(&format!("{prefix}.yank"), move |i: &mut Interpreter| {
        with_popped_index(i, id, |stack, index| stack.yank(index));
    });
    interpreter.define_instruction(&format!("{prefix}.yankdup"), move |i: &mut Interpreter| {
        with_popped_index(i, id, |stack, index| stack.yankdup(index));
    });
}

/// Pop an index from the integer stack and apply `operation` to the target
/// stack; restore the index if the target is empty or missing. Note the
/// integer stack may itself be the target, in which case the index pop is
/// part of the operation's view of the stack.
fn with_popped_index(
    interpreter: &mut Interpreter,
    id: StackId,
    operation: impl FnOnce(&mut dyn StackOps, i32),
) {
    if interpreter.int_stack().is_empty() {
        return;
    }
    let index = interpreter.int_stack_mut().pop();
    let depth = match interpreter.stack_ops_mut(id) {
        Some(stack) => stack.depth(),
        None => {
            interpreter.int_stack_mut().push(index);
            return;
        }
    };
    if depth == 0 {
        interpreter.int_stack_mut().push(index);
        return;
    }
    if let Some(stack) = interpreter.stack_ops_mut(id) {
        operation(stack, index);
    }
}
