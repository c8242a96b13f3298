//! The instruction binding.

use std::fmt;
use std::rc::Rc;

use crate::interpreter::Interpreter;

/// A named executable bound in the interpreter's registry.
///
/// The body takes the interpreter state as an explicit parameter; there is
/// no captured mutable state. Bodies are total: whatever the stacks hold,
/// execution cannot fail (underflow and numeric edges are absorbed by the
/// instruction itself).
#[derive(Clone)]
pub struct Instruction {
    name: Rc<str>,
    body: Rc<dyn Fn(&mut Interpreter)>,
}

impl Instruction {
    pub(crate) fn new(name: &str, body: impl Fn(&mut Interpreter) + 'static) -> Self {
        Instruction {
            name: Rc::from(name),
            body: Rc::new(body),
        }
    }

    /// The name this instruction is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the instruction against the interpreter state.
    pub fn execute(&self, interpreter: &mut Interpreter) {
        (self.body)(interpreter);
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Instruction").field(&self.name).finish()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl PartialEq for Instruction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
