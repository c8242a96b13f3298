//! The Push interpreter.
//!
//! Owns every stack, the instruction registry, and the step loop.
//! `execute` loads a program onto the code and exec stacks and steps until
//! the exec stack empties, the step ceiling is hit, or `exec.yield` sets the
//! stop flag. Each dispatched atom is one step; instructions may push
//! further atoms (the iteration combinators emit their own continuation
//! programs), so a runaway loop is bounded by the step budget rather than
//! host stack depth.

mod builder;

pub use builder::InterpreterBuilder;

use std::fmt;
use std::mem;
use std::rc::Rc;

use rand::rngs::StdRng;
use rustc_hash::FxHashMap;

use push_ir::{Atom, Program};
use push_stack::{StackOps, TypedStack};

use crate::config::SynthesisConfig;
use crate::errors::SetupError;
use crate::input::InputPusher;
use crate::instruction::Instruction;
use crate::instructions::stackops;
use crate::random_program::AtomGenerator;

/// Identifies one of the interpreter's stacks, so the generic stack
/// instructions can address the active stack even while frames swap the
/// underlying storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackId {
    /// The execution stack.
    Exec,
    /// The code stack.
    Code,
    /// The integer stack.
    Integer,
    /// The float stack.
    Float,
    /// The boolean stack.
    Boolean,
    /// The name stack.
    Name,
    /// The input stack.
    Input,
    /// A caller-registered custom stack, by registration index.
    Custom(usize),
}

/// A suspended set of typed stacks, saved while an inner frame runs. The
/// exec and input stacks are frameless.
struct Frame {
    int: TypedStack<i32>,
    float: TypedStack<f32>,
    boolean: TypedStack<bool>,
    code: TypedStack<Atom>,
    name: TypedStack<String>,
}

/// The Push language interpreter.
pub struct Interpreter {
    pub(crate) instructions: FxHashMap<String, Instruction>,
    pub(crate) generators: FxHashMap<String, AtomGenerator>,
    /// The active random-generation set. Order matters for RNG draw
    /// reproducibility, and duplicate entries are deliberate weighting.
    pub(crate) active_generators: Vec<(String, AtomGenerator)>,
    pub(crate) exec_stack: TypedStack<Atom>,
    pub(crate) code_stack: TypedStack<Atom>,
    pub(crate) int_stack: TypedStack<i32>,
    pub(crate) float_stack: TypedStack<f32>,
    pub(crate) bool_stack: TypedStack<bool>,
    pub(crate) name_stack: TypedStack<String>,
    pub(crate) input_stack: TypedStack<Atom>,
    custom_stacks: Vec<(String, Box<dyn StackOps>)>,
    frames: Vec<Frame>,
    pub(crate) use_frames: bool,
    pub(crate) stop: bool,
    pub(crate) quoting: bool,
    total_steps_taken: u64,
    evaluation_executions: u64,
    pub(crate) config: SynthesisConfig,
    pub(crate) rng: StdRng,
    input_pusher: Rc<dyn InputPusher>,
}

impl Interpreter {
    /// Create an interpreter with the full default instruction set and an
    /// entropy-seeded RNG. Use [`InterpreterBuilder`] for a fixed seed or
    /// frames.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    // Execution

    /// Execute a Push program with no step limit.
    ///
    /// Returns the number of steps executed.
    pub fn execute(&mut self, program: &Program) -> u64 {
        self.execute_with_limit(program, -1)
    }

    /// Execute a Push program, dispatching at most `max_steps` atoms
    /// (`-1` for unbounded).
    #[tracing::instrument(level = "trace", skip_all, fields(points = program.points()))]
    pub fn execute_with_limit(&mut self, program: &Program, max_steps: i64) -> u64 {
        self.evaluation_executions += 1;
        self.load_program(program);
        self.step(max_steps)
    }

    /// Load a program onto the code and exec stacks without stepping.
    pub fn load_program(&mut self, program: &Program) {
        self.code_stack.push(Atom::Program(program.clone()));
        self.exec_stack.push(Atom::Program(program.clone()));
    }

    /// Step the interpreter until the exec stack empties, `max_steps` atoms
    /// have been dispatched (`-1` for unbounded), or an instruction yields.
    ///
    /// Returns the number of steps executed.
    pub fn step(&mut self, max_steps: i64) -> u64 {
        self.stop = false;
        let mut remaining = max_steps;
        let mut executed = 0;
        while remaining != 0 && !self.exec_stack.is_empty() && !self.stop {
            let atom = self.exec_stack.pop();
            tracing::trace!(atom = %atom, "dispatch");
            self.execute_atom(atom);
            if remaining > 0 {
                remaining -= 1;
            }
            executed += 1;
        }
        self.total_steps_taken += executed;
        executed
    }

    /// Dispatch a single atom against the interpreter state.
    pub fn execute_atom(&mut self, atom: Atom) {
        match atom {
            Atom::Program(program) => {
                if self.use_frames {
                    // The children run inside a fresh frame: frame.push is
                    // dispatched first, frame.pop after the last child.
                    self.exec_stack.push(Atom::Name("frame.pop".to_string()));
                    program.push_all_reverse(&mut self.exec_stack);
                    self.exec_stack.push(Atom::Name("frame.push".to_string()));
                } else {
                    program.push_all_reverse(&mut self.exec_stack);
                }
            }
            Atom::Int(value) => self.int_stack.push(value),
            Atom::Float(value) => self.float_stack.push(value),
            Atom::Bool(value) => self.bool_stack.push(value),
            Atom::Instruction(reference) => {
                if let Some(instruction) = self.instructions.get(reference.name()).cloned() {
                    instruction.execute(self);
                }
            }
            Atom::Name(name) => {
                if !self.quoting {
                    if let Some(instruction) = self.instructions.get(&name).cloned() {
                        instruction.execute(self);
                        return;
                    }
                }
                // Pure data names round-trip through the name stack.
                self.name_stack.push(name);
                self.quoting = false;
            }
        }
    }

    /// Request a cooperative halt; the step loop checks this flag once per
    /// iteration. Equivalent to the in-band `exec.yield` instruction.
    pub fn yield_execution(&mut self) {
        self.stop = true;
    }

    // Registry

    /// Bind `body` as the instruction `name`, together with its atom
    /// generator. Re-registration replaces both.
    pub fn define_instruction(&mut self, name: &str, body: impl Fn(&mut Interpreter) + 'static) {
        self.instructions
            .insert(name.to_string(), Instruction::new(name, body));
        self.generators
            .insert(name.to_string(), AtomGenerator::Instruction(name.to_string()));
    }

    /// Bind `body` as `name` and enable it for random generation
    /// immediately.
    pub fn add_instruction(&mut self, name: &str, body: impl Fn(&mut Interpreter) + 'static) {
        self.define_instruction(name, body);
        self.active_generators.push((
            name.to_string(),
            AtomGenerator::Instruction(name.to_string()),
        ));
    }

    pub(crate) fn register_generator(&mut self, name: &str, generator: AtomGenerator) {
        self.generators.insert(name.to_string(), generator);
    }

    /// Look up a registered instruction by name.
    pub fn get_instruction(&self, name: &str) -> Option<&Instruction> {
        self.instructions.get(name)
    }

    /// Every registered instruction name, sorted and space-joined.
    pub fn registered_instructions_string(&self) -> String {
        let mut names: Vec<&str> = self.instructions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names.join(" ")
    }

    // Stacks

    /// The integer stack of the active frame.
    pub fn int_stack(&self) -> &TypedStack<i32> {
        &self.int_stack
    }

    /// Mutable integer stack of the active frame.
    pub fn int_stack_mut(&mut self) -> &mut TypedStack<i32> {
        &mut self.int_stack
    }

    /// The float stack of the active frame.
    pub fn float_stack(&self) -> &TypedStack<f32> {
        &self.float_stack
    }

    /// Mutable float stack of the active frame.
    pub fn float_stack_mut(&mut self) -> &mut TypedStack<f32> {
        &mut self.float_stack
    }

    /// The boolean stack of the active frame.
    pub fn bool_stack(&self) -> &TypedStack<bool> {
        &self.bool_stack
    }

    /// Mutable boolean stack of the active frame.
    pub fn bool_stack_mut(&mut self) -> &mut TypedStack<bool> {
        &mut self.bool_stack
    }

    /// The name stack of the active frame.
    pub fn name_stack(&self) -> &TypedStack<String> {
        &self.name_stack
    }

    /// Mutable name stack of the active frame.
    pub fn name_stack_mut(&mut self) -> &mut TypedStack<String> {
        &mut self.name_stack
    }

    /// The code stack of the active frame.
    pub fn code_stack(&self) -> &TypedStack<Atom> {
        &self.code_stack
    }

    /// Mutable code stack of the active frame.
    pub fn code_stack_mut(&mut self) -> &mut TypedStack<Atom> {
        &mut self.code_stack
    }

    /// The exec stack (frameless).
    pub fn exec_stack(&self) -> &TypedStack<Atom> {
        &self.exec_stack
    }

    /// Mutable exec stack.
    pub fn exec_stack_mut(&mut self) -> &mut TypedStack<Atom> {
        &mut self.exec_stack
    }

    /// The input stack (frameless, seeded once per fitness case).
    pub fn input_stack(&self) -> &TypedStack<Atom> {
        &self.input_stack
    }

    /// Mutable input stack.
    pub fn input_stack_mut(&mut self) -> &mut TypedStack<Atom> {
        &mut self.input_stack
    }

    /// Register a custom stack under `name`, define the nine `<name>.*`
    /// stack instructions for it, and return its index.
    pub fn add_stack(&mut self, name: &str, stack: Box<dyn StackOps>) -> Result<usize, SetupError> {
        if self.get_stack(name).is_some() {
            return Err(SetupError::DuplicateStack(name.to_string()));
        }
        let index = self.custom_stacks.len();
        self.custom_stacks.push((name.to_string(), stack));
        stackops::define_stack_instructions(self, name, StackId::Custom(index));
        tracing::debug!(name, index, "registered custom stack");
        Ok(index)
    }

    /// Look up any stack (core or custom) by name.
    pub fn get_stack(&self, name: &str) -> Option<&dyn StackOps> {
        match name {
            "exec" => Some(&self.exec_stack),
            "code" => Some(&self.code_stack),
            "integer" => Some(&self.int_stack),
            "float" => Some(&self.float_stack),
            "boolean" => Some(&self.bool_stack),
            "name" => Some(&self.name_stack),
            "input" => Some(&self.input_stack),
            _ => self
                .custom_stacks
                .iter()
                .find(|(stack_name, _)| stack_name == name)
                .map(|(_, stack)| stack.as_ref()),
        }
    }

    /// The custom stack registered at `index`.
    pub fn custom_stack(&self, index: usize) -> Option<&dyn StackOps> {
        self.custom_stacks.get(index).map(|(_, stack)| stack.as_ref())
    }

    /// Mutable custom stack at `index`.
    pub fn custom_stack_mut(&mut self, index: usize) -> Option<&mut (dyn StackOps + 'static)> {
        self.custom_stacks
            .get_mut(index)
            .map(|(_, stack)| stack.as_mut())
    }

    pub(crate) fn stack_ops_mut(&mut self, id: StackId) -> Option<&mut (dyn StackOps + 'static)> {
        match id {
            StackId::Exec => Some(&mut self.exec_stack),
            StackId::Code => Some(&mut self.code_stack),
            StackId::Integer => Some(&mut self.int_stack),
            StackId::Float => Some(&mut self.float_stack),
            StackId::Boolean => Some(&mut self.bool_stack),
            StackId::Name => Some(&mut self.name_stack),
            StackId::Input => Some(&mut self.input_stack),
            StackId::Custom(index) => self.custom_stack_mut(index),
        }
    }

    /// Reset every stack (custom stacks included) and the in-band flags,
    /// leaving the registry, counters, and RNG untouched.
    pub fn clear_stacks(&mut self) {
        self.exec_stack.clear();
        self.code_stack.clear();
        self.int_stack.clear();
        self.float_stack.clear();
        self.bool_stack.clear();
        self.name_stack.clear();
        self.input_stack.clear();
        for (_, stack) in &mut self.custom_stacks {
            stack.clear();
        }
        // Unbalanced frames left by an interrupted run are discarded.
        self.frames.clear();
        self.stop = false;
        self.quoting = false;
    }

    // Frames

    /// Whether frames are enabled. When on, each sub-program executes
    /// against a fresh set of stacks with top-of-stack argument and return
    /// passing.
    pub fn use_frames(&self) -> bool {
        self.use_frames
    }

    /// Toggle frame execution.
    pub fn set_use_frames(&mut self, use_frames: bool) {
        tracing::debug!(use_frames, "frames toggled");
        self.use_frames = use_frames;
    }

    /// Enter a fresh frame, seeding each new stack with the value popped
    /// from the enclosing frame's top (the code and name stacks seed only
    /// when non-empty). No-op unless frames are enabled.
    pub fn push_frame(&mut self) {
        if !self.use_frames {
            return;
        }
        let int_seed = self.int_stack.pop();
        let float_seed = self.float_stack.pop();
        let bool_seed = self.bool_stack.pop();
        let code_seed = (!self.code_stack.is_empty()).then(|| self.code_stack.pop());
        let name_seed = (!self.name_stack.is_empty()).then(|| self.name_stack.pop());
        self.frames.push(Frame {
            int: mem::take(&mut self.int_stack),
            float: mem::take(&mut self.float_stack),
            boolean: mem::take(&mut self.bool_stack),
            code: mem::take(&mut self.code_stack),
            name: mem::take(&mut self.name_stack),
        });
        self.int_stack.push(int_seed);
        self.float_stack.push(float_seed);
        self.bool_stack.push(bool_seed);
        if let Some(seed) = code_seed {
            self.code_stack.push(seed);
        }
        if let Some(seed) = name_seed {
            self.name_stack.push(seed);
        }
    }

    /// Leave the current frame, discarding its stacks and re-seeding the
    /// enclosing frame's tops with the inner top values. No-op unless frames
    /// are enabled and a frame is open.
    pub fn pop_frame(&mut self) {
        if !self.use_frames {
            return;
        }
        let Some(enclosing) = self.frames.pop() else {
            return;
        };
        let int_seed = self.int_stack.pop();
        let float_seed = self.float_stack.pop();
        let bool_seed = self.bool_stack.pop();
        let code_seed = (!self.code_stack.is_empty()).then(|| self.code_stack.pop());
        let name_seed = (!self.name_stack.is_empty()).then(|| self.name_stack.pop());
        self.int_stack = enclosing.int;
        self.float_stack = enclosing.float;
        self.bool_stack = enclosing.boolean;
        self.code_stack = enclosing.code;
        self.name_stack = enclosing.name;
        self.int_stack.push(int_seed);
        self.float_stack.push(float_seed);
        self.bool_stack.push(bool_seed);
        if let Some(seed) = code_seed {
            self.code_stack.push(seed);
        }
        if let Some(seed) = name_seed {
            self.name_stack.push(seed);
        }
    }

    // Configuration and counters

    /// The synthesis/ERC parameters.
    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Replace the synthesis/ERC parameters.
    pub fn set_random_parameters(&mut self, config: SynthesisConfig) {
        self.config = config;
    }

    /// Replace the input-pushing collaborator.
    pub fn set_input_pusher(&mut self, pusher: Rc<dyn InputPusher>) {
        self.input_pusher = pusher;
    }

    pub(crate) fn input_pusher(&self) -> Rc<dyn InputPusher> {
        Rc::clone(&self.input_pusher)
    }

    /// Total steps dispatched over the interpreter's lifetime.
    pub fn total_steps_taken(&self) -> u64 {
        self.total_steps_taken
    }

    /// Number of `execute` calls so far this run.
    pub fn evaluation_executions(&self) -> u64 {
        self.evaluation_executions
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders the current state of every core stack, one per line.
impl fmt::Display for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "exec stack: {}", self.exec_stack)?;
        writeln!(f, "code stack: {}", self.code_stack)?;
        writeln!(f, "integer stack: {}", self.int_stack)?;
        writeln!(f, "float stack: {}", self.float_stack)?;
        writeln!(f, "boolean stack: {}", self.bool_stack)?;
        writeln!(f, "name stack: {}", self.name_stack)?;
        writeln!(f, "input stack: {}", self.input_stack)
    }
}
