//! Builder for configured interpreters.

use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rustc_hash::FxHashMap;

use push_stack::TypedStack;

use crate::config::SynthesisConfig;
use crate::input::{DefaultInputPusher, InputPusher};
use crate::instructions;
use crate::interpreter::Interpreter;

/// Builds an [`Interpreter`] with an explicit RNG seed, frame mode, ERC
/// configuration, and input pusher.
///
/// A fixed seed plus a fixed instruction-registration sequence makes every
/// `random_atom`/`random_code` draw reproducible, which evolutionary runs
/// depend on.
pub struct InterpreterBuilder {
    seed: Option<u64>,
    use_frames: bool,
    config: SynthesisConfig,
    input_pusher: Rc<dyn InputPusher>,
}

impl InterpreterBuilder {
    /// Start from defaults: entropy seed, frames off, default config.
    pub fn new() -> Self {
        InterpreterBuilder {
            seed: None,
            use_frames: false,
            config: SynthesisConfig::default(),
            input_pusher: Rc::new(DefaultInputPusher),
        }
    }

    /// Seed the RNG for reproducible atom and code generation.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable frame execution (each sub-program runs in a fresh frame).
    #[must_use]
    pub fn use_frames(mut self, use_frames: bool) -> Self {
        self.use_frames = use_frames;
        self
    }

    /// Set the synthesis/ERC parameters.
    #[must_use]
    pub fn config(mut self, config: SynthesisConfig) -> Self {
        self.config = config;
        self
    }

    /// Inject the input-pushing collaborator.
    #[must_use]
    pub fn input_pusher(mut self, pusher: Rc<dyn InputPusher>) -> Self {
        self.input_pusher = pusher;
        self
    }

    /// Build the interpreter and install the default instruction set.
    pub fn build(self) -> Interpreter {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut interpreter = Interpreter {
            instructions: FxHashMap::default(),
            generators: FxHashMap::default(),
            active_generators: Vec::new(),
            exec_stack: TypedStack::new(),
            code_stack: TypedStack::new(),
            int_stack: TypedStack::new(),
            float_stack: TypedStack::new(),
            bool_stack: TypedStack::new(),
            name_stack: TypedStack::new(),
            input_stack: TypedStack::new(),
            custom_stacks: Vec::new(),
            frames: Vec::new(),
            use_frames: self.use_frames,
            stop: false,
            quoting: false,
            total_steps_taken: 0,
            evaluation_executions: 0,
            config: self.config,
            rng,
            input_pusher: self.input_pusher,
        };
        instructions::install(&mut interpreter);
        interpreter
    }
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
