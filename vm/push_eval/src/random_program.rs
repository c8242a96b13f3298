//! Random program synthesis.
//!
//! Candidate programs are sampled uniformly from the *active* generator
//! set, a caller-configured subset of the registry. `random_code` shapes a
//! program of an exact point count by recursively decomposing the size into
//! a shuffled partition (the lisp implementation calls this `decompose`).

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;

use push_ir::{Atom, Program};

use crate::errors::SetupError;
use crate::instructions::input::input_in_n;
use crate::interpreter::Interpreter;

/// Stack-type prefixes accepted by the `registered.<type>` pseudo-entry.
const STACK_TYPES: [&str; 8] = [
    "integer", "float", "boolean", "exec", "code", "name", "input", "frame",
];

/// Produces one random program atom.
///
/// Most generators simply emit their instruction's name; the ERC variants
/// draw a fresh literal from the configured range each time they fire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AtomGenerator {
    /// Emit the instruction name as a [`Atom::Name`].
    Instruction(String),
    /// Emit a fresh integer ephemeral random constant.
    IntErc,
    /// Emit a fresh float ephemeral random constant.
    FloatErc,
    /// Emit a fresh boolean constant.
    BoolErc,
}

impl AtomGenerator {
    pub(crate) fn generate(&self, interpreter: &mut Interpreter) -> Atom {
        match self {
            AtomGenerator::Instruction(name) => Atom::Name(name.clone()),
            AtomGenerator::IntErc => Atom::Int(interpreter.random_int_erc()),
            AtomGenerator::FloatErc => Atom::Float(interpreter.random_float_erc()),
            AtomGenerator::BoolErc => Atom::Bool(interpreter.random_bool_erc()),
        }
    }
}

impl Interpreter {
    /// Draw one random atom uniformly from the active generator set.
    ///
    /// With no generators enabled this returns the zero atom (an empty
    /// program).
    pub fn random_atom(&mut self) -> Atom {
        if self.active_generators.is_empty() {
            return Atom::default();
        }
        let index = self.rng.gen_range(0..self.active_generators.len());
        let generator = self.active_generators[index].1.clone();
        generator.generate(self)
    }

    /// Generate a random program of exactly `target_size` points.
    ///
    /// The shape is randomized but the total point count is deterministic:
    /// `random_code(n).points() == n` for every `n >= 1`.
    pub fn random_code(&mut self, target_size: usize) -> Program {
        let mut program = Program::new();
        let budget = target_size.saturating_sub(1);
        for chunk in self.random_code_distribution(budget, budget) {
            if chunk == 1 {
                let atom = self.random_atom();
                program.push(atom);
            } else {
                let nested = self.random_code(chunk);
                program.push(nested);
            }
        }
        program
    }

    /// Decompose `count` into a partition of positive chunk sizes, then
    /// shuffle it so subtree placement is randomized.
    pub fn random_code_distribution(&mut self, count: usize, max_elements: usize) -> Vec<usize> {
        let mut distribution = Vec::new();
        self.decompose(&mut distribution, count, max_elements);
        distribution.shuffle(&mut self.rng);
        distribution
    }

    fn decompose(&mut self, distribution: &mut Vec<usize>, count: usize, max_elements: usize) {
        if count < 1 {
            return;
        }
        let chunk = if count < 2 {
            1
        } else {
            self.rng.gen_range(0..count) + 1
        };
        distribution.push(chunk);
        self.decompose(distribution, count - chunk, max_elements.saturating_sub(1));
    }

    pub(crate) fn random_int_erc(&mut self) -> i32 {
        let min = self.config.min_random_int;
        let max = self.config.max_random_int;
        let resolution = self.config.random_int_resolution;
        let span = max.saturating_sub(min).max(1);
        let mut value = self.rng.gen_range(0..span);
        if resolution > 0 {
            value -= value % resolution;
        }
        value.saturating_add(min)
    }

    pub(crate) fn random_float_erc(&mut self) -> f32 {
        let min = self.config.min_random_float;
        let max = self.config.max_random_float;
        let resolution = self.config.random_float_resolution;
        let mut value = self.rng.gen::<f32>() * (max - min);
        if resolution > 0.0 {
            value -= value % resolution;
        }
        value + min
    }

    pub(crate) fn random_bool_erc(&mut self) -> bool {
        self.rng.gen_range(0..2) == 1
    }

    /// Configure the active random-generation set from an explicit list of
    /// instruction names.
    ///
    /// Two pseudo-entries are expanded: `registered.<type>` enables every
    /// generator with that name prefix (plus the type's constant
    /// generators, deliberately over-weighting constants), and
    /// `input.makeinputsN` materializes `input.in0` .. `input.in(N-1)`.
    /// Any other unknown name aborts configuration.
    pub fn set_instructions(&mut self, instruction_list: &Program) -> Result<(), SetupError> {
        self.active_generators.clear();
        for atom in instruction_list.atoms() {
            let name = match atom {
                Atom::Name(name) => name.clone(),
                Atom::Instruction(reference) => reference.name().to_string(),
                other => {
                    return Err(SetupError::NotAnInstructionName {
                        atom: other.to_string(),
                    })
                }
            };
            self.enable_generator(&name)?;
        }
        tracing::debug!(
            generators = self.active_generators.len(),
            "configured random instruction set"
        );
        Ok(())
    }

    fn enable_generator(&mut self, name: &str) -> Result<(), SetupError> {
        if let Some(stack_type) = name.strip_prefix("registered.") {
            if !STACK_TYPES.contains(&stack_type) {
                return Err(SetupError::UnknownInstruction(name.to_string()));
            }
            // Sorted so the active-set order, and hence the RNG draw
            // sequence, does not depend on map iteration order.
            let mut matching: Vec<String> = self
                .instructions
                .keys()
                .filter(|key| key.starts_with(stack_type))
                .cloned()
                .collect();
            matching.sort_unstable();
            for key in matching {
                if let Some(generator) = self.generators.get(&key).cloned() {
                    self.active_generators.push((key, generator));
                }
            }
            // Constants ride along with their type, making them
            // proportionally more likely than any single instruction.
            match stack_type {
                "boolean" => {
                    self.push_active("true");
                    self.push_active("false");
                    self.push_active("boolean.erc");
                }
                "integer" => self.push_active("integer.erc"),
                "float" => self.push_active("float.erc"),
                _ => {}
            }
            Ok(())
        } else if let Some(count) = name.strip_prefix("input.makeinputs") {
            let count: usize = count.parse().map_err(|_| SetupError::InvalidInputCount {
                name: name.to_string(),
            })?;
            for index in 0..count {
                let input_name = format!("input.in{index}");
                self.define_instruction(&input_name, input_in_n(index));
                self.push_active(&input_name);
            }
            Ok(())
        } else {
            let generator = self
                .generators
                .get(name)
                .cloned()
                .ok_or_else(|| SetupError::UnknownInstruction(name.to_string()))?;
            self.active_generators.push((name.to_string(), generator));
            Ok(())
        }
    }

    fn push_active(&mut self, name: &str) {
        if let Some(generator) = self.generators.get(name).cloned() {
            self.active_generators.push((name.to_string(), generator));
        }
    }

    /// Replace the active generator set with every generator whose name
    /// matches one of the include patterns.
    pub fn set_instructions_filtered(&mut self, patterns: &[&str]) -> Result<(), SetupError> {
        self.active_generators.clear();
        self.add_instructions(patterns)
    }

    /// Enable every generator whose name matches one of the patterns.
    pub fn add_instructions(&mut self, patterns: &[&str]) -> Result<(), SetupError> {
        for pattern in patterns {
            let regex = compile_pattern(pattern)?;
            let mut matching: Vec<String> = self
                .generators
                .keys()
                .filter(|key| regex.is_match(key))
                .cloned()
                .collect();
            matching.sort_unstable();
            for name in matching {
                self.push_active(&name);
            }
        }
        tracing::debug!(
            generators = self.active_generators.len(),
            "configured random instruction set"
        );
        Ok(())
    }

    /// Disable every active generator whose name matches one of the
    /// patterns.
    pub fn remove_instructions(&mut self, patterns: &[&str]) -> Result<(), SetupError> {
        for pattern in patterns {
            let regex = compile_pattern(pattern)?;
            self.active_generators.retain(|(name, _)| !regex.is_match(name));
        }
        Ok(())
    }

    /// The active generator names, sorted, deduplicated, and space-joined.
    pub fn active_instructions_string(&self) -> String {
        let mut names: Vec<&str> = self
            .active_generators
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        names.join(" ")
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, SetupError> {
    Regex::new(pattern).map_err(|source| SetupError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
