//! Setup-tier errors.
//!
//! Runtime execution never errors (underflow, overflow, and malformed
//! operands are absorbed as no-ops or saturating results); these variants
//! cover only configuration mistakes by the calling framework, which must
//! abort setup.

use thiserror::Error;

/// Errors surfaced by interpreter configuration APIs.
#[derive(Error, Debug)]
pub enum SetupError {
    /// A name in the instruction set matches no registered generator.
    #[error("unknown instruction `{0}` in instruction set")]
    UnknownInstruction(String),

    /// The instruction list held an atom that is not a name.
    #[error("instruction list may contain only instruction names, got `{atom}`")]
    NotAnInstructionName {
        /// Rendered form of the offending atom.
        atom: String,
    },

    /// An `input.makeinputsN` entry with an unparseable count.
    #[error("malformed input count in `{name}`")]
    InvalidInputCount {
        /// The offending pseudo-instruction name.
        name: String,
    },

    /// An include/exclude pattern failed to compile.
    #[error("invalid instruction pattern `{pattern}`")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// The regex compilation failure.
        #[source]
        source: regex::Error,
    },

    /// `add_stack` was given a name already bound to a stack.
    #[error("a stack named `{0}` already exists")]
    DuplicateStack(String),
}
