//! Synthesis and ERC configuration.

use serde::{Deserialize, Serialize};

/// Parameters for ephemeral random constants and random code generation.
///
/// The evolutionary driver loads these from its parameter files and hands
/// them to the interpreter whole; every field has a usable default so a
/// partial configuration deserializes cleanly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Lower bound (inclusive) for integer ERCs and `integer.rand`.
    pub min_random_int: i32,
    /// Upper bound (exclusive) for integer ERCs and `integer.rand`.
    pub max_random_int: i32,
    /// Step that integer ERCs are floored to; non-positive disables it.
    pub random_int_resolution: i32,
    /// Lower bound for float ERCs and `float.rand`.
    pub min_random_float: f32,
    /// Upper bound for float ERCs and `float.rand`.
    pub max_random_float: f32,
    /// Step that float ERCs are floored to; non-positive disables it.
    pub random_float_resolution: f32,
    /// Largest program `code.rand`/`exec.rand` may synthesize.
    pub max_random_code_size: usize,
    /// Point budget above which `exec.s` refuses to build its pair list.
    pub max_points_in_program: usize,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        SynthesisConfig {
            min_random_int: 0,
            max_random_int: 100,
            random_int_resolution: -1,
            min_random_float: 0.0,
            max_random_float: 1.0,
            random_float_resolution: -1.0,
            max_random_code_size: 100,
            max_points_in_program: 100,
        }
    }
}
