//! Parsing the textual program form.

use std::str::FromStr;

use logos::Logos;
use thiserror::Error;

use crate::atom::Atom;
use crate::lexer::Token;
use crate::program::Program;

/// Errors from parsing the textual program form.
///
/// Parsing is setup-tier API: a malformed program text is a logic error in
/// the caller and is surfaced, unlike runtime stack conditions which the
/// interpreter absorbs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The lexer could not recognize a token.
    #[error("unrecognized token `{text}`")]
    InvalidToken {
        /// The offending source fragment.
        text: String,
    },
    /// An integer literal does not fit in `i32`.
    #[error("integer literal `{text}` is out of range")]
    IntOutOfRange {
        /// The offending literal.
        text: String,
    },
    /// A float literal failed to convert.
    #[error("malformed float literal `{text}`")]
    InvalidFloat {
        /// The offending literal.
        text: String,
    },
    /// A `)` with no matching `(`.
    #[error("unexpected `)` with no open program")]
    UnexpectedClose,
    /// Input ended with at least one program still open.
    #[error("missing `)` before end of input")]
    MissingClose,
}

impl FromStr for Program {
    type Err = ParseError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let mut lexer = Token::lexer(source);
        // open[0] collects top-level atoms; deeper entries are unclosed
        // nested programs.
        let mut open: Vec<Program> = vec![Program::new()];
        while let Some(token) = lexer.next() {
            let token = token.map_err(|()| ParseError::InvalidToken {
                text: lexer.slice().to_string(),
            })?;
            let atom = match token {
                Token::Open => {
                    open.push(Program::new());
                    continue;
                }
                Token::Close => {
                    if open.len() < 2 {
                        return Err(ParseError::UnexpectedClose);
                    }
                    Atom::Program(open.pop().unwrap_or_default())
                }
                Token::True => Atom::Bool(true),
                Token::False => Atom::Bool(false),
                Token::Int => {
                    let text = lexer.slice();
                    let value = text.parse::<i32>().map_err(|_| ParseError::IntOutOfRange {
                        text: text.to_string(),
                    })?;
                    Atom::Int(value)
                }
                Token::Float => {
                    let text = lexer.slice();
                    let value = text.parse::<f32>().map_err(|_| ParseError::InvalidFloat {
                        text: text.to_string(),
                    })?;
                    Atom::Float(value)
                }
                Token::Name => Atom::Name(lexer.slice().to_string()),
            };
            if let Some(current) = open.last_mut() {
                current.push(atom);
            }
        }
        if open.len() != 1 {
            return Err(ParseError::MissingClose);
        }
        let mut root = open.pop().unwrap_or_default();
        // A source that is exactly one parenthesized list is that list, so
        // `( 1 2 )` round-trips as a two-atom program rather than a wrapper
        // around one.
        if root.len() == 1 && matches!(root.atoms()[0], Atom::Program(_)) {
            if let Atom::Program(inner) = root.pop() {
                return Ok(inner);
            }
        }
        Ok(root)
    }
}
