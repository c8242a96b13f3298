//! Token definitions for the program textual form.
//!
//! Tokens are whitespace-delimited; `(` and `)` delimit nested programs. A
//! token lexes, in priority order, as a boolean literal, an integer literal,
//! a float literal (must contain a decimal point), or a bare name.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub(crate) enum Token {
    #[token("(")]
    Open,

    #[token(")")]
    Close,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[regex(r"-?[0-9]+", priority = 3)]
    Int,

    #[regex(r"-?([0-9]+\.[0-9]*|\.[0-9]+)", priority = 4)]
    Float,

    // Anything else between delimiters is a name or instruction identifier.
    #[regex(r"[^\s()]+", priority = 1)]
    Name,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        Token::lexer(source).filter_map(Result::ok).collect()
    }

    #[test]
    fn test_literal_priority() {
        assert_eq!(
            lex("( 1 -2 4.0 .5 true false x integer.+ )"),
            vec![
                Token::Open,
                Token::Int,
                Token::Int,
                Token::Float,
                Token::Float,
                Token::True,
                Token::False,
                Token::Name,
                Token::Name,
                Token::Close,
            ]
        );
    }

    #[test]
    fn test_longest_match_wins() {
        // A longer identifier is a name even when a literal prefix matches.
        assert_eq!(lex("truex 12a 4.0.1"), vec![Token::Name, Token::Name, Token::Name]);
    }
}
