use std::fmt;
use std::ops::Range;

use chumsky::prelude::Simple;
use chumsky::primitive::{any, choice, end, filter, just, one_of};
use chumsky::text;
use chumsky::Parser;
use serde::{Deserialize, Serialize};

use crate::ast::value::{Number, Value};
use crate::error::LexError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenKind {
    Number,
    String,
    Print,
    Push,
    Add,
    Halt,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Print => "PRINT",
            TokenKind::Push => "PUSH",
            TokenKind::Add => "ADD",
            TokenKind::Halt => "HALT",
        })
    }
}

/// A classified lexeme. On the wire it is the pair `[KIND, value]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(TokenKind, Value)", into = "(TokenKind, Value)")]
pub struct Token {
    pub kind: TokenKind,
    pub value: Value,
}

impl Token {
    pub fn keyword(kind: TokenKind) -> Self {
        let value = Value::Text(kind.to_string());
        Token { kind, value }
    }

    pub fn number(number: Number) -> Self {
        Token {
            kind: TokenKind::Number,
            value: Value::Number(number),
        }
    }

    pub fn string(text: impl Into<String>) -> Self {
        Token {
            kind: TokenKind::String,
            value: Value::Text(text.into()),
        }
    }

    /// Source form of the token; lexing it yields this token again.
    pub fn literal(&self) -> String {
        match self.kind {
            TokenKind::String => format!("\"{}\"", self.value),
            _ => self.value.to_string(),
        }
    }
}

impl From<(TokenKind, Value)> for Token {
    fn from((kind, value): (TokenKind, Value)) -> Self {
        Token { kind, value }
    }
}

impl From<Token> for (TokenKind, Value) {
    fn from(token: Token) -> Self {
        (token.kind, token.value)
    }
}

pub fn tokenize(src: &str) -> Result<Vec<Token>, LexError> {
    let lexemes = lexer()
        .parse(src)
        .map_err(|errors| stray_character(src, errors))?;

    lexemes
        .into_iter()
        .map(|(lexeme, span)| {
            let (line, column) = locate(src, span.start);
            match lexeme {
                Lexeme::Token(token) => Ok(token),
                Lexeme::Invalid(reason) => Err(LexError::InvalidNumber {
                    reason,
                    line,
                    column,
                }),
                Lexeme::Unexpected(character) => Err(LexError::UnexpectedCharacter {
                    character,
                    line,
                    column,
                }),
            }
        })
        .collect()
}

// The catch-all consumes any character, so this only reports what chumsky
// itself stopped on.
fn stray_character(src: &str, errors: Vec<Simple<char>>) -> LexError {
    let offset = errors
        .first()
        .map(|error| error.span().start)
        .unwrap_or_default();
    let (line, column) = locate(src, offset);
    LexError::UnexpectedCharacter {
        character: src.chars().nth(offset).unwrap_or('\0'),
        line,
        column,
    }
}

/// 1-based line and column of the `offset`th character.
fn locate(src: &str, offset: usize) -> (usize, usize) {
    src.chars()
        .take(offset)
        .fold((1, 1), |(line, column), c| match c {
            '\n' => (line + 1, 1),
            _ => (line, column + 1),
        })
}

#[derive(Debug, Clone)]
enum Lexeme {
    Token(Token),
    /// A number literal with no 64-bit representation.
    Invalid(String),
    Unexpected(char),
}

fn lexer() -> impl Parser<char, Vec<(Lexeme, Range<usize>)>, Error = Simple<char>> {
    let lexeme = lexeme()
        .map_with_span(|lexeme, span| (lexeme, span))
        .then_ignore(blank());

    blank()
        .ignore_then(lexeme.repeated())
        .then_ignore(end())
}

fn blank() -> impl Parser<char, (), Error = Simple<char>> {
    one_of(" \t\n").repeated().ignored()
}

// Order matters: numbers, then keywords, then strings, then the catch-all.
fn lexeme() -> impl Parser<char, Lexeme, Error = Simple<char>> {
    let number = number().map(|number| match number {
        Ok(number) => Lexeme::Token(Token::number(number)),
        Err(reason) => Lexeme::Invalid(reason),
    });

    choice((
        number,
        keyword().map(Token::keyword).map(Lexeme::Token),
        string().map(Token::string).map(Lexeme::Token),
        any().map(Lexeme::Unexpected),
    ))
}

/// An out-of-range literal still matches; its failure travels as data.
fn number() -> impl Parser<char, Result<Number, String>, Error = Simple<char>> {
    let fraction = just('.').chain::<char, _, _>(text::digits(10));

    just('-')
        .or_not()
        .chain::<char, _, _>(text::digits(10))
        .chain::<char, _, _>(fraction.or_not().flatten())
        .collect::<String>()
        .map(|literal| parse_number(&literal))
}

fn parse_number(literal: &str) -> Result<Number, String> {
    if literal.contains('.') {
        literal
            .parse()
            .map(Number::Float)
            .map_err(|err| format!("{literal}: {err}"))
    } else {
        literal
            .parse()
            .map(Number::Int)
            .map_err(|err| format!("{literal}: {err}"))
    }
}

// Plain literals with no word boundary: `PUSH10` is PUSH followed by 10.
fn keyword() -> impl Parser<char, TokenKind, Error = Simple<char>> {
    choice((
        just("PRINT").to(TokenKind::Print),
        just("PUSH").to(TokenKind::Push),
        just("ADD").to(TokenKind::Add),
        just("HALT").to(TokenKind::Halt),
    ))
}

fn string() -> impl Parser<char, String, Error = Simple<char>> {
    filter(|c: &char| *c != '"')
        .repeated()
        .collect::<String>()
        .delimited_by(just('"'), just('"'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_numbers_and_strings() {
        let tokens = tokenize("PUSH 10\nPUSH -2.5\nADD\nPRINT \"Hello, World\"\nHALT\n").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::keyword(TokenKind::Push),
                Token::number(Number::Int(10)),
                Token::keyword(TokenKind::Push),
                Token::number(Number::Float(-2.5)),
                Token::keyword(TokenKind::Add),
                Token::keyword(TokenKind::Print),
                Token::string("Hello, World"),
                Token::keyword(TokenKind::Halt),
            ]
        );
    }

    #[test]
    fn keywords_need_no_separator() {
        let tokens = tokenize("PUSH10ADD").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|token| token.kind).collect();
        assert_eq!(kinds, [TokenKind::Push, TokenKind::Number, TokenKind::Add]);
    }

    #[test]
    fn strings_may_span_lines() {
        let tokens = tokenize("PRINT \"a\n\tb\"").unwrap();
        assert_eq!(tokens[1], Token::string("a\n\tb"));
    }

    #[test]
    fn blank_source_has_no_tokens() {
        assert_eq!(tokenize(" \t\n\n ").unwrap(), vec![]);
    }

    #[test]
    fn unexpected_character_is_located() {
        let err = tokenize("PUSH 1\nPUSH @").unwrap_err();
        assert_eq!(
            err,
            LexError::UnexpectedCharacter {
                character: '@',
                line: 2,
                column: 6,
            }
        );
        assert_eq!(err.to_string(), "Unexpected token \"@\" at line 2, column 6");
    }

    #[test]
    fn lowercase_keywords_are_rejected() {
        let err = tokenize("push 1").unwrap_err();
        assert!(matches!(err, LexError::UnexpectedCharacter { character: 'p', .. }));
    }

    #[test]
    fn unterminated_string_fails_at_its_quote() {
        let err = tokenize("PRINT \"oops").unwrap_err();
        assert!(matches!(
            err,
            LexError::UnexpectedCharacter {
                character: '"',
                line: 1,
                column: 7,
            }
        ));
    }

    #[test]
    fn carriage_return_is_not_blank() {
        assert!(tokenize("HALT\r\n").is_err());
    }

    #[test]
    fn dangling_decimal_point_is_not_part_of_the_number() {
        let err = tokenize("PUSH 1.").unwrap_err();
        assert!(matches!(err, LexError::UnexpectedCharacter { character: '.', .. }));
    }

    #[test]
    fn oversized_integer_is_rejected() {
        let err = tokenize("PUSH 1\nPUSH 99999999999999999999").unwrap_err();
        assert!(matches!(err, LexError::InvalidNumber { line: 2, column: 6, .. }));
        assert!(err.to_string().starts_with("Invalid number at line 2, column 6: 99999999999999999999"));
    }

    #[test]
    fn tokens_travel_as_kind_value_pairs() {
        let tokens = tokenize("PUSH 7 PRINT \"hi\"").unwrap();
        let json = serde_json::to_string(&tokens).unwrap();
        assert_eq!(json, r#"[["PUSH","PUSH"],["NUMBER",7],["PRINT","PRINT"],["STRING","hi"]]"#);
        let back: Vec<Token> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tokens);
    }
}
