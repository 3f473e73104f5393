mod lex;

use std::iter::Enumerate;
use std::vec;

use crate::ast::value::Value;
use crate::ast::{Node, Program};
use crate::error::ParseError;

pub use self::lex::{tokenize, Token, TokenKind};

/// Builds one node per instruction. Tokens that are neither an instruction
/// nor consumed as an argument are skipped.
pub fn parse(tokens: Vec<Token>) -> Result<Program, ParseError> {
    let mut cursor = Cursor::new(tokens);
    let mut program = vec![];

    while let Some(token) = cursor.advance() {
        let node = match token.kind {
            TokenKind::Push => Node::Push {
                value: cursor.argument(TokenKind::Push)?,
            },
            TokenKind::Print => Node::Print {
                message: cursor.argument(TokenKind::Print)?,
            },
            TokenKind::Add => Node::Add,
            TokenKind::Halt => Node::Halt,
            TokenKind::Number | TokenKind::String => continue,
        };
        program.push(node);
    }
    Ok(program)
}

struct Cursor {
    tokens: Enumerate<vec::IntoIter<Token>>,
    position: usize,
}

impl Cursor {
    fn new(tokens: Vec<Token>) -> Self {
        Cursor {
            tokens: tokens.into_iter().enumerate(),
            position: 0,
        }
    }

    fn advance(&mut self) -> Option<Token> {
        let (position, token) = self.tokens.next()?;
        self.position = position;
        Some(token)
    }

    /// Consumes the token after `instruction` as its argument.
    fn argument(&mut self, instruction: TokenKind) -> Result<Value, ParseError> {
        let position = self.position;
        self.advance()
            .map(|token| token.value)
            .ok_or(ParseError::MissingArgument {
                instruction,
                position,
            })
    }
}
