//! Failures that abort a pipeline stage.
//!
//! Semantic findings are not errors; see [`crate::typecheck::Diagnostic`].

use std::io;
use std::path::PathBuf;

use itertools::Itertools;
use snafu::Snafu;

use crate::parse::TokenKind;
use crate::typecheck::Diagnostic;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum LexError {
    #[snafu(display("Unexpected token \"{character}\" at line {line}, column {column}"))]
    UnexpectedCharacter {
        character: char,
        line: usize,
        column: usize,
    },
    #[snafu(display("Invalid number at line {line}, column {column}: {reason}"))]
    InvalidNumber {
        reason: String,
        line: usize,
        column: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum ParseError {
    #[snafu(display("{instruction} at token {position} is missing its argument"))]
    MissingArgument {
        instruction: TokenKind,
        position: usize,
    },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum WireError {
    #[snafu(display("node {index} has no \"type\" tag"))]
    MissingTag { index: usize },
    #[snafu(display("Unknown node type: {kind}"))]
    UnknownNodeKind { kind: String },
    #[snafu(display("malformed {kind} at node {index}: {source}"))]
    MalformedNode {
        kind: String,
        index: usize,
        source: serde_json::Error,
    },
    #[snafu(display("invalid JSON: {source}"))]
    Json { source: serde_json::Error },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(context(false), display("{source}"))]
    Lex { source: LexError },
    #[snafu(context(false), display("{source}"))]
    Parse { source: ParseError },
    #[snafu(context(false), display("{source}"))]
    Wire { source: WireError },
    #[snafu(display("{}", diagnostics.iter().join("\n")))]
    Rejected { diagnostics: Vec<Diagnostic> },
    #[snafu(display("{}: {source}", path.display()))]
    Io { path: PathBuf, source: io::Error },
    #[snafu(context(false), display("failed to write assembly: {source}"))]
    Write { source: io::Error },
}
