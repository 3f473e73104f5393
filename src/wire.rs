//! JSON form of an AST, for stages invoked one at a time.

use serde_json::Value as Json;
use snafu::{OptionExt, ResultExt};

use crate::ast::{Node, Program, NODE_KINDS};
use crate::error::{JsonSnafu, MalformedNodeSnafu, MissingTagSnafu, WireError};

/// A decoded record: a node, or the tag of a record no node kind matches.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Node(Node),
    Unknown(String),
}

pub fn to_string(program: &[Node]) -> Result<String, WireError> {
    serde_json::to_string(program).context(JsonSnafu)
}

pub fn from_str(json: &str) -> Result<Vec<Entry>, WireError> {
    let records: Vec<Json> = serde_json::from_str(json).context(JsonSnafu)?;
    decode(records)
}

pub fn decode(records: Vec<Json>) -> Result<Vec<Entry>, WireError> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| decode_record(index, record))
        .collect()
}

fn decode_record(index: usize, record: Json) -> Result<Entry, WireError> {
    let kind = record
        .get("type")
        .and_then(Json::as_str)
        .context(MissingTagSnafu { index })?
        .to_owned();

    if !NODE_KINDS.contains(&kind.as_str()) {
        return Ok(Entry::Unknown(kind));
    }
    serde_json::from_value(record)
        .map(Entry::Node)
        .context(MalformedNodeSnafu { kind, index })
}

/// Drops the wire wrapping, refusing any record of an unknown kind.
pub fn into_program(entries: Vec<Entry>) -> Result<Program, WireError> {
    entries
        .into_iter()
        .map(|entry| match entry {
            Entry::Node(node) => Ok(node),
            Entry::Unknown(kind) => Err(WireError::UnknownNodeKind { kind }),
        })
        .collect()
}
