pub mod value;

use serde::{Deserialize, Serialize};

use self::value::Value;

/// One instruction of a stack program. Serializes to the labeled records
/// `{"type": "PushNode", "value": ..}`, `{"type": "AddNode"}`, and so on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    #[serde(rename = "PushNode")]
    Push { value: Value },
    #[serde(rename = "AddNode")]
    Add,
    #[serde(rename = "PrintNode")]
    Print { message: Value },
    #[serde(rename = "HaltNode")]
    Halt,
}

pub const NODE_KINDS: [&str; 4] = ["PushNode", "AddNode", "PrintNode", "HaltNode"];

impl Node {
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Push { .. } => NODE_KINDS[0],
            Node::Add => NODE_KINDS[1],
            Node::Print { .. } => NODE_KINDS[2],
            Node::Halt => NODE_KINDS[3],
        }
    }
}

pub type Program = Vec<Node>;
