mod diagnostic;

use crate::ast::value::Value;
use crate::ast::Node;
use crate::util::require;
use crate::wire::Entry;

pub use self::diagnostic::Diagnostic;

type Result = std::result::Result<(), Diagnostic>;

/// Every finding of one pass, plus the simulated stack depth at its end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub diagnostics: Vec<Diagnostic>,
    pub depth: usize,
}

impl Report {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

pub fn check(program: &[Node]) -> Report {
    check_all(program.iter().map(Ok))
}

/// Like [`check`], for a program decoded from the wire: entries with an
/// unrecognized tag become diagnostics and leave the depth alone.
pub fn check_entries(entries: &[Entry]) -> Report {
    check_all(entries.iter().map(|entry| match entry {
        Entry::Node(node) => Ok(node),
        Entry::Unknown(kind) => Err(Diagnostic::UnknownNodeKind { kind: kind.clone() }),
    }))
}

fn check_all<'a>(
    nodes: impl IntoIterator<Item = std::result::Result<&'a Node, Diagnostic>>,
) -> Report {
    let mut depth = 0;
    let diagnostics = nodes
        .into_iter()
        .filter_map(|node| node.and_then(|node| check_node(&mut depth, node)).err())
        .collect();
    Report { diagnostics, depth }
}

fn check_node(depth: &mut usize, node: &Node) -> Result {
    match node {
        Node::Push { value } => check_push(depth, value),
        Node::Add => check_add(depth),
        Node::Print { message } => check_print(message),
        Node::Halt => Ok(()),
    }
}

// A push counts toward the depth even when its value is rejected.
fn check_push(depth: &mut usize, value: &Value) -> Result {
    *depth += 1;
    require!(value.as_number().is_some(), Diagnostic::NonNumericPush)
}

fn check_add(depth: &mut usize) -> Result {
    require!(*depth >= 2, Diagnostic::InsufficientOperands)?;
    *depth -= 1;
    Ok(())
}

fn check_print(message: &Value) -> Result {
    require!(message.as_text().is_some(), Diagnostic::NonTextualPrint)
}
