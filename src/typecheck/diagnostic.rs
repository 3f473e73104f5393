use std::fmt;

use serde::{Serialize, Serializer};

/// A non-fatal semantic finding. Serializes as its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    NonNumericPush,
    InsufficientOperands,
    NonTextualPrint,
    UnknownNodeKind { kind: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NonNumericPush => f.write_str("PUSH value must be an integer."),
            Diagnostic::InsufficientOperands => {
                f.write_str("ADD requires at least two values on the stack.")
            }
            Diagnostic::NonTextualPrint => f.write_str("PRINT message must be a string."),
            Diagnostic::UnknownNodeKind { kind } => write!(f, "Unknown node type: {kind}"),
        }
    }
}

impl Serialize for Diagnostic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
