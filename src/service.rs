//! Request/response shim exposing each pipeline stage on its own.

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::ast::Node;
use crate::codegen::generate;
use crate::parse::{parse, tokenize, Token};
use crate::typecheck::{check, check_entries, Diagnostic};
use crate::wire;

#[derive(Debug, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum Request {
    Ping,
    Tokenize {
        #[serde(default)]
        source: String,
    },
    Parse {
        #[serde(default)]
        tokens: Vec<Token>,
    },
    Typecheck {
        #[serde(default)]
        ast: Vec<Json>,
    },
    Generate {
        #[serde(default)]
        ast: Vec<Json>,
    },
    Compile {
        #[serde(default)]
        source: String,
    },
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Pong {},
    Tokens { tokens: Vec<Token> },
    Ast { ast: Vec<Node> },
    Errors { errors: Vec<Diagnostic> },
    NasmCode { nasm_code: String },
    Error { error: String },
}

impl Response {
    fn error(error: impl ToString) -> Self {
        Response::Error {
            error: error.to_string(),
        }
    }
}

pub fn handle(request: Request) -> Response {
    match request {
        Request::Ping => Response::Pong {},
        Request::Tokenize { source } => match tokenize(&source) {
            Ok(tokens) => Response::Tokens { tokens },
            Err(err) => Response::error(err),
        },
        Request::Parse { tokens } => match parse(tokens) {
            Ok(ast) => Response::Ast { ast },
            Err(err) => Response::error(format!("An error occurred during parsing: {err}")),
        },
        Request::Typecheck { ast } => match wire::decode(ast) {
            Ok(entries) => Response::Errors {
                errors: check_entries(&entries).diagnostics,
            },
            Err(err) => Response::error(err),
        },
        Request::Generate { ast } => {
            let program = match wire::decode(ast).and_then(wire::into_program) {
                Ok(program) => program,
                Err(err) => return Response::error(err),
            };
            assembly(&program)
        }
        Request::Compile { source } => compile(&source),
    }
}

fn compile(source: &str) -> Response {
    let program = match tokenize(source) {
        Ok(tokens) => parse(tokens),
        Err(err) => return Response::error(err),
    };
    let program = match program {
        Ok(program) => program,
        Err(err) => return Response::error(err),
    };
    let report = check(&program);
    if !report.is_ok() {
        return Response::Errors {
            errors: report.diagnostics,
        };
    }
    assembly(&program)
}

fn assembly(program: &[Node]) -> Response {
    match generate(program) {
        Ok(nasm_code) => Response::NasmCode { nasm_code },
        Err(err) => Response::error(err),
    }
}

/// Answers one JSON request with one JSON response.
pub fn handle_json(request: &str) -> Result<String, serde_json::Error> {
    let response = match serde_json::from_str(request) {
        Ok(request) => handle(request),
        Err(err) => Response::error(format!("invalid request: {err}")),
    };
    serde_json::to_string(&response)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn call(request: Json) -> Json {
        let response = handle_json(&request.to_string()).unwrap();
        serde_json::from_str(&response).unwrap()
    }

    #[test]
    fn ping() {
        assert_eq!(call(json!({"command": "ping"})), json!({}));
    }

    #[test]
    fn tokenize_request() {
        assert_eq!(
            call(json!({"command": "tokenize", "source": "PUSH 1\nHALT"})),
            json!({"tokens": [["PUSH", "PUSH"], ["NUMBER", 1], ["HALT", "HALT"]]})
        );
        assert_eq!(
            call(json!({"command": "tokenize", "source": "PUSH #"})),
            json!({"error": "Unexpected token \"#\" at line 1, column 6"})
        );
    }

    #[test]
    fn missing_payload_defaults_to_empty() {
        assert_eq!(call(json!({"command": "tokenize"})), json!({"tokens": []}));
        assert_eq!(call(json!({"command": "typecheck"})), json!({"errors": []}));
    }

    #[test]
    fn parse_request() {
        assert_eq!(
            call(json!({"command": "parse", "tokens": [["PUSH", "PUSH"], ["NUMBER", 2.5], ["ADD", "ADD"]]})),
            json!({"ast": [{"type": "PushNode", "value": 2.5}, {"type": "AddNode"}]})
        );
        let failed = call(json!({"command": "parse", "tokens": [["PRINT", "PRINT"]]}));
        assert!(failed["error"].as_str().unwrap().starts_with("An error occurred during parsing"));
    }

    #[test]
    fn typecheck_request() {
        assert_eq!(
            call(json!({"command": "typecheck", "ast": [
                {"type": "AddNode"},
                {"type": "PushNode", "value": "x"},
                {"type": "LoopNode"}
            ]})),
            json!({"errors": [
                "ADD requires at least two values on the stack.",
                "PUSH value must be an integer.",
                "Unknown node type: LoopNode"
            ]})
        );
    }

    #[test]
    fn odd_payloads_are_diagnostics() {
        assert_eq!(
            call(json!({"command": "typecheck", "ast": [
                {"type": "PushNode", "value": null},
                {"type": "PrintNode", "message": [1, 2]},
                {"type": "PushNode", "value": {"n": 1}},
                {"type": "AddNode"}
            ]})),
            json!({"errors": [
                "PUSH value must be an integer.",
                "PRINT message must be a string.",
                "PUSH value must be an integer."
            ]})
        );
    }

    #[test]
    fn generate_refuses_unknown_nodes() {
        let response = call(json!({"command": "generate", "ast": [{"type": "LoopNode"}]}));
        assert_eq!(response, json!({"error": "Unknown node type: LoopNode"}));
    }

    #[test]
    fn compile_stops_at_diagnostics() {
        assert_eq!(
            call(json!({"command": "compile", "source": "ADD"})),
            json!({"errors": ["ADD requires at least two values on the stack."]})
        );
        let compiled = call(json!({"command": "compile", "source": "PUSH 1 HALT"}));
        assert!(compiled["nasm_code"].as_str().unwrap().contains("    push 1\n"));
    }

    #[test]
    fn unknown_command() {
        let response = call(json!({"command": "optimize"}));
        assert!(response["error"].as_str().unwrap().starts_with("invalid request"));
    }
}
