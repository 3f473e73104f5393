use std::fmt;
use std::io;

use itertools::Itertools;

pub type Result = std::result::Result<(), io::Error>;

const INDENT: &str = "    ";

#[derive(Clone)]
pub enum Line {
    Section(&'static str),
    Global(&'static str),
    Label(&'static str),
    /// `name db "text",0`
    CString {
        name: &'static str,
        text: &'static str,
    },
    Instruction(&'static str, Vec<Operand>),
    // Internals.
    Break,
}

#[derive(Clone)]
pub enum Operand {
    Register(&'static str),
    Symbol(&'static str),
    Immediate(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register(name) | Operand::Symbol(name) => f.write_str(name),
            Operand::Immediate(value) => f.write_str(value),
        }
    }
}

/// Writes the lines separated by newlines, with no trailing newline.
pub fn format<Writer: io::Write>(lines: Vec<Line>, writer: &mut Writer) -> Result {
    Itertools::intersperse(lines.into_iter(), Line::Break)
        .try_for_each(|line| format_line(line, writer))
}

fn format_line<Writer: io::Write>(line: Line, writer: &mut Writer) -> Result {
    match line {
        Line::Section(name) => write!(writer, "section {name}"),
        Line::Global(name) => write!(writer, "global {name}"),
        Line::Label(name) => write!(writer, "{name}:"),
        Line::CString { name, text } => write!(writer, "{name} db \"{text}\",0"),
        Line::Instruction(mnemonic, operands) => {
            format_instruction(mnemonic, operands, writer)
        }
        Line::Break => writer.write_all(b"\n"),
    }
}

fn format_instruction<Writer: io::Write>(
    mnemonic: &str,
    operands: Vec<Operand>,
    writer: &mut Writer,
) -> Result {
    write!(writer, "{INDENT}{mnemonic}")?;
    if operands.is_empty() {
        return Ok(());
    }
    write!(writer, " {}", operands.iter().join(", "))
}
