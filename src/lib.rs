pub mod ast;
pub mod codegen;
pub mod error;
pub mod parse;
pub mod service;
pub mod typecheck;
mod util;
pub mod wire;

use std::io;

use snafu::ensure;

use codegen::gen;
use error::RejectedSnafu;
use parse::{parse, tokenize};
use typecheck::check;

pub use error::{Error, Result};

/// Runs every stage over `src` and writes the assembly to `dest`. Nothing is
/// written when the checker has any finding.
pub fn compile<Write: io::Write>(src: &str, dest: &mut Write) -> Result<()> {
    let tokens = tokenize(src)?;
    let program = parse(tokens)?;
    let report = check(&program);
    ensure!(
        report.is_ok(),
        RejectedSnafu {
            diagnostics: report.diagnostics
        }
    );
    gen(&program, dest)?;
    Ok(())
}
