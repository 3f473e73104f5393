use std::fs;
use std::io::{self, Write};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Deserialize;
use snafu::ResultExt;

use stackc::error::{IoSnafu, JsonSnafu};
use stackc::parse::{parse, tokenize};
use stackc::service::{self, Request, Response};
use stackc::typecheck::check;
use stackc::{wire, Result};

#[derive(Parser)]
#[command(version, about = "Compile stack programs to x86-64 NASM")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a program, writing the assembly to stdout or --output.
    Compile {
        #[arg(long, require_equals = true)]
        output: Option<PathBuf>,

        input_file: PathBuf,
    },
    /// Print the tokens of a program as JSON.
    Tokenize { input_file: PathBuf },
    /// Print the AST of a program as JSON.
    Parse { input_file: PathBuf },
    /// Report every diagnostic of a program.
    Check { input_file: PathBuf },
    /// Answer one JSON request per TCP connection.
    Serve {
        #[arg(long, require_equals = true)]
        host: Option<IpAddr>,

        #[arg(long, require_equals = true)]
        port: Option<u16>,
    },
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).context(IoSnafu { path })
}

fn compile(input_file: &Path, output: Option<&Path>) -> Result<()> {
    let src = read_source(input_file)?;
    let mut asm = vec![];
    stackc::compile(&src, &mut asm)?;
    match output {
        Some(path) => fs::write(path, &asm).context(IoSnafu { path }),
        None => Ok(io::stdout().write_all(&asm)?),
    }
}

fn print_tokens(input_file: &Path) -> Result<()> {
    let tokens = tokenize(&read_source(input_file)?)?;
    println!("{}", serde_json::to_string(&tokens).context(JsonSnafu)?);
    Ok(())
}

fn print_ast(input_file: &Path) -> Result<()> {
    let program = parse(tokenize(&read_source(input_file)?)?)?;
    println!("{}", wire::to_string(&program)?);
    Ok(())
}

/// Returns whether the program passed.
fn report(input_file: &Path) -> Result<bool> {
    let program = parse(tokenize(&read_source(input_file)?)?)?;
    let report = check(&program);
    for diagnostic in &report.diagnostics {
        eprintln!("{}: {diagnostic}", input_file.display());
    }
    Ok(report.is_ok())
}

fn handle(mut stream: TcpStream) -> io::Result<()> {
    let mut de = serde_json::Deserializer::from_reader(&stream);
    let response = match Request::deserialize(&mut de) {
        Ok(request) => service::handle(request),
        Err(err) => Response::Error {
            error: format!("invalid request: {err}"),
        },
    };
    serde_json::to_writer(&stream, &response)?;
    stream.flush()
}

fn serve(host: Option<IpAddr>, port: Option<u16>) -> io::Result<()> {
    let ip = host.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
    let addr = SocketAddr::new(ip, port.unwrap_or(3000));
    let listener = TcpListener::bind(addr)?;
    println!("Bound to {addr:?}");

    for stream in listener.incoming() {
        if let Err(err) = stream.and_then(handle) {
            eprintln!("connection failed: {err}");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile { output, input_file } => compile(&input_file, output.as_deref()),
        Commands::Tokenize { input_file } => print_tokens(&input_file),
        Commands::Parse { input_file } => print_ast(&input_file),
        Commands::Check { input_file } => match report(&input_file) {
            Ok(true) => Ok(()),
            Ok(false) => return ExitCode::FAILURE,
            Err(err) => Err(err),
        },
        Commands::Serve { host, port } => match serve(host, port) {
            Ok(()) => Ok(()),
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
