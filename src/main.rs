use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use forscript::interpreter::Interpreter;
use forscript::lexer;
use forscript::parser::{self, SyntaxError};

/// Runs a forscript program: integer assignments, `for` loops and `print`.
#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Program file to run. Reads standard input when omitted.
    path: Option<PathBuf>,

    /// Print the parsed program instead of running it.
    #[arg(long)]
    print_ast: bool,

    /// Print the token stream and exit.
    #[arg(long, conflicts_with = "print_ast")]
    tokens: bool,

    /// Stop after a successful parse.
    #[arg(long)]
    parse_only: bool,

    /// After a successful run, print every variable as `name = value`.
    #[arg(long)]
    symbols: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if let Some(syntax_error) = error.downcast_ref::<SyntaxError>() {
                eprintln!("{}", syntax_error.report());
            } else {
                eprintln!("error: {error:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let source = read_source(args.path.as_ref())?;

    let tokens = lexer::tokenize(&source).context("Tokenizing program")?;
    if args.tokens {
        for token in &tokens {
            println!("{:>4}:{:<3} {token}", token.span.line, token.span.column);
        }
        return Ok(());
    }

    let program = parser::parse_tokens(tokens)?;
    log::info!("parsed {} top-level statements", program.len());
    if args.print_ast {
        print!("{program}");
        return Ok(());
    }
    if args.parse_only {
        return Ok(());
    }

    let mut interpreter = Interpreter::new(io::stdout().lock());
    interpreter.run(&program).context("Running program")?;
    if args.symbols {
        interpreter.dump_symbols().context("Writing symbol table")?;
    }
    Ok(())
}

fn read_source(path: Option<&PathBuf>) -> Result<String> {
    if let Some(path) = path {
        return fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()));
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Reading stdin")?;
    Ok(buffer)
}
