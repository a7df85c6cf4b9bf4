pub mod util;
pub mod interpreter;
pub mod repl;

use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use clap::{Parser as ClapParser, Subcommand};
use thiserror::Error;
use crate::interpreter::environment::Environment;
use crate::interpreter::error::RuntimeError;
use crate::interpreter::evaluator::Evaluator;
use crate::interpreter::lexer::{Lexer, Token};
use crate::interpreter::object::Object;
use crate::repl::Repl;

/// Every user function call recurses in the evaluator, so scripts need far
/// more stack than the main thread gets.
pub const INTERPRETER_STACK_SIZE: usize = 256 * 1024 * 1024;

#[derive(ClapParser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    #[clap(short, long, global = true, help = "Print verbose log output")]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a script
    Load {
        #[clap(help = "Script to run")]
        file: PathBuf,
        #[clap(short, long, help = "Continue in the REPL with the script's bindings")]
        interactive: bool,
    },
    /// Start the REPL on stdin and stdout
    Start,
    /// Print the tokens of a script
    Tokens {
        file: PathBuf,
    },
    /// Print the parsed form of a script
    Parse {
        file: PathBuf,
    },
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{} parse error(s)", .0.len())]
    Parse(Vec<String>),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

pub fn run(config: Config) -> Result<(), RunError> {
    match config.command {
        Command::Load { file, interactive } => {
            let env = Environment::new_global();
            let source = read_source(&file)?;

            drop(load(&source, &env, std::io::stdout().lock())?);

            if interactive {
                Repl::with_environment(env).start(std::io::stdin().lock(), std::io::stdout().lock())?;
            }

            Ok(())
        },
        Command::Start => {
            Repl::new().start(std::io::stdin().lock(), std::io::stdout().lock())?;
            Ok(())
        },
        Command::Tokens { file } => {
            let source = read_source(&file)?;
            let mut out = std::io::stdout().lock();

            for token in Lexer::new(&source) {
                writeln!(out, "{}", format_token(&token))?;
            }

            Ok(())
        },
        Command::Parse { file } => {
            let source = read_source(&file)?;
            let (program, errors) = interpreter::parse(&source);

            if !errors.is_empty() {
                report_parse_errors(&errors);
                return Err(RunError::Parse(errors));
            }

            let mut out = std::io::stdout().lock();

            for stmt in &program.statements {
                writeln!(out, "{}", stmt)?;
            }

            Ok(())
        },
    }
}

/// Evaluates a whole script against `env`, printing `puts` output and a
/// non-null result to `output`.
pub fn load<W: Write>(source: &str, env: &Rc<RefCell<Environment>>, output: W) -> Result<W, RunError> {
    let (program, errors) = interpreter::parse(source);

    if !errors.is_empty() {
        report_parse_errors(&errors);
        return Err(RunError::Parse(errors));
    }

    let mut evaluator = Evaluator::new(output);
    let result = evaluator.evaluate_program(&program, env);

    match result {
        Object::Null => {},
        Object::Error(err) => {
            writeln!(evaluator.output_mut(), "ERROR: {}", err)?;
            return Err(RunError::Runtime(err));
        },
        value => writeln!(evaluator.output_mut(), "{}", value.inspect())?,
    }

    Ok(evaluator.into_output())
}

/// Runs `f` on a thread whose stack fits deeply recursive scripts.
pub fn run_on_large_stack<F, T>(f: F) -> std::io::Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    std::thread::Builder::new()
        .name(String::from("interpreter"))
        .stack_size(INTERPRETER_STACK_SIZE)
        .spawn(f)?
        .join()
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "interpreter thread panicked"))
}

fn format_token(token: &Token) -> String {
    format!("{} {:<10} {}", token.start(), token.token_type(), token)
}

fn read_source(path: &Path) -> Result<String, RunError> {
    tracing::debug!(path = %path.display(), "reading script");
    Ok(std::fs::read_to_string(path)?)
}

fn report_parse_errors(errors: &[String]) {
    for error in errors {
        eprintln!("\t{}", error);
    }
}
