use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;
use crate::interpreter;
use crate::interpreter::environment::Environment;
use crate::interpreter::evaluator::Evaluator;

pub const PROMPT: &str = ">> ";

/// Read-eval-print loop. Bindings survive from one line to the next.
pub struct Repl {
    env: Rc<RefCell<Environment>>,
}

impl Repl {
    pub fn new() -> Repl {
        Repl::with_environment(Environment::new_global())
    }

    pub fn with_environment(env: Rc<RefCell<Environment>>) -> Repl {
        Repl { env }
    }

    pub fn environment(&self) -> &Rc<RefCell<Environment>> {
        &self.env
    }

    /// Runs until `reader` hits end of input.
    pub fn start<R: BufRead, W: Write>(&self, mut reader: R, writer: W) -> std::io::Result<()> {
        let mut evaluator = Evaluator::new(writer);
        let mut line = String::new();

        loop {
            write!(evaluator.output_mut(), "{}", PROMPT)?;
            evaluator.output_mut().flush()?;

            line.clear();

            if reader.read_line(&mut line)? == 0 {
                break;
            }

            let (program, errors) = interpreter::parse(&line);

            if !errors.is_empty() {
                tracing::debug!(errors = errors.len(), "skipping line with parse errors");

                for error in &errors {
                    writeln!(evaluator.output_mut(), "\t{}", error)?;
                }

                continue;
            }

            let result = evaluator.evaluate_program(&program, &self.env);
            writeln!(evaluator.output_mut(), "{}", result.inspect())?;
        }

        writeln!(evaluator.output_mut())?;
        Ok(())
    }
}

impl Default for Repl {
    fn default() -> Self {
        Repl::new()
    }
}
