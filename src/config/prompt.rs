use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::num::ParseIntError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Input closed while waiting for '{0}'")]
    Closed(String),
    #[error("'{input}' is not a valid number for '{label}'")]
    InvalidNumber {
        label: String,
        input: String,
        #[source]
        source: ParseIntError,
    },
}

/// Line-oriented operator prompts. Every question is rendered as
/// `<label> > ` and answered with a single line.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> Result<String, PromptError> {
        write!(self.output, "{} > ", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Closed(question.to_string()));
        }

        Ok(line.trim().to_string())
    }

    /// Empty input selects `default`.
    pub fn text_or(&mut self, label: &str, default: &str) -> Result<String, PromptError> {
        let answer = self.ask(&format!("{} (default: {})", label, default))?;
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }

    /// Asks again until a non-empty answer arrives.
    pub fn required(&mut self, label: &str) -> Result<String, PromptError> {
        loop {
            let answer = self.ask(label)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
        }
    }

    pub fn number(&mut self, label: &str) -> Result<u64, PromptError> {
        let answer = self.required(label)?;
        answer.parse::<u64>().map_err(|source| PromptError::InvalidNumber {
            label: label.to_string(),
            input: answer,
            source,
        })
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

/// Errors a script run can end with. Validation failures are the operator's
/// to fix and are reported, not raised.
pub trait OperatorError: std::error::Error + From<io::Error> {
    fn is_validation(&self) -> bool;
}

/// Turns the outcome of a script run into an exit status: 0 on success, 1
/// after printing `[Error] <message>` for a validation failure. Any other
/// error is handed back untouched.
pub fn conclude<E: OperatorError, O: Write>(result: Result<(), E>, out: &mut O) -> Result<u8, E> {
    match result {
        Ok(()) => Ok(0),
        Err(e) if e.is_validation() => {
            writeln!(out, "[Error] {}", e)?;
            Ok(1)
        }
        Err(e) => Err(e),
    }
}
