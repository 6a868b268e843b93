//! Interactive user prompt
//!
//! The OAuth PIN exchange is the only place the bootstrap waits for the
//! user. It goes through this trait so it can run without a terminal.

use std::io::{self, BufRead, Write};

pub trait Prompt {
    /// Show an informational line to the user
    fn show(&mut self, message: &str);

    /// Ask `question` and return the answer without the trailing newline
    fn ask(&mut self, question: &str) -> io::Result<String>;
}

/// Prompt on stdout/stdin
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn show(&mut self, message: &str) {
        println!("{}", message);
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", question)?;
        stdout.flush()?;

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before an answer was given",
            ));
        }
        Ok(answer.trim_end_matches(['\r', '\n']).to_string())
    }
}
