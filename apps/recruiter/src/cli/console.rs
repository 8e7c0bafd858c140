//! Line-oriented prompts over any reader/writer pair, so interactive flows can
//! be driven from a script in tests.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail, Result};

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    /// Prints `label` and reads one line. `None` at end of input.
    pub fn read_line(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Reads a trimmed answer; running out of input is an error.
    pub fn ask(&mut self, label: &str) -> Result<String> {
        self.read_line(label)?
            .map(|line| line.trim().to_string())
            .ok_or_else(|| anyhow!("input closed while waiting for: {}", label.trim()))
    }

    /// Like `ask`, but a blank answer must not happen.
    pub fn ask_required(&mut self, label: &str) -> Result<String> {
        let answer = self.ask(label)?;
        if answer.is_empty() {
            bail!("{} is required", label.trim().trim_end_matches(':'));
        }
        Ok(answer)
    }

    pub fn ask_or(&mut self, label: &str, default: &str) -> Result<String> {
        let answer = self.ask(label)?;
        Ok(if answer.is_empty() {
            default.to_string()
        } else {
            answer
        })
    }

    pub fn confirm(&mut self, label: &str) -> Result<bool> {
        let answer = self.ask(label)?.to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }

    /// Prints a numbered list and returns the zero-based pick. A blank answer is `None`.
    pub fn choose<T: Display>(&mut self, label: &str, items: &[T]) -> Result<Option<usize>> {
        for (i, item) in items.iter().enumerate() {
            self.say(format!("{}. {item}", i + 1))?;
        }
        let answer = self.ask(label)?;
        if answer.is_empty() {
            return Ok(None);
        }
        match answer.parse::<usize>() {
            Ok(n) if (1..=items.len()).contains(&n) => Ok(Some(n - 1)),
            _ => bail!("Invalid selection '{answer}'"),
        }
    }

    /// Reads lines until a blank line or end of input.
    pub fn read_block(&mut self) -> Result<String> {
        let mut lines = Vec::new();
        while let Some(line) = self.read_line("")? {
            if line.trim().is_empty() {
                break;
            }
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
