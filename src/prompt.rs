use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::report::{self, Report};
use crate::session::Shell;

/// Numbered-menu shell over any line reader and writer.
pub struct TextShell<R, W> {
    input: R,
    output: W,
    json: bool,
}

impl<R: BufRead, W: Write> TextShell<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            json: false,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        let read = self.input.read_line(&mut buf).context("read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> Shell for TextShell<R, W> {
    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<Option<usize>> {
        writeln!(self.output, "{prompt}")?;
        for (i, opt) in options.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, opt)?;
        }
        loop {
            write!(self.output, "Choose an option number: ")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match parse_choice(&line, options.len()) {
                Ok(idx) => return Ok(Some(idx)),
                Err(msg) => writeln!(self.output, "{msg}")?,
            }
        }
    }

    fn read_height(&mut self, prompt: &str) -> Result<Option<f64>> {
        loop {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match parse_height(&line) {
                Some(height) => return Ok(Some(height)),
                None => writeln!(self.output, "Invalid input. Enter a decimal number.")?,
            }
        }
    }

    fn show_message(&mut self, msg: &str) -> Result<()> {
        writeln!(self.output, "{msg}")?;
        Ok(())
    }

    fn show_report(&mut self, report: &Report) -> Result<()> {
        if self.json {
            let json = report.to_json().context("serialize report")?;
            writeln!(self.output, "{json}")?;
            return Ok(());
        }
        writeln!(self.output)?;
        writeln!(self.output, "Results:")?;
        for line in report::result_lines(report) {
            writeln!(self.output, "{line}")?;
        }
        Ok(())
    }
}

/// 1-based menu entry to a 0-based index.
pub fn parse_choice(raw: &str, len: usize) -> Result<usize, &'static str> {
    let n = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| "Invalid input. Enter a number.")?;
    if n >= 1 && (n as u64) <= len as u64 {
        Ok((n - 1) as usize)
    } else {
        Err("Invalid number. Try again.")
    }
}

pub fn parse_height(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|h| h.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_choice_bounds() {
        assert_eq!(parse_choice("1", 3), Ok(0));
        assert_eq!(parse_choice(" 3 ", 3), Ok(2));
        assert!(parse_choice("0", 3).is_err());
        assert!(parse_choice("4", 3).is_err());
        assert!(parse_choice("-1", 3).is_err());
        assert_eq!(parse_choice("two", 3), Err("Invalid input. Enter a number."));
    }

    #[test]
    fn parse_height_rejects_non_numbers() {
        assert_eq!(parse_height("1.75"), Some(1.75));
        assert_eq!(parse_height(" 2 "), Some(2.0));
        assert_eq!(parse_height("1,75"), None);
        assert_eq!(parse_height("nan"), None);
        assert_eq!(parse_height(""), None);
    }
}
