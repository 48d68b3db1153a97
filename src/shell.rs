//! Interactive command loop
//!
//! Reads one command per line from any `BufRead`, writes status lines to any
//! `Write`. End of input behaves like `quit` without the farewell.

use crate::command::{describe_error, Command, Flow, COMMAND_HELP};
use crate::error::{GarageError, Result};
use crate::garage::Garage;
use std::collections::VecDeque;
use std::io::{BufRead, Write};
use tracing::{debug, info};

pub const LEVELS_PROMPT: &str = "Number of levels in your parking lot garage: ";
pub const SLOTS_PROMPT: &str = "Number of slots/spots on each level: ";

/// Prompt for and read the garage dimensions as (levels, slots per level)
///
/// The two numbers may be on one line or on separate lines.
///
/// # Errors
///
/// - `InvalidNumber` if a token is not a non-negative integer
/// - `Io` if input ends before both numbers are read
pub fn read_dimensions<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<(usize, usize)> {
    resolve_dimensions(None, None, input, output)
}

/// Use the dimensions already known and prompt only for the missing ones
///
/// Nothing is read from `input` when both are given.
pub fn resolve_dimensions<R: BufRead, W: Write>(
    levels: Option<usize>,
    slots_per_level: Option<usize>,
    input: &mut R,
    output: &mut W,
) -> Result<(usize, usize)> {
    let mut pending = VecDeque::new();
    let levels = match levels {
        Some(levels) => levels,
        None => next_number(input, output, &mut pending, LEVELS_PROMPT)?,
    };
    let slots = match slots_per_level {
        Some(slots) => slots,
        None => next_number(input, output, &mut pending, SLOTS_PROMPT)?,
    };
    Ok((levels, slots))
}

fn next_number<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    pending: &mut VecDeque<String>,
    prompt: &str,
) -> Result<usize> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut buf = Vec::new();
    while pending.is_empty() {
        let Some(line) = read_line_lossy(input, &mut buf)? else {
            return Err(GarageError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "input ended before garage dimensions were given",
            )));
        };
        pending.extend(line.split_whitespace().map(str::to_string));
    }

    let token = pending.pop_front().unwrap_or_default();
    token
        .parse::<usize>()
        .map_err(|_| GarageError::InvalidNumber(token))
}

/// Read one line, replacing invalid UTF-8 with U+FFFD
///
/// Returns `None` at end of input.
fn read_line_lossy<R: BufRead>(input: &mut R, buf: &mut Vec<u8>) -> Result<Option<String>> {
    buf.clear();
    if input.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}

/// Command shell bound to one garage
pub struct Shell<'g, R, W> {
    garage: &'g Garage,
    input: R,
    output: W,
}

impl<'g, R: BufRead, W: Write> Shell<'g, R, W> {
    pub fn new(garage: &'g Garage, input: R, output: W) -> Self {
        Shell {
            garage,
            input,
            output,
        }
    }

    /// Print the welcome banner and command list, then process commands
    /// until `quit` or end of input
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "\nWelcome to the Garage System!")?;
        writeln!(self.output, "\n{}", COMMAND_HELP)?;

        let mut buf = Vec::new();
        loop {
            write!(self.output, "\nEnter command: ")?;
            self.output.flush()?;

            let Some(line) = read_line_lossy(&mut self.input, &mut buf)? else {
                info!("Input closed, leaving command loop");
                writeln!(self.output)?;
                break;
            };

            if self.dispatch(&line)? == Flow::Quit {
                break;
            }
        }

        self.output.flush()?;
        Ok(())
    }

    /// Handle one input line
    pub fn dispatch(&mut self, line: &str) -> Result<Flow> {
        match Command::parse(line) {
            Ok(Some(command)) => command.execute(self.garage, &mut self.output),
            Ok(None) => Ok(Flow::Continue),
            Err(err) => {
                debug!("Could not parse {:?}: {}", line.trim_end(), err);
                writeln!(self.output, "{}", describe_error(&err))?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Consume the shell, returning its output sink
    pub fn into_output(self) -> W {
        self.output
    }
}
