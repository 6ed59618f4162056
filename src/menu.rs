use std::io::{BufRead, Write};

use crate::model::{self, InputError, MenuSelection};

const EXIT_WORDS: [&str; 3] = ["q", "quit", "exit"];

/// Parses one line of menu input against a menu of `len` options.
pub fn parse_choice(line: &str, len: usize) -> Result<MenuSelection, InputError> {
    let number: usize = line.trim().parse().map_err(|_| InputError::NotANumber)?;
    MenuSelection::new(number, len).ok_or(InputError::OutOfRange(len))
}

/// Presents a numbered menu and reads until a valid choice is entered.
///
/// Invalid lines print the reason and show the menu again. End of input or one
/// of the exit words ends the loop with `AppError::Cancelled`.
pub fn select_option<R: BufRead, W: Write, S: AsRef<str>>(
    prompt: &str,
    options: &[S],
    input: &mut R,
    output: &mut W,
) -> model::Result<MenuSelection> {
    if options.is_empty() {
        return Err(model::AppError::Data("Nothing to choose from.".into()));
    }

    let mut buf = Vec::new();
    loop {
        writeln!(output, "{}\n", prompt)?;
        for (i, opt) in options.iter().enumerate() {
            writeln!(output, "  {}. {}", i + 1, opt.as_ref())?;
        }
        write!(output, "Enter choice [1-{}]: ", options.len())?;
        output.flush()?;

        // Bytes that are not UTF-8 fall through to parse_choice and get rejected there.
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            writeln!(output)?;
            return Err(model::AppError::Cancelled);
        }
        let line = String::from_utf8_lossy(&buf);
        if EXIT_WORDS.contains(&line.trim().to_lowercase().as_str()) {
            return Err(model::AppError::Cancelled);
        }

        match parse_choice(&line, options.len()) {
            Ok(selection) => {
                log::debug!("selected option {}", selection.number());
                return Ok(selection);
            }
            Err(err) => {
                log::debug!("rejected menu input {:?}: {}", line.trim(), err);
                writeln!(output, "\n{}\n", err)?;
            }
        }
    }
}
