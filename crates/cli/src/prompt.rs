//! Interactive prompts for arguments omitted on the command line
//!
//! Labels are written to stderr so stdout stays reserved for per-file
//! output and JSON records; answers are read from stdin.

use std::io::{self, BufRead, Write};

/// Print `label: ` on stderr and read one line from stdin.
///
/// Surrounding whitespace is stripped from the answer, so a pasted path or
/// bucket name with a stray space is taken as intended. At end of input the
/// returned string is empty.
pub fn prompt_line(label: &str) -> io::Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "{label}: ")?;
    stderr.flush()?;

    read_answer(&mut io::stdin().lock())
}

fn read_answer<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
