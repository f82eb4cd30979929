//! JSON I/O handling for CLI
//!
//! - Input: a single JSON object, from an argument or stdin
//! - Output: pretty-printed JSON on stdout

use std::io::{self, Read, Write};

use serde::Serialize;
use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read a JSON value from stdin
pub fn read_stdin() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;

    if input.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    Ok(serde_json::from_str(&input)?)
}

/// Parse `arg` as JSON, or read stdin when it is "-"
pub fn read_json_arg(arg: &str) -> CliResult<Value> {
    if arg == "-" {
        return read_stdin();
    }
    Ok(serde_json::from_str(arg)?)
}

/// Write a value to stdout
pub fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_arg() {
        let value = read_json_arg(r#"{"title": "Hello"}"#).unwrap();
        assert_eq!(value["title"], "Hello");
        assert!(read_json_arg("{oops").is_err());
    }
}
