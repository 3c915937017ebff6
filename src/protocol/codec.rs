//! Protocol codec
//!
//! Line framing for requests and responses.
//!
//! ## Wire Format
//!
//! ### Request
//! ```text
//! CREATE_KEY Users 1 {"email":"a@x.com"}\n
//! END\n
//! ```
//! Every line before the terminator is concatenated without a separator.
//!
//! ### Response
//! ```text
//! OK!\n
//! ```
//! Exactly one line; the server closes the connection afterwards.

use std::io::{BufRead, Write};

use crate::error::Result;
use super::Response;

/// Default request terminator line
pub const DEFAULT_TERMINATOR: &str = "END";

// =============================================================================
// Requests
// =============================================================================

/// Read a request body: lines up to (not including) the terminator line.
///
/// Blocks until the terminator arrives. EOF first is `UnexpectedEof`.
pub fn read_request<R: BufRead>(reader: &mut R, terminator: &str) -> Result<String> {
    let mut body = String::new();
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "connection closed before request terminator",
            )
            .into());
        }

        let content = trim_line_ending(&line);
        if content == terminator {
            return Ok(body);
        }
        body.push_str(content);
    }
}

/// Write a request body followed by the terminator line
pub fn write_request<W: Write>(writer: &mut W, body: &str, terminator: &str) -> Result<()> {
    writer.write_all(body.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.write_all(terminator.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Responses
// =============================================================================

/// Write a response as one line
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    writer.write_all(response.to_line().as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Read a one-line response. A missing trailing newline is accepted.
pub fn read_response<R: BufRead>(reader: &mut R) -> Result<Response> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "connection closed before response",
        )
        .into());
    }
    Ok(Response::from_line(trim_line_ending(&line)))
}

fn trim_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
