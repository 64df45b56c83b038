//! CLI response formatting and output.
//!
//! Successful runs keep stdout free for the overwrite notice (or the dry-run
//! rendering) unless `--json` asks for an envelope. Failures are always
//! reported as a JSON envelope on stderr.

use serde::Serialize;
use setupgen::error::Hint;
use setupgen::{Error, ErrorCode, Result};
use std::io::{self, Write};

#[derive(Debug, Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<Hint>>,
}

impl<T: Serialize> CliResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            Error::internal_unexpected(format!("serialize response: {}", e))
        })
    }
}

impl CliResponse<()> {
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(CliError {
                code: err.code.as_str().to_string(),
                message: err.message.clone(),
                details: err.details.clone(),
                hints: if err.hints.is_empty() {
                    None
                } else {
                    Some(err.hints.clone())
                },
            }),
        }
    }
}

fn write_payload<W: Write>(mut handle: W, payload: &str, context: &str) -> Result<()> {
    if let Err(e) = writeln!(handle, "{}", payload) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            return Ok(()); // Exit gracefully on SIGPIPE
        }
        return Err(Error::internal_io(e.to_string(), Some(context.to_string())));
    }
    Ok(())
}

pub fn print_success<T: Serialize>(data: T) -> Result<()> {
    let payload = CliResponse::success(data).to_json()?;
    write_payload(io::stdout().lock(), &payload, "write stdout")
}

pub fn print_error(err: &Error) -> Result<()> {
    let payload = CliResponse::<()>::from_error(err).to_json()?;
    write_payload(io::stderr().lock(), &payload, "write stderr")
}

pub fn exit_code_for_error(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::ValidationMissingArgument | ErrorCode::ValidationInvalidArgument => 2,

        ErrorCode::DescriptorParseFailed
        | ErrorCode::DescriptorMissingField
        | ErrorCode::TemplateInvalid
        | ErrorCode::InternalIoError
        | ErrorCode::InternalUnexpected => 1,
    }
}
