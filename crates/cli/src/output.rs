//! Result envelope and printing for CLI commands.
//!
//! In JSON mode every command prints one envelope on stdout:
//!
//! ```json
//! { "ok": true, "command": "switch", "data": { ... } }
//! { "ok": false, "command": "switch", "error": { "code": "STORE_ERROR", "message": "..." } }
//! ```
//!
//! Text mode prints a human summary instead; errors always go to stderr.

use std::fmt;
use std::io::{self, Write};

use serde::Serialize;

/// Output format for CLI results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text
	#[default]
	Text,
	/// JSON envelope
	Json,
}

impl fmt::Display for OutputFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OutputFormat::Text => write!(f, "text"),
			OutputFormat::Json => write!(f, "json"),
		}
	}
}

#[derive(Debug, Serialize)]
pub struct CommandResult<T: Serialize> {
	pub ok: bool,
	pub command: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,
}

impl<T: Serialize> CommandResult<T> {
	pub fn success(command: &str, data: T) -> Self {
		Self {
			ok: true,
			command: command.to_string(),
			data: Some(data),
			error: None,
		}
	}

	pub fn failure(command: &str, error: CommandError) -> Self {
		Self {
			ok: false,
			command: command.to_string(),
			data: None,
			error: Some(error),
		}
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandError {
	pub code: ErrorCode,
	pub message: String,
}

/// Standardized error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	AccountNotFound,
	NotSignedIn,
	/// Reading or writing the account store failed
	StoreError,
	/// Reading or writing the cookie jar failed
	CookieJarError,
	InvalidInput,
	IoError,
}

impl fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let code = serde_json::to_value(self)
			.ok()
			.and_then(|v| v.as_str().map(String::from))
			.unwrap_or_else(|| format!("{self:?}"));
		f.write_str(&code)
	}
}

pub fn print_json<T: Serialize>(result: &CommandResult<T>) {
	let mut stdout = io::stdout().lock();
	if let Ok(json) = serde_json::to_string_pretty(result) {
		let _ = writeln!(stdout, "{json}");
	}
}

pub fn print_error_stderr(error: &CommandError) {
	eprintln!("Error [{}]: {}", error.code, error.message);
}
