use std::path::PathBuf;

use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error("account not found: {0}")]
	AccountNotFound(String),

	#[error("no signed-in account in {}", .0.display())]
	NotSignedIn(PathBuf),

	#[error("failed to read {path}")]
	ReadInput {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error(transparent)]
	Core(#[from] acctswitch::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl CliError {
	/// Convert this error to a CommandError for structured output
	pub fn to_command_error(&self) -> CommandError {
		let code = match self {
			CliError::AccountNotFound(_) => ErrorCode::AccountNotFound,
			CliError::NotSignedIn(_) => ErrorCode::NotSignedIn,
			CliError::ReadInput { .. } => ErrorCode::IoError,
			CliError::Core(acctswitch::Error::Store { .. }) => ErrorCode::StoreError,
			CliError::Core(acctswitch::Error::CookieJar(_) | acctswitch::Error::CookieRejected { .. }) => {
				ErrorCode::CookieJarError
			}
			CliError::Core(acctswitch::Error::Json(_)) | CliError::Json(_) => ErrorCode::InvalidInput,
		};

		let message = match self {
			CliError::ReadInput { path, source } => format!("failed to read {}: {source}", path.display()),
			other => other.to_string(),
		};

		CommandError { code, message }
	}
}
