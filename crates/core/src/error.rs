//! Error types for account storage and session switching.

use thiserror::Error;

/// Result type alias for acctswitch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the store or the cookie jar.
///
/// Absence (unknown account, missing store key, no live session cookie) is
/// never an error; those are modelled as [`Option`].
#[derive(Debug, Error)]
pub enum Error {
	/// The persistent store failed to read or write a key.
	#[error("store error on '{key}': {message}")]
	Store { key: String, message: String },

	/// The browser cookie API rejected a call.
	#[error("cookie jar error: {0}")]
	CookieJar(String),

	/// A single cookie was refused by the jar (policy, malformed attributes).
	#[error("cookie '{name}' rejected: {reason}")]
	CookieRejected { name: String, reason: String },

	/// Persisted data did not match the expected shape.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl Error {
	pub fn store(key: impl Into<String>, message: impl Into<String>) -> Self {
		Self::Store {
			key: key.into(),
			message: message.into(),
		}
	}

	pub fn rejected(name: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::CookieRejected {
			name: name.into(),
			reason: reason.into(),
		}
	}
}
