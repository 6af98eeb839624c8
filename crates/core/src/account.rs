//! The [`Account`] read-model, assembled fresh on every registry query.

use acctswitch_protocol::StoredCookie;
use serde::Serialize;

/// A stored account as presented to callers.
///
/// Never persisted: `active` comes from the live browser cookie and
/// `avatar_url` from a separate store key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
	pub name: String,
	pub cookies: Vec<StoredCookie>,
	/// The browser's current-user cookie names this account.
	pub active: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub avatar_url: Option<String>,
	/// Session expiry in milliseconds since the Unix epoch.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub expires_at: Option<i64>,
}

impl Account {
	/// `true` once `now_ms` has reached the session cookie's expiry.
	/// Accounts without a known expiry never report expired.
	pub fn is_expired(&self, now_ms: i64) -> bool {
		self.expires_at.is_some_and(|expires_at| expires_at <= now_ms)
	}
}

/// Whether the live current-user cookie value identifies `name`.
pub fn derive_active(live: Option<&str>, name: &str) -> bool {
	live == Some(name)
}

/// Expiry of the snapshot's session cookie in epoch milliseconds.
///
/// [`None`] when the cookie is missing or is a pure session cookie.
pub fn derive_expiry(cookies: &[StoredCookie], session_cookie: &str) -> Option<i64> {
	cookies
		.iter()
		.find(|cookie| cookie.name == session_cookie)
		.and_then(|cookie| cookie.expiration_date)
		.map(|seconds| (seconds * 1000.0) as i64)
}
