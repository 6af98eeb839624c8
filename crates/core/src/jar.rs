//! Browser-side collaborators: the live cookie jar and the toolbar badge.

use acctswitch_protocol::{CookieQuery, SetCookieDetails, StoredCookie};
use async_trait::async_trait;

use crate::error::Result;

/// The browser's live cookie jar.
#[async_trait(?Send)]
pub trait CookieJar {
	/// Returns the single live cookie matching `query`.
	async fn get(&self, query: &CookieQuery) -> Result<Option<StoredCookie>>;

	/// Returns every live cookie belonging to `domain` (including subdomains).
	async fn get_all(&self, domain: &str) -> Result<Vec<StoredCookie>>;

	/// Sets one cookie. Fails with [`Error::CookieRejected`](crate::Error::CookieRejected)
	/// when the browser refuses it.
	async fn set(&self, details: SetCookieDetails) -> Result<()>;

	/// Removes every cookie the jar considers part of `domain`.
	async fn clear(&self, domain: &str) -> Result<()>;
}

/// Short status text on the extension's toolbar icon.
pub trait Badge {
	/// Fire-and-forget; failures stay inside the implementation.
	fn set_badge_text(&self, text: &str);
}
