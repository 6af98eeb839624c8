//! Replaces the browser's live session with a stored account snapshot.
//!
//! The protocol is strictly sequential:
//!
//! 1. If the current-user cookie already names the target, stop. Clearing
//!    cookies in the middle of an identity-provider redirect breaks it.
//! 2. Clear the service domain's cookies.
//! 3. Load the target's snapshot (an unknown account is an empty snapshot).
//! 4. Set each stored cookie, one at a time. A rejected cookie is recorded
//!    and skipped.
//! 5. Update the badge.
//!
//! Nothing serializes concurrent calls; two overlapping switches can leave a
//! mix of both accounts' cookies in the jar. Callers disable the trigger
//! while a switch is in flight.

use std::rc::Rc;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::jar::Badge;
use crate::registry::AccountRegistry;

/// Badge text for a switch that restored nothing, or for a nameless account.
pub const EMPTY_BADGE: &str = "...";

/// A cookie the jar refused during restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedCookie {
	pub name: String,
	pub reason: String,
}

/// What a completed switch did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreReport {
	pub account: String,
	/// Cookies in the snapshot, i.e. `set` calls made.
	pub attempted: usize,
	pub restored: usize,
	pub failed: Vec<FailedCookie>,
	/// Text shown on the badge afterwards.
	pub badge: String,
}

impl RestoreReport {
	/// Every snapshot cookie made it into the jar.
	pub fn is_complete(&self) -> bool {
		self.failed.is_empty()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SwitchOutcome {
	/// The account was already signed in; no cookie was touched.
	AlreadyActive,
	Switched(RestoreReport),
}

/// Badge label for an account: its first two characters.
pub fn badge_label(name: &str) -> String {
	if name.is_empty() {
		return EMPTY_BADGE.to_string();
	}
	name.chars().take(2).collect()
}

/// Runs the activation protocol against injected collaborators.
///
/// Every step runs against the registry's cookie jar.
pub struct SessionSwitcher {
	registry: AccountRegistry,
	badge: Rc<dyn Badge>,
}

impl SessionSwitcher {
	pub fn new(registry: AccountRegistry, badge: Rc<dyn Badge>) -> Self {
		Self { registry, badge }
	}

	pub fn registry(&self) -> &AccountRegistry {
		&self.registry
	}

	/// Makes `name` the browser's signed-in account.
	///
	/// Store and jar failures on the read, clear and lookup steps propagate;
	/// per-cookie `set` failures are collected in the report instead.
	pub async fn switch_to(&self, name: &str) -> Result<SwitchOutcome> {
		if self.registry.current_user().await?.as_deref() == Some(name) {
			info!(account = name, "already active account, skipping cookie reset");
			return Ok(SwitchOutcome::AlreadyActive);
		}

		let service = *self.registry.service();
		let jar = self.registry.jar();
		jar.clear(service.domain).await?;

		let cookies = self
			.registry
			.find(name)
			.await?
			.map(|account| account.cookies)
			.unwrap_or_default();

		let mut failed = Vec::new();
		for cookie in &cookies {
			if let Err(err) = jar.set(cookie.to_set_details(service.url)).await {
				warn!(account = name, cookie = %cookie.name, error = %err, "failed to restore cookie");
				failed.push(FailedCookie {
					name: cookie.name.clone(),
					reason: err.to_string(),
				});
			}
		}

		let badge = if cookies.is_empty() {
			EMPTY_BADGE.to_string()
		} else {
			badge_label(name)
		};
		self.badge.set_badge_text(&badge);

		let report = RestoreReport {
			account: name.to_string(),
			attempted: cookies.len(),
			restored: cookies.len() - failed.len(),
			failed,
			badge,
		};
		info!(
			account = name,
			restored = report.restored,
			failed = report.failed.len(),
			"switched account"
		);
		Ok(SwitchOutcome::Switched(report))
	}
}
