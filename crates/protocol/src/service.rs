//! The single web service whose sessions are switched, and the persisted
//! store layout.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::cookie::StoredCookie;

/// Store key holding [`AccountMap`].
pub const ACCOUNTS_KEY: &str = "accounts";

/// Store key holding [`AvatarMap`].
pub const AVATARS_KEY: &str = "avatars";

/// Account name to cookie snapshot, in the order accounts were first added.
pub type AccountMap = IndexMap<String, Vec<StoredCookie>>;

/// Account name to avatar URL. Not kept in step with [`AccountMap`].
pub type AvatarMap = IndexMap<String, String>;

/// Where the service lives and which of its cookies carry identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
	/// Origin used for cookie lookups and `set` calls.
	pub url: &'static str,
	/// Domain whose cookies make up a session.
	pub domain: &'static str,
	/// Cookie whose value is the signed-in account name.
	pub current_user_cookie: &'static str,
	/// Cookie marking the authenticated session; its expiry is the session's.
	pub session_cookie: &'static str,
}

impl Service {
	pub const GITHUB: Service = Service {
		url: "https://github.com",
		domain: "github.com",
		current_user_cookie: "dotcom_user",
		session_cookie: "user_session",
	};
}

impl Default for Service {
	fn default() -> Self {
		Self::GITHUB
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn account_map_serializes_as_object_keyed_by_name() {
		let mut accounts = AccountMap::new();
		accounts.insert("octocat".into(), vec![StoredCookie::new("dotcom_user", "octocat", "github.com")]);
		accounts.insert("hubot".into(), Vec::new());

		let json = serde_json::to_value(&accounts).unwrap();
		assert_eq!(json["hubot"], serde_json::json!([]));
		assert_eq!(json["octocat"][0]["value"], "octocat");
	}

	#[test]
	fn account_map_keeps_document_order() {
		let accounts: AccountMap = serde_json::from_str(r#"{"zed": [], "alice": [], "Bob": []}"#).unwrap();
		let names: Vec<_> = accounts.keys().map(String::as_str).collect();
		assert_eq!(names, ["zed", "alice", "Bob"]);

		let through_value: AccountMap = serde_json::from_value(serde_json::to_value(&accounts).unwrap()).unwrap();
		assert_eq!(through_value, accounts);
		assert!(through_value.keys().eq(accounts.keys()));
	}
}
