//! Cookie shapes as persisted in account snapshots and as passed to the
//! browser cookie API.
//!
//! # Main Types
//!
//! - [`StoredCookie`] - One captured cookie, in the `chrome.cookies` shape
//! - [`SetCookieDetails`] - Argument to the cookie jar's `set` call
//! - [`CookieQuery`] - Argument to the cookie jar's `get` call

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// SameSite policy as reported by the `chrome.cookies` API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameSite {
	/// Sent with cross-site requests (`SameSite=None`).
	NoRestriction,
	Lax,
	Strict,
	/// The browser did not record a policy.
	#[default]
	Unspecified,
}

/// A point-in-time capture of one browser cookie's restorable attributes.
///
/// Serializes exactly like the cookie objects the browser hands out, so a
/// snapshot written to the store reads back field for field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCookie {
	pub name: String,
	pub value: String,
	/// Domain the cookie belongs to (leading dot for domain cookies).
	pub domain: String,
	pub path: String,
	/// Cookie is bound to the exact host that set it.
	pub host_only: bool,
	/// Cookie has no expiration and dies with the browser session.
	pub session: bool,
	pub secure: bool,
	pub http_only: bool,
	#[serde(default)]
	pub same_site: SameSite,
	/// Expiration as Unix timestamp in seconds, [`None`] for session cookies.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expiration_date: Option<f64>,
	/// Browser cookie store identifier, carried through untouched.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub store_id: Option<String>,
	/// Browser-specific attributes (`partitionKey`, `firstPartyDomain`, ...)
	/// passed back to `set` as they were captured.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl StoredCookie {
	/// Creates a host-only session cookie on `domain` with path `/`.
	pub fn new(name: impl Into<String>, value: impl Into<String>, domain: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
			domain: domain.into(),
			path: "/".into(),
			host_only: true,
			session: true,
			secure: false,
			http_only: false,
			same_site: SameSite::Unspecified,
			expiration_date: None,
			store_id: None,
			extra: Map::new(),
		}
	}

	/// Makes the cookie a domain cookie (sent to subdomains).
	pub fn domain_wide(mut self) -> Self {
		self.host_only = false;
		self
	}

	/// Sets an expiration (Unix seconds), turning this into a persistent cookie.
	pub fn expires(mut self, expiration_date: f64) -> Self {
		self.expiration_date = Some(expiration_date);
		self.session = false;
		self
	}

	pub fn secure(mut self, secure: bool) -> Self {
		self.secure = secure;
		self
	}

	pub fn http_only(mut self, http_only: bool) -> Self {
		self.http_only = http_only;
		self
	}

	pub fn same_site(mut self, same_site: SameSite) -> Self {
		self.same_site = same_site;
		self
	}

	/// Translates this snapshot entry into a `set` call against `url`.
	///
	/// The browser rejects an explicit `domain` for host-only cookies (it would
	/// turn them into domain cookies), so it is only passed through when the
	/// cookie was not host-only. `hostOnly` and `session` are inferred by the
	/// browser from `domain` and `expirationDate` and are dropped; unknown
	/// attributes are forwarded.
	pub fn to_set_details(&self, url: &str) -> SetCookieDetails {
		SetCookieDetails {
			url: url.to_string(),
			name: self.name.clone(),
			value: self.value.clone(),
			domain: (!self.host_only).then(|| self.domain.clone()),
			path: Some(self.path.clone()),
			secure: self.secure,
			http_only: self.http_only,
			same_site: self.same_site,
			expiration_date: self.expiration_date,
			store_id: self.store_id.clone(),
			extra: self.extra.clone(),
		}
	}
}

/// Details for setting a cookie, in the `chrome.cookies.set` shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCookieDetails {
	/// URL the cookie is associated with; determines the default domain/path.
	pub url: String,
	pub name: String,
	pub value: String,
	/// Omitted for host-only cookies.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub domain: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub path: Option<String>,
	pub secure: bool,
	pub http_only: bool,
	pub same_site: SameSite,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expiration_date: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub store_id: Option<String>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl SetCookieDetails {
	/// Host the cookie lands on: the explicit domain, else the URL's host.
	pub fn effective_domain(&self) -> String {
		match &self.domain {
			Some(domain) => domain.clone(),
			None => host_of(&self.url).to_string(),
		}
	}

	/// The cookie the browser would report back after a successful `set`.
	pub fn into_cookie(self) -> StoredCookie {
		let domain = self.effective_domain();
		StoredCookie {
			host_only: self.domain.is_none(),
			session: self.expiration_date.is_none(),
			name: self.name,
			value: self.value,
			domain,
			path: self.path.unwrap_or_else(|| "/".into()),
			secure: self.secure,
			http_only: self.http_only,
			same_site: self.same_site,
			expiration_date: self.expiration_date,
			store_id: self.store_id,
			extra: self.extra,
		}
	}
}

/// Lookup of a single live cookie by URL and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieQuery {
	pub url: String,
	pub name: String,
}

impl CookieQuery {
	pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			name: name.into(),
		}
	}
}

/// Extracts the host from an `scheme://host[:port]/path` URL.
pub fn host_of(url: &str) -> &str {
	let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
	let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
	authority.split(':').next().unwrap_or(authority)
}

/// Whether a cookie stored under `cookie_domain` belongs to `domain`.
///
/// Matches the host itself and any subdomain; a leading dot on the cookie
/// domain is ignored.
pub fn domain_matches(cookie_domain: &str, domain: &str) -> bool {
	let cookie_domain = cookie_domain.trim_start_matches('.');
	let domain = domain.trim_start_matches('.');
	cookie_domain == domain || cookie_domain.ends_with(&format!(".{domain}"))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stored_cookie_uses_browser_field_names() {
		let cookie = StoredCookie::new("user_session", "abc", "github.com")
			.expires(1_700_000_000.0)
			.http_only(true)
			.same_site(SameSite::Lax);

		let json = serde_json::to_value(&cookie).unwrap();
		assert_eq!(json["hostOnly"], true);
		assert_eq!(json["httpOnly"], true);
		assert_eq!(json["session"], false);
		assert_eq!(json["sameSite"], "lax");
		assert_eq!(json["expirationDate"], 1_700_000_000.0);
		assert!(json.get("storeId").is_none());
	}

	#[test]
	fn stored_cookie_reads_browser_export() {
		let raw = r#"{
			"name": "_gh_sess", "value": "xyz", "domain": ".github.com", "path": "/",
			"hostOnly": false, "session": true, "secure": true, "httpOnly": true,
			"sameSite": "no_restriction", "storeId": "0"
		}"#;

		let cookie: StoredCookie = serde_json::from_str(raw).unwrap();
		assert_eq!(cookie.same_site, SameSite::NoRestriction);
		assert_eq!(cookie.expiration_date, None);
		assert_eq!(cookie.store_id.as_deref(), Some("0"));
	}

	#[test]
	fn browser_specific_fields_survive_capture_and_restore() {
		let raw = r#"{
			"name": "__Host-session", "value": "p", "domain": "github.com", "path": "/",
			"hostOnly": true, "session": true, "secure": true, "httpOnly": true,
			"sameSite": "lax", "partitionKey": {"topLevelSite": "https://github.com"},
			"firstPartyDomain": ""
		}"#;

		let cookie: StoredCookie = serde_json::from_str(raw).unwrap();
		assert_eq!(cookie.extra.len(), 2);

		let stored = serde_json::to_value(&cookie).unwrap();
		assert_eq!(stored["partitionKey"]["topLevelSite"], "https://github.com");

		let details = serde_json::to_value(cookie.to_set_details("https://github.com")).unwrap();
		assert_eq!(details["partitionKey"]["topLevelSite"], "https://github.com");
		assert_eq!(details["firstPartyDomain"], "");
		assert!(details.get("hostOnly").is_none());
		assert!(details.get("session").is_none());
	}

	#[test]
	fn host_only_cookie_is_set_without_domain() {
		let cookie = StoredCookie::new("dotcom_user", "octocat", "github.com");
		let details = cookie.to_set_details("https://github.com");

		assert_eq!(details.domain, None);
		assert_eq!(details.url, "https://github.com");
		assert_eq!(details.path.as_deref(), Some("/"));
	}

	#[test]
	fn domain_cookie_keeps_domain() {
		let cookie = StoredCookie::new("logged_in", "yes", ".github.com").domain_wide();
		let details = cookie.to_set_details("https://github.com");

		assert_eq!(details.domain.as_deref(), Some(".github.com"));
		assert_eq!(details.effective_domain(), ".github.com");
	}

	#[test]
	fn set_details_round_trip_to_cookie() {
		let original = StoredCookie::new("user_session", "s3cr3t", "github.com")
			.expires(1_800_000_000.0)
			.secure(true)
			.http_only(true)
			.same_site(SameSite::Lax);

		let restored = original.to_set_details("https://github.com").into_cookie();
		assert_eq!(restored, original);
	}

	#[test]
	fn host_of_strips_scheme_port_and_path() {
		assert_eq!(host_of("https://github.com"), "github.com");
		assert_eq!(host_of("https://github.com:8443/login?x=1"), "github.com");
		assert_eq!(host_of("github.com/path"), "github.com");
	}

	#[test]
	fn domain_matching_covers_subdomains() {
		assert!(domain_matches(".github.com", "github.com"));
		assert!(domain_matches("gist.github.com", "github.com"));
		assert!(!domain_matches("notgithub.com", "github.com"));
	}
}
