//! [`CookieJar`] over a cookie export file.
//!
//! The file is a JSON array of cookies in the browser extension shape, the
//! same shape snapshots are stored in. `set` applies the browser's
//! acceptance rules so that restores fail per cookie the way they would in a
//! real profile.

use std::path::{Path, PathBuf};

use acctswitch::protocol::{domain_matches, host_of};
use acctswitch::{CookieJar, CookieQuery, Error, Result, SameSite, SetCookieDetails, StoredCookie};
use async_trait::async_trait;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct FileCookieJar {
	path: PathBuf,
}

impl FileCookieJar {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub async fn load(&self) -> Result<Vec<StoredCookie>> {
		match tokio::fs::read_to_string(&self.path).await {
			Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
			Ok(content) => Ok(serde_json::from_str(&content)?),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
			Err(e) => Err(Error::CookieJar(format!("{}: {e}", self.path.display()))),
		}
	}

	pub async fn save(&self, cookies: &[StoredCookie]) -> Result<()> {
		let io_err = |e: std::io::Error| Error::CookieJar(format!("{}: {e}", self.path.display()));
		if let Some(parent) = self.path.parent() {
			tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
		}
		tokio::fs::write(&self.path, serde_json::to_string_pretty(cookies)?)
			.await
			.map_err(io_err)
	}
}

/// Browser acceptance rules for a `set` call.
pub fn check_policy(details: &SetCookieDetails) -> std::result::Result<(), String> {
	let https = details.url.starts_with("https://");

	if details.secure && !https {
		return Err("secure cookie set from an insecure URL".into());
	}
	if details.same_site == SameSite::NoRestriction && !details.secure {
		return Err("SameSite=None requires Secure".into());
	}
	if details.name.starts_with("__Secure-") && !details.secure {
		return Err("__Secure- prefix requires Secure".into());
	}
	if details.name.starts_with("__Host-")
		&& (!details.secure || details.domain.is_some() || details.path.as_deref().is_some_and(|p| p != "/"))
	{
		return Err("__Host- prefix requires Secure, no Domain and Path=/".into());
	}
	match &details.domain {
		Some(domain) if !domain_matches(host_of(&details.url), domain) => {
			Err(format!("domain {domain} does not match {}", details.url))
		}
		_ => Ok(()),
	}
}

#[async_trait(?Send)]
impl CookieJar for FileCookieJar {
	async fn get(&self, query: &CookieQuery) -> Result<Option<StoredCookie>> {
		let host = host_of(&query.url);
		Ok(self
			.load()
			.await?
			.into_iter()
			.find(|c| c.name == query.name && domain_matches(host, &c.domain)))
	}

	async fn get_all(&self, domain: &str) -> Result<Vec<StoredCookie>> {
		Ok(self
			.load()
			.await?
			.into_iter()
			.filter(|c| domain_matches(&c.domain, domain))
			.collect())
	}

	async fn set(&self, details: SetCookieDetails) -> Result<()> {
		check_policy(&details).map_err(|reason| Error::rejected(&details.name, reason))?;

		let cookie = details.into_cookie();
		let mut cookies = self.load().await?;
		cookies.retain(|c| !(c.name == cookie.name && c.domain == cookie.domain && c.path == cookie.path));
		debug!(cookie = %cookie.name, domain = %cookie.domain, "cookie set");
		cookies.push(cookie);
		self.save(&cookies).await
	}

	async fn clear(&self, domain: &str) -> Result<()> {
		let mut cookies = self.load().await?;
		let before = cookies.len();
		cookies.retain(|c| !domain_matches(&c.domain, domain));
		debug!(domain, removed = before - cookies.len(), "cookies cleared");
		self.save(&cookies).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	fn details(name: &str) -> SetCookieDetails {
		StoredCookie::new(name, "v", "github.com").to_set_details("https://github.com")
	}

	#[test]
	fn plain_cookie_passes_policy() {
		assert!(check_policy(&details("user_session")).is_ok());
	}

	#[test]
	fn same_site_none_needs_secure() {
		let mut d = details("tracker");
		d.same_site = SameSite::NoRestriction;
		assert!(check_policy(&d).is_err());

		d.secure = true;
		assert!(check_policy(&d).is_ok());
	}

	#[test]
	fn host_prefix_rules() {
		let mut d = details("__Host-user_session_same_site");
		assert!(check_policy(&d).is_err());

		d.secure = true;
		assert!(check_policy(&d).is_ok());

		d.domain = Some("github.com".into());
		assert!(check_policy(&d).is_err());
	}

	#[test]
	fn foreign_domain_is_rejected() {
		let mut d = details("x");
		d.domain = Some(".example.com".into());
		assert!(check_policy(&d).is_err());
	}

	#[tokio::test]
	async fn set_then_get_through_file() {
		let tmp = TempDir::new().unwrap();
		let jar = FileCookieJar::new(tmp.path().join("cookies.json"));

		jar.set(details("dotcom_user")).await.unwrap();
		let found = jar.get(&CookieQuery::new("https://github.com", "dotcom_user")).await.unwrap();

		assert_eq!(found.unwrap().value, "v");
	}

	#[tokio::test]
	async fn rejected_set_leaves_file_alone() {
		let tmp = TempDir::new().unwrap();
		let jar = FileCookieJar::new(tmp.path().join("cookies.json"));
		let mut d = details("__Secure-next");
		d.secure = false;

		let err = jar.set(d).await.unwrap_err();

		assert!(matches!(err, Error::CookieRejected { ref name, .. } if name == "__Secure-next"));
		assert!(jar.load().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn clear_keeps_other_domains() {
		let tmp = TempDir::new().unwrap();
		let jar = FileCookieJar::new(tmp.path().join("cookies.json"));
		jar.save(&[
			StoredCookie::new("a", "1", ".github.com").domain_wide(),
			StoredCookie::new("b", "2", "example.com"),
		])
		.await
		.unwrap();

		jar.clear("github.com").await.unwrap();

		let names: Vec<_> = jar.load().await.unwrap().into_iter().map(|c| c.name).collect();
		assert_eq!(names, vec!["b"]);
	}
}
