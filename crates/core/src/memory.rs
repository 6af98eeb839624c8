//! In-memory collaborators.
//!
//! Useful for embedding the core without a browser and as test doubles:
//! the jar counts calls and can be rigged to reject cookies or fail outright.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

use acctswitch_protocol::{CookieQuery, SetCookieDetails, StoredCookie, domain_matches, host_of};
use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::jar::{Badge, CookieJar};
use crate::store::Store;

/// A [`Store`] backed by a map of JSON values.
#[derive(Debug, Default)]
pub struct MemoryStore {
	values: RefCell<BTreeMap<String, serde_json::Value>>,
	offline: Cell<bool>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Makes every subsequent call fail, as a disconnected backend would.
	pub fn set_offline(&self, offline: bool) {
		self.offline.set(offline);
	}

	/// Raw value under `key`, bypassing the async interface.
	pub fn peek(&self, key: &str) -> Option<serde_json::Value> {
		self.values.borrow().get(key).cloned()
	}

	fn check_online(&self, key: &str) -> Result<()> {
		if self.offline.get() {
			return Err(Error::store(key, "store unavailable"));
		}
		Ok(())
	}
}

#[async_trait(?Send)]
impl Store for MemoryStore {
	async fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
		self.check_online(key)?;
		Ok(self.values.borrow().get(key).cloned())
	}

	async fn set(&self, key: &str, value: serde_json::Value) -> Result<()> {
		self.check_online(key)?;
		self.values.borrow_mut().insert(key.to_string(), value);
		Ok(())
	}
}

/// A [`CookieJar`] holding cookies in a list, recording every call.
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
	cookies: RefCell<Vec<StoredCookie>>,
	rejected_names: RefCell<BTreeSet<String>>,
	rejected_calls: RefCell<BTreeSet<usize>>,
	set_attempts: RefCell<Vec<String>>,
	get_calls: Cell<usize>,
	clear_calls: Cell<usize>,
	offline: Cell<bool>,
	failing_clear: Cell<bool>,
}

impl MemoryCookieJar {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_cookies(cookies: Vec<StoredCookie>) -> Self {
		let jar = Self::default();
		*jar.cookies.borrow_mut() = cookies;
		jar
	}

	/// Inserts or replaces a cookie directly, skipping rejection rules.
	pub fn put(&self, cookie: StoredCookie) {
		let mut cookies = self.cookies.borrow_mut();
		cookies.retain(|c| !(c.name == cookie.name && c.domain == cookie.domain && c.path == cookie.path));
		cookies.push(cookie);
	}

	/// Rejects every `set` of a cookie with this name.
	pub fn reject_name(&self, name: impl Into<String>) {
		self.rejected_names.borrow_mut().insert(name.into());
	}

	/// Rejects the `n`th `set` call (1-based).
	pub fn reject_call(&self, n: usize) {
		self.rejected_calls.borrow_mut().insert(n);
	}

	/// Makes every subsequent call fail with [`Error::CookieJar`].
	pub fn set_offline(&self, offline: bool) {
		self.offline.set(offline);
	}

	/// Makes `clear` fail while other calls keep working.
	pub fn fail_clear(&self, failing: bool) {
		self.failing_clear.set(failing);
	}

	pub fn cookies(&self) -> Vec<StoredCookie> {
		self.cookies.borrow().clone()
	}

	/// Names passed to `set`, in call order, including rejected ones.
	pub fn set_attempts(&self) -> Vec<String> {
		self.set_attempts.borrow().clone()
	}

	pub fn set_calls(&self) -> usize {
		self.set_attempts.borrow().len()
	}

	pub fn get_calls(&self) -> usize {
		self.get_calls.get()
	}

	pub fn clear_calls(&self) -> usize {
		self.clear_calls.get()
	}

	fn check_online(&self) -> Result<()> {
		if self.offline.get() {
			return Err(Error::CookieJar("cookie jar unavailable".into()));
		}
		Ok(())
	}
}

#[async_trait(?Send)]
impl CookieJar for MemoryCookieJar {
	async fn get(&self, query: &CookieQuery) -> Result<Option<StoredCookie>> {
		self.get_calls.set(self.get_calls.get() + 1);
		self.check_online()?;
		let host = host_of(&query.url);
		Ok(self
			.cookies
			.borrow()
			.iter()
			.find(|c| c.name == query.name && domain_matches(host, &c.domain))
			.cloned())
	}

	async fn get_all(&self, domain: &str) -> Result<Vec<StoredCookie>> {
		self.check_online()?;
		Ok(self
			.cookies
			.borrow()
			.iter()
			.filter(|c| domain_matches(&c.domain, domain))
			.cloned()
			.collect())
	}

	async fn set(&self, details: SetCookieDetails) -> Result<()> {
		let call = {
			let mut attempts = self.set_attempts.borrow_mut();
			attempts.push(details.name.clone());
			attempts.len()
		};
		self.check_online()?;

		if self.rejected_calls.borrow().contains(&call) || self.rejected_names.borrow().contains(&details.name) {
			return Err(Error::rejected(&details.name, "rejected by cookie policy"));
		}

		self.put(details.into_cookie());
		Ok(())
	}

	async fn clear(&self, domain: &str) -> Result<()> {
		self.clear_calls.set(self.clear_calls.get() + 1);
		self.check_online()?;
		if self.failing_clear.get() {
			return Err(Error::CookieJar("clear failed".into()));
		}
		self.cookies.borrow_mut().retain(|c| !domain_matches(&c.domain, domain));
		Ok(())
	}
}

/// A [`Badge`] that remembers every text it was given.
#[derive(Debug, Default)]
pub struct RecordingBadge {
	texts: RefCell<Vec<String>>,
}

impl RecordingBadge {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn texts(&self) -> Vec<String> {
		self.texts.borrow().clone()
	}

	pub fn last(&self) -> Option<String> {
		self.texts.borrow().last().cloned()
	}
}

impl Badge for RecordingBadge {
	fn set_badge_text(&self, text: &str) {
		self.texts.borrow_mut().push(text.to_string());
	}
}
