//! Stored accounts: cookie snapshots and avatars keyed by account name.

use std::rc::Rc;

use acctswitch_protocol::{ACCOUNTS_KEY, AVATARS_KEY, AccountMap, AvatarMap, CookieQuery, Service, StoredCookie};
use tracing::{debug, info};

use crate::account::{Account, derive_active, derive_expiry};
use crate::error::Result;
use crate::jar::CookieJar;
use crate::store::{Store, StoreExt};

/// Read and write access to stored accounts.
///
/// Holds no state of its own; every call goes to the store, and reads also
/// consult the live cookie jar once to decide which account is active.
#[derive(Clone)]
pub struct AccountRegistry {
	store: Rc<dyn Store>,
	jar: Rc<dyn CookieJar>,
	service: Service,
}

impl AccountRegistry {
	pub fn new(store: Rc<dyn Store>, jar: Rc<dyn CookieJar>) -> Self {
		Self::with_service(store, jar, Service::default())
	}

	pub fn with_service(store: Rc<dyn Store>, jar: Rc<dyn CookieJar>, service: Service) -> Self {
		Self { store, jar, service }
	}

	pub fn service(&self) -> &Service {
		&self.service
	}

	pub(crate) fn jar(&self) -> &Rc<dyn CookieJar> {
		&self.jar
	}

	/// Value of the browser's current-user cookie, if any.
	pub async fn current_user(&self) -> Result<Option<String>> {
		let query = CookieQuery::new(self.service.url, self.service.current_user_cookie);
		Ok(self.jar.get(&query).await?.map(|cookie| cookie.value))
	}

	/// All stored accounts, in the order they were first added.
	pub async fn list_all(&self) -> Result<Vec<Account>> {
		let Some(accounts): Option<AccountMap> = self.store.get_json(ACCOUNTS_KEY).await? else {
			return Ok(Vec::new());
		};

		let current = self.current_user().await?;
		let avatars: AvatarMap = self.store.get_json(AVATARS_KEY).await?.unwrap_or_default();
		debug!(count = accounts.len(), current = ?current, "loaded accounts");

		Ok(accounts
			.into_iter()
			.map(|(name, cookies)| Account {
				active: derive_active(current.as_deref(), &name),
				avatar_url: avatars.get(&name).cloned(),
				expires_at: derive_expiry(&cookies, self.service.session_cookie),
				name,
				cookies,
			})
			.collect())
	}

	pub async fn list_names(&self) -> Result<Vec<String>> {
		Ok(self.list_all().await?.into_iter().map(|account| account.name).collect())
	}

	/// Looks up an account by exact (case-sensitive) name.
	pub async fn find(&self, name: &str) -> Result<Option<Account>> {
		Ok(self.list_all().await?.into_iter().find(|account| account.name == name))
	}

	/// Stores `cookies` as the complete snapshot for `name`, replacing any
	/// previous one. An empty snapshot is kept as-is.
	pub async fn upsert(&self, name: &str, cookies: Vec<StoredCookie>) -> Result<()> {
		let count = cookies.len();
		self.store
			.update(ACCOUNTS_KEY, |accounts: Option<AccountMap>| {
				let mut accounts = accounts.unwrap_or_default();
				accounts.insert(name.to_string(), cookies);
				Some(accounts)
			})
			.await?;
		debug!(account = name, cookies = count, "account snapshot saved");
		Ok(())
	}

	/// Deletes the snapshot for `name`; unknown names leave the store
	/// untouched. Avatars are left alone.
	pub async fn remove(&self, name: &str) -> Result<()> {
		self.store
			.update(ACCOUNTS_KEY, |accounts: Option<AccountMap>| {
				let mut accounts = accounts?;
				accounts.shift_remove(name)?;
				Some(accounts)
			})
			.await?;
		debug!(account = name, "account removed");
		Ok(())
	}

	pub async fn save_avatar(&self, name: &str, url: &str) -> Result<()> {
		self.store
			.update(AVATARS_KEY, |avatars: Option<AvatarMap>| {
				let mut avatars = avatars.unwrap_or_default();
				avatars.insert(name.to_string(), url.to_string());
				Some(avatars)
			})
			.await
	}

	/// Looks up the avatar URL stored for `name`, independent of whether the
	/// account itself still exists.
	pub async fn avatar(&self, name: &str) -> Result<Option<String>> {
		let avatars: Option<AvatarMap> = self.store.get_json(AVATARS_KEY).await?;
		Ok(avatars.and_then(|mut avatars| avatars.shift_remove(name)))
	}

	/// Saves the browser's current session under the signed-in account name.
	///
	/// Returns the captured name, or [`None`] when nobody is signed in.
	pub async fn capture_current(&self) -> Result<Option<String>> {
		let Some(name) = self.current_user().await? else {
			debug!("no signed-in account to capture");
			return Ok(None);
		};

		let cookies = self.jar.get_all(self.service.domain).await?;
		info!(account = %name, cookies = cookies.len(), "captured session");
		self.upsert(&name, cookies).await?;
		Ok(Some(name))
	}
}
