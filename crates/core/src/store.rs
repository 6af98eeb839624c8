//! Persistent key-value store contract.
//!
//! Implementations only move JSON documents; typed access and the
//! read-modify-write helper live in [`StoreExt`].

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::Result;

/// Asynchronous key-value storage (`chrome.storage.local`, a JSON file, ...).
#[async_trait(?Send)]
pub trait Store {
	/// Returns the value under `key`, or [`None`] when the key was never set.
	async fn get(&self, key: &str) -> Result<Option<serde_json::Value>>;

	/// Replaces the value under `key`.
	async fn set(&self, key: &str, value: serde_json::Value) -> Result<()>;
}

/// Typed helpers over any [`Store`].
#[async_trait(?Send)]
pub trait StoreExt: Store {
	/// Reads and deserializes `key`.
	async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
		match self.get(key).await? {
			Some(value) => Ok(Some(serde_json::from_value(value)?)),
			None => Ok(None),
		}
	}

	/// Reads `key`, applies `mutate`, and writes the result back.
	///
	/// `mutate` receives [`None`] when the key is absent. Returning [`None`]
	/// skips the write. The read and the write are separate store calls with
	/// nothing held in between: concurrent updates of the same key are
	/// last-write-wins.
	async fn update<T, F>(&self, key: &str, mutate: F) -> Result<()>
	where
		T: Serialize + DeserializeOwned,
		F: FnOnce(Option<T>) -> Option<T>,
	{
		let current = self.get_json::<T>(key).await?;
		let Some(next) = mutate(current) else {
			debug!(key, "update left store unchanged");
			return Ok(());
		};
		self.set(key, serde_json::to_value(next)?).await?;
		debug!(key, "store updated");
		Ok(())
	}
}

impl<S: Store + ?Sized> StoreExt for S {}
