//! [`Store`] backed by a single JSON document on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use acctswitch::{Error, Result, Store};
use async_trait::async_trait;
use tracing::debug;

type Document = BTreeMap<String, serde_json::Value>;

/// Every key lives in one JSON object; each call re-reads the file.
///
/// Like the browser's storage area, nothing locks the file between a read
/// and the following write.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
	path: PathBuf,
}

impl JsonFileStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	async fn load(&self, key: &str) -> Result<Document> {
		match tokio::fs::read_to_string(&self.path).await {
			Ok(content) if content.trim().is_empty() => Ok(Document::new()),
			Ok(content) => serde_json::from_str(&content).map_err(|e| Error::store(key, format!("{}: {e}", self.path.display()))),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Document::new()),
			Err(e) => Err(Error::store(key, format!("{}: {e}", self.path.display()))),
		}
	}

	async fn save(&self, key: &str, document: &Document) -> Result<()> {
		let io_err = |e: std::io::Error| Error::store(key, format!("{}: {e}", self.path.display()));

		if let Some(parent) = self.path.parent() {
			tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
		}
		tokio::fs::write(&self.path, serde_json::to_string_pretty(document)?)
			.await
			.map_err(io_err)?;
		// Snapshots are live credentials.
		#[cfg(unix)]
		{
			use std::os::unix::fs::PermissionsExt;
			tokio::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
				.await
				.map_err(io_err)?;
		}
		Ok(())
	}
}

#[async_trait(?Send)]
impl Store for JsonFileStore {
	async fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
		let mut document = self.load(key).await?;
		debug!(key, path = %self.path.display(), "store read");
		Ok(document.remove(key))
	}

	async fn set(&self, key: &str, value: serde_json::Value) -> Result<()> {
		let mut document = self.load(key).await?;
		document.insert(key.to_string(), value);
		self.save(key, &document).await?;
		debug!(key, path = %self.path.display(), "store written");
		Ok(())
	}
}
