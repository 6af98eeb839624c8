//! Badge text written to a file next to the store.

use std::path::PathBuf;

use acctswitch::Badge;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct FileBadge {
	path: PathBuf,
}

impl FileBadge {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn read(&self) -> Option<String> {
		std::fs::read_to_string(&self.path).ok().map(|text| text.trim_end().to_string())
	}
}

impl Badge for FileBadge {
	fn set_badge_text(&self, text: &str) {
		let written = self
			.path
			.parent()
			.map_or(Ok(()), std::fs::create_dir_all)
			.and_then(|()| std::fs::write(&self.path, format!("{text}\n")));

		match written {
			Ok(()) => debug!(text, path = %self.path.display(), "badge updated"),
			Err(e) => warn!(path = %self.path.display(), error = %e, "failed to write badge"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	#[test]
	fn writes_and_reads_back() {
		let tmp = TempDir::new().unwrap();
		let badge = FileBadge::new(tmp.path().join("badge.txt"));

		assert_eq!(badge.read(), None);
		badge.set_badge_text("oc");
		assert_eq!(badge.read().as_deref(), Some("oc"));
	}

	#[test]
	fn unwritable_path_is_swallowed() {
		let tmp = TempDir::new().unwrap();
		let blocker = tmp.path().join("file");
		std::fs::write(&blocker, "").unwrap();

		let badge = FileBadge::new(blocker.join("badge.txt"));
		badge.set_badge_text("oc");
		assert_eq!(badge.read(), None);
	}
}
