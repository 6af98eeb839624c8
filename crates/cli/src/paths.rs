//! File locations for CLI state.

use std::path::{Path, PathBuf};

/// Environment variable overriding the state directory.
pub const STATE_DIR_ENV: &str = "ACCTSWITCH_STATE_DIR";

/// Environment variable overriding the cookie jar file.
pub const JAR_ENV: &str = "ACCTSWITCH_JAR";

/// Where the CLI keeps its store, its cookie jar and the badge text.
///
/// Defaults to `<config dir>/acctswitch/` (`$XDG_CONFIG_HOME` or
/// `~/.config` on Linux).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
	pub dir: PathBuf,
	/// Persistent store document (accounts and avatars).
	pub store: PathBuf,
	/// Live cookie jar: a JSON array of browser cookies.
	pub jar: PathBuf,
	/// Last badge text written by a switch.
	pub badge: PathBuf,
}

impl StatePaths {
	pub fn resolve(state_dir: Option<PathBuf>, jar: Option<PathBuf>) -> Self {
		let dir = state_dir.unwrap_or_else(default_state_dir);
		Self::in_dir(&dir, jar)
	}

	pub fn in_dir(dir: &Path, jar: Option<PathBuf>) -> Self {
		Self {
			store: dir.join("store.json"),
			jar: jar.unwrap_or_else(|| dir.join("cookies.json")),
			badge: dir.join("badge.txt"),
			dir: dir.to_path_buf(),
		}
	}
}

fn default_state_dir() -> PathBuf {
	dirs::config_dir()
		.or_else(|| dirs::home_dir().map(|home| home.join(".config")))
		.unwrap_or_else(|| PathBuf::from("."))
		.join("acctswitch")
}
