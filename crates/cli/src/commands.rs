//! Command implementations.
//!
//! Each command runs against an [`AccountRegistry`] and [`SessionSwitcher`]
//! wired to the on-disk store, cookie jar and badge, and produces JSON data
//! plus a text rendering.

use std::path::Path;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use acctswitch::{Account, AccountRegistry, SessionSwitcher, StoredCookie, SwitchOutcome};
use colored::Colorize;
use serde_json::json;
use tracing::{debug, info};

use crate::badge::FileBadge;
use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use crate::file_jar::FileCookieJar;
use crate::file_store::JsonFileStore;
use crate::output::{self, CommandResult, OutputFormat};
use crate::paths::StatePaths;

/// What a command produced.
pub struct CommandOutput {
	pub data: serde_json::Value,
	pub text: String,
}

/// Wired collaborators for one invocation.
pub struct Env {
	pub paths: StatePaths,
	pub switcher: SessionSwitcher,
}

impl Env {
	pub fn new(paths: StatePaths) -> Self {
		let store = Rc::new(JsonFileStore::new(paths.store.clone()));
		let jar = Rc::new(FileCookieJar::new(paths.jar.clone()));
		let badge = Rc::new(FileBadge::new(paths.badge.clone()));
		let registry = AccountRegistry::new(store, jar);
		let switcher = SessionSwitcher::new(registry, badge);
		Self { paths, switcher }
	}

	pub fn registry(&self) -> &AccountRegistry {
		self.switcher.registry()
	}
}

pub async fn dispatch(cli: Cli) -> Result<()> {
	let format = cli.format;
	let name = cli.command.name();
	let env = Env::new(StatePaths::resolve(cli.state_dir, cli.jar));
	debug!(command = name, state_dir = %env.paths.dir.display(), jar = %env.paths.jar.display(), "dispatch");

	let result = execute(&env, cli.command).await;
	match (result, format) {
		(Ok(out), OutputFormat::Json) => {
			output::print_json(&CommandResult::success(name, out.data));
			Ok(())
		}
		(Ok(out), OutputFormat::Text) => {
			if !out.text.is_empty() {
				println!("{}", out.text);
			}
			Ok(())
		}
		(Err(err), OutputFormat::Json) => {
			let cmd_error = err.to_command_error();
			output::print_error_stderr(&cmd_error);
			output::print_json(&CommandResult::<()>::failure(name, cmd_error));
			Err(err)
		}
		(Err(err), OutputFormat::Text) => {
			output::print_error_stderr(&err.to_command_error());
			Err(err)
		}
	}
}

pub async fn execute(env: &Env, command: Commands) -> Result<CommandOutput> {
	match command {
		Commands::List => list(env).await,
		Commands::Show { name } => show(env, &name).await,
		Commands::Switch { name } => switch(env, &name).await,
		Commands::Capture => capture(env).await,
		Commands::Remove { name } => remove(env, &name).await,
		Commands::Avatar { name, url } => avatar(env, &name, &url).await,
		Commands::Import { name, file } => import(env, &name, &file).await,
	}
}

async fn list(env: &Env) -> Result<CommandOutput> {
	let accounts = env.registry().list_all().await?;
	let now = now_ms();

	let text = if accounts.is_empty() {
		"no accounts stored".dimmed().to_string()
	} else {
		accounts
			.iter()
			.map(|account| account_line(account, now))
			.collect::<Vec<_>>()
			.join("\n")
	};

	Ok(CommandOutput {
		data: serde_json::to_value(&accounts)?,
		text,
	})
}

async fn show(env: &Env, name: &str) -> Result<CommandOutput> {
	let account = env
		.registry()
		.find(name)
		.await?
		.ok_or_else(|| CliError::AccountNotFound(name.to_string()))?;

	let mut lines = vec![account_line(&account, now_ms())];
	if let Some(url) = &account.avatar_url {
		lines.push(format!("  avatar: {url}"));
	}
	for cookie in &account.cookies {
		lines.push(format!("  {} ({}{})", cookie.name, cookie.domain, cookie.path));
	}

	Ok(CommandOutput {
		data: serde_json::to_value(&account)?,
		text: lines.join("\n"),
	})
}

async fn switch(env: &Env, name: &str) -> Result<CommandOutput> {
	let outcome = env.switcher.switch_to(name).await?;

	let text = match &outcome {
		SwitchOutcome::AlreadyActive => format!("{name} is already active"),
		SwitchOutcome::Switched(report) => {
			let mut lines = vec![format!(
				"switched to {} ({}/{} cookies restored, badge {})",
				name.bold(),
				report.restored,
				report.attempted,
				report.badge
			)];
			for failed in &report.failed {
				lines.push(format!("  {} {}: {}", "skipped".yellow(), failed.name, failed.reason));
			}
			lines.join("\n")
		}
	};

	Ok(CommandOutput {
		data: serde_json::to_value(&outcome)?,
		text,
	})
}

async fn capture(env: &Env) -> Result<CommandOutput> {
	let name = env
		.registry()
		.capture_current()
		.await?
		.ok_or_else(|| CliError::NotSignedIn(env.paths.jar.clone()))?;

	let cookies = env.registry().find(&name).await?.map_or(0, |a| a.cookies.len());
	Ok(CommandOutput {
		data: json!({ "account": name, "cookies": cookies }),
		text: format!("captured {cookies} cookies for {name}"),
	})
}

async fn remove(env: &Env, name: &str) -> Result<CommandOutput> {
	let existed = env.registry().find(name).await?.is_some();
	env.registry().remove(name).await?;

	Ok(CommandOutput {
		data: json!({ "account": name, "removed": existed }),
		text: if existed {
			format!("removed {name}")
		} else {
			format!("{name} was not stored")
		},
	})
}

async fn avatar(env: &Env, name: &str, url: &str) -> Result<CommandOutput> {
	env.registry().save_avatar(name, url).await?;

	Ok(CommandOutput {
		data: json!({ "account": name, "avatarUrl": url }),
		text: format!("avatar saved for {name}"),
	})
}

async fn import(env: &Env, name: &str, file: &Path) -> Result<CommandOutput> {
	let content = tokio::fs::read_to_string(file).await.map_err(|source| CliError::ReadInput {
		path: file.to_path_buf(),
		source,
	})?;
	let cookies: Vec<StoredCookie> = serde_json::from_str(&content)?;
	let domain = env.registry().service().domain;
	let cookies: Vec<StoredCookie> = cookies
		.into_iter()
		.filter(|c| acctswitch::protocol::domain_matches(&c.domain, domain))
		.collect();

	let count = cookies.len();
	env.registry().upsert(name, cookies).await?;
	info!(account = name, cookies = count, "imported snapshot");

	Ok(CommandOutput {
		data: json!({ "account": name, "cookies": count }),
		text: format!("imported {count} cookies for {name}"),
	})
}

fn account_line(account: &Account, now: i64) -> String {
	let marker = if account.active { "*".green().bold() } else { " ".normal() };
	let status = match account.expires_at {
		_ if account.cookies.is_empty() => "no cookies".dimmed().to_string(),
		Some(_) if account.is_expired(now) => "expired".red().to_string(),
		Some(expires_at) => format!("expires in {}", humanize_ms(expires_at - now)),
		None => "session".dimmed().to_string(),
	};
	format!("{marker} {} [{status}]", account.name)
}

fn humanize_ms(ms: i64) -> String {
	let minutes = ms / 60_000;
	match minutes {
		m if m < 60 => format!("{m}m"),
		m if m < 60 * 24 => format!("{}h", m / 60),
		m => format!("{}d", m / (60 * 24)),
	}
}

fn now_ms() -> i64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_millis() as i64)
		.unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::output::ErrorCode;
	use tempfile::TempDir;

	fn env(tmp: &TempDir) -> Env {
		Env::new(StatePaths::in_dir(tmp.path(), None))
	}

	#[test]
	fn humanize_picks_largest_unit() {
		assert_eq!(humanize_ms(5 * 60_000), "5m");
		assert_eq!(humanize_ms(3 * 3_600_000), "3h");
		assert_eq!(humanize_ms(10 * 86_400_000), "10d");
	}

	#[tokio::test]
	async fn show_unknown_account_errors() {
		let tmp = TempDir::new().unwrap();
		let err = execute(&env(&tmp), Commands::Show { name: "ghost".into() })
			.await
			.err()
			.unwrap();

		assert!(matches!(err, CliError::AccountNotFound(ref n) if n == "ghost"));
	}

	#[tokio::test]
	async fn import_of_missing_file_is_io_error() {
		let tmp = TempDir::new().unwrap();
		let file = tmp.path().join("missing.json");
		let err = execute(
			&env(&tmp),
			Commands::Import {
				name: "octocat".into(),
				file: file.clone(),
			},
		)
		.await
		.err()
		.unwrap();

		assert!(matches!(err, CliError::ReadInput { ref path, .. } if *path == file));
		let cmd = err.to_command_error();
		assert_eq!(cmd.code, ErrorCode::IoError);
		assert!(cmd.message.starts_with("failed to read"));
	}

	#[tokio::test]
	async fn capture_without_login_errors() {
		let tmp = TempDir::new().unwrap();
		let err = execute(&env(&tmp), Commands::Capture).await.err().unwrap();

		assert!(matches!(err, CliError::NotSignedIn(_)));
	}

	#[tokio::test]
	async fn import_keeps_only_service_cookies() {
		let tmp = TempDir::new().unwrap();
		let file = tmp.path().join("export.json");
		let export = vec![
			StoredCookie::new("user_session", "abc", "github.com"),
			StoredCookie::new("ads", "1", ".doubleclick.net").domain_wide(),
		];
		std::fs::write(&file, serde_json::to_string(&export).unwrap()).unwrap();

		let env = env(&tmp);
		let out = execute(
			&env,
			Commands::Import {
				name: "octocat".into(),
				file,
			},
		)
		.await
		.unwrap();

		assert_eq!(out.data["cookies"], 1);
		let account = env.registry().find("octocat").await.unwrap().unwrap();
		assert_eq!(account.cookies, vec![export[0].clone()]);
	}

	#[tokio::test]
	async fn switch_then_list_marks_active() {
		let tmp = TempDir::new().unwrap();
		let env = env(&tmp);
		env.registry()
			.upsert(
				"octocat",
				vec![StoredCookie::new("dotcom_user", "octocat", ".github.com").domain_wide()],
			)
			.await
			.unwrap();

		let out = execute(&env, Commands::Switch { name: "octocat".into() }).await.unwrap();
		assert_eq!(out.data["outcome"], "switched");
		assert_eq!(out.data["badge"], "oc");

		let out = execute(&env, Commands::List).await.unwrap();
		assert_eq!(out.data[0]["active"], true);

		let out = execute(&env, Commands::Switch { name: "octocat".into() }).await.unwrap();
		assert_eq!(out.data["outcome"], "already_active");
	}
}
