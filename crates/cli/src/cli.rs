use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use crate::paths::{JAR_ENV, STATE_DIR_ENV};

/// Switch between saved sessions of one web service.
#[derive(Parser, Debug)]
#[command(name = "acctswitch")]
#[command(about = "Keep several signed-in sessions and swap the active one")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format
	#[arg(short = 'f', long, global = true, value_enum, default_value = "text")]
	pub format: OutputFormat,

	/// Directory holding the account store and badge
	#[arg(long, global = true, value_name = "DIR", env = STATE_DIR_ENV)]
	pub state_dir: Option<PathBuf>,

	/// Cookie jar file to operate on (defaults to <state-dir>/cookies.json)
	#[arg(long, global = true, value_name = "FILE", env = JAR_ENV)]
	pub jar: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
	/// List stored accounts, marking the active one.
	List,
	/// Show one account's details.
	Show {
		#[arg(value_name = "NAME")]
		name: String,
	},
	/// Make an account the signed-in one by restoring its cookies.
	Switch {
		#[arg(value_name = "NAME")]
		name: String,
	},
	/// Save the jar's current session under the signed-in account.
	Capture,
	/// Forget an account's cookies (its avatar is kept).
	Remove {
		#[arg(value_name = "NAME")]
		name: String,
	},
	/// Remember an avatar URL for an account.
	Avatar {
		#[arg(value_name = "NAME")]
		name: String,
		#[arg(value_name = "URL")]
		url: String,
	},
	/// Store a cookie export file as an account's snapshot.
	Import {
		#[arg(value_name = "NAME")]
		name: String,
		#[arg(value_name = "FILE")]
		file: PathBuf,
	},
}

impl Commands {
	pub fn name(&self) -> &'static str {
		match self {
			Commands::List => "list",
			Commands::Show { .. } => "show",
			Commands::Switch { .. } => "switch",
			Commands::Capture => "capture",
			Commands::Remove { .. } => "remove",
			Commands::Avatar { .. } => "avatar",
			Commands::Import { .. } => "import",
		}
	}
}
