//! Command line front end for acctswitch.
//!
//! Drives the account registry and session switcher against files: a JSON
//! store for snapshots and avatars, and a JSON cookie export standing in for
//! the browser's live cookie jar.

pub mod badge;
pub mod cli;
pub mod commands;
pub mod error;
pub mod file_jar;
pub mod file_store;
pub mod logging;
pub mod output;
pub mod paths;
