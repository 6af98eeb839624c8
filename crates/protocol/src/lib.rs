//! Data types shared by the acctswitch core, CLI and browser extension.
//!
//! Types in this crate are pure data: the shapes cookies take in the
//! persistent store and in calls to the browser cookie API. Behaviour is
//! limited to conversions between those shapes.

pub mod cookie;
pub mod service;

pub use cookie::*;
pub use service::*;
