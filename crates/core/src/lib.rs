//! Keep several signed-in sessions for one web service in a single browser
//! profile and switch between them.
//!
//! # Architecture
//!
//! * [`AccountRegistry`] - stored cookie snapshots and avatars per account,
//!   presented as [`Account`] views combined with live browser state
//! * [`SessionSwitcher`] - replaces the live cookie jar with a snapshot
//!
//! Both are stateless: durable state lives behind the [`Store`] trait and
//! live state behind [`CookieJar`]. Collaborators are injected, so the same
//! core runs inside the browser extension, the CLI, and tests (see
//! [`memory`]).
//!
//! Everything is single-threaded and cooperative; futures are not `Send`.

pub mod account;
pub mod error;
pub mod jar;
pub mod memory;
pub mod registry;
pub mod store;
pub mod switcher;

pub use account::{Account, derive_active, derive_expiry};
pub use acctswitch_protocol::{self as protocol, CookieQuery, SameSite, Service, SetCookieDetails, StoredCookie};
pub use error::{Error, Result};
pub use jar::{Badge, CookieJar};
pub use registry::AccountRegistry;
pub use store::{Store, StoreExt};
pub use switcher::{EMPTY_BADGE, FailedCookie, RestoreReport, SessionSwitcher, SwitchOutcome, badge_label};
