//! Background worker for the account switcher extension.
//!
//! Wires the acctswitch core to `chrome.storage.local`, `chrome.cookies` and
//! `chrome.action`, and exports the account operations to the popup's JS.
//! Every export builds fresh collaborators; all state lives in the browser.

mod chrome;
mod collaborators;

use std::cell::RefCell;
use std::rc::Rc;

use acctswitch::{AccountRegistry, SessionSwitcher, StoredCookie, SwitchOutcome};
use js_sys::{Array, Object, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::collaborators::{ActionBadge, ChromeCookieJar, ChromeStore};

const LOG_LIMIT: usize = 40;
const LOG_KEY: &str = "acctswitch_log";

thread_local! {
	static LOG: RefCell<Vec<String>> = RefCell::new(Vec::new());
}

#[wasm_bindgen(start)]
pub fn start() {
	console_error_panic_hook::set_once();
	push_log("background started");
}

fn registry() -> AccountRegistry {
	AccountRegistry::new(Rc::new(ChromeStore), Rc::new(ChromeCookieJar))
}

fn switcher() -> SessionSwitcher {
	SessionSwitcher::new(registry(), Rc::new(ActionBadge))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
	value
		.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
		.map_err(JsValue::from)
}

fn js_err(err: acctswitch::Error) -> JsValue {
	push_log(&format!("error: {err}"));
	JsValue::from_str(&err.to_string())
}

/// All stored accounts with `active`, `avatarUrl` and `expiresAt` filled in.
#[wasm_bindgen(js_name = listAccounts)]
pub async fn list_accounts() -> Result<JsValue, JsValue> {
	to_js(&registry().list_all().await.map_err(js_err)?)
}

#[wasm_bindgen(js_name = listAccountNames)]
pub async fn list_account_names() -> Result<JsValue, JsValue> {
	to_js(&registry().list_names().await.map_err(js_err)?)
}

/// The named account, or `undefined`.
#[wasm_bindgen(js_name = findAccount)]
pub async fn find_account(name: String) -> Result<JsValue, JsValue> {
	match registry().find(&name).await.map_err(js_err)? {
		Some(account) => to_js(&account),
		None => Ok(JsValue::UNDEFINED),
	}
}

#[wasm_bindgen(js_name = upsertAccount)]
pub async fn upsert_account(name: String, cookies: JsValue) -> Result<(), JsValue> {
	let cookies: Vec<StoredCookie> = serde_wasm_bindgen::from_value(cookies)?;
	registry().upsert(&name, cookies).await.map_err(js_err)
}

#[wasm_bindgen(js_name = removeAccount)]
pub async fn remove_account(name: String) -> Result<(), JsValue> {
	registry().remove(&name).await.map_err(js_err)
}

#[wasm_bindgen(js_name = saveAvatar)]
pub async fn save_avatar(name: String, url: String) -> Result<(), JsValue> {
	registry().save_avatar(&name, &url).await.map_err(js_err)
}

/// Saves the browser's current session; resolves to the account name or
/// `undefined` when nobody is signed in.
#[wasm_bindgen(js_name = captureCurrent)]
pub async fn capture_current() -> Result<JsValue, JsValue> {
	let captured = registry().capture_current().await.map_err(js_err)?;
	if let Some(name) = &captured {
		push_log(&format!("captured {name}"));
	}
	Ok(captured.map(JsValue::from).unwrap_or(JsValue::UNDEFINED))
}

/// Activates `name`. Resolves to the switch outcome; rejected cookies are
/// listed in `failed` rather than failing the call.
#[wasm_bindgen(js_name = switchTo)]
pub async fn switch_to(name: String) -> Result<JsValue, JsValue> {
	let outcome = switcher().switch_to(&name).await.map_err(js_err)?;
	match &outcome {
		SwitchOutcome::AlreadyActive => {
			web_sys::console::info_1(&JsValue::from_str("switchTo: already active account, skipping cookie reset"));
		}
		SwitchOutcome::Switched(report) => {
			for failed in &report.failed {
				web_sys::console::warn_1(&JsValue::from_str(&format!(
					"Failed to restore cookie {}: {}",
					failed.name, failed.reason
				)));
			}
			push_log(&format!(
				"switched to {} ({}/{} cookies)",
				report.account, report.restored, report.attempted
			));
		}
	}
	to_js(&outcome)
}

pub(crate) fn stringify_js_error(err: JsValue) -> String {
	err.as_string()
		.or_else(|| {
			Reflect::get(&err, &JsValue::from_str("message"))
				.ok()?
				.as_string()
		})
		.or_else(|| js_sys::JSON::stringify(&err).ok()?.as_string())
		.unwrap_or_else(|| format!("{:?}", err))
}

pub(crate) fn push_log(line: &str) {
	LOG.with(|log| {
		let mut vec = log.borrow_mut();
		vec.push(line.to_string());
		if vec.len() > LOG_LIMIT {
			let excess = vec.len() - LOG_LIMIT;
			vec.drain(0..excess);
		}
		persist_log(&vec);
	});
}

fn persist_log(lines: &[String]) {
	let array = Array::new();
	for line in lines {
		array.push(&JsValue::from_str(line));
	}
	let obj = Object::new();
	let _ = Reflect::set(&obj, &JsValue::from_str(LOG_KEY), &array);
	let _ = chrome::storage_local_set(&obj);
}
