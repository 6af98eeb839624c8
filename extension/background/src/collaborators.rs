//! Core collaborator traits implemented over the `chrome.*` APIs.

use acctswitch::{Badge, CookieJar, CookieQuery, Error, Result, SetCookieDetails, Store, StoredCookie};
use async_trait::async_trait;
use js_sys::{Object, Reflect};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::chrome;
use crate::{push_log, stringify_js_error};

fn to_js<T: Serialize + ?Sized>(value: &T) -> std::result::Result<JsValue, serde_wasm_bindgen::Error> {
	value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> std::result::Result<T, serde_wasm_bindgen::Error> {
	serde_wasm_bindgen::from_value(value)
}

/// `chrome.storage.local`.
pub struct ChromeStore;

#[async_trait(?Send)]
impl Store for ChromeStore {
	async fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
		let store_err = |e: JsValue| Error::store(key, stringify_js_error(e));

		let items = JsFuture::from(chrome::storage_local_get(&JsValue::from_str(key)))
			.await
			.map_err(store_err)?;
		let value = Reflect::get(&items, &JsValue::from_str(key)).map_err(store_err)?;
		if value.is_undefined() || value.is_null() {
			return Ok(None);
		}
		from_js(value).map(Some).map_err(|e| Error::store(key, e.to_string()))
	}

	async fn set(&self, key: &str, value: serde_json::Value) -> Result<()> {
		let mut items = serde_json::Map::new();
		items.insert(key.to_string(), value);
		let items = to_js(&items).map_err(|e| Error::store(key, e.to_string()))?;
		JsFuture::from(chrome::storage_local_set(&items))
			.await
			.map_err(|e| Error::store(key, stringify_js_error(e)))?;
		Ok(())
	}
}

/// `chrome.cookies`.
pub struct ChromeCookieJar;

#[async_trait(?Send)]
impl CookieJar for ChromeCookieJar {
	async fn get(&self, query: &CookieQuery) -> Result<Option<StoredCookie>> {
		let details = to_js(query).map_err(|e| Error::CookieJar(e.to_string()))?;
		let cookie = JsFuture::from(chrome::cookies_get(&details))
			.await
			.map_err(|e| Error::CookieJar(stringify_js_error(e)))?;
		if cookie.is_null() || cookie.is_undefined() {
			return Ok(None);
		}
		from_js(cookie).map(Some).map_err(|e| Error::CookieJar(e.to_string()))
	}

	async fn get_all(&self, domain: &str) -> Result<Vec<StoredCookie>> {
		let details = to_js(&json!({ "domain": domain })).map_err(|e| Error::CookieJar(e.to_string()))?;
		let cookies = JsFuture::from(chrome::cookies_get_all(&details))
			.await
			.map_err(|e| Error::CookieJar(stringify_js_error(e)))?;
		from_js(cookies).map_err(|e| Error::CookieJar(e.to_string()))
	}

	async fn set(&self, details: SetCookieDetails) -> Result<()> {
		let name = details.name.clone();
		let js_details = to_js(&details).map_err(|e| Error::rejected(&name, e.to_string()))?;
		let cookie = JsFuture::from(chrome::cookies_set(&js_details))
			.await
			.map_err(|e| Error::rejected(&name, stringify_js_error(e)))?;
		// Chrome resolves with null instead of rejecting for some refusals.
		if cookie.is_null() || cookie.is_undefined() {
			return Err(Error::rejected(name, "browser refused cookie"));
		}
		Ok(())
	}

	async fn clear(&self, domain: &str) -> Result<()> {
		let cookies = self.get_all(domain).await?;
		for cookie in &cookies {
			let details = to_js(&RemoveDetails {
				url: removal_url(cookie),
				name: &cookie.name,
				store_id: cookie.store_id.as_deref(),
			})
			.map_err(|e| Error::CookieJar(e.to_string()))?;
			JsFuture::from(chrome::cookies_remove(&details))
				.await
				.map_err(|e| Error::CookieJar(stringify_js_error(e)))?;
		}
		push_log(&format!("cleared {} cookies for {domain}", cookies.len()));
		Ok(())
	}
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoveDetails<'a> {
	url: String,
	name: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	store_id: Option<&'a str>,
}

/// URL `chrome.cookies.remove` needs to address `cookie`.
pub fn removal_url(cookie: &StoredCookie) -> String {
	let scheme = if cookie.secure { "https" } else { "http" };
	format!("{scheme}://{}{}", cookie.domain.trim_start_matches('.'), cookie.path)
}

/// `chrome.action` badge.
pub struct ActionBadge;

impl Badge for ActionBadge {
	fn set_badge_text(&self, text: &str) {
		let details = Object::new();
		let _ = Reflect::set(&details, &JsValue::from_str("text"), &JsValue::from_str(text));
		chrome::action_set_badge_text(&details);
	}
}
