//! Bindings to the `chrome.*` extension APIs used by the background worker.

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
	#[wasm_bindgen(js_namespace = ["chrome", "storage", "local"], js_name = get)]
	pub fn storage_local_get(keys: &JsValue) -> js_sys::Promise;

	#[wasm_bindgen(js_namespace = ["chrome", "storage", "local"], js_name = set)]
	pub fn storage_local_set(items: &JsValue) -> js_sys::Promise;

	#[wasm_bindgen(js_namespace = ["chrome", "cookies"], js_name = get)]
	pub fn cookies_get(details: &JsValue) -> js_sys::Promise;

	#[wasm_bindgen(js_namespace = ["chrome", "cookies"], js_name = getAll)]
	pub fn cookies_get_all(details: &JsValue) -> js_sys::Promise;

	#[wasm_bindgen(js_namespace = ["chrome", "cookies"], js_name = set)]
	pub fn cookies_set(details: &JsValue) -> js_sys::Promise;

	#[wasm_bindgen(js_namespace = ["chrome", "cookies"], js_name = remove)]
	pub fn cookies_remove(details: &JsValue) -> js_sys::Promise;

	#[wasm_bindgen(js_namespace = ["chrome", "action"], js_name = setBadgeText)]
	pub fn action_set_badge_text(details: &JsValue);
}
