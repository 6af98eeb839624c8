//! Integration tests for account storage and the derived account view.

use std::rc::Rc;

use acctswitch::memory::{MemoryCookieJar, MemoryStore};
use acctswitch::protocol::{ACCOUNTS_KEY, AVATARS_KEY};
use acctswitch::{AccountRegistry, Error, SameSite, StoredCookie};

struct Fixture {
	store: Rc<MemoryStore>,
	jar: Rc<MemoryCookieJar>,
	registry: AccountRegistry,
}

fn fixture() -> Fixture {
	let store = Rc::new(MemoryStore::new());
	let jar = Rc::new(MemoryCookieJar::new());
	let registry = AccountRegistry::new(store.clone(), jar.clone());
	Fixture { store, jar, registry }
}

fn snapshot(user: &str) -> Vec<StoredCookie> {
	vec![
		StoredCookie::new("dotcom_user", user, ".github.com")
			.domain_wide()
			.expires(1_900_000_000.0)
			.secure(true),
		StoredCookie::new("user_session", format!("session-{user}"), "github.com")
			.expires(1_750_000_000.0)
			.secure(true)
			.http_only(true)
			.same_site(SameSite::Lax),
		StoredCookie::new("_gh_sess", "opaque", "github.com")
			.http_only(true)
			.same_site(SameSite::Strict),
	]
}

fn sign_in(jar: &MemoryCookieJar, user: &str) {
	jar.put(StoredCookie::new("dotcom_user", user, ".github.com").domain_wide());
}

#[tokio::test]
async fn empty_store_lists_nothing() {
	let f = fixture();

	assert!(f.registry.list_all().await.unwrap().is_empty());
	assert!(f.registry.list_names().await.unwrap().is_empty());
	assert!(f.registry.find("octocat").await.unwrap().is_none());
	assert_eq!(f.jar.get_calls(), 0);
}

#[tokio::test]
async fn upsert_then_find_returns_same_cookies() {
	let f = fixture();
	let cookies = snapshot("octocat");

	f.registry.upsert("octocat", cookies.clone()).await.unwrap();

	let account = f.registry.find("octocat").await.unwrap().expect("account stored");
	assert_eq!(account.name, "octocat");
	assert_eq!(account.cookies, cookies);
}

#[tokio::test]
async fn upsert_replaces_instead_of_merging() {
	let f = fixture();
	f.registry.upsert("octocat", snapshot("octocat")).await.unwrap();

	let replacement = vec![StoredCookie::new("user_session", "fresh", "github.com")];
	f.registry.upsert("octocat", replacement.clone()).await.unwrap();

	let account = f.registry.find("octocat").await.unwrap().unwrap();
	assert_eq!(account.cookies, replacement);
	assert_eq!(f.registry.list_names().await.unwrap(), vec!["octocat"]);
}

#[tokio::test]
async fn empty_snapshot_is_a_known_account() {
	let f = fixture();
	f.registry.upsert("hubot", Vec::new()).await.unwrap();

	let account = f.registry.find("hubot").await.unwrap().expect("empty account kept");
	assert!(account.cookies.is_empty());
	assert_eq!(account.expires_at, None);
}

#[tokio::test]
async fn names_are_case_sensitive() {
	let f = fixture();
	f.registry.upsert("octocat", snapshot("octocat")).await.unwrap();

	assert!(f.registry.find("Octocat").await.unwrap().is_none());
}

#[tokio::test]
async fn active_follows_live_cookie() {
	let f = fixture();
	for name in ["alice", "bob", "carol"] {
		f.registry.upsert(name, snapshot(name)).await.unwrap();
	}

	let active = |accounts: Vec<acctswitch::Account>| -> Vec<String> {
		accounts.into_iter().filter(|a| a.active).map(|a| a.name).collect()
	};

	assert!(active(f.registry.list_all().await.unwrap()).is_empty());

	sign_in(&f.jar, "bob");
	assert_eq!(active(f.registry.list_all().await.unwrap()), vec!["bob"]);

	sign_in(&f.jar, "mallory");
	assert!(active(f.registry.list_all().await.unwrap()).is_empty());
}

#[tokio::test]
async fn list_all_queries_live_cookie_once() {
	let f = fixture();
	for name in ["alice", "bob", "carol", "dave"] {
		f.registry.upsert(name, snapshot(name)).await.unwrap();
	}
	sign_in(&f.jar, "carol");

	let accounts = f.registry.list_all().await.unwrap();

	assert_eq!(accounts.len(), 4);
	assert_eq!(f.jar.get_calls(), 1);
}

#[tokio::test]
async fn list_names_follows_insertion_order_like_list_all() {
	let f = fixture();
	for name in ["zed", "alice", "Bob"] {
		f.registry.upsert(name, Vec::new()).await.unwrap();
	}

	let names = f.registry.list_names().await.unwrap();
	let from_accounts: Vec<_> = f.registry.list_all().await.unwrap().into_iter().map(|a| a.name).collect();

	assert_eq!(names, vec!["zed", "alice", "Bob"]);
	assert_eq!(names, from_accounts);
}

#[tokio::test]
async fn replacing_or_removing_keeps_remaining_order() {
	let f = fixture();
	for name in ["zed", "alice", "Bob", "carol"] {
		f.registry.upsert(name, Vec::new()).await.unwrap();
	}

	f.registry.upsert("zed", snapshot("zed")).await.unwrap();
	f.registry.remove("alice").await.unwrap();

	assert_eq!(f.registry.list_names().await.unwrap(), vec!["zed", "Bob", "carol"]);
}

#[tokio::test]
async fn expiry_comes_from_session_cookie() {
	let f = fixture();
	f.registry.upsert("octocat", snapshot("octocat")).await.unwrap();
	f.registry
		.upsert("guest", vec![StoredCookie::new("_gh_sess", "x", "github.com")])
		.await
		.unwrap();

	let octocat = f.registry.find("octocat").await.unwrap().unwrap();
	assert_eq!(octocat.expires_at, Some(1_750_000_000_000));

	let guest = f.registry.find("guest").await.unwrap().unwrap();
	assert_eq!(guest.expires_at, None);
}

#[tokio::test]
async fn avatars_attach_to_accounts() {
	let f = fixture();
	f.registry.upsert("octocat", snapshot("octocat")).await.unwrap();
	f.registry
		.save_avatar("octocat", "https://avatars.githubusercontent.com/u/583231")
		.await
		.unwrap();

	let account = f.registry.find("octocat").await.unwrap().unwrap();
	assert_eq!(account.avatar_url.as_deref(), Some("https://avatars.githubusercontent.com/u/583231"));
}

#[tokio::test]
async fn avatar_can_exist_without_account() {
	let f = fixture();
	f.registry.save_avatar("ghost", "https://example.com/ghost.png").await.unwrap();

	assert!(f.registry.list_all().await.unwrap().is_empty());
	assert_eq!(
		f.registry.avatar("ghost").await.unwrap().as_deref(),
		Some("https://example.com/ghost.png")
	);
}

#[tokio::test]
async fn remove_keeps_avatar() {
	let f = fixture();
	f.registry.upsert("octocat", snapshot("octocat")).await.unwrap();
	f.registry.save_avatar("octocat", "https://example.com/o.png").await.unwrap();
	let avatars_before = f.store.peek(AVATARS_KEY);

	f.registry.remove("octocat").await.unwrap();

	assert!(f.registry.find("octocat").await.unwrap().is_none());
	assert_eq!(f.store.peek(AVATARS_KEY), avatars_before);
	assert_eq!(
		f.registry.avatar("octocat").await.unwrap().as_deref(),
		Some("https://example.com/o.png")
	);
}

#[tokio::test]
async fn remove_unknown_is_noop() {
	let f = fixture();

	f.registry.remove("nobody").await.unwrap();
	assert!(f.store.peek(ACCOUNTS_KEY).is_none());

	f.registry.upsert("octocat", Vec::new()).await.unwrap();
	let before = f.store.peek(ACCOUNTS_KEY);
	f.registry.remove("nobody").await.unwrap();
	assert_eq!(f.store.peek(ACCOUNTS_KEY), before);
}

#[tokio::test]
async fn persisted_shape_uses_browser_cookie_fields() {
	let f = fixture();
	f.registry.upsert("octocat", snapshot("octocat")).await.unwrap();

	let raw = f.store.peek(ACCOUNTS_KEY).unwrap();
	let session = &raw["octocat"][1];
	assert_eq!(session["name"], "user_session");
	assert_eq!(session["hostOnly"], true);
	assert_eq!(session["sameSite"], "lax");
	assert_eq!(session["expirationDate"], 1_750_000_000.0);
}

#[tokio::test]
async fn capture_saves_live_session_under_current_user() {
	let f = fixture();
	for cookie in snapshot("octocat") {
		f.jar.put(cookie);
	}
	f.jar.put(StoredCookie::new("unrelated", "1", "example.com"));

	let captured = f.registry.capture_current().await.unwrap();

	assert_eq!(captured.as_deref(), Some("octocat"));
	let account = f.registry.find("octocat").await.unwrap().unwrap();
	assert_eq!(account.cookies.len(), 3);
	assert!(account.active);
	assert!(account.cookies.iter().all(|c| c.name != "unrelated"));
}

#[tokio::test]
async fn capture_keeps_browser_specific_attributes() {
	let f = fixture();
	sign_in(&f.jar, "octocat");
	let mut partitioned = StoredCookie::new("__Host-chips", "c", "github.com").secure(true);
	partitioned
		.extra
		.insert("partitionKey".into(), serde_json::json!({ "topLevelSite": "https://github.com" }));
	f.jar.put(partitioned.clone());

	f.registry.capture_current().await.unwrap();

	let account = f.registry.find("octocat").await.unwrap().unwrap();
	let restored = account.cookies.iter().find(|c| c.name == "__Host-chips").unwrap();
	assert_eq!(restored, &partitioned);
	let raw = f.store.peek(ACCOUNTS_KEY).unwrap();
	assert_eq!(raw["octocat"][1]["partitionKey"]["topLevelSite"], "https://github.com");
}

#[tokio::test]
async fn capture_without_signed_in_user_stores_nothing() {
	let f = fixture();
	f.jar.put(StoredCookie::new("_gh_sess", "anon", "github.com"));

	assert_eq!(f.registry.capture_current().await.unwrap(), None);
	assert!(f.store.peek(ACCOUNTS_KEY).is_none());
}

#[tokio::test]
async fn store_failure_propagates() {
	let f = fixture();
	f.registry.upsert("octocat", Vec::new()).await.unwrap();
	f.store.set_offline(true);

	assert!(matches!(f.registry.list_all().await, Err(Error::Store { .. })));
	assert!(matches!(f.registry.upsert("hubot", Vec::new()).await, Err(Error::Store { .. })));
}

#[tokio::test]
async fn malformed_store_value_is_a_json_error() {
	let f = fixture();
	acctswitch::Store::set(&*f.store, ACCOUNTS_KEY, serde_json::json!(["not", "a", "map"]))
		.await
		.unwrap();

	assert!(matches!(f.registry.list_all().await, Err(Error::Json(_))));
}
