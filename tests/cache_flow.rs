//! End-to-end tests of the cache-aside flow
//!
//! Drives `CachedFetchController` against a real `FileStore` in a temporary
//! directory and a mock HTTP user service.

use tempfile::TempDir;
use usertable::cache::{
    now_millis, parse_cache_entry, CacheEntry, CacheStore, FileStore, CACHE_KEY, CACHE_TTL_MS,
};
use usertable::controller::{CachedFetchController, LoadOutcome, CACHE_HINT};
use usertable::data::{User, UsersClient, LOAD_FAILED_MESSAGE};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USERS_BODY: &str = r#"[
    {"id": 1, "name": "Leanne Graham", "email": "Sincere@april.biz",
     "phone": "1-770-736-8031 x56442", "website": "hildegard.org"},
    {"id": 2, "name": "Ervin Howell", "email": "Shanna@melissa.tv",
     "phone": "010-692-6593 x09125", "website": "anastasia.net"}
]"#;

fn ivan() -> User {
    User {
        id: 1,
        name: "Ivan Ivanov".to_string(),
        email: "ivan@example.com".to_string(),
        phone: "+7 (999) 123-45-67".to_string(),
        website: "example.com".to_string(),
    }
}

fn file_store() -> (FileStore, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    (FileStore::with_dir(temp_dir.path().to_path_buf()), temp_dir)
}

fn seed(store: &FileStore, entry: &CacheEntry) {
    let json = entry.to_json().expect("Entry should encode");
    store.set(CACHE_KEY, &json).expect("Seed should succeed");
}

async fn users_server(status: u16, expected_calls: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(status).set_body_string(USERS_BODY))
        .expect(expected_calls)
        .mount(&server)
        .await;
    server
}

fn client_for(server: &MockServer) -> UsersClient {
    UsersClient::with_endpoint(format!("{}/users", server.uri()))
}

/// Fresh entry on disk: served without any request reaching the server
#[tokio::test]
async fn test_fresh_file_entry_served_without_request() {
    let server = users_server(200, 0).await;
    let (store, _dir) = file_store();
    seed(&store, &CacheEntry::new(now_millis(), vec![ivan()]));

    let mut controller = CachedFetchController::new(store, client_for(&server));
    let outcome = controller.load().await;

    assert_eq!(outcome, LoadOutcome::Hit { count: 1 });
    assert_eq!(controller.users(), &[ivan()]);
    assert_eq!(controller.cache_hint(), Some(CACHE_HINT));
    server.verify().await;
}

/// Stale entry: exactly one request, entry rewritten with the response
#[tokio::test]
async fn test_stale_file_entry_refetched() {
    let server = users_server(200, 1).await;
    let (store, _dir) = file_store();
    seed(&store, &CacheEntry::new(now_millis() - CACHE_TTL_MS - 1, vec![]));

    let mut controller = CachedFetchController::new(store, client_for(&server));
    let outcome = controller.load().await;

    assert_eq!(outcome, LoadOutcome::Fetched { count: 2 });
    let raw = controller
        .store()
        .get(CACHE_KEY)
        .expect("Get should succeed")
        .expect("Entry should be written");
    let entry = parse_cache_entry(&raw).expect("Written entry should parse");
    assert_eq!(entry.data.len(), 2);
    assert_eq!(entry.data[0].name, "Leanne Graham");
    assert!(now_millis() - entry.timestamp < CACHE_TTL_MS);
    server.verify().await;
}

/// Clear first on an empty store, then load: one request
#[tokio::test]
async fn test_clear_then_load_on_empty_store() {
    let server = users_server(200, 1).await;
    let (store, _dir) = file_store();

    let mut controller = CachedFetchController::new(store, client_for(&server));
    controller.clear();
    let outcome = controller.load().await;

    assert_eq!(outcome, LoadOutcome::Fetched { count: 2 });
    server.verify().await;
}

/// HTTP 500: error set, users empty, nothing written to disk
#[tokio::test]
async fn test_server_error_leaves_cache_unwritten() {
    let server = users_server(500, 1).await;
    let (store, dir) = file_store();

    let mut controller = CachedFetchController::new(store, client_for(&server));
    let outcome = controller.load().await;

    assert!(matches!(outcome, LoadOutcome::Failed { .. }));
    assert_eq!(controller.error(), Some(LOAD_FAILED_MESSAGE));
    assert!(controller.users().is_empty());
    assert!(!dir.path().join("usersCache.json").exists());
    server.verify().await;
}

/// A tampered file is replaced by the next successful fetch
#[tokio::test]
async fn test_corrupt_file_recovered_by_fetch() {
    let server = users_server(200, 1).await;
    let (store, dir) = file_store();
    std::fs::write(dir.path().join("usersCache.json"), "{\"timestamp\": ").expect("Write");

    let mut controller = CachedFetchController::new(store, client_for(&server));
    let first = controller.load().await;
    let second = controller.load().await;

    assert_eq!(first, LoadOutcome::Fetched { count: 2 });
    assert_eq!(second, LoadOutcome::Hit { count: 2 });
    assert!(controller.error().is_none());
    server.verify().await;
}

/// A second controller over the same directory sees the first one's entry
#[tokio::test]
async fn test_entry_survives_controller_restart() {
    let server = users_server(200, 1).await;
    let (store, dir) = file_store();

    let mut first = CachedFetchController::new(store, client_for(&server));
    first.load().await;
    drop(first);

    let reopened = FileStore::with_dir(dir.path().to_path_buf());
    let mut second = CachedFetchController::new(reopened, client_for(&server));
    let outcome = second.load().await;

    assert_eq!(outcome, LoadOutcome::Hit { count: 2 });
    server.verify().await;
}

#[test]
fn test_clear_twice_on_file_store() {
    let (store, dir) = file_store();
    seed(&store, &CacheEntry::new(now_millis(), vec![ivan()]));

    let mut controller = CachedFetchController::new(store, UsersClient::new());
    controller.clear();
    controller.clear();

    assert!(!dir.path().join("usersCache.json").exists());
}
