use std::sync::Arc;
use assert_fs::TempDir;
use futures::future::join_all;
use rand::SeedableRng;
use time::Duration;
use mocks::{TestNoteStoreIo, START_TIME};
use super::*;


async fn make_store() -> NoteStoreImpl<TestNoteStoreIo> {
    NoteStoreImpl::new_impl(TestNoteStoreIo::new())
        .await
        .expect("store creation failed")
}

fn owner(id: &str) -> OwnerIdString {
    OwnerIdString::from_str(id).unwrap()
}

fn key(hex_pair: &str) -> SecretKey {
    SecretKey::from_str(&hex_pair.repeat(32)).unwrap()
}

#[tokio::test]
async fn get_or_create_new_owner_is_empty() {
    let store = make_store().await;
    let note = store.get_or_create(&owner("alice")).await.unwrap();
    assert_eq!(note.owner_id.as_str(), "alice");
    assert_eq!(note.text, "");
    assert_eq!(note.secret_key, None);
    assert_eq!(note.last_modified, START_TIME);

    store.io.advance(Duration::minutes(5));
    let again = store.get_or_create(&owner("alice")).await.unwrap();
    assert!(Arc::ptr_eq(&note, &again));
    assert_eq!(store.io.writes(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn get_or_create_concurrent_first_access() {
    let store = Arc::new(make_store().await);
    let notes = join_all(
        (0..32).map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                store.get_or_create(&owner("alice")).await.unwrap()
            })
        })
    ).await;
    let first = notes[0].as_ref().unwrap();
    for note in &notes {
        assert!(Arc::ptr_eq(first, note.as_ref().unwrap()));
    }
    assert_eq!(store.io.writes(), 1);
    assert_eq!(store.state.read().await.owner_to_note.len(), 1);
}

#[tokio::test]
async fn write_then_read() {
    let store = make_store().await;
    for text in ["buy milk", "", "multi\nline \"quoted\" ✓"] {
        store.io.advance(Duration::seconds(1));
        let before = store.io.get_time();
        store.write(&owner("alice"), text).await.unwrap();
        let note = store.get_or_create(&owner("alice")).await.unwrap();
        assert_eq!(note.text, text);
        assert!(note.last_modified >= before);
    }
}

#[tokio::test]
async fn write_creates_missing_note() {
    let store = make_store().await;
    let note = store.write(&owner("bob"), "hello").await.unwrap();
    assert_eq!(note.text, "hello");
    assert_eq!(note.secret_key, None);
}

#[tokio::test]
async fn write_keeps_secret_key() {
    let store = make_store().await;
    let key = store.generate_key(&owner("alice")).await.unwrap();
    let note = store.write(&owner("alice"), "buy milk").await.unwrap();
    assert_eq!(note.secret_key, Some(key.clone()));
    let found = store.find_by_key(key.as_str()).await.unwrap().unwrap();
    assert_eq!(found.text, "buy milk");
}

#[tokio::test]
async fn last_modified_never_decreases() {
    let store = make_store().await;
    store.io.advance(Duration::hours(1));
    let first = store.write(&owner("alice"), "one").await.unwrap();
    store.io.set_time(START_TIME);
    let second = store.write(&owner("alice"), "two").await.unwrap();
    assert_eq!(second.text, "two");
    assert_eq!(second.last_modified, first.last_modified);
}

#[tokio::test]
async fn generate_key_rotates() {
    let store = make_store().await;
    let first = store.generate_key(&owner("alice")).await.unwrap();
    let second = store.generate_key(&owner("alice")).await.unwrap();
    assert_ne!(first, second);
    assert!(store.find_by_key(first.as_str()).await.unwrap().is_none());
    let note = store.find_by_key(second.as_str()).await.unwrap().unwrap();
    assert_eq!(note.owner_id.as_str(), "alice");
    assert_eq!(store.state.read().await.key_to_owner.len(), 1);
}

#[tokio::test]
async fn generate_key_for_unseen_owner() {
    let store = make_store().await;
    let key = store.generate_key(&owner("carol")).await.unwrap();
    let note = store.get_or_create(&owner("carol")).await.unwrap();
    assert_eq!(note.text, "");
    assert_eq!(note.secret_key, Some(key));
}

#[tokio::test]
async fn find_by_key_not_found() {
    let store = make_store().await;
    store.generate_key(&owner("alice")).await.unwrap();
    assert!(store.find_by_key("").await.unwrap().is_none());
    assert!(store.find_by_key("not-a-key").await.unwrap().is_none());
    assert!(store.find_by_key(key("ab").as_str()).await.unwrap().is_none());
}

#[tokio::test]
async fn read_by_key_unknown() {
    let store = make_store().await;
    let err = store.read_by_key(key("ab").as_str()).await.unwrap_err();
    assert!(matches!(err, NoteStoreError::NoteNotFound), "wrong error type: {err:#?}");
}

#[tokio::test]
async fn write_by_key_empty_text() {
    let store = make_store().await;
    let valid = store.generate_key(&owner("alice")).await.unwrap();
    for candidate in [valid.as_str(), key("cd").as_str(), ""] {
        let err = store.write_by_key(candidate, "").await.unwrap_err();
        assert!(matches!(err, NoteStoreError::EmptyText), "wrong error type: {err:#?}");
    }
}

#[tokio::test]
async fn write_by_key_unknown_key() {
    let store = make_store().await;
    for candidate in [key("cd").as_str(), "garbled", ""] {
        let err = store.write_by_key(candidate, "hello").await.unwrap_err();
        assert!(matches!(err, NoteStoreError::NoteNotFound), "wrong error type: {err:#?}");
    }
}

#[tokio::test]
async fn write_by_key_then_read_by_key() {
    let store = make_store().await;
    let key = store.generate_key(&owner("alice")).await.unwrap();
    store.io.advance(Duration::seconds(30));
    store.write_by_key(key.as_str(), "hello").await.unwrap();
    let public = store.read_by_key(key.as_str()).await.unwrap();
    assert_eq!(public.text, "hello");
    assert_eq!(
        public.last_modified,
        (START_TIME + Duration::seconds(30)).unix_timestamp(),
    );
    let note = store.get_or_create(&owner("alice")).await.unwrap();
    assert_eq!(note.text, "hello");
    assert_eq!(note.secret_key, Some(key));
}

#[tokio::test]
async fn failed_write_changes_nothing() {
    let store = make_store().await;
    store.write(&owner("alice"), "buy milk").await.unwrap();
    let key = store.generate_key(&owner("alice")).await.unwrap();
    let db = store.io.db();

    store.io.set_fail_writes(true);
    store.io.advance(Duration::hours(1));
    assert!(matches!(
        store.write(&owner("alice"), "sell milk").await,
        Err(NoteStoreError::Io(_)),
    ));
    assert!(store.generate_key(&owner("alice")).await.is_err());
    assert!(store.write_by_key(key.as_str(), "sell milk").await.is_err());
    assert!(store.get_or_create(&owner("bob")).await.is_err());

    let note = store.get_or_create(&owner("alice")).await.unwrap();
    assert_eq!(note.text, "buy milk");
    assert_eq!(note.last_modified, START_TIME);
    assert_eq!(note.secret_key, Some(key.clone()));
    assert!(store.find_by_key(key.as_str()).await.unwrap().is_some());
    assert!(store.state.read().await.get(&owner("bob")).is_none());
    assert_eq!(store.io.db(), db);
}

#[tokio::test]
async fn colliding_key_is_regenerated() {
    let store = make_store().await;
    store.io.force_keys([key("aa")]);
    store.generate_key(&owner("alice")).await.unwrap();
    store.io.force_keys([key("aa"), key("bb")]);
    let bobs = store.generate_key(&owner("bob")).await.unwrap();
    assert_eq!(bobs, key("bb"));
    let alices = store.find_by_key(key("aa").as_str()).await.unwrap().unwrap();
    assert_eq!(alices.owner_id.as_str(), "alice");
}

#[tokio::test]
async fn key_generation_gives_up() {
    let store = make_store().await;
    store.io.force_keys([key("aa")]);
    store.generate_key(&owner("alice")).await.unwrap();
    store.io.force_keys(std::iter::repeat_n(key("aa"), MAX_KEY_GENERATION_ATTEMPTS));
    let err = store.generate_key(&owner("bob")).await.unwrap_err();
    assert!(matches!(err, NoteStoreError::KeyGeneration), "wrong error type: {err:#?}");
    assert!(store.state.read().await.get(&owner("bob")).is_none());
}

#[tokio::test]
async fn reloads_saved_state() {
    let store = make_store().await;
    store.write(&owner("alice"), "buy milk\nand eggs").await.unwrap();
    let key = store.generate_key(&owner("alice")).await.unwrap();
    store.get_or_create(&owner("bob")).await.unwrap();

    let reloaded = NoteStoreImpl::new_impl(TestNoteStoreIo::with_db(store.io.db()))
        .await
        .unwrap();
    let note = reloaded.find_by_key(key.as_str()).await.unwrap().unwrap();
    assert_eq!(note.owner_id.as_str(), "alice");
    assert_eq!(note.text, "buy milk\nand eggs");
    assert_eq!(note.last_modified, START_TIME);
    let bobs = reloaded.get_or_create(&owner("bob")).await.unwrap();
    assert_eq!(bobs.text, "");
    assert_eq!(reloaded.io.writes(), 0);
}

#[tokio::test]
async fn shared_key_in_db_is_dropped() {
    let shared = key("ab");
    let db = format!(r#"
        [[note]]
        owner_id = "alice"
        last_modified = "2012-05-01T10:00:00Z"
        secret_key = "{shared}"
        text = "a"

        [[note]]
        owner_id = "bob"
        last_modified = "2012-05-01T10:00:00Z"
        secret_key = "{shared}"
        text = "b"
    "#, shared = shared.as_str());
    let store = NoteStoreImpl::new_impl(TestNoteStoreIo::with_db(Some(db)))
        .await
        .unwrap();
    assert!(store.find_by_key(shared.as_str()).await.unwrap().is_none());
    assert_eq!(store.get_or_create(&owner("alice")).await.unwrap().secret_key, None);
    assert_eq!(store.get_or_create(&owner("bob")).await.unwrap().text, "b");
}

#[tokio::test]
async fn invalid_db_fails_loading() {
    let result = NoteStoreImpl::new_impl(
        TestNoteStoreIo::with_db(Some("[[note]]\nowner_id = \"\"\n".into()))
    ).await;
    assert!(matches!(result, Err(NoteStoreError::Parsing(_))));
}

#[tokio::test]
async fn alice_scenario() {
    let store = make_store().await;
    let note = store.get_or_create(&owner("alice")).await.unwrap();
    assert_eq!((note.text.as_str(), &note.secret_key), ("", &None));

    store.write(&owner("alice"), "buy milk").await.unwrap();
    assert_eq!(store.get_or_create(&owner("alice")).await.unwrap().text, "buy milk");

    let k1 = store.generate_key(&owner("alice")).await.unwrap();
    let found = store.find_by_key(k1.as_str()).await.unwrap().unwrap();
    assert_eq!(found.owner_id.as_str(), "alice");
    assert_eq!(store.read_by_key(k1.as_str()).await.unwrap().text, "buy milk");
    assert!(matches!(
        store.write_by_key(k1.as_str(), "").await,
        Err(NoteStoreError::EmptyText),
    ));

    let k2 = store.generate_key(&owner("alice")).await.unwrap();
    assert!(matches!(
        store.read_by_key(k1.as_str()).await,
        Err(NoteStoreError::NoteNotFound),
    ));
    assert_eq!(store.read_by_key(k2.as_str()).await.unwrap().text, "buy milk");
}

fn production_config(dir: &TempDir) -> AppConfig {
    AppConfig {
        data_directory: dir.path().to_path_buf(),
        ..AppConfig::default()
    }
}

fn production_rng() -> SyncRng<StdRng> {
    SyncRng::new(StdRng::seed_from_u64(3))
}

#[tokio::test]
async fn production_store_persists() {
    let dir = TempDir::new().unwrap();
    let config = production_config(&dir);
    let key = {
        let store = ProductionNoteStore::new(&config, production_rng()).await.unwrap();
        store.write(&owner("alice"), "buy milk").await.unwrap();
        store.generate_key(&owner("alice")).await.unwrap()
    };
    let store = ProductionNoteStore::new(&config, production_rng()).await.unwrap();
    let public = store.read_by_key(key.as_str()).await.unwrap();
    assert_eq!(public.text, "buy milk");
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.contains(crate::lib_constants::TMP_FILENAME_INFIX))
        .collect();
    assert!(leftovers.is_empty(), "tmp files left behind: {leftovers:?}");
}

#[tokio::test]
async fn production_store_is_exclusive() {
    let dir = TempDir::new().unwrap();
    let config = production_config(&dir);
    let _store = ProductionNoteStore::new(&config, production_rng()).await.unwrap();
    let second = ProductionNoteStore::new(&config, production_rng()).await;
    assert!(matches!(second, Err(NoteStoreError::LockingFailed)));
}

#[tokio::test]
async fn production_store_needs_data_dir() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig {
        data_directory: dir.path().join("missing"),
        ..AppConfig::default()
    };
    let result = ProductionNoteStore::new(&config, production_rng()).await;
    assert!(matches!(result, Err(NoteStoreError::DataDirNotInitialized)));
}
