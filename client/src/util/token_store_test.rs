use super::*;

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("fittrack-token-{}", uuid::Uuid::new_v4()))
}

#[test]
fn memory_store_round_trips_and_clears() {
    let store = MemoryTokenStore::new();
    assert_eq!(store.get().unwrap(), None);
    store.set("tok-1").unwrap();
    assert_eq!(store.get().unwrap().as_deref(), Some("tok-1"));
    store.clear().unwrap();
    store.clear().unwrap();
    assert_eq!(store.get().unwrap(), None);
}

#[test]
fn memory_store_can_be_preseeded() {
    let store = MemoryTokenStore::with_token("tok-seed");
    assert_eq!(store.get().unwrap().as_deref(), Some("tok-seed"));
}

#[test]
fn file_store_uses_canonical_key_as_file_name() {
    let dir = temp_dir();
    let store = FileTokenStore::new(&dir);
    assert_eq!(store.path(), dir.join("authToken"));
}

#[test]
fn file_store_missing_file_reads_as_absent() {
    let store = FileTokenStore::new(temp_dir());
    assert_eq!(store.get().unwrap(), None);
    store.clear().unwrap();
}

#[test]
fn file_store_creates_directory_and_persists() {
    let dir = temp_dir();
    let store = FileTokenStore::new(&dir);
    store.set("tok-file").unwrap();

    let reopened = FileTokenStore::new(&dir);
    assert_eq!(reopened.get().unwrap().as_deref(), Some("tok-file"));

    reopened.clear().unwrap();
    assert_eq!(store.get().unwrap(), None);
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn file_store_trims_and_treats_blank_as_absent() {
    let dir = temp_dir();
    std::fs::create_dir_all(&dir).unwrap();
    let store = FileTokenStore::new(&dir);

    std::fs::write(store.path(), "  tok-padded\n").unwrap();
    assert_eq!(store.get().unwrap().as_deref(), Some("tok-padded"));

    std::fs::write(store.path(), "\n").unwrap();
    assert_eq!(store.get().unwrap(), None);
    let _ = std::fs::remove_dir_all(dir);
}

#[cfg(unix)]
#[test]
fn file_store_restricts_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = temp_dir();
    let store = FileTokenStore::new(&dir);
    store.set("tok").unwrap();
    let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    let _ = std::fs::remove_dir_all(dir);
}

#[cfg(unix)]
#[test]
fn file_store_replaces_world_readable_token_file() {
    use std::os::unix::fs::PermissionsExt;

    let dir = temp_dir();
    let store = FileTokenStore::new(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(store.path(), "old").unwrap();
    std::fs::set_permissions(store.path(), std::fs::Permissions::from_mode(0o644)).unwrap();
    std::fs::write(store.path().with_extension("tmp"), "stale").unwrap();

    store.set("tok-new").unwrap();
    let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    assert_eq!(store.get().unwrap().as_deref(), Some("tok-new"));
    assert!(!store.path().with_extension("tmp").exists());
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn file_store_set_failure_leaves_no_token_behind() {
    let dir = temp_dir();
    std::fs::create_dir_all(dir.join(TOKEN_STORAGE_KEY)).unwrap();
    let store = FileTokenStore::new(&dir);

    assert!(matches!(store.set("tok"), Err(StorageError::Io { .. })));
    assert!(!store.path().with_extension("tmp").exists());
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn storage_error_is_transient() {
    let err = StorageError::Io {
        path: PathBuf::from("/nope/authToken"),
        source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
    };
    assert_eq!(err.error_code(), "E_TOKEN_STORAGE_IO");
    assert_eq!(err.class(), ErrorClass::Transient);
    assert!(err.to_string().contains("/nope/authToken"));
}
