use hr_interval_core::storage::save_quietly;
use hr_interval_core::*;
use std::fs;
use std::path::PathBuf;

fn tmp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("hr_interval_{}_{}", std::process::id(), name))
}

#[test]
fn test_save_and_load_profile() {
    let path = tmp_path("profile.json");

    let profile = UserPhysiology {
        max_hr: 192,
        rest_hr: 48,
        zone_width: 6,
        fitness_level: FitnessLevel::Advanced,
    };

    save_profile(&profile, &path).expect("kunne ikke lagre profil");
    let loaded = load_profile(&path).expect("kunne ikke laste profil");
    assert_eq!(loaded, Some(profile));

    fs::remove_file(&path).ok();
}

#[test]
fn missing_file_is_none() {
    let path = tmp_path("does_not_exist.json");
    assert_eq!(load_profile(&path).unwrap(), None);
    assert_eq!(load_or_default(&JsonFileStore::new(&path)), UserPhysiology::default());
}

#[test]
fn corrupt_file_falls_back_to_defaults() {
    let path = tmp_path("corrupt.json");
    fs::write(&path, "{ not json").unwrap();

    assert!(matches!(load_profile(&path), Err(StorageError::Json(_))));
    assert_eq!(load_or_default(&JsonFileStore::new(&path)), UserPhysiology::default());

    fs::remove_file(&path).ok();
}

#[test]
fn implausible_profile_is_rejected() {
    let path = tmp_path("implausible.json");
    fs::write(&path, r#"{"max_hr": 90, "rest_hr": 120, "zone_width": 10}"#).unwrap();
    assert_eq!(load_or_default(&JsonFileStore::new(&path)), UserPhysiology::default());
    fs::remove_file(&path).ok();
}

#[test]
fn memory_store_keeps_last_save() {
    let store = MemoryStore::default();
    assert_eq!(load_or_default(&store), UserPhysiology::default());

    let p = UserPhysiology { max_hr: 200, ..Default::default() };
    assert!(save_quietly(&store, &p));
    assert_eq!(load_or_default(&store), p);
}
