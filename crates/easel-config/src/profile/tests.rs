use super::*;
use serde_json::json;

#[test]
fn missing_profile_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProfileStore::rooted(dir.path());

    let profile = store
        .load_profile("layout.windows", ProfileScope::Local, json!({ "windows": {} }))
        .unwrap();
    assert_eq!(profile.get("windows"), Some(&json!({})));
    assert!(!profile.path().exists());
}

#[test]
fn save_then_reload() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProfileStore::rooted(dir.path());

    let mut profile = store
        .load_profile("layout.console.main", ProfileScope::Local, json!({}))
        .unwrap();
    profile.set("width", json!(640));
    profile.set("height", json!(480));
    profile.save().unwrap();

    let reloaded = store
        .load_profile("layout.console.main", ProfileScope::Local, json!({ "x": 10 }))
        .unwrap();
    assert_eq!(reloaded.get("width"), Some(&json!(640)));
    assert_eq!(reloaded.get("x"), Some(&json!(10)));
}

#[test]
fn stored_values_win_over_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProfileStore::rooted(dir.path());

    let mut profile = store
        .load_profile("settings", ProfileScope::Global, json!({}))
        .unwrap();
    profile.set("theme", json!("dark"));
    profile.save().unwrap();

    let reloaded = store
        .load_profile("settings", ProfileScope::Global, json!({ "theme": "light" }))
        .unwrap();
    assert_eq!(reloaded.get("theme"), Some(&json!("dark")));
}

#[test]
fn scopes_are_separate_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProfileStore::rooted(dir.path());
    let global = store.profile_path("p", ProfileScope::Global).unwrap();
    let project = store.profile_path("p", ProfileScope::Project).unwrap();
    assert_ne!(global, project);
}

#[test]
fn malformed_profile_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProfileStore::rooted(dir.path());
    let path = store.profile_path("broken", ProfileScope::Local).unwrap();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ not json").unwrap();

    let profile = store
        .load_profile("broken", ProfileScope::Local, json!({ "a": 1 }))
        .unwrap();
    assert_eq!(profile.get("a"), Some(&json!(1)));
}

#[test]
fn rejects_path_like_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProfileStore::rooted(dir.path());
    assert!(store.profile_path("../escape", ProfileScope::Local).is_err());
    assert!(store.profile_path("", ProfileScope::Local).is_err());
}

#[test]
fn scope_parse() {
    assert_eq!(ProfileScope::parse("global"), Some(ProfileScope::Global));
    assert_eq!(ProfileScope::parse("project"), Some(ProfileScope::Project));
    assert_eq!(ProfileScope::parse("elsewhere"), None);
}
