//! Tests for the persisted server registry.

use remotarr::models::ServerKind;
use remotarr::registry::{NewServer, ServerRegistry, SettingsStore};
use std::path::PathBuf;
use uuid::Uuid;

fn temp_path() -> PathBuf {
    std::env::temp_dir().join(format!("remotarr-registry-{}.json", Uuid::new_v4()))
}

fn home_sonarr() -> NewServer {
    NewServer {
        name: "Home Sonarr".to_string(),
        base_url: "http://localhost:8989".to_string(),
        api_key: "abc".to_string(),
        kind: ServerKind::Sonarr,
    }
}

#[test]
fn test_add_then_delete_round_trip() {
    let path = temp_path();
    let registry = ServerRegistry::open(SettingsStore::new(&path)).unwrap();
    assert!(registry.servers().is_empty());

    let added = registry.add(home_sonarr()).unwrap();

    let servers = registry.servers();
    assert_eq!(servers.len(), 1);
    assert_eq!(servers[0].name, "Home Sonarr");
    assert_eq!(servers[0].base_url, "http://localhost:8989");
    assert_eq!(servers[0].api_key, "abc");
    assert_eq!(servers[0].kind, ServerKind::Sonarr);
    assert!(servers[0].active);

    registry.delete(added.id).unwrap();
    assert!(registry.servers().is_empty());

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_delete_leaves_other_records_intact() {
    let path = temp_path();
    let registry = ServerRegistry::open(SettingsStore::new(&path)).unwrap();

    let sonarr = registry.add(home_sonarr()).unwrap();
    let radarr = registry
        .add(NewServer {
            name: "Home Radarr".to_string(),
            base_url: "http://localhost:7878".to_string(),
            api_key: "xyz".to_string(),
            kind: ServerKind::Radarr,
        })
        .unwrap();

    registry.delete(sonarr.id).unwrap();

    let servers = registry.servers();
    assert_eq!(servers.len(), 1);
    assert_eq!(servers[0].id, radarr.id);
    assert_eq!(servers[0].name, "Home Radarr");

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_registry_persists_across_reopen() {
    let path = temp_path();

    {
        let registry = ServerRegistry::open(SettingsStore::new(&path)).unwrap();
        registry.add(home_sonarr()).unwrap();
    }

    let reopened = ServerRegistry::open(SettingsStore::new(&path)).unwrap();
    let servers = reopened.servers();
    assert_eq!(servers.len(), 1);
    assert_eq!(servers[0].name, "Home Sonarr");

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_update_edits_record_in_place() {
    let path = temp_path();
    let registry = ServerRegistry::open(SettingsStore::new(&path)).unwrap();

    let added = registry.add(home_sonarr()).unwrap();

    let mut edited = added.clone();
    edited.name = "Renamed Sonarr".to_string();
    edited.active = false;
    registry.update(edited).unwrap();

    let servers = registry.servers();
    assert_eq!(servers.len(), 1);
    assert_eq!(servers[0].id, added.id);
    assert_eq!(servers[0].name, "Renamed Sonarr");
    assert!(!servers[0].active);

    std::fs::remove_file(&path).ok();
}

#[tokio::test]
async fn test_subscribers_see_mutations() {
    let path = temp_path();
    let registry = ServerRegistry::open(SettingsStore::new(&path)).unwrap();
    let mut rx = registry.subscribe();

    registry.add(home_sonarr()).unwrap();

    rx.changed().await.unwrap();
    assert_eq!(rx.borrow().len(), 1);

    std::fs::remove_file(&path).ok();
}
