use notecrypt_client::recent::RECENT_CAPACITY;
use notecrypt_client::{RecentItem, RecentItems};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn item(id: i64) -> RecentItem {
    RecentItem {
        id,
        identifier: format!("s{id:04}"),
        flag: false,
    }
}

fn ids(recent: &RecentItems) -> Vec<i64> {
    recent.items().iter().map(|i| i.id).collect()
}

#[test]
fn starts_empty() {
    let recent = RecentItems::new();
    assert!(recent.is_empty());
    assert_eq!(recent.len(), 0);
}

#[test]
fn touch_puts_newest_first() {
    let mut recent = RecentItems::new();
    recent.touch(item(1));
    recent.touch(item(2));
    recent.touch(item(3));
    assert_eq!(ids(&recent), vec![3, 2, 1]);
}

#[test]
fn touch_existing_moves_to_front_without_duplicating() {
    let mut recent = RecentItems::new();
    for id in 1..=4 {
        recent.touch(item(id));
    }
    let updated = RecentItem {
        flag: true,
        ..item(2)
    };
    recent.touch(updated.clone());

    assert_eq!(ids(&recent), vec![2, 4, 3, 1]);
    assert_eq!(recent.items()[0], updated);
}

#[test]
fn capacity_drops_oldest() {
    let mut recent = RecentItems::new();
    for id in 1..=15 {
        recent.touch(item(id));
    }
    assert_eq!(recent.len(), RECENT_CAPACITY);
    assert_eq!(ids(&recent), (6..=15).rev().collect::<Vec<_>>());
}

#[test]
fn non_positive_ids_are_ignored() {
    let mut recent = RecentItems::new();
    recent.touch(item(0));
    recent.touch(item(-3));
    assert!(recent.is_empty());
}

#[test]
fn save_then_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("recent.json");

    let mut recent = RecentItems::new();
    recent.touch(item(7));
    recent.touch(RecentItem {
        id: 8,
        identifier: "s0008".into(),
        flag: true,
    });
    recent.save(&path).unwrap();

    assert_eq!(RecentItems::load(&path), recent);
}

#[test]
fn load_missing_file_is_empty() {
    let dir = TempDir::new().unwrap();
    assert!(RecentItems::load(&dir.path().join("absent.json")).is_empty());
}

#[test]
fn load_malformed_file_is_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("recent.json");
    std::fs::write(&path, "{ not a list").unwrap();
    assert!(RecentItems::load(&path).is_empty());
}

#[test]
fn load_truncates_oversized_list() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("recent.json");
    let items: Vec<RecentItem> = (1..=20).map(item).collect();
    std::fs::write(&path, serde_json::to_string(&items).unwrap()).unwrap();

    let recent = RecentItems::load(&path);
    assert_eq!(recent.len(), RECENT_CAPACITY);
    assert_eq!(recent.items()[0].id, 1);
}

#[test]
fn accepts_legacy_field_names() {
    let raw = r#"[{"id": 4, "stud_nr": "s1234", "graduated": true}, {"id": 5, "stud_nr": "s5678"}]"#;
    let items: Vec<RecentItem> = serde_json::from_str(raw).unwrap();

    assert_eq!(items[0].identifier, "s1234");
    assert!(items[0].flag);
    assert!(!items[1].flag);
}

#[test]
fn save_into_unwritable_path_is_storage_error() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "x").unwrap();

    let recent = RecentItems::new();
    let err = recent.save(&blocker.join("recent.json")).unwrap_err();
    assert!(matches!(err, notecrypt_client::ClientError::Storage(_)));
}
