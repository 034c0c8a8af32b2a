//! Integration tests for SQLite-backed history persistence
//!
//! Exercises the history manager over the production storage backend:
//! records surviving process restarts (modeled as reopening the database),
//! capacity eviction on disk, and the theme sharing the same database file.

use tempfile::tempdir;

use bubbly::history::HistoryStore;
use bubbly::message::Message;
use bubbly::storage::SqliteStore;
use bubbly::theme::Theme;

fn conversation(text: &str) -> Vec<Message> {
    vec![Message::user(text), Message::assistant("reply")]
}

fn history_at(db_path: &std::path::Path) -> HistoryStore {
    let store = SqliteStore::new_with_path(db_path).expect("failed to open store");
    HistoryStore::new(Box::new(store), 20, 30)
}

#[test]
fn test_records_survive_reopening_the_database() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("bubbly.db");

    {
        let history = history_at(&db_path);
        history.save("id-1", &conversation("hello")).expect("save");
        history.save("id-2", &conversation("again")).expect("save");
    }

    let history = history_at(&db_path);
    let summaries = history.list().expect("list");
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].id, "id-2");

    let record = history.get("id-1").expect("get").expect("missing");
    assert_eq!(record.messages, conversation("hello"));
}

#[test]
fn test_capacity_eviction_applies_on_disk() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("bubbly.db");

    {
        let store = SqliteStore::new_with_path(&db_path).expect("open");
        let history = HistoryStore::new(Box::new(store), 2, 30);
        for i in 0..3 {
            history
                .save(&format!("id-{}", i), &conversation("x"))
                .expect("save");
        }
    }

    let history = history_at(&db_path);
    let summaries = history.list().expect("list");
    assert_eq!(summaries.len(), 2);
    assert!(summaries.iter().all(|s| s.id != "id-0"));
}

#[test]
fn test_delete_persists_across_reopen() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("bubbly.db");

    {
        let history = history_at(&db_path);
        history.save("keep", &conversation("a")).expect("save");
        history.save("drop", &conversation("b")).expect("save");
        history.delete("drop").expect("delete");
    }

    let history = history_at(&db_path);
    assert!(history.get("drop").expect("get").is_none());
    assert!(history.get("keep").expect("get").is_some());
}

#[test]
fn test_resave_updates_record_on_disk() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("bubbly.db");

    {
        let history = history_at(&db_path);
        history.save("id-1", &conversation("draft")).expect("save");
        let longer = vec![
            Message::user("draft"),
            Message::assistant("reply"),
            Message::user("followup"),
        ];
        history.save("id-1", &longer).expect("resave");
    }

    let history = history_at(&db_path);
    let summaries = history.list().expect("list");
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].message_count, 3);
}

#[test]
fn test_theme_and_history_share_one_database() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("bubbly.db");

    {
        let store = SqliteStore::new_with_path(&db_path).expect("open");
        Theme::Dark.store(&store).expect("store theme");

        let history = HistoryStore::new(Box::new(store), 20, 30);
        history.save("id-1", &conversation("hi")).expect("save");
    }

    let store = SqliteStore::new_with_path(&db_path).expect("reopen");
    assert_eq!(Theme::load(&store).expect("load theme"), Theme::Dark);

    let history = HistoryStore::new(Box::new(store), 20, 30);
    assert!(history.get("id-1").expect("get").is_some());
}

#[test]
fn test_theme_defaults_to_light_on_fresh_database() {
    let dir = tempdir().expect("tempdir");
    let store = SqliteStore::new_with_path(dir.path().join("bubbly.db")).expect("open");
    assert_eq!(Theme::load(&store).expect("load"), Theme::Light);
}
