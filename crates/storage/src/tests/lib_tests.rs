use super::*;

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("tarot.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );
}

#[tokio::test]
async fn missing_card_is_none() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let card = storage.card(CardIndex(12)).await.expect("lookup");
    assert!(card.is_none());
}

#[tokio::test]
async fn seeds_full_deck_once() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let first = storage.seed_standard_deck().await.expect("seed");
    let second = storage.seed_standard_deck().await.expect("seed again");
    assert_eq!(first, 156);
    assert_eq!(second, 0);
    assert_eq!(storage.card_count().await.expect("count"), 156);

    let fool = storage
        .card(CardIndex(0))
        .await
        .expect("lookup")
        .expect("seeded card");
    assert_eq!(fool.name, "The Fool");
    assert_eq!(fool.meaning, None);
}

#[tokio::test]
async fn seeding_keeps_imported_rows() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .upsert_card(&CardRecord {
            index: CardIndex(1),
            name: "Le Bateleur".into(),
            meaning: Some("Initiative, skill".into()),
        })
        .await
        .expect("upsert");

    let inserted = storage.seed_standard_deck().await.expect("seed");
    assert_eq!(inserted, 155);

    let card = storage
        .card(CardIndex(1))
        .await
        .expect("lookup")
        .expect("card");
    assert_eq!(card.name, "Le Bateleur");
    assert_eq!(card.meaning.as_deref(), Some("Initiative, skill"));
}

#[tokio::test]
async fn import_overwrites_existing_rows() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.seed_standard_deck().await.expect("seed");

    let written = storage
        .import_cards(&[
            CardRecord {
                index: CardIndex(0),
                name: "The Fool".into(),
                meaning: Some("New beginnings".into()),
            },
            CardRecord {
                index: CardIndex(78),
                name: "The Fool (Reversed)".into(),
                meaning: Some("Recklessness".into()),
            },
        ])
        .await
        .expect("import");
    assert_eq!(written, 2);

    let cards = storage.list_cards().await.expect("list");
    assert_eq!(cards.len(), 156);
    assert_eq!(cards[0].meaning.as_deref(), Some("New beginnings"));
    assert_eq!(cards[78].meaning.as_deref(), Some("Recklessness"));
}

#[tokio::test]
async fn upsert_replaces_name_and_clears_meaning() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .import_cards(&[CardRecord {
            index: CardIndex(5),
            name: "The Pope".into(),
            meaning: Some("Tradition".into()),
        }])
        .await
        .expect("import");

    storage
        .upsert_card(&CardRecord {
            index: CardIndex(5),
            name: "The Hierophant".into(),
            meaning: None,
        })
        .await
        .expect("upsert");

    assert_eq!(storage.card_count().await.expect("count"), 1);
    let card = storage
        .card(CardIndex(5))
        .await
        .expect("lookup")
        .expect("card");
    assert_eq!(card.name, "The Hierophant");
    assert!(card.meaning.is_none());
}

#[test]
fn memory_urls_have_no_parent_dir() {
    assert!(sqlite_path("sqlite::memory:").is_none());
    assert!(sqlite_path("postgres://localhost/db").is_none());
    assert_eq!(
        sqlite_path("sqlite://./data/tarot.db?mode=ro"),
        Some(PathBuf::from("./data/tarot.db"))
    );
}
