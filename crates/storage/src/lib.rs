use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::info;

use shared::{
    deck,
    domain::{CardIndex, CardRecord},
};

const UPSERT_CARD: &str = "INSERT INTO tarot_meanings (id, card_name, card_meaning) VALUES (?, ?, ?)
     ON CONFLICT(id) DO UPDATE SET card_name = excluded.card_name,
                                   card_meaning = excluded.card_meaning";

/// Card table backed by SQLite. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid sqlite url '{database_url}'"))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn card_count(&self) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM tarot_meanings")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn card(&self, index: CardIndex) -> Result<Option<CardRecord>> {
        let row = sqlx::query("SELECT id, card_name, card_meaning FROM tarot_meanings WHERE id = ?")
            .bind(index.0)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to load card {index}"))?;
        row.map(card_from_row).transpose()
    }

    pub async fn list_cards(&self) -> Result<Vec<CardRecord>> {
        let rows = sqlx::query("SELECT id, card_name, card_meaning FROM tarot_meanings ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(card_from_row).collect()
    }

    pub async fn upsert_card(&self, card: &CardRecord) -> Result<()> {
        sqlx::query(UPSERT_CARD)
            .bind(card.index.0)
            .bind(&card.name)
            .bind(card.meaning.as_deref())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Replaces or inserts every card in one transaction. Returns the number of
    /// rows written.
    pub async fn import_cards(&self, cards: &[CardRecord]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;
        for card in cards {
            written += sqlx::query(UPSERT_CARD)
                .bind(card.index.0)
                .bind(&card.name)
                .bind(card.meaning.as_deref())
                .execute(&mut *tx)
                .await
                .with_context(|| format!("failed to import card {}", card.index))?
                .rows_affected();
        }
        tx.commit().await?;
        info!(written, "card table import committed");
        Ok(written)
    }

    /// Fills missing rows with the built-in deck names. Existing rows are kept.
    pub async fn seed_standard_deck(&self) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        for card in deck::standard_deck() {
            inserted += sqlx::query(
                "INSERT OR IGNORE INTO tarot_meanings (id, card_name, card_meaning) VALUES (?, ?, ?)",
            )
            .bind(card.index.0)
            .bind(&card.name)
            .bind(card.meaning.as_deref())
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }
        tx.commit().await?;
        info!(inserted, "standard deck seeded");
        Ok(inserted)
    }
}

fn card_from_row(row: SqliteRow) -> Result<CardRecord> {
    Ok(CardRecord {
        index: CardIndex(row.try_get("id")?),
        name: row.try_get("card_name")?,
        meaning: row.try_get("card_meaning")?,
    })
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
