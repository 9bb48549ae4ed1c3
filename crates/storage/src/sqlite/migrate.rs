use chrono::Utc;
use sqlx::{Row, SqlitePool};

use super::SqliteInitError;

struct Migration {
    version: i64,
    name: &'static str,
    statements: &'static [&'static str],
}

/// Schema history, oldest first. Applied versions are never edited.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "quiz detail cache",
        statements: &[r"
            CREATE TABLE IF NOT EXISTS quiz_details (
                quiz_id INTEGER PRIMARY KEY,
                reveal_policy TEXT NOT NULL,
                question_count INTEGER NOT NULL CHECK (question_count >= 0),
                payload TEXT NOT NULL,
                fetched_at TEXT NOT NULL
            );
        "],
    },
    Migration {
        version: 2,
        name: "fetched_at index",
        statements: &[
            "CREATE INDEX IF NOT EXISTS idx_quiz_details_fetched_at ON quiz_details (fetched_at);",
        ],
    },
];

/// Apply every migration that is not yet recorded, each in its own transaction.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
        ",
    )
    .execute(pool)
    .await?;

    let applied = applied_versions(pool).await?;
    for migration in MIGRATIONS {
        if applied.contains(&migration.version) {
            continue;
        }
        apply(pool, migration)
            .await
            .map_err(|source| SqliteInitError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            })?;
        log::info!(
            "applied quiz cache migration {} ({})",
            migration.version,
            migration.name
        );
    }
    Ok(())
}

async fn apply(pool: &SqlitePool, migration: &Migration) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for statement in migration.statements {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    sqlx::query("INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)")
        .bind(migration.version)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
    tx.commit().await
}

/// Versions recorded in `schema_migrations`, ascending.
///
/// # Errors
///
/// Returns `SqliteInitError::Sqlx` if the table cannot be read.
pub async fn applied_versions(pool: &SqlitePool) -> Result<Vec<i64>, SqliteInitError> {
    let rows = sqlx::query("SELECT version FROM schema_migrations ORDER BY version")
        .fetch_all(pool)
        .await?;
    rows.iter()
        .map(|row| row.try_get::<i64, _>("version"))
        .collect::<Result<Vec<_>, _>>()
        .map_err(SqliteInitError::from)
}
