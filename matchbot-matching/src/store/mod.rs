//! SQLite-backed Profile Store and Interaction Log.
//!
//! Functions take a `&mut SqliteConnection` so a caller can run several of them inside one
//! transaction and observe its own writes.

use chrono::{NaiveDateTime, Utc};
use diesel::connection::SimpleConnection;

use matchbot_shared::clients::db::DbPool;
use matchbot_shared::errors::{AppError, AppResult};

pub mod interactions;
pub mod profiles;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS profiles (
    user_id      INTEGER PRIMARY KEY NOT NULL,
    display_name TEXT NOT NULL,
    age          INTEGER,
    gender       TEXT NOT NULL,
    preference   TEXT NOT NULL,
    interests    TEXT NOT NULL DEFAULT '',
    bio          TEXT NOT NULL DEFAULT '',
    handle       TEXT,
    created_at   TIMESTAMP NOT NULL
);

CREATE TABLE IF NOT EXISTS likes (
    liker_id   INTEGER NOT NULL,
    liked_id   INTEGER NOT NULL,
    created_at TIMESTAMP NOT NULL,
    PRIMARY KEY (liker_id, liked_id)
);

CREATE TABLE IF NOT EXISTS passes (
    passer_id  INTEGER NOT NULL,
    passed_id  INTEGER NOT NULL,
    created_at TIMESTAMP NOT NULL,
    PRIMARY KEY (passer_id, passed_id)
);

CREATE TABLE IF NOT EXISTS matches (
    user_a_id  INTEGER NOT NULL,
    user_b_id  INTEGER NOT NULL,
    created_at TIMESTAMP NOT NULL,
    PRIMARY KEY (user_a_id, user_b_id),
    CHECK (user_a_id <= user_b_id)
);

CREATE INDEX IF NOT EXISTS idx_likes_liked ON likes (liked_id);
CREATE INDEX IF NOT EXISTS idx_matches_user_b ON matches (user_b_id);
"#;

/// Create the tables if they are missing. Safe to run on every startup.
pub fn init_schema(pool: &DbPool) -> AppResult<()> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;
    conn.batch_execute(SCHEMA)?;
    tracing::info!("database schema ready");
    Ok(())
}

/// Write timestamp for new rows (UTC).
pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
