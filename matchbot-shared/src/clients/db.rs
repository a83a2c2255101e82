use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError};
use diesel::sqlite::SqliteConnection;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Per-connection pragmas applied when r2d2 opens a connection.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas {
    wal: bool,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        let mut pragmas = String::from("PRAGMA busy_timeout = 5000; PRAGMA foreign_keys = ON;");
        if self.wal {
            pragmas.push_str(" PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;");
        }
        conn.batch_execute(&pragmas)
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn is_in_memory(database_url: &str) -> bool {
    database_url == ":memory:" || database_url.contains("mode=memory")
}

/// Build the SQLite pool.
///
/// Every in-memory connection is its own database, so an in-memory url gets a single
/// connection that is never recycled.
pub fn create_pool(database_url: &str, max_size: u32) -> Result<DbPool, PoolError> {
    let in_memory = is_in_memory(database_url);
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);

    let builder = Pool::builder()
        .test_on_check_out(true)
        .connection_customizer(Box::new(SqlitePragmas { wal: !in_memory }));

    let pool = if in_memory {
        builder
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .build(manager)?
    } else {
        builder
            .max_size(max_size.max(1))
            .min_idle(Some(1))
            .build(manager)?
    };

    tracing::info!(
        database_url = %database_url,
        max_size = pool.max_size(),
        "database connection pool created"
    );
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_urls_are_detected() {
        assert!(is_in_memory(":memory:"));
        assert!(is_in_memory("file:matchbot?mode=memory&cache=shared"));
        assert!(!is_in_memory("matchbot.db"));
    }

    #[test]
    fn in_memory_pool_is_pinned_to_one_connection() {
        let pool = create_pool(":memory:", 8).unwrap();
        assert_eq!(pool.max_size(), 1);

        let mut conn = pool.get().unwrap();
        conn.batch_execute("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (1);")
            .unwrap();
        drop(conn);

        // Same connection, same database.
        let mut conn = pool.get().unwrap();
        conn.batch_execute("INSERT INTO t VALUES (2);").unwrap();
    }
}
