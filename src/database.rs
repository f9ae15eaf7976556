//! Per-guild prefix storage.
//!
//! The bot only ever reads from the store. Rows are managed outside of the bot.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::sqlite::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use crate::error::DatabaseError;
use crate::serenity::GuildId;

/// Anything that knows the configured prefix of a guild.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrefixStore: Send + Sync {
    /// Returns the prefix configured for `guild`.
    /// Errors with [DatabaseError::NoPrefix] if the guild has none.
    async fn guild_prefix(&self, guild: GuildId) -> Result<String, DatabaseError>;
}

/// SQLite backed [PrefixStore].
/// Internally uses a pool, so it's cheap to clone.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database at `url`, creating the file and table if missing.
    pub async fn connect(url: &str) -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        tracing::debug!("Connected to database at {url}");

        Self::create_tables(&pool).await?;
        Ok(Self { pool })
    }

    /// Open an in-memory database (for testing).
    #[cfg(test)]
    pub async fn open_in_memory() -> Result<Self, DatabaseError> {
        // In-memory databases are per connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        Self::create_tables(&pool).await?;
        Ok(Self { pool })
    }

    async fn create_tables(pool: &SqlitePool) -> Result<(), DatabaseError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS guild_prefixes (
                guild_id INTEGER PRIMARY KEY NOT NULL,
                prefix TEXT NOT NULL
            )",
        )
        .execute(pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl PrefixStore for Database {
    async fn guild_prefix(&self, guild: GuildId) -> Result<String, DatabaseError> {
        // SQLite integers are signed, snowflakes fit in 63 bits.
        let id = guild.get() as i64;

        let prefix: Option<String> =
            sqlx::query_scalar("SELECT prefix FROM guild_prefixes WHERE guild_id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        prefix.ok_or(DatabaseError::NoPrefix(guild))
    }
}
