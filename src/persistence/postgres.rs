//! PostgreSQL implementation of the persistence layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{Connection, PgConnection, PgPool, Postgres, Transaction};

use super::PollGateway;
use super::models::{StoredPoll, StoredTally};
use crate::config::ServerConfig;
use crate::domain::{CurrentPoll, PollDefinition, PollId, PollSnapshot, Tallies};
use crate::error::StoreError;

/// Advisory lock key serializing concurrent bootstraps across processes.
const BOOTSTRAP_LOCK_KEY: i64 = 0x706f_6c6c;

const CREATE_POLLS: &str = "CREATE TABLE IF NOT EXISTS polls (\
     id SERIAL PRIMARY KEY, \
     question TEXT NOT NULL, \
     options JSONB NOT NULL, \
     created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP)";

const CREATE_VOTES: &str = "CREATE TABLE IF NOT EXISTS votes (\
     id SERIAL PRIMARY KEY, \
     poll_id INTEGER REFERENCES polls(id), \
     option_text TEXT NOT NULL, \
     vote_count INTEGER NOT NULL DEFAULT 0, \
     UNIQUE (poll_id, option_text))";

/// PostgreSQL-backed [`PollGateway`] using `sqlx::PgPool`.
///
/// The pool is normally created lazily, so building a gateway never
/// touches the network. Each operation acquires one connection, bounded by
/// the pool's acquire timeout.
#[derive(Debug, Clone)]
pub struct PgPollGateway {
    pool: PgPool,
    seed: PollDefinition,
}

impl PgPollGateway {
    /// Creates a gateway over an existing pool, seeding the default poll.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            seed: PollDefinition::default(),
        }
    }

    /// Replaces the poll inserted by [`PollGateway::bootstrap`] on an
    /// empty store.
    #[must_use]
    pub fn with_seed(mut self, seed: PollDefinition) -> Self {
        self.seed = seed;
        self
    }

    /// Builds a lazily-connecting pool from `config`.
    #[must_use]
    pub fn connect_lazy(config: &ServerConfig) -> Self {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_connect_timeout())
            .connect_lazy_with(config.pg_connect_options());
        Self::new(pool)
    }

    /// Returns the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Any failure to obtain a connection counts as the store being
    /// unreachable, including rejected credentials.
    async fn acquire(&self) -> Result<PoolConnection<Postgres>, StoreError> {
        self.pool.acquire().await.map_err(|e| {
            tracing::warn!(error = %e, "database connection failed");
            StoreError::Connection(e.to_string())
        })
    }
}

#[async_trait]
impl PollGateway for PgPollGateway {
    async fn connect(&self) -> Result<(), StoreError> {
        self.acquire().await.map(drop)
    }

    async fn bootstrap(&self) -> Result<bool, StoreError> {
        let mut conn = self.acquire().await?;
        let mut tx = conn.begin().await?;
        match seed_schema(&mut tx, &self.seed).await {
            Ok(seeded) => {
                tx.commit().await?;
                Ok(seeded)
            }
            Err(err) => {
                rollback(tx, "bootstrap").await;
                Err(err)
            }
        }
    }

    async fn fetch_current_poll(&self) -> Result<CurrentPoll, StoreError> {
        let mut conn = self.acquire().await?;
        let poll = latest_poll(&mut conn).await?;
        let votes: Tallies = load_tallies(&mut conn, poll.id)
            .await?
            .into_iter()
            .map(|t| (t.option_text, t.vote_count))
            .collect();

        tracing::debug!(poll_id = %poll.id, created_at = %poll.created_at, "loaded current poll");
        if !votes.covers_exactly(&poll.options) {
            tracing::warn!(poll_id = %poll.id, "tally rows do not match poll options");
        }

        Ok(CurrentPoll {
            id: poll.id,
            snapshot: PollSnapshot {
                question: poll.question,
                options: poll.options,
                votes,
            },
        })
    }

    async fn current_poll_id(&self) -> Result<PollId, StoreError> {
        let mut conn = self.acquire().await?;
        let id = sqlx::query_scalar::<_, i32>(
            "SELECT id FROM polls ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(StoreError::NotFound)?;
        Ok(PollId::new(id))
    }

    async fn increment_vote(&self, poll_id: PollId, option: &str) -> Result<Tallies, StoreError> {
        let mut conn = self.acquire().await?;
        let mut tx = conn.begin().await?;
        match increment_in_tx(&mut tx, poll_id, option).await {
            Ok(tallies) => {
                tx.commit().await?;
                tracing::info!(%poll_id, option, "vote recorded");
                Ok(tallies)
            }
            Err(err) => {
                rollback(tx, "increment_vote").await;
                Err(err)
            }
        }
    }
}

/// Creates the schema and inserts the seed poll with zeroed tallies if the
/// store holds no poll. Must run inside a transaction.
async fn seed_schema(conn: &mut PgConnection, seed: &PollDefinition) -> Result<bool, StoreError> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(BOOTSTRAP_LOCK_KEY)
        .execute(&mut *conn)
        .await?;
    sqlx::query(CREATE_POLLS).execute(&mut *conn).await?;
    sqlx::query(CREATE_VOTES).execute(&mut *conn).await?;

    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM polls")
        .fetch_one(&mut *conn)
        .await?;
    if count > 0 {
        tracing::debug!(count, "polls already present, skipping seed");
        return Ok(false);
    }

    let poll_id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO polls (question, options) VALUES ($1, $2) RETURNING id",
    )
    .bind(seed.question())
    .bind(Json(seed.options()))
    .fetch_one(&mut *conn)
    .await?;

    for option in seed.options() {
        sqlx::query("INSERT INTO votes (poll_id, option_text, vote_count) VALUES ($1, $2, 0)")
            .bind(poll_id)
            .bind(option)
            .execute(&mut *conn)
            .await?;
    }

    tracing::info!(poll_id, question = seed.question(), "seeded default poll");
    Ok(true)
}

/// Validate, increment, and re-read. Must run inside a transaction.
async fn increment_in_tx(
    conn: &mut PgConnection,
    poll_id: PollId,
    option: &str,
) -> Result<Tallies, StoreError> {
    let Json(options) =
        sqlx::query_scalar::<_, Json<Vec<String>>>("SELECT options FROM polls WHERE id = $1")
            .bind(poll_id.get())
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(StoreError::NotFound)?;

    if !options.iter().any(|o| o == option) {
        return Err(StoreError::InvalidOption(option.to_string()));
    }

    // Row lock taken by the UPDATE serializes concurrent votes for the
    // same option.
    let updated = sqlx::query(
        "UPDATE votes SET vote_count = COALESCE(vote_count, 0) + 1 \
         WHERE poll_id = $1 AND option_text = $2",
    )
    .bind(poll_id.get())
    .bind(option)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    if updated != 1 {
        return Err(StoreError::Unexpected(format!(
            "expected one tally row for option {option:?} of poll {poll_id}, found {updated}"
        )));
    }

    Ok(load_tallies(conn, poll_id)
        .await?
        .into_iter()
        .map(|t| (t.option_text, t.vote_count))
        .collect())
}

async fn latest_poll(conn: &mut PgConnection) -> Result<StoredPoll, StoreError> {
    let row = sqlx::query_as::<_, (i32, String, Json<Vec<String>>, DateTime<Utc>)>(
        "SELECT id, question, options, created_at::timestamptz FROM polls \
         ORDER BY created_at DESC, id DESC LIMIT 1",
    )
    .fetch_optional(&mut *conn)
    .await?;

    let Some((id, question, Json(options), created_at)) = row else {
        return Err(StoreError::NotFound);
    };
    Ok(StoredPoll {
        id: PollId::new(id),
        question,
        options,
        created_at,
    })
}

async fn load_tallies(
    conn: &mut PgConnection,
    poll_id: PollId,
) -> Result<Vec<StoredTally>, StoreError> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT option_text, COALESCE(vote_count, 0)::BIGINT FROM votes \
         WHERE poll_id = $1 ORDER BY option_text",
    )
    .bind(poll_id.get())
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(option_text, vote_count)| StoredTally {
            option_text,
            vote_count,
        })
        .collect())
}

async fn rollback(tx: Transaction<'_, Postgres>, operation: &'static str) {
    if let Err(e) = tx.rollback().await {
        tracing::error!(operation, error = %e, "transaction rollback failed");
    }
}
