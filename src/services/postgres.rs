use chrono::NaiveDate;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::core::feed::CandidateSource;
use crate::core::filters::{CandidateFilter, SqlValue};
use crate::core::swipe_guard::{AppendOutcome, SwipeStore};
use crate::models::{Card, Package, Preference, PreferencesRequest, PreferredGender, Swipe, SwipeDirection};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// PostgreSQL client for all persisted state
///
/// Holds the single connection pool; queries are parameter-bound SQL text.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
        idle_timeout_secs: u64,
    ) -> Result<Self, PostgresError> {
        // Every statement gets a server-side deadline, so a slow query can
        // never hold a request open past the same bound used for acquires
        let statement_timeout_ms = (acquire_timeout_secs * 1_000).to_string();
        let connect_options: PgConnectOptions = database_url
            .parse::<PgConnectOptions>()?
            .options([("statement_timeout", statement_timeout_ms.as_str())]);

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(idle_timeout_secs))
            .test_before_acquire(true)
            .connect_with(connect_options)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            acquire_timeout_secs.unwrap_or(5),
            idle_timeout_secs.unwrap_or(600),
        )
        .await
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    // ---- users ----

    /// Insert a new user row, returning its id
    pub async fn create_user(&self, phone_number: &str) -> Result<i64, PostgresError> {
        let result = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (phone_number) VALUES ($1) RETURNING id",
        )
        .bind(phone_number)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(id) => {
                tracing::debug!("Created user {} for phone {}", id, phone_number);
                Ok(id)
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(
                PostgresError::Conflict("phone number already registered".to_string()),
            ),
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a non-deleted user by phone number
    pub async fn find_user_id_by_phone(
        &self,
        phone_number: &str,
    ) -> Result<Option<i64>, PostgresError> {
        let id = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM users WHERE phone_number = $1 AND is_deleted = FALSE",
        )
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }

    /// Flip the verified flag and stamp login time after a successful
    /// passcode check
    pub async fn mark_verified(&self, user_id: i64) -> Result<(), PostgresError> {
        sqlx::query("UPDATE users SET verified = TRUE, login_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // ---- one-time passcodes ----

    /// Store the hashed passcode for a user; one live passcode per user
    pub async fn save_otp(&self, user_id: i64, otp_hash: &str) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO otp_credentials (user_id, otp_hash, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET
                otp_hash = EXCLUDED.otp_hash,
                created_at = EXCLUDED.created_at
        "#;

        sqlx::query(query)
            .bind(user_id)
            .bind(otp_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Fetch the stored passcode hash for a user
    pub async fn otp_hash(&self, user_id: i64) -> Result<Option<String>, PostgresError> {
        let hash = sqlx::query_scalar::<_, String>(
            "SELECT otp_hash FROM otp_credentials WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hash)
    }

    /// Remove the passcode after a successful verification (single use)
    pub async fn clear_otp(&self, user_id: i64) -> Result<(), PostgresError> {
        sqlx::query("DELETE FROM otp_credentials WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // ---- preferences ----

    /// Stored preferences, if the user ever saved any
    pub async fn get_preferences(
        &self,
        user_id: i64,
    ) -> Result<Option<Preference>, PostgresError> {
        let query = r#"
            SELECT id, user_id, date_mode, bff_mode, preferred_gender,
                   min_age, max_age, created_at, updated_at
            FROM preferences
            WHERE user_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| Preference {
            id: row.get("id"),
            user_id: row.get("user_id"),
            date_mode: row.get("date_mode"),
            bff_mode: row.get("bff_mode"),
            preferred_gender: PreferredGender::from_column(
                row.get::<String, _>("preferred_gender").as_str(),
            ),
            min_age: row.get("min_age"),
            max_age: row.get("max_age"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }))
    }

    /// Create or update the user's preferences row
    pub async fn upsert_preferences(
        &self,
        user_id: i64,
        update: &PreferencesRequest,
    ) -> Result<Preference, PostgresError> {
        let query = r#"
            INSERT INTO preferences
                (user_id, date_mode, bff_mode, preferred_gender, min_age, max_age, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET
                date_mode = EXCLUDED.date_mode,
                bff_mode = EXCLUDED.bff_mode,
                preferred_gender = EXCLUDED.preferred_gender,
                min_age = EXCLUDED.min_age,
                max_age = EXCLUDED.max_age,
                updated_at = NOW()
            RETURNING id, user_id, date_mode, bff_mode, preferred_gender,
                      min_age, max_age, created_at, updated_at
        "#;

        let gender = PreferredGender::from_column(&update.preferred_gender);

        let row = sqlx::query(query)
            .bind(user_id)
            .bind(update.date_mode)
            .bind(update.bff_mode)
            .bind(gender.as_str())
            .bind(update.min_age)
            .bind(update.max_age)
            .fetch_one(&self.pool)
            .await?;

        Ok(Preference {
            id: row.get("id"),
            user_id: row.get("user_id"),
            date_mode: row.get("date_mode"),
            bff_mode: row.get("bff_mode"),
            preferred_gender: gender,
            min_age: row.get("min_age"),
            max_age: row.get("max_age"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    // ---- packages ----

    pub async fn create_package(
        &self,
        name: &str,
        feature: &str,
        price: f64,
        currency: &str,
    ) -> Result<i64, PostgresError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO packages (name, feature, price, currency, created_at) \
             VALUES ($1, $2, $3, $4, NOW()) RETURNING id",
        )
        .bind(name)
        .bind(feature)
        .bind(price)
        .bind(currency)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn list_packages(&self) -> Result<Vec<Package>, PostgresError> {
        let query = r#"
            SELECT id, name, feature, price, currency, is_deleted, created_at, updated_at
            FROM packages
            WHERE is_deleted = FALSE
            ORDER BY id ASC
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        Ok(rows
            .iter()
            .map(|row| Package {
                id: row.get("id"),
                name: row.get("name"),
                feature: row.get("feature"),
                price: row.get("price"),
                currency: row.get("currency"),
                is_deleted: row.get("is_deleted"),
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
            })
            .collect())
    }

    /// Update a live package; false when no such package exists
    pub async fn update_package(
        &self,
        id: i64,
        name: &str,
        feature: &str,
        price: f64,
        currency: &str,
    ) -> Result<bool, PostgresError> {
        let result = sqlx::query(
            "UPDATE packages SET name = $1, feature = $2, price = $3, currency = $4, \
             updated_at = NOW() WHERE id = $5 AND is_deleted = FALSE",
        )
        .bind(name)
        .bind(feature)
        .bind(price)
        .bind(currency)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete a package; false when no such package exists
    pub async fn delete_package(&self, id: i64) -> Result<bool, PostgresError> {
        let result = sqlx::query(
            "UPDATE packages SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // ---- purchases ----

    /// Append to the purchase ledger and flag the buyer premium, atomically
    pub async fn record_purchase(
        &self,
        user_id: i64,
        package_id: i64,
    ) -> Result<i64, PostgresError> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM packages WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(package_id)
        .fetch_optional(&mut *tx)
        .await?;

        if exists.is_none() {
            return Err(PostgresError::NotFound(format!(
                "package {} not found",
                package_id
            )));
        }

        let purchase_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO purchases (user_id, package_id, purchase_date, created_at) \
             VALUES ($1, $2, NOW(), NOW()) RETURNING id",
        )
        .bind(user_id)
        .bind(package_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET is_premium = TRUE WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Recorded purchase {} (user {}, package {})",
            purchase_id,
            user_id,
            package_id
        );

        Ok(purchase_id)
    }
}

impl SwipeStore for PostgresClient {
    type Error = PostgresError;

    /// Atomic quota check + insert
    ///
    /// Same-swiper appends serialize on a transaction-scoped advisory lock,
    /// so the count cannot go stale between the check and the insert.
    /// Duplicates never reach the count: the unique index on
    /// (swiper_id, profile_id, swipe_day) makes the insert a no-op and we
    /// report that as `AlreadySwiped`.
    async fn append_swipe(
        &self,
        swiper_id: i64,
        profile_id: i64,
        direction: SwipeDirection,
        day: NaiveDate,
        quota: u32,
    ) -> Result<AppendOutcome, PostgresError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(swiper_id)
            .execute(&mut *tx)
            .await?;

        let swiped_today = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM swipes WHERE swiper_id = $1 AND swipe_day = $2",
        )
        .bind(swiper_id)
        .bind(day)
        .fetch_one(&mut *tx)
        .await?;

        if swiped_today >= quota as i64 {
            tx.rollback().await?;
            return Ok(AppendOutcome::QuotaExhausted {
                swiped_today: swiped_today as u32,
            });
        }

        let row = sqlx::query(
            "INSERT INTO swipes (swiper_id, profile_id, direction, swiped_at, swipe_day) \
             VALUES ($1, $2, $3, NOW(), $4) \
             ON CONFLICT (swiper_id, profile_id, swipe_day) DO NOTHING \
             RETURNING id, swiped_at",
        )
        .bind(swiper_id)
        .bind(profile_id)
        .bind(direction.as_str())
        .bind(day)
        .fetch_optional(&mut *tx)
        .await?;

        match row {
            Some(row) => {
                tx.commit().await?;
                Ok(AppendOutcome::Inserted(Swipe {
                    id: row.get("id"),
                    swiper_id,
                    profile_id,
                    direction,
                    swiped_at: row.get("swiped_at"),
                    swipe_day: day,
                }))
            }
            None => {
                tx.rollback().await?;
                Ok(AppendOutcome::AlreadySwiped)
            }
        }
    }
}

impl CandidateSource for PostgresClient {
    type Error = PostgresError;

    async fn candidates(&self, filter: &CandidateFilter) -> Result<Vec<Card>, PostgresError> {
        let (sql, params) = filter.to_sql();

        let mut query = sqlx::query(&sql);
        for param in params {
            query = match param {
                SqlValue::Int(value) => query.bind(value),
                SqlValue::Text(value) => query.bind(value),
            };
        }

        let rows = query.fetch_all(&self.pool).await?;

        let cards: Vec<Card> = rows
            .iter()
            .map(|row| Card {
                user_id: row.get("user_id"),
                verified: row.get("verified"),
                name: row.get("name"),
                age: row.get("age"),
                bio: row.get("bio"),
                photo_url: row.get("photo_url"),
            })
            .collect();

        tracing::debug!(
            "Candidate query for viewer {} returned {} rows",
            filter.viewer_id(),
            cards.len()
        );

        Ok(cards)
    }
}
