//! SQLite storage for prediction logs and user accounts.

use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::model::{PredictionRecord, UserAccount};
use crate::schema::HarvestInput;

/// Creates a connection pool to the SQLite database.
///
/// # Errors
///
/// Returns an error if the connection to the database fails.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Creates the `prediksi` and `users` tables if they do not exist yet.
///
/// # Errors
///
/// Returns an error if a statement fails.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS prediksi (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            luas_panen REAL NOT NULL,
            bibit REAL NOT NULL,
            pupuk_npk REAL NOT NULL,
            pupuk_urea REAL NOT NULL,
            obat_insectisida REAL NOT NULL,
            hasil_panen REAL NOT NULL,
            created_at DATETIME NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub struct PredictionRepository;

impl PredictionRepository {
    /// Stores one prediction together with the inputs it was made from.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create(
        pool: &SqlitePool,
        input: &HarvestInput,
        hasil_panen: f64,
    ) -> Result<PredictionRecord, sqlx::Error> {
        sqlx::query_as::<_, PredictionRecord>(
            r#"
            INSERT INTO prediksi (luas_panen, bibit, pupuk_npk, pupuk_urea, obat_insectisida, hasil_panen, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, luas_panen, bibit, pupuk_npk, pupuk_urea, obat_insectisida, hasil_panen, created_at
            "#,
        )
        .bind(input.luas_panen)
        .bind(input.bibit)
        .bind(input.pupuk_npk)
        .bind(input.pupuk_urea)
        .bind(input.obat_insectisida)
        .bind(hasil_panen)
        .bind(Utc::now().naive_utc())
        .fetch_one(pool)
        .await
    }

    /// Lists every stored prediction in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<PredictionRecord>, sqlx::Error> {
        sqlx::query_as::<_, PredictionRecord>(
            r#"
            SELECT id, luas_panen, bibit, pupuk_npk, pupuk_urea, obat_insectisida, hasil_panen, created_at
            FROM prediksi
            ORDER BY id ASC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM prediksi")
            .fetch_one(pool)
            .await
    }
}

pub struct UserRepository;

impl UserRepository {
    /// Finds the account whose username and password both match exactly.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn find_by_credentials(
        pool: &SqlitePool,
        username: &str,
        password: &str,
    ) -> Result<Option<UserAccount>, sqlx::Error> {
        sqlx::query_as::<_, UserAccount>(
            "SELECT id, username, password FROM users WHERE username = ? AND password = ?",
        )
        .bind(username)
        .bind(password)
        .fetch_optional(pool)
        .await
    }

    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<UserAccount>, sqlx::Error> {
        sqlx::query_as::<_, UserAccount>("SELECT id, username, password FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Inserts a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails, including a unique
    /// violation when the username is already taken.
    pub async fn create(
        pool: &SqlitePool,
        username: &str,
        password: &str,
    ) -> Result<UserAccount, sqlx::Error> {
        sqlx::query_as::<_, UserAccount>(
            "INSERT INTO users (username, password) VALUES (?, ?) RETURNING id, username, password",
        )
        .bind(username)
        .bind(password)
        .fetch_one(pool)
        .await
    }
}

/// True if the error is a unique constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
