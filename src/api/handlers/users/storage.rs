//! SQL storage for the `users` table.
//!
//! Every function issues exactly one parameterized statement. Updates and
//! deletes do not check the affected row count, so targeting a missing id is
//! a successful no-op.

use sqlx::{postgres::PgRow, PgPool, Row};
use thiserror::Error;
use tracing::{info_span, Instrument};

use super::types::User;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("user not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

fn db_span(operation: &'static str) -> tracing::Span {
    info_span!(
        "db.query",
        db.system = "postgresql",
        db.sql.table = "users",
        db.operation = operation
    )
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
    })
}

/// Fetch a single user by primary key.
///
/// # Errors
/// Returns [`StorageError::NotFound`] when no row matches the id.
pub async fn get_user(pool: &PgPool, id: i32) -> Result<User, StorageError> {
    let row = sqlx::query("SELECT id, name, email FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .instrument(db_span("SELECT"))
        .await?;

    match row {
        Some(row) => Ok(user_from_row(&row)?),
        None => Err(StorageError::NotFound),
    }
}

/// List up to `count` users after skipping `start`, in storage order.
///
/// # Errors
/// Returns an error if the query fails.
pub async fn get_users(pool: &PgPool, start: i64, count: i64) -> Result<Vec<User>, StorageError> {
    let rows = sqlx::query("SELECT id, name, email FROM users LIMIT $1 OFFSET $2")
        .bind(count)
        .bind(start)
        .fetch_all(pool)
        .instrument(db_span("SELECT"))
        .await?;

    rows.iter()
        .map(|row| user_from_row(row).map_err(StorageError::from))
        .collect()
}

/// Insert a user and return the id generated by the database.
///
/// # Errors
/// Returns an error if the insert fails, including a duplicate email.
pub async fn create_user(pool: &PgPool, name: &str, email: &str) -> Result<i32, StorageError> {
    let row = sqlx::query("INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(email)
        .fetch_one(pool)
        .instrument(db_span("INSERT"))
        .await?;

    Ok(row.try_get("id")?)
}

/// Overwrite name and email of the user with the given id.
///
/// # Errors
/// Returns an error if the statement fails, e.g. the new email is taken.
pub async fn update_user(
    pool: &PgPool,
    id: i32,
    name: &str,
    email: &str,
) -> Result<(), StorageError> {
    sqlx::query("UPDATE users SET name = $1, email = $2 WHERE id = $3")
        .bind(name)
        .bind(email)
        .bind(id)
        .execute(pool)
        .instrument(db_span("UPDATE"))
        .await?;

    Ok(())
}

/// Permanently delete the user with the given id.
///
/// # Errors
/// Returns an error if the statement fails.
pub async fn delete_user(pool: &PgPool, id: i32) -> Result<(), StorageError> {
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .instrument(db_span("DELETE"))
        .await?;

    Ok(())
}
