//! Users repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::User,
};

const USER_COLUMNS: &str = "id, username, password, full_name, account_created_on";

pub const USERNAME_TAKEN: &str = "That username is already taken. Please choose another one.";

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

/// Unique index violations become a user-facing conflict
fn map_unique_violation(e: sqlx::Error) -> AppError {
    let taken = matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation());
    if taken {
        AppError::Conflict(USERNAME_TAKEN.to_string())
    } else {
        AppError::Database(e)
    }
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by username (case-insensitive)
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE LOWER(username) = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Check if username already exists
    pub async fn exists(&self, username: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(username) = LOWER($1))",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Create a new user; `password_hash` is already hashed
    pub async fn create(&self, username: &str, password_hash: &str, full_name: &str) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, password, full_name)
            VALUES (LOWER($1), $2, $3)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(username)
        .bind(password_hash)
        .bind(full_name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)
    }

    /// Change username and full name
    pub async fn update_profile(&self, id: i32, username: &str, full_name: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET username = LOWER($1), full_name = $2
            WHERE id = $3
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(username)
        .bind(full_name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)
    }

    /// Delete a user. Books they hold go back on the shelf in the same transaction.
    pub async fn delete(&self, username: &str) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let released = sqlx::query(
            r#"
            UPDATE books SET status = 'available', user_id = NULL
            WHERE user_id = (SELECT id FROM users WHERE LOWER(username) = LOWER($1))
            "#,
        )
        .bind(username)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let deleted = sqlx::query("DELETE FROM users WHERE LOWER(username) = LOWER($1)")
            .bind(username)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        if released > 0 {
            tracing::info!("Released {} book(s) held by deleted user '{}'", released, username);
        }

        Ok(deleted > 0)
    }

    /// Every account except the admin, by full name
    pub async fn list_members(&self, admin_username: &str) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE LOWER(username) != LOWER($1) ORDER BY full_name, username",
            USER_COLUMNS
        ))
        .bind(admin_username)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
