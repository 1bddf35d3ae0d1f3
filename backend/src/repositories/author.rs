//! Author repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

/// Author record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthorRecord {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub login: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Public part of an author, as embedded in recipes
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AuthorRow {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

/// Input for registering an author
#[derive(Debug, Clone)]
pub struct CreateAuthor<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub login: &'a str,
    pub password_hash: &'a str,
}

/// Author repository
pub struct AuthorRepository;

impl AuthorRepository {
    pub async fn create(db: &PgPool, input: CreateAuthor<'_>) -> Result<AuthorRecord> {
        let author = sqlx::query_as::<_, AuthorRecord>(
            r#"
            INSERT INTO authors (first_name, last_name, login, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, first_name, last_name, login, password_hash, created_at
            "#,
        )
        .bind(input.first_name)
        .bind(input.last_name)
        .bind(input.login)
        .bind(input.password_hash)
        .fetch_one(db)
        .await?;

        Ok(author)
    }

    pub async fn find_by_login(db: &PgPool, login: &str) -> Result<Option<AuthorRecord>> {
        let author = sqlx::query_as::<_, AuthorRecord>(
            r#"
            SELECT id, first_name, last_name, login, password_hash, created_at
            FROM authors
            WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(db)
        .await?;

        Ok(author)
    }

    pub async fn find_by_id(db: &PgPool, id: i32) -> Result<Option<AuthorRecord>> {
        let author = sqlx::query_as::<_, AuthorRecord>(
            r#"
            SELECT id, first_name, last_name, login, password_hash, created_at
            FROM authors
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(author)
    }

    pub async fn login_exists(db: &PgPool, login: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE login = $1)")
                .bind(login)
                .fetch_one(db)
                .await?;

        Ok(exists)
    }

    /// Public rows for a set of author ids
    pub async fn find_many(conn: &mut PgConnection, ids: &[i32]) -> Result<Vec<AuthorRow>> {
        let authors = sqlx::query_as::<_, AuthorRow>(
            "SELECT id, first_name, last_name FROM authors WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&mut *conn)
        .await?;

        Ok(authors)
    }
}
