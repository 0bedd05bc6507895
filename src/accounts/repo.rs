use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Account row as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub balance: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Account {
    pub async fn insert(db: &PgPool, id: Uuid, balance: i64) -> sqlx::Result<Account> {
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (id, balance)
            VALUES ($1, $2)
            RETURNING id, balance, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(balance)
        .fetch_one(db)
        .await
    }

    pub async fn list(db: &PgPool) -> sqlx::Result<Vec<Account>> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, balance, created_at, updated_at
            FROM accounts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await
    }

    /// Exact-match lookup. The id is cast server-side, so malformed text
    /// surfaces as a store error the same way an unparameterized query would.
    pub async fn find_by_id(db: &PgPool, id: &str) -> sqlx::Result<Option<Account>> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, balance, created_at, updated_at
            FROM accounts
            WHERE id = $1::uuid
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Single-statement update: balance and updated_at move together.
    pub async fn update_balance(db: &PgPool, id: Uuid, balance: i64) -> sqlx::Result<Option<Account>> {
        sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET balance = $1, updated_at = now()
            WHERE id = $2
            RETURNING id, balance, created_at, updated_at
            "#,
        )
        .bind(balance)
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Hard delete, returning the row as it existed before removal.
    pub async fn delete(db: &PgPool, id: &str) -> sqlx::Result<Option<Account>> {
        sqlx::query_as::<_, Account>(
            r#"
            DELETE FROM accounts
            WHERE id = $1::uuid
            RETURNING id, balance, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }
}

/// Identity of the backing database: (dbname, user, full version string).
pub async fn connection_info(db: &PgPool) -> sqlx::Result<(String, String, String)> {
    sqlx::query_as::<_, (String, String, String)>(
        r#"
        SELECT current_database()::text, current_user::text, version()
        "#,
    )
    .fetch_one(db)
    .await
}
