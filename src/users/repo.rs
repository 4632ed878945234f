use sqlx::{FromRow, PgExecutor};
use time::OffsetDateTime;

use crate::users::dto::{NewUser, UserPatch};

/// User record in the database. Password stays plaintext, as the service
/// was originally written; it is never serialized back to the client.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub password: String,
    pub email: String,
    pub reg_time: OffsetDateTime,
}

impl User {
    pub async fn find_by_id(
        db: impl PgExecutor<'_>,
        id: i32,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, password, email, reg_time
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn create(db: impl PgExecutor<'_>, new: &NewUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, password, email)
            VALUES ($1, $2, $3)
            RETURNING id, name, password, email, reg_time
            "#,
        )
        .bind(&new.name)
        .bind(&new.password)
        .bind(&new.email)
        .fetch_one(db)
        .await
    }

    /// Apply a partial update; omitted fields keep their values, `reg_time`
    /// is refreshed. Returns `None` when the row does not exist.
    pub async fn apply_patch(
        db: impl PgExecutor<'_>,
        id: i32,
        patch: &UserPatch,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                password = COALESCE($3, password),
                email = COALESCE($4, email),
                reg_time = now()
            WHERE id = $1
            RETURNING id, name, password, email, reg_time
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.password)
        .bind(&patch.email)
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: impl PgExecutor<'_>, id: i32) -> Result<bool, sqlx::Error> {
        let res = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
