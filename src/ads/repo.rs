use sqlx::{FromRow, PgExecutor};
use time::OffsetDateTime;

use crate::ads::dto::{CreateAdRequest, UpdateAdRequest};

#[derive(Debug, Clone, FromRow)]
pub struct Advertisement {
    pub id: i32,
    pub header: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
    pub id_user: i32,
}

impl Advertisement {
    pub async fn find_by_id(
        db: impl PgExecutor<'_>,
        id: i32,
    ) -> Result<Option<Advertisement>, sqlx::Error> {
        sqlx::query_as::<_, Advertisement>(
            r#"
            SELECT id, header, description, created_at, id_user
            FROM advertisements
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        db: impl PgExecutor<'_>,
        new: &CreateAdRequest,
    ) -> Result<Advertisement, sqlx::Error> {
        sqlx::query_as::<_, Advertisement>(
            r#"
            INSERT INTO advertisements (header, description, id_user)
            VALUES ($1, $2, $3)
            RETURNING id, header, description, created_at, id_user
            "#,
        )
        .bind(&new.header)
        .bind(&new.description)
        .bind(new.id_user)
        .fetch_one(db)
        .await
    }

    /// Apply a partial update; omitted fields keep their values, `created_at`
    /// is refreshed. Returns `None` when the row does not exist.
    pub async fn apply_patch(
        db: impl PgExecutor<'_>,
        id: i32,
        patch: &UpdateAdRequest,
    ) -> Result<Option<Advertisement>, sqlx::Error> {
        sqlx::query_as::<_, Advertisement>(
            r#"
            UPDATE advertisements
            SET header = COALESCE($2, header),
                description = COALESCE($3, description),
                id_user = COALESCE($4, id_user),
                created_at = now()
            WHERE id = $1
            RETURNING id, header, description, created_at, id_user
            "#,
        )
        .bind(id)
        .bind(&patch.header)
        .bind(&patch.description)
        .bind(patch.id_user)
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: impl PgExecutor<'_>, id: i32) -> Result<bool, sqlx::Error> {
        let res = sqlx::query(r#"DELETE FROM advertisements WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
