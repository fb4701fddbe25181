use sqlx::PgExecutor;
use uuid::Uuid;

use crate::database::{models::UserIdentity, utils::sql};

pub async fn find(
    ex: impl PgExecutor<'_>,
    user_id: Uuid,
) -> Result<Option<UserIdentity>, sqlx::Error> {
    sqlx::query_as::<_, UserIdentity>(&sql(r#"
        SELECT
            id,
            name,
            email,
            email_verified,
            created_at,
            updated_at
        FROM
            users
        WHERE
            id = ?
    "#))
    .bind(user_id)
    .fetch_optional(ex)
    .await
}
