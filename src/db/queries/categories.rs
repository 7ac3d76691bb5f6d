use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

pub async fn get_all_categories(pool: &SqlitePool) -> sqlx::Result<Vec<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, type FROM categories ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_category(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, type FROM categories WHERE categories.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Category id to type, ordered by id.
pub async fn get_category_types(pool: &SqlitePool) -> sqlx::Result<BTreeMap<i64, String>> {
    Ok(get_all_categories(pool)
        .await?
        .into_iter()
        .map(|c| (c.id, c.kind))
        .collect())
}

/// Upserts by id. Runs on the caller's connection so an import can share one transaction.
pub async fn import_categories(
    conn: &mut SqliteConnection,
    categories: Vec<Category>,
) -> sqlx::Result<()> {
    for category in categories {
        sqlx::query(
            r#"
            INSERT INTO categories (id, type) VALUES (?1, ?2)
            ON CONFLICT(id) DO UPDATE SET type = excluded.type
            "#,
        )
        .bind(category.id)
        .bind(category.kind)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{establish_in_memory, run_migrations};

    async fn pool() -> SqlitePool {
        let pool = establish_in_memory().await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    fn category(id: i64, kind: &str) -> Category {
        Category {
            id,
            kind: kind.to_owned(),
        }
    }

    #[tokio::test]
    async fn import_keeps_ids_and_overwrites_types() {
        let pool = pool().await;
        let mut conn = pool.acquire().await.unwrap();
        import_categories(&mut conn, vec![category(3, "Geography"), category(1, "Sience")])
            .await
            .unwrap();
        import_categories(&mut conn, vec![category(1, "Science")])
            .await
            .unwrap();
        drop(conn);

        assert_eq!(
            get_all_categories(&pool).await.unwrap(),
            vec![category(1, "Science"), category(3, "Geography")]
        );
        assert_eq!(get_category(&pool, 2).await.unwrap(), None);
    }

    #[tokio::test]
    async fn category_types_are_keyed_by_id() {
        let pool = pool().await;
        let mut conn = pool.acquire().await.unwrap();
        import_categories(&mut conn, vec![category(2, "Art"), category(1, "Science")])
            .await
            .unwrap();
        drop(conn);
        let types = get_category_types(&pool).await.unwrap();
        assert_eq!(types.len(), 2);
        assert_eq!(types[&1], "Science");
        assert_eq!(types[&2], "Art");
    }

    #[test]
    fn category_serializes_type_field() {
        let json = serde_json::to_value(category(4, "History")).unwrap();
        assert_eq!(json, serde_json::json!({"id": 4, "type": "History"}));
    }
}
