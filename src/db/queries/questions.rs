use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::pagination::Window;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

pub struct NewQuestion<'a> {
    pub question: &'a str,
    pub answer: &'a str,
    pub category: i64,
    pub difficulty: i64,
}

/// Which rows of `questions` a listing covers.
#[derive(Debug, Clone, Copy)]
pub enum QuestionFilter {
    All,
    Category(i64),
}

fn push_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: QuestionFilter) {
    match filter {
        QuestionFilter::All => {}
        QuestionFilter::Category(category) => {
            query.push(" WHERE category = ").push_bind(category);
        }
    }
}

pub async fn count_questions(pool: &SqlitePool, filter: QuestionFilter) -> sqlx::Result<i64> {
    let mut query = QueryBuilder::new("SELECT COUNT(*) FROM questions");
    push_filter(&mut query, filter);
    query.build_query_scalar::<i64>().fetch_one(pool).await
}

pub async fn get_questions(
    pool: &SqlitePool,
    filter: QuestionFilter,
) -> sqlx::Result<Vec<Question>> {
    let mut query =
        QueryBuilder::new("SELECT id, question, answer, category, difficulty FROM questions");
    push_filter(&mut query, filter);
    query.push(" ORDER BY id");
    query.build_query_as::<Question>().fetch_all(pool).await
}

pub async fn get_questions_page(
    pool: &SqlitePool,
    filter: QuestionFilter,
    window: Window,
) -> sqlx::Result<Vec<Question>> {
    let mut query =
        QueryBuilder::new("SELECT id, question, answer, category, difficulty FROM questions");
    push_filter(&mut query, filter);
    query
        .push(" ORDER BY id LIMIT ")
        .push_bind(window.limit)
        .push(" OFFSET ")
        .push_bind(window.offset);
    query.build_query_as::<Question>().fetch_all(pool).await
}

/// Questions whose text contains `term`, ignoring case, ordered by id.
// SQLite's lower() only folds ASCII, so the match runs on Unicode-lowercased text here
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    let needle = term.to_lowercase();
    Ok(get_questions(pool, QuestionFilter::All)
        .await?
        .into_iter()
        .filter(|q| q.question.to_lowercase().contains(&needle))
        .collect())
}

pub async fn create_question(pool: &SqlitePool, new: NewQuestion<'_>) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;

    let id = sqlx::query(
        r#"
        INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(new.question)
    .bind(new.answer)
    .bind(new.category)
    .bind(new.difficulty)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Fails with `RowNotFound` when no question has this id.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<()> {
    let deleted = sqlx::query(
        r#"
        DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();

    if deleted == 0 {
        return Err(sqlx::Error::RowNotFound);
    }
    Ok(())
}

pub async fn import_questions(
    conn: &mut SqliteConnection,
    questions: Vec<Question>,
) -> sqlx::Result<()> {
    for question in questions {
        sqlx::query(
            r#"
            INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                question = excluded.question,
                answer = excluded.answer,
                category = excluded.category,
                difficulty = excluded.difficulty
            "#,
        )
        .bind(question.id)
        .bind(question.question)
        .bind(question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{establish_in_memory, run_migrations};

    async fn seeded_pool() -> SqlitePool {
        let pool = establish_in_memory().await.unwrap();
        run_migrations(&pool).await.unwrap();
        let texts = [
            ("Whose autobiography is entitled 'I Know Why the Caged Bird Sings'?", 4),
            ("What is the heaviest organ in the human body?", 1),
            ("Who discovered penicillin?", 1),
            ("Which 100% cotton fabric is twill woven?", 2),
            ("Quel ÉLÈVE a gagné?", 3),
        ];
        for (question, category) in texts {
            create_question(
                &pool,
                NewQuestion {
                    question,
                    answer: "answer",
                    category,
                    difficulty: 2,
                },
            )
            .await
            .unwrap();
        }
        pool
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let pool = seeded_pool().await;
        let found = search_questions(&pool, "BIRD").await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].question.contains("Caged Bird"));
        assert_eq!(search_questions(&pool, "the").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn search_folds_non_ascii_case() {
        let pool = seeded_pool().await;
        let found = search_questions(&pool, "élève").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].question, "Quel ÉLÈVE a gagné?");
        assert_eq!(search_questions(&pool, "GAGNÉ").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let pool = seeded_pool().await;
        assert_eq!(search_questions(&pool, "%").await.unwrap().len(), 1);
        assert!(search_questions(&pool, "_").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn category_filter_and_window() {
        let pool = seeded_pool().await;
        assert_eq!(
            count_questions(&pool, QuestionFilter::Category(1)).await.unwrap(),
            2
        );
        let page = get_questions_page(
            &pool,
            QuestionFilter::All,
            Window {
                offset: 1,
                limit: 2,
            },
        )
        .await
        .unwrap();
        assert_eq!(page.iter().map(|q| q.id).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[tokio::test]
    async fn deleting_twice_reports_missing_row() {
        let pool = seeded_pool().await;
        delete_question(&pool, 2).await.unwrap();
        assert!(matches!(
            delete_question(&pool, 2).await,
            Err(sqlx::Error::RowNotFound)
        ));
        let remaining: Vec<i64> = get_questions(&pool, QuestionFilter::All)
            .await
            .unwrap()
            .iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(remaining, vec![1, 3, 4, 5]);
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let pool = seeded_pool().await;
        delete_question(&pool, 5).await.unwrap();
        let id = create_question(
            &pool,
            NewQuestion {
                question: "Who invented Peanut Butter?",
                answer: "George Washington Carver",
                category: 4,
                difficulty: 2,
            },
        )
        .await
        .unwrap();
        assert_eq!(id, 6);
    }
}
