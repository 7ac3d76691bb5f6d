use std::collections::BTreeMap;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        NewQuestion, Question, QuestionFilter,
    },
    pagination::PageQuery,
    server::{app::AppState, error::ApiError},
    telemetry::record_question_change,
};

use super::{bad_request, page_or_first, success, unprocessable, ApiResponse, Success};

// category and difficulty come as numbers or as numeric strings depending on the client
#[derive(Debug, Deserialize)]
struct CreateQuestion {
    question: String,
    answer: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    difficulty: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    category: i64,
}

#[derive(Debug, Deserialize)]
struct SearchQuestions {
    #[serde(rename = "searchTerm")]
    search_term: String,
}

#[derive(Serialize)]
struct QuestionListing {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    categories: BTreeMap<i64, String>,
    current_category: Option<String>,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    current_category: Option<String>,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResponse<Json<QuestionListing>> {
    let page = page_or_first(query);
    let total_questions = questions::count_questions(&pool, QuestionFilter::All).await?;
    if total_questions == 0 {
        return Err(ApiError::NotFound);
    }
    let questions =
        questions::get_questions_page(&pool, QuestionFilter::All, page.window()).await?;

    Ok(Json(QuestionListing {
        success: true,
        questions,
        total_questions,
        categories: categories::get_category_types(&pool).await?,
        current_category: None,
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    body: Result<Json<CreateQuestion>, JsonRejection>,
) -> ApiResponse<Json<Success>> {
    let Json(new_question) = body.map_err(unprocessable)?;
    let id = questions::create_question(
        &pool,
        NewQuestion {
            question: &new_question.question,
            answer: &new_question.answer,
            category: new_question.category,
            difficulty: new_question.difficulty,
        },
    )
    .await?;

    tracing::info!(id, category = new_question.category, "Created question");
    record_question_change("create");
    Ok(success())
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResponse<Json<Success>> {
    let Path(id) = path.map_err(|_| ApiError::NotFound)?;
    match questions::delete_question(&pool, id).await {
        Ok(()) => {
            tracing::info!(id, "Deleted question");
            record_question_change("delete");
            Ok(success())
        }
        Err(sqlx::Error::RowNotFound) => Err(ApiError::Unprocessable(format!(
            "question {id} does not exist"
        ))),
        Err(e) => Err(e.into()),
    }
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    query: Result<Query<PageQuery>, QueryRejection>,
    body: Result<Json<SearchQuestions>, JsonRejection>,
) -> ApiResponse<Json<SearchResults>> {
    let page = page_or_first(query);
    let Json(SearchQuestions { search_term }) = body.map_err(bad_request)?;

    let matches = questions::search_questions(&pool, &search_term).await?;
    if matches.is_empty() {
        return Err(ApiError::NotFound);
    }
    let total_questions = matches.len() as i64;
    let questions = page.window().slice(matches);

    Ok(Json(SearchResults {
        success: true,
        questions,
        total_questions,
        current_category: None,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}
