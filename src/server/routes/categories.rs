use std::collections::BTreeMap;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        Question, QuestionFilter,
    },
    pagination::PageQuery,
    server::{app::AppState, error::ApiError},
};

use super::{page_or_first, ApiResponse};

#[derive(Serialize)]
struct CategoriesResponse {
    success: bool,
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct CategoryQuestions {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    current_category: Option<String>,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesResponse>> {
    let categories = categories::get_category_types(&pool).await?;
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(CategoriesResponse {
        success: true,
        categories,
    }))
}

// an empty category is a 422 here while the other listings answer 404, clients rely on it
async fn get_category_questions(
    State(pool): State<SqlitePool>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResponse<Json<CategoryQuestions>> {
    let page = page_or_first(query);
    let Path(category_id) = path.map_err(|_| ApiError::NotFound)?;
    let current_category = categories::get_category(&pool, category_id)
        .await?
        .map(|c| c.kind);

    let filter = QuestionFilter::Category(category_id);
    let total_questions = questions::count_questions(&pool, filter).await?;
    if total_questions == 0 {
        return Err(ApiError::Unprocessable(format!(
            "no questions in category {category_id}"
        )));
    }
    let questions = questions::get_questions_page(&pool, filter, page.window()).await?;

    Ok(Json(CategoryQuestions {
        success: true,
        questions,
        total_questions,
        current_category,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(get_category_questions))
        .with_state(state)
}
