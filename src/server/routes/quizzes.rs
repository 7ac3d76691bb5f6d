use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions, Question},
    quiz::{QuizCategory, QuizRng},
    server::app::AppState,
    telemetry::record_quiz_question,
};

use super::{unprocessable, ApiResponse};

#[derive(Debug, Deserialize)]
struct QuizRequest {
    previous_questions: Vec<i64>,
    quiz_category: QuizCategoryBody,
}

// the frontend also sends the category `type`, only the id matters
#[derive(Debug, Deserialize)]
struct QuizCategoryBody {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

#[derive(Serialize)]
struct QuizQuestion {
    success: bool,
    question: Question,
}

async fn next_quiz_question(
    State(pool): State<SqlitePool>,
    State(rng): State<QuizRng>,
    body: Result<Json<QuizRequest>, JsonRejection>,
) -> ApiResponse<Json<QuizQuestion>> {
    let Json(request) = body.map_err(unprocessable)?;
    let category = QuizCategory::from(request.quiz_category.id);

    let pool_questions = questions::get_questions(&pool, category.filter()).await?;
    let question = rng.pick(pool_questions, &request.previous_questions)?;

    tracing::debug!(
        id = question.id,
        category = %category.label(),
        previous = request.previous_questions.len(),
        "Serving quiz question"
    );
    record_quiz_question(&category.label());
    Ok(Json(QuizQuestion {
        success: true,
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_quiz_question))
        .with_state(state)
}
