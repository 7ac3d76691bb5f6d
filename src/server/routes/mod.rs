mod categories;
mod questions;
mod quizzes;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;
use serde::Serialize;

use super::error::ApiError;
use crate::pagination::PageQuery;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

pub type ApiResponse<T> = Result<T, ApiError>;

#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

pub fn success() -> Json<Success> {
    Json(Success { success: true })
}

// body rejections are mapped per endpoint, so handlers take `Result<Json<T>, JsonRejection>`
fn unprocessable(rejection: JsonRejection) -> ApiError {
    ApiError::Unprocessable(rejection.body_text())
}

fn bad_request(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(rejection.body_text())
}

// a query string that does not parse at all (e.g. `?page=1&page=2`) is treated like a missing page
fn page_or_first(query: Result<Query<PageQuery>, QueryRejection>) -> PageQuery {
    query.map(|Query(page)| page).unwrap_or_default()
}
