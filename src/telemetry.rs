use prometheus::register_counter_vec;
use prometheus::CounterVec;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

// sqlx logs every statement at info
const DEFAULT_FILTER: &str = "info,sqlx=warn,tower_http=debug";

lazy_static! {
    pub static ref QUIZ_QUESTIONS_SERVED: CounterVec = register_counter_vec!(
        "quiz_questions_served_total",
        "Number of questions served in quiz mode",
        &["category"]
    )
    .unwrap();
    pub static ref QUESTION_CHANGES: CounterVec = register_counter_vec!(
        "question_changes_total",
        "Number of created and deleted questions",
        &["operation"]
    )
    .unwrap();
}

pub fn record_quiz_question(category: &str) {
    QUIZ_QUESTIONS_SERVED.with_label_values(&[category]).inc();
}

pub fn record_question_change(operation: &str) {
    QUESTION_CHANGES.with_label_values(&[operation]).inc();
}

pub fn init_tracing() {
    let span_events = std::env::var("INCLUDE_SPAN_EVENTS")
        .is_ok_and(|value| value.eq_ignore_ascii_case("true"));
    let fmt_layer = fmt::layer().with_span_events(if span_events {
        FmtSpan::ENTER | FmtSpan::EXIT
    } else {
        FmtSpan::NONE
    });
    let filter_layer =
        EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
