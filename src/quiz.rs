use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::db::{Question, QuestionFilter};

/// Quiz category as sent by the client, where id 0 stands for every category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizCategory {
    All,
    Only(i64),
}

impl From<i64> for QuizCategory {
    fn from(id: i64) -> Self {
        match id {
            0 => QuizCategory::All,
            id => QuizCategory::Only(id),
        }
    }
}

impl QuizCategory {
    pub fn filter(self) -> QuestionFilter {
        match self {
            QuizCategory::All => QuestionFilter::All,
            QuizCategory::Only(id) => QuestionFilter::Category(id),
        }
    }

    pub fn label(self) -> String {
        match self {
            QuizCategory::All => "all".to_owned(),
            QuizCategory::Only(id) => id.to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("no questions in the selected category")]
    EmptyPool,
    #[error("every question of the selected category was already asked")]
    Exhausted,
}

/// Picks one question uniformly among those not listed in `previous`.
pub fn pick_question<R: Rng + ?Sized>(
    pool: Vec<Question>,
    previous: &[i64],
    rng: &mut R,
) -> Result<Question, QuizError> {
    if pool.is_empty() {
        return Err(QuizError::EmptyPool);
    }
    let previous: HashSet<i64> = previous.iter().copied().collect();
    let mut remaining: Vec<Question> = pool
        .into_iter()
        .filter(|q| !previous.contains(&q.id))
        .collect();
    if remaining.is_empty() {
        return Err(QuizError::Exhausted);
    }
    let idx = rng.gen_range(0..remaining.len());
    Ok(remaining.swap_remove(idx))
}

/// Random source shared by request handlers.
#[derive(Clone)]
pub struct QuizRng(Arc<Mutex<StdRng>>);

impl QuizRng {
    pub fn seeded(seed: u64) -> Self {
        QuizRng(Arc::new(Mutex::new(StdRng::seed_from_u64(seed))))
    }

    pub fn from_entropy() -> Self {
        QuizRng(Arc::new(Mutex::new(StdRng::from_entropy())))
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map(Self::seeded).unwrap_or_else(Self::from_entropy)
    }

    pub fn pick(&self, pool: Vec<Question>, previous: &[i64]) -> Result<Question, QuizError> {
        let mut rng = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        pick_question(pool, previous, &mut *rng)
    }
}
