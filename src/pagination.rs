use serde::{Deserialize, Deserializer};

pub const QUESTIONS_PER_PAGE: i64 = 10;

/// `?page=N` query string of the paginated question endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page", deserialize_with = "deserialize_page")]
    pub page: i64,
}

impl Default for PageQuery {
    fn default() -> Self {
        PageQuery { page: first_page() }
    }
}

impl PageQuery {
    pub fn window(&self) -> Window {
        Window::for_page(self.page)
    }
}

/// Row range `[offset, offset + limit)` of the id-ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: i64,
    pub limit: i64,
}

impl Window {
    pub fn for_page(page: i64) -> Self {
        if page < 1 {
            return Window {
                offset: 0,
                limit: 0,
            };
        }
        Window {
            offset: (page - 1).saturating_mul(QUESTIONS_PER_PAGE),
            limit: QUESTIONS_PER_PAGE,
        }
    }

    /// Applies the window to rows that were already fetched in id order.
    pub fn slice<T>(&self, rows: Vec<T>) -> Vec<T> {
        let offset = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit).unwrap_or(0);
        rows.into_iter().skip(offset).take(limit).collect()
    }
}

fn first_page() -> i64 {
    1
}

// anything that is not an integer falls back to the first page instead of rejecting the request
fn deserialize_page<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or_else(first_page))
}
