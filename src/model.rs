use std::time::Duration;

/// A `documents` row as read for embedding. The `embedding` column itself is
/// never loaded, only filtered on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: i64,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedRunSummary {
    pub total: usize,
    pub processed: usize,
    pub errors: usize,
    pub elapsed: Duration,
}

impl EmbedRunSummary {
    pub fn nothing_pending() -> Self {
        Self {
            total: 0,
            processed: 0,
            errors: 0,
            elapsed: Duration::ZERO,
        }
    }
}
