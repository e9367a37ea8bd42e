use std::time::Duration;

/// Progress after `index` of `total` documents have been handled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub index: usize,
    pub total: usize,
    pub elapsed: Duration,
}

impl ProgressSnapshot {
    pub fn new(index: usize, total: usize, elapsed: Duration) -> Self {
        Self {
            index,
            total,
            elapsed,
        }
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.index as f64 / self.total as f64 * 100.0
    }

    pub fn per_doc_secs(&self) -> f64 {
        if self.index == 0 {
            return 0.0;
        }
        self.elapsed.as_secs_f64() / self.index as f64
    }

    pub fn remaining_secs(&self) -> f64 {
        self.per_doc_secs() * self.total.saturating_sub(self.index) as f64
    }

    pub fn render(&self) -> String {
        format!(
            "  {}/{} [{:5.1}%] {:.0}s elapsed, ~{:.0}s left, {:.1}s/doc",
            self.index,
            self.total,
            self.percent(),
            self.elapsed.as_secs_f64(),
            self.remaining_secs(),
            self.per_doc_secs()
        )
    }
}

pub fn render_summary(processed: usize, total: usize, errors: usize, elapsed: Duration) -> String {
    let mut out = format!("Gotowe: {processed}/{total}");
    if errors > 0 {
        out.push_str(&format!(" (błędy: {errors})"));
    }
    out.push_str(&format!("\nCzas: {:.0}s", elapsed.as_secs_f64()));
    out
}
