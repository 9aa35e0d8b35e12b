use std::time::Instant;

/// Counts calls made to external services for diagnostic logging.
#[derive(Debug, Default)]
pub struct RequestCounter {
    count: u64,
    last_request: Option<Instant>,
}

impl RequestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Record one request and log the running total.
    pub fn record(&mut self, what: &str) {
        self.count += 1;
        let now = Instant::now();
        match self.last_request {
            Some(last) => tracing::info!(
                requests = self.count,
                interval_secs = (now - last).as_secs_f64(),
                "{}",
                what
            ),
            None => tracing::info!(requests = self.count, "{} (first request)", what),
        }
        self.last_request = Some(now);
    }
}
