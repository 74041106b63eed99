//! Query timing and connection pool gauges.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Times one named query for the `db_query_duration_seconds` histogram.
///
/// Created before the query is issued; `record` consumes the timer once
/// the result is back, so a forgotten call shows up as a missing series
/// rather than a wrong one.
pub struct QueryTimer {
    query: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query: &'static str) -> Self {
        Self {
            query,
            start: Instant::now(),
        }
    }

    pub fn record(self) {
        histogram!("db_query_duration_seconds", "query" => self.query)
            .record(self.start.elapsed().as_secs_f64());
    }
}

/// Export the pool's current connection counts as gauges.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("db_connections_total").set(size as f64);
    gauge!("db_connections_idle").set(idle as f64);
    gauge!("db_connections_active").set(size.saturating_sub(idle) as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_timer_holds_name() {
        let timer = QueryTimer::new("list_events");
        assert_eq!(timer.query, "list_events");
    }
}
