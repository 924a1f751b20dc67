//! Statement logging.
//!
//! With the `tracing` feature enabled (the default), executed statements are
//! emitted on the `taosorm.sql` target when [`Config::log_sql`] is set, and
//! statements slower than [`Config::slow_query_threshold_ms`] are reported at
//! warn level regardless.
//!
//! [`Config::log_sql`]: crate::Config::log_sql
//! [`Config::slow_query_threshold_ms`]: crate::Config::slow_query_threshold_ms

use crate::config::Config;
use std::time::Duration;

/// What kind of statement was run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Exec,
    Query,
}

/// Outcome of a statement, for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Rows(u64),
    Error(String),
}

/// Truncate `sql` to at most `max_bytes`, respecting char boundaries.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

pub(crate) fn display_sql(sql: &str, max_sql_length: Option<usize>) -> String {
    match max_sql_length {
        Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
        _ => sql.to_string(),
    }
}

/// Report a finished statement. `sql` is the explained statement.
#[cfg(feature = "tracing")]
pub(crate) fn report(
    config: &Config,
    kind: QueryKind,
    sql: &str,
    elapsed: Duration,
    outcome: &QueryOutcome,
) {
    let slow = config
        .slow_query_threshold_duration()
        .is_some_and(|threshold| elapsed > threshold);
    if !config.log_sql && !slow {
        return;
    }

    let sql = display_sql(sql, config.max_sql_length);
    let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
    match outcome {
        QueryOutcome::Rows(rows) if slow => tracing::warn!(
            target: "taosorm.sql",
            kind = ?kind,
            elapsed_ms,
            rows,
            sql = %sql,
            "slow query"
        ),
        QueryOutcome::Rows(rows) => tracing::debug!(
            target: "taosorm.sql",
            kind = ?kind,
            elapsed_ms,
            rows,
            sql = %sql,
        ),
        QueryOutcome::Error(error) => tracing::debug!(
            target: "taosorm.sql",
            kind = ?kind,
            elapsed_ms,
            error = %error,
            sql = %sql,
        ),
    }
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn report(
    _config: &Config,
    _kind: QueryKind,
    _sql: &str,
    _elapsed: Duration,
    _outcome: &QueryOutcome,
) {
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_sql_bytes("SELECT 1", 100), "SELECT 1");
        assert_eq!(truncate_sql_bytes("SELECT 1", 6), "SELECT");
        // 'é' is two bytes; cutting inside it backs off to the boundary.
        assert_eq!(truncate_sql_bytes("aé", 2), "a");
    }

    #[test]
    fn display_sql_appends_ellipsis_only_when_truncated() {
        assert_eq!(display_sql("SELECT * FROM tb_1", Some(6)), "SELECT...");
        assert_eq!(display_sql("SELECT 1", Some(200)), "SELECT 1");
        assert_eq!(display_sql("SELECT 1", None), "SELECT 1");
    }
}
