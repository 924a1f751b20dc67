//! Time-window clauses for aggregation queries.
//!
//! - `SESSION(ts_col, tol_val)`
//! - `STATE_WINDOW(col)`
//! - `INTERVAL(interval_val [, interval_offset]) [SLIDING(sliding_val)]`

use super::{Builder, Clause, ClauseExpr, Expression};

pub use super::duration::{Duration, Unit};

#[derive(Debug, Clone, PartialEq, Eq)]
enum WindowKind {
    Session {
        ts_column: String,
        tolerance: Duration,
    },
    State {
        column: String,
    },
    Interval {
        interval: Duration,
        offset: Option<Duration>,
        sliding: Option<Duration>,
    },
}

/// The `WINDOW` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    kind: WindowKind,
}

impl Window {
    /// Session window: rows whose timestamps are within `tolerance` of each
    /// other fall into one window.
    pub fn session(ts_column: impl Into<String>, tolerance: Duration) -> Self {
        Self {
            kind: WindowKind::Session {
                ts_column: ts_column.into(),
                tolerance,
            },
        }
    }

    /// State window: consecutive rows with the same value of `column`.
    pub fn state(column: impl Into<String>) -> Self {
        Self {
            kind: WindowKind::State {
                column: column.into(),
            },
        }
    }

    /// Fixed-size interval window.
    pub fn interval(interval: Duration) -> Self {
        Self {
            kind: WindowKind::Interval {
                interval,
                offset: None,
                sliding: None,
            },
        }
    }

    /// Set the interval offset. Ignored for session and state windows.
    pub fn with_offset(mut self, offset: Duration) -> Self {
        if let WindowKind::Interval { offset: slot, .. } = &mut self.kind {
            *slot = Some(offset);
        }
        self
    }

    /// Set the sliding step. Ignored for session and state windows.
    pub fn with_sliding(mut self, sliding: Duration) -> Self {
        if let WindowKind::Interval { sliding: slot, .. } = &mut self.kind {
            *slot = Some(sliding);
        }
        self
    }
}

impl Expression for Window {
    fn build(&self, builder: &mut dyn Builder) {
        match &self.kind {
            WindowKind::Session {
                ts_column,
                tolerance,
            } => {
                builder.write_str("SESSION(");
                builder.write_str(ts_column);
                builder.write_char(',');
                tolerance.write_to(builder);
                builder.write_char(')');
            }
            WindowKind::State { column } => {
                builder.write_str("STATE_WINDOW(");
                builder.write_str(column);
                builder.write_char(')');
            }
            WindowKind::Interval {
                interval,
                offset,
                sliding,
            } => {
                builder.write_str("INTERVAL(");
                interval.write_to(builder);
                if let Some(offset) = offset {
                    builder.write_char(',');
                    offset.write_to(builder);
                }
                builder.write_char(')');
                if let Some(sliding) = sliding {
                    builder.write_str(" SLIDING(");
                    sliding.write_to(builder);
                    builder.write_char(')');
                }
            }
        }
    }
}

impl ClauseExpr for Window {
    fn name(&self) -> &'static str {
        "WINDOW"
    }

    fn merge_clause(self: Box<Self>, clause: &mut Clause) {
        clause.name.clear();
        clause.expression = Some(self);
    }
}
