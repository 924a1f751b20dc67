//! `SLIMIT` / `SOFFSET`: limits on the number of groups (child tables) a
//! super-table query returns.

use super::basic::merge_limit_offset;
use super::{Builder, Clause, ClauseExpr, Expression};

/// The `SLIMIT` clause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SLimit {
    pub limit: i64,
    pub offset: i64,
}

impl SLimit {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }

    pub fn limit(limit: i64) -> Self {
        Self { limit, offset: 0 }
    }

    pub fn offset(offset: i64) -> Self {
        Self { limit: 0, offset }
    }
}

impl Expression for SLimit {
    fn build(&self, builder: &mut dyn Builder) {
        if self.limit > 0 {
            builder.write_str("SLIMIT ");
            builder.write_str(&self.limit.to_string());
        }
        if self.offset > 0 {
            if self.limit > 0 {
                builder.write_char(' ');
            }
            builder.write_str("SOFFSET ");
            builder.write_str(&self.offset.to_string());
        }
    }
}

impl ClauseExpr for SLimit {
    fn name(&self) -> &'static str {
        "SLIMIT"
    }

    fn merge_clause(self: Box<Self>, clause: &mut Clause) {
        clause.name.clear();
        let prev = clause
            .expression_as::<SLimit>()
            .map(|s| (s.limit, s.offset));
        let (limit, offset) = merge_limit_offset(self.limit, self.offset, prev);
        clause.expression = Some(Box::new(SLimit { limit, offset }));
    }
}
