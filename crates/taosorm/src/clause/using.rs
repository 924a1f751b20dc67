//! `USING <stable>(<tag names>) TAGS(<tag values>)`: create the target table
//! from a super-table on first insert.

use super::{Builder, Clause, ClauseExpr, Expression};
use crate::value::Value;
use std::collections::BTreeMap;

/// The `USING` clause.
///
/// Tags render in ascending name order.
#[derive(Debug, Clone, PartialEq)]
pub struct Using {
    stable: String,
    tags: BTreeMap<String, Value>,
}

impl Using {
    pub fn new(stable: impl Into<String>, tags: BTreeMap<String, Value>) -> Self {
        Self {
            stable: stable.into(),
            tags,
        }
    }

    /// `USING <stable>` with no tags yet.
    pub fn stable(stable: impl Into<String>) -> Self {
        Self::new(stable, BTreeMap::new())
    }

    /// Add or replace a tag value.
    pub fn add_tag_pair(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.tags.insert(name.into(), value.into());
        self
    }

    pub fn tags(&self) -> &BTreeMap<String, Value> {
        &self.tags
    }
}

impl Expression for Using {
    fn build(&self, builder: &mut dyn Builder) {
        builder.write_str("USING ");
        builder.write_str(&self.stable);
        builder.add_var_list(self.tags.keys().map(|k| Value::from(k.as_str())).collect());
        builder.write_str(" TAGS");
        builder.add_var_list(self.tags.values().cloned().collect());
    }
}

impl ClauseExpr for Using {
    fn name(&self) -> &'static str {
        "USING"
    }

    fn merge_clause(self: Box<Self>, clause: &mut Clause) {
        clause.name.clear();
        clause.expression = Some(self);
    }
}
