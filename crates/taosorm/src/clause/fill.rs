//! `FILL(<mode>[,<value>])` for empty time-window buckets.

use super::{Builder, Clause, ClauseExpr, Expression};

/// How empty buckets are synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillType {
    None,
    Value,
    Prev,
    Null,
    Linear,
    Next,
}

impl FillType {
    pub fn as_str(self) -> &'static str {
        match self {
            FillType::None => "NONE",
            FillType::Value => "VALUE",
            FillType::Prev => "PREV",
            FillType::Null => "NULL",
            FillType::Linear => "LINEAR",
            FillType::Next => "NEXT",
        }
    }
}

/// The `FILL` clause.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    fill_type: FillType,
    value: f64,
}

impl Fill {
    pub fn new(fill_type: FillType) -> Self {
        Self {
            fill_type,
            value: 0.0,
        }
    }

    /// `FILL (VALUE,<value>)`.
    pub fn value(value: f64) -> Self {
        Self::new(FillType::Value).with_value(value)
    }

    pub fn null() -> Self {
        Self::new(FillType::Null)
    }

    pub fn prev() -> Self {
        Self::new(FillType::Prev)
    }

    pub fn next() -> Self {
        Self::new(FillType::Next)
    }

    pub fn linear() -> Self {
        Self::new(FillType::Linear)
    }

    /// Set the constant used by `VALUE` fills; other modes ignore it.
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn fill_type(&self) -> FillType {
        self.fill_type
    }
}

impl Expression for Fill {
    fn build(&self, builder: &mut dyn Builder) {
        builder.write_char('(');
        builder.write_str(self.fill_type.as_str());
        if self.fill_type == FillType::Value {
            builder.write_char(',');
            builder.write_str(&self.value.to_string());
        }
        builder.write_char(')');
    }
}

impl ClauseExpr for Fill {
    fn name(&self) -> &'static str {
        "FILL"
    }

    // Keeps the clause name, so the keyword is written by `Clause::build`.
    fn merge_clause(self: Box<Self>, clause: &mut Clause) {
        clause.expression = Some(self);
    }
}
