//! Clause composition for TDengine statements.
//!
//! A statement is assembled from named clauses. Each clause value implements
//! [`ClauseExpr`]: it knows its clause name, how to merge itself into a clause
//! already stored under that name, and how to render itself into a
//! [`Builder`]. [`Statement::build`] then renders the clauses in the order a
//! caller asks for.
//!
//! # Example
//!
//! ```ignore
//! use taosorm::clause::{From, Select, Statement, window::{Duration, Window}, fill::Fill};
//! use taosorm::TaosDialect;
//!
//! let dialect = TaosDialect::default();
//! let mut stmt = Statement::new(&dialect, "meters");
//! stmt.add_clause(Select::raw("avg(current)"));
//! stmt.add_clause(From::current());
//! stmt.add_clause(Window::interval(Duration::parse("10m")?));
//! stmt.add_clause(Fill::null());
//! stmt.build(&["SELECT", "FROM", "WINDOW", "FILL"]);
//! assert_eq!(stmt.sql(), "SELECT avg(current) FROM meters INTERVAL(10m) FILL (NULL)");
//! ```

mod basic;
pub mod create;
pub mod duration;
pub mod fill;
pub mod slimit;
mod statement;
pub mod using;
pub mod window;

pub use basic::{
    Column, Expr, From, GroupBy, Insert, Limit, Locking, OrderBy, OrderByColumn, Select, Table,
    Values, Where,
};
pub use statement::{ClauseBuilder, ClauseBuilders, Clauses, SqlWriter, Statement};

use crate::value::Value;
use std::any::Any;

/// The SQL-accumulating writer every expression renders into.
pub trait Builder {
    /// Append literal SQL text.
    fn write_str(&mut self, s: &str);

    /// Append a single literal character.
    fn write_char(&mut self, c: char);

    /// Append an identifier through the dialect's quoting rules.
    fn write_quoted(&mut self, name: &str);

    /// Record a bind value and append its placeholder.
    fn add_var(&mut self, value: Value);

    /// Name of the table the statement targets.
    fn current_table(&self) -> &str;

    /// Append `(?,?,...)` for a list of values, recording each value.
    fn add_var_list(&mut self, values: Vec<Value>) {
        self.write_char('(');
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                self.write_char(',');
            }
            self.add_var(value);
        }
        self.write_char(')');
    }
}

/// Anything that renders into a [`Builder`].
pub trait Expression {
    fn build(&self, builder: &mut dyn Builder);
}

/// A clause value that can be attached to a [`Statement`].
pub trait ClauseExpr: Expression + Any + Send + Sync {
    /// Name the clause is stored and ordered under.
    fn name(&self) -> &'static str;

    /// Merge this value into the clause previously stored under [`name`](Self::name).
    ///
    /// On entry `clause.name` is set to the clause name and `clause.expression`
    /// holds the previous value, if any.
    fn merge_clause(self: Box<Self>, clause: &mut Clause);
}

/// A named slot in a statement.
///
/// When `name` is non-empty it is written as a keyword before the expression.
#[derive(Default)]
pub struct Clause {
    pub name: String,
    pub expression: Option<Box<dyn ClauseExpr>>,
}

impl Clause {
    /// Downcast the stored expression to a concrete clause type.
    pub fn expression_as<T: ClauseExpr>(&self) -> Option<&T> {
        let expr: &dyn Any = self.expression.as_deref()?;
        expr.downcast_ref::<T>()
    }

    /// Render the clause: `name ` followed by the expression.
    pub fn build(&self, builder: &mut dyn Builder) {
        let Some(expr) = self.expression.as_deref() else {
            return;
        };
        if !self.name.is_empty() {
            builder.write_str(&self.name);
            builder.write_char(' ');
        }
        expr.build(builder);
    }
}

impl std::fmt::Debug for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clause")
            .field("name", &self.name)
            .field("expression", &self.expression.as_ref().map(|_| "<dyn ClauseExpr>"))
            .finish()
    }
}
