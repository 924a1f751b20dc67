//! Statement assembly: clause storage, ordering and the SQL writer.

use super::{Builder, Clause, ClauseExpr};
use crate::dialect::Dialect;
use crate::value::Value;
use std::collections::HashMap;

/// Override for how a named clause is rendered.
///
/// Receives the clause being built, every clause attached to the statement
/// (so it can look at its neighbours), and the writer.
pub type ClauseBuilder = fn(&Clause, &Clauses, &mut dyn Builder);

/// Clause-name to override mapping, usually provided by a dialect.
pub type ClauseBuilders = HashMap<&'static str, ClauseBuilder>;

/// Clauses attached to a statement, keyed by clause name.
#[derive(Debug, Default)]
pub struct Clauses {
    inner: HashMap<String, Clause>,
}

impl Clauses {
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Clause> {
        self.inner.get(name)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn add(&mut self, value: Box<dyn ClauseExpr>) {
        let name = value.name();
        let mut clause = self.inner.remove(name).unwrap_or_default();
        clause.name = name.to_string();
        value.merge_clause(&mut clause);
        self.inner.insert(name.to_string(), clause);
    }
}

/// The [`Builder`] implementation backing a [`Statement`].
pub struct SqlWriter<'a> {
    dialect: &'a dyn Dialect,
    table: String,
    sql: String,
    vars: Vec<Value>,
}

impl<'a> SqlWriter<'a> {
    pub fn new(dialect: &'a dyn Dialect, table: impl Into<String>) -> Self {
        Self {
            dialect,
            table: table.into(),
            sql: String::new(),
            vars: Vec::new(),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn vars(&self) -> &[Value] {
        &self.vars
    }
}

impl Builder for SqlWriter<'_> {
    fn write_str(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    fn write_char(&mut self, c: char) {
        self.sql.push(c);
    }

    fn write_quoted(&mut self, name: &str) {
        self.dialect.quote_to(&mut self.sql, name);
    }

    fn add_var(&mut self, value: Value) {
        self.dialect.bind_var_to(&mut self.sql, &value);
        self.vars.push(value);
    }

    fn current_table(&self) -> &str {
        &self.table
    }
}

/// A statement under construction.
pub struct Statement<'a> {
    clauses: Clauses,
    clause_builders: ClauseBuilders,
    writer: SqlWriter<'a>,
}

impl<'a> Statement<'a> {
    /// Create a statement for `table` with the dialect's clause-builder overrides.
    pub fn new(dialect: &'a dyn Dialect, table: impl Into<String>) -> Self {
        Self {
            clauses: Clauses::default(),
            clause_builders: dialect.clause_builders(),
            writer: SqlWriter::new(dialect, table),
        }
    }

    /// Replace the clause-builder overrides.
    pub fn with_clause_builders(mut self, clause_builders: ClauseBuilders) -> Self {
        self.clause_builders = clause_builders;
        self
    }

    /// Attach a clause, merging it with any clause of the same name.
    pub fn add_clause(&mut self, value: impl ClauseExpr) -> &mut Self {
        self.clauses.add(Box::new(value));
        self
    }

    /// Attach an already boxed clause.
    pub fn add_boxed_clause(&mut self, value: Box<dyn ClauseExpr>) -> &mut Self {
        self.clauses.add(value);
        self
    }

    pub fn clauses(&self) -> &Clauses {
        &self.clauses
    }

    pub fn table(&self) -> &str {
        self.writer.current_table()
    }

    /// Render the named clauses, in order, separated by single spaces.
    ///
    /// Names without an attached clause are skipped, and a clause that renders
    /// nothing leaves no separator behind.
    pub fn build(&mut self, names: &[&str]) -> &mut Self {
        let mut written = !self.writer.sql.is_empty();
        for name in names {
            let Some(clause) = self.clauses.get(name) else {
                continue;
            };
            let mark = self.writer.sql.len();
            if written {
                self.writer.sql.push(' ');
            }
            let body = self.writer.sql.len();
            match self.clause_builders.get(*name) {
                Some(custom) => custom(clause, &self.clauses, &mut self.writer),
                None => clause.build(&mut self.writer),
            }
            if self.writer.sql.len() == body {
                self.writer.sql.truncate(mark);
            } else {
                written = true;
            }
        }
        self
    }

    /// The SQL rendered so far.
    pub fn sql(&self) -> &str {
        self.writer.sql()
    }

    /// The bind values recorded so far, in placeholder order.
    pub fn vars(&self) -> &[Value] {
        self.writer.vars()
    }

    /// Rendered SQL with the bind values interpolated by the dialect.
    pub fn explain(&self) -> String {
        self.writer.dialect.explain(&self.writer.sql, &self.writer.vars)
    }

    /// Consume the statement, returning the rendered SQL and its bind values.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.writer.sql, self.writer.vars)
    }
}

impl Builder for Statement<'_> {
    fn write_str(&mut self, s: &str) {
        self.writer.write_str(s);
    }

    fn write_char(&mut self, c: char) {
        self.writer.write_char(c);
    }

    fn write_quoted(&mut self, name: &str) {
        self.writer.write_quoted(name);
    }

    fn add_var(&mut self, value: Value) {
        self.writer.add_var(value);
    }

    fn current_table(&self) -> &str {
        self.writer.current_table()
    }
}
