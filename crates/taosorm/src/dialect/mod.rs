//! SQL dialects.
//!
//! A [`Dialect`] decides how placeholders and identifiers are written, how a
//! statement is explained with its values inlined, which clause-builder
//! overrides apply, the order clauses are emitted in, and how model fields map
//! to column types.

mod taos;

pub use taos::{DRIVER_NAME, TaosDialect};

use crate::clause::{ClauseBuilders, Expr};
use crate::config::Config;
use crate::error::OrmResult;
use crate::schema::Field;
use crate::value::Value;

/// Dialect hooks used while building and executing statements.
pub trait Dialect: Send + Sync {
    /// Dialect name (e.g. `tdengine`).
    fn name(&self) -> &'static str;

    /// Adjust session configuration and dialect defaults before first use.
    fn initialize(&mut self, config: &mut Config) -> OrmResult<()>;

    /// Clause order for SELECT statements.
    fn query_clauses(&self) -> &'static [&'static str];

    /// Clause order for INSERT / CREATE statements.
    fn create_clauses(&self) -> &'static [&'static str];

    /// Per-clause rendering overrides.
    fn clause_builders(&self) -> ClauseBuilders {
        ClauseBuilders::new()
    }

    /// Append the placeholder for `value`.
    fn bind_var_to(&self, out: &mut String, value: &Value);

    /// Append an identifier.
    fn quote_to(&self, out: &mut String, ident: &str);

    /// Render `sql` with `vars` substituted for its placeholders.
    fn explain(&self, sql: &str, vars: &[Value]) -> String;

    /// SQL to execute with every value inlined. Unlike [`explain`](Self::explain)
    /// this fails when a value has no faithful literal form.
    fn interpolate(&self, sql: &str, vars: &[Value]) -> OrmResult<String> {
        Ok(self.explain(sql, vars))
    }

    /// Column type for a model field.
    fn data_type_of(&self, field: &Field) -> String;

    /// Default value expression for a model field.
    fn default_value_of(&self, field: &Field) -> Expr;

    fn save_point(&self, name: &str) -> OrmResult<()>;

    fn rollback_to(&self, name: &str) -> OrmResult<()>;
}
