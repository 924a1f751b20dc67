//! The TDengine dialect.

use super::Dialect;
use crate::clause::create::{Column as ColumnDef, ColumnType};
use crate::clause::{
    Builder, Clause, ClauseBuilder, ClauseBuilders, Clauses, Expr, Insert, Locking, Values,
};
use crate::config::Config;
use crate::error::{OrmError, OrmResult};
use crate::schema::{DataType, Field};
use crate::value::Value;
use chrono::SecondsFormat;

/// Default driver name for TDengine.
pub const DRIVER_NAME: &str = "taosSql";

const QUERY_CLAUSES: &[&str] = &[
    "SELECT", "FROM", "WHERE", "WINDOW", "FILL", "GROUP BY", "ORDER BY", "SLIMIT", "LIMIT",
];

const CREATE_CLAUSES: &[&str] = &["CREATE TABLE", "INSERT", "USING", "VALUES", "ON CONFLICT"];

/// Default length of NCHAR and BINARY columns whose field has no size.
const DEFAULT_VAR_LENGTH: u64 = 64;

/// TDengine dialect: connection settings plus the SQL rules of the
/// `taosSql` driver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaosDialect {
    pub driver_name: String,
    pub dsn: String,
}

impl TaosDialect {
    /// Dialect for `dsn` using the default driver.
    pub fn open(dsn: impl Into<String>) -> Self {
        Self {
            driver_name: String::new(),
            dsn: dsn.into(),
        }
    }

    pub fn with_driver_name(mut self, driver_name: impl Into<String>) -> Self {
        self.driver_name = driver_name.into();
        self
    }

    /// Column definition for a model field.
    pub fn column_of(&self, field: &Field) -> ColumnDef {
        let (column_type, length) = match &field.data_type {
            DataType::Bool => (ColumnType::Bool, 0),
            DataType::Int | DataType::Uint => {
                let column_type = match field.size {
                    0 => ColumnType::BigInt,
                    1..=8 => ColumnType::TinyInt,
                    9..=16 => ColumnType::SmallInt,
                    17..=32 => ColumnType::Int,
                    _ => ColumnType::BigInt,
                };
                (column_type, 0)
            }
            DataType::Float => {
                let column_type = match field.size {
                    1..=32 => ColumnType::Float,
                    _ => ColumnType::Double,
                };
                (column_type, 0)
            }
            DataType::String => (ColumnType::NChar, var_length(field.size)),
            DataType::Time => (ColumnType::Timestamp, 0),
            DataType::Bytes => (ColumnType::Binary, var_length(field.size)),
            DataType::Custom(ty) => (ColumnType::Other(ty.clone()), 0),
        };
        ColumnDef::with_length(field.db_name.clone(), column_type, length)
    }
}

fn var_length(size: u32) -> u64 {
    if size == 0 {
        DEFAULT_VAR_LENGTH
    } else {
        u64::from(size)
    }
}

/// INSERT is dropped when the statement creates a table instead.
fn build_insert(clause: &Clause, clauses: &Clauses, builder: &mut dyn Builder) {
    if clause.expression_as::<Insert>().is_some() && clauses.contains("CREATE TABLE") {
        return;
    }
    clause.build(builder);
}

/// VALUES is dropped when the statement creates a table instead.
fn build_values(clause: &Clause, clauses: &Clauses, builder: &mut dyn Builder) {
    if clause.expression_as::<Values>().is_some() && clauses.contains("CREATE TABLE") {
        return;
    }
    clause.build(builder);
}

/// TDengine has no row locks.
fn build_locking(clause: &Clause, _clauses: &Clauses, builder: &mut dyn Builder) {
    if clause.expression_as::<Locking>().is_some() {
        return;
    }
    clause.build(builder);
}

/// Escape a string the way the driver does before inlining it.
fn escape_into(out: &mut String, s: &str) {
    for ch in s.chars() {
        match ch {
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x1a' => out.push_str("\\Z"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
}

fn write_literal(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("NULL"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(i) => out.push_str(&i.to_string()),
        Value::UInt(u) => out.push_str(&u.to_string()),
        Value::Float(f) if f.is_finite() => out.push_str(&f.to_string()),
        // TDengine has no literal for infinities or NaN.
        Value::Float(_) => out.push_str("NULL"),
        // Written between the quotes of its `'?'` placeholder.
        Value::String(s) => escape_into(out, s),
        Value::Bytes(b) => {
            out.push('\'');
            escape_into(out, &String::from_utf8_lossy(b));
            out.push('\'');
        }
        Value::Timestamp(ts) => {
            out.push('\'');
            out.push_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true));
            out.push('\'');
        }
    }
}

impl Dialect for TaosDialect {
    fn name(&self) -> &'static str {
        "tdengine"
    }

    fn initialize(&mut self, config: &mut Config) -> OrmResult<()> {
        if self.driver_name.is_empty() {
            self.driver_name = DRIVER_NAME.to_string();
        }
        config.skip_default_transaction = true;
        config.disable_nested_transaction = true;
        config.disable_automatic_ping = true;
        config.disable_foreign_key_constraint_when_migrating = true;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "taosorm",
            dialect = self.name(),
            driver = %self.driver_name,
            "dialect initialized"
        );
        Ok(())
    }

    fn query_clauses(&self) -> &'static [&'static str] {
        QUERY_CLAUSES
    }

    fn create_clauses(&self) -> &'static [&'static str] {
        CREATE_CLAUSES
    }

    fn clause_builders(&self) -> ClauseBuilders {
        let mut builders = ClauseBuilders::new();
        builders.insert("INSERT", build_insert as ClauseBuilder);
        builders.insert("VALUES", build_values as ClauseBuilder);
        builders.insert("FOR", build_locking as ClauseBuilder);
        builders
    }

    fn bind_var_to(&self, out: &mut String, value: &Value) {
        if value.is_string() {
            out.push_str("'?'");
        } else {
            out.push('?');
        }
    }

    fn quote_to(&self, out: &mut String, ident: &str) {
        out.push_str(ident);
    }

    /// Placeholders are `?`, or `'?'` when a string value is next. A `?`
    /// inside any other quoted literal is left alone.
    fn explain(&self, sql: &str, vars: &[Value]) -> String {
        let mut out = String::with_capacity(sql.len() + vars.len() * 8);
        let mut vars = vars.iter().peekable();
        let mut rest = sql;
        let mut in_quote = false;
        while let Some(ch) = rest.chars().next() {
            if !in_quote {
                if rest.starts_with("'?'") {
                    if let Some(value) = vars.next_if(|v| v.is_string()) {
                        out.push('\'');
                        write_literal(&mut out, value);
                        out.push('\'');
                        rest = &rest[3..];
                        continue;
                    }
                }
                if ch == '?' {
                    if let Some(value) = vars.next() {
                        write_literal(&mut out, value);
                        rest = &rest[1..];
                        continue;
                    }
                }
            } else if ch == '\\' {
                let len: usize = rest.chars().take(2).map(char::len_utf8).sum();
                out.push_str(&rest[..len]);
                rest = &rest[len..];
                continue;
            }
            if ch == '\'' {
                in_quote = !in_quote;
            }
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
        out
    }

    /// Rejects BINARY values that are not UTF-8; send those with placeholders.
    fn interpolate(&self, sql: &str, vars: &[Value]) -> OrmResult<String> {
        for (i, value) in vars.iter().enumerate() {
            if let Value::Bytes(bytes) = value {
                if std::str::from_utf8(bytes).is_err() {
                    return Err(OrmError::validation(format!(
                        "bind value {} is binary data that is not UTF-8 and cannot be inlined; \
                         use Config::keep_placeholders",
                        i + 1
                    )));
                }
            }
        }
        Ok(self.explain(sql, vars))
    }

    fn data_type_of(&self, field: &Field) -> String {
        self.column_of(field).type_sql()
    }

    fn default_value_of(&self, _field: &Field) -> Expr {
        Expr::new("NULL")
    }

    fn save_point(&self, _name: &str) -> OrmResult<()> {
        Err(OrmError::not_supported("SavePoint"))
    }

    fn rollback_to(&self, _name: &str) -> OrmResult<()> {
        Err(OrmError::not_supported("RollbackTo"))
    }
}
