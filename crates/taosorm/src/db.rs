//! Sessions: build a statement from clauses, explain it, and run it on a pool.

use crate::client::ConnPool;
use crate::clause::{
    ClauseExpr, Column, Expr, Expression, From as FromClause, Insert, Limit, OrderBy, Select,
    Statement, Values, Where,
};
use crate::config::Config;
use crate::dialect::{Dialect, TaosDialect};
use crate::error::{OrmError, OrmResult};
use crate::migrator::Migrator;
use crate::monitor::{self, QueryKind, QueryOutcome};
use crate::row::{FromRow, Row};
use crate::value::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

/// One record to insert: column name to value.
pub type Record = BTreeMap<String, Value>;

/// A TDengine database handle: dialect, session configuration and pool.
pub struct Db<C> {
    dialect: TaosDialect,
    pool: C,
    config: Config,
}

impl<C: ConnPool> Db<C> {
    /// Initialize the dialect against `config` and wrap `pool`.
    pub fn open(mut dialect: TaosDialect, pool: C, mut config: Config) -> OrmResult<Self> {
        dialect.initialize(&mut config)?;
        Ok(Self {
            dialect,
            pool,
            config,
        })
    }

    pub fn dialect(&self) -> &TaosDialect {
        &self.dialect
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pool(&self) -> &C {
        &self.pool
    }

    /// Start a session on `table`.
    pub fn table(&self, table: impl Into<String>) -> Session<'_, C> {
        Session {
            db: self,
            statement: Statement::new(&self.dialect, table),
        }
    }

    pub fn migrator(&self) -> Migrator<'_, C> {
        Migrator::new(self)
    }

    /// Run raw SQL. `?` placeholders in `sql` are bound to `vars` in order.
    pub async fn exec(&self, sql: &str, vars: Vec<Value>) -> OrmResult<u64> {
        let (sql, vars) = self.bind_raw(sql, vars);
        self.run_exec(sql, vars).await
    }

    /// Run a raw query. `?` placeholders in `sql` are bound to `vars` in order.
    pub async fn raw(&self, sql: &str, vars: Vec<Value>) -> OrmResult<Vec<Row>> {
        let (sql, vars) = self.bind_raw(sql, vars);
        self.run_query(sql, vars).await
    }

    fn bind_raw(&self, sql: &str, vars: Vec<Value>) -> (String, Vec<Value>) {
        let mut statement = Statement::new(&self.dialect, "");
        Expr::with_vars(sql, vars).build(&mut statement);
        statement.into_parts()
    }

    /// What to hand the pool, and the explained SQL for logging.
    fn prepare(&self, sql: String, vars: Vec<Value>) -> OrmResult<(String, Vec<Value>, String)> {
        if self.config.interpolate_params {
            let interpolated = self.dialect.interpolate(&sql, &vars)?;
            Ok((interpolated.clone(), Vec::new(), interpolated))
        } else {
            let explained = self.dialect.explain(&sql, &vars);
            Ok((sql, vars, explained))
        }
    }

    async fn with_timeout<T, F>(&self, future: F) -> OrmResult<T>
    where
        F: std::future::Future<Output = OrmResult<T>> + Send,
    {
        match self.config.query_timeout() {
            Some(timeout) => tokio::time::timeout(timeout, future)
                .await
                .map_err(|_| OrmError::Timeout(timeout))?,
            None => future.await,
        }
    }

    pub(crate) async fn run_exec(&self, sql: String, vars: Vec<Value>) -> OrmResult<u64> {
        let (sql, vars, explained) = self.prepare(sql, vars)?;
        let start = Instant::now();
        let result = self.with_timeout(self.pool.execute(&sql, &vars)).await;
        let outcome = match &result {
            Ok(affected) => QueryOutcome::Rows(*affected),
            Err(e) => QueryOutcome::Error(e.to_string()),
        };
        monitor::report(
            &self.config,
            QueryKind::Exec,
            &explained,
            start.elapsed(),
            &outcome,
        );
        result
    }

    pub(crate) async fn run_query(&self, sql: String, vars: Vec<Value>) -> OrmResult<Vec<Row>> {
        let (sql, vars, explained) = self.prepare(sql, vars)?;
        let start = Instant::now();
        let result = self.with_timeout(self.pool.query(&sql, &vars)).await;
        let outcome = match &result {
            Ok(rows) => QueryOutcome::Rows(rows.len() as u64),
            Err(e) => QueryOutcome::Error(e.to_string()),
        };
        monitor::report(
            &self.config,
            QueryKind::Query,
            &explained,
            start.elapsed(),
            &outcome,
        );
        result
    }
}

/// A statement under construction against one table.
///
/// ```ignore
/// let rows = db
///     .table("tb_aggregate")
///     .select("max(value) as v")
///     .where_("ts >= ? and ts <= ?", vec![start.into(), end.into()])
///     .clause(Window::interval(Duration::seconds(1)))
///     .clause(Fill::null())
///     .find()
///     .await?;
/// ```
pub struct Session<'a, C> {
    db: &'a Db<C>,
    statement: Statement<'a>,
}

impl<'a, C: ConnPool> Session<'a, C> {
    /// Raw select list, e.g. `avg(value) as v`.
    pub fn select(mut self, sql: impl Into<String>) -> Self {
        self.statement.add_clause(Select::raw(sql));
        self
    }

    /// Add a condition; repeated calls are joined with `AND`.
    pub fn where_(mut self, sql: impl Into<String>, vars: Vec<Value>) -> Self {
        self.statement.add_clause(Where::new(Expr::with_vars(sql, vars)));
        self
    }

    /// Attach any clause (WINDOW, FILL, SLIMIT, USING, CREATE TABLE, ...).
    pub fn clause(mut self, clause: impl ClauseExpr) -> Self {
        self.statement.add_clause(clause);
        self
    }

    pub fn clauses(mut self, clauses: Vec<Box<dyn ClauseExpr>>) -> Self {
        for clause in clauses {
            self.statement.add_boxed_clause(clause);
        }
        self
    }

    pub fn order(mut self, order: OrderBy) -> Self {
        self.statement.add_clause(order);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.statement.add_clause(Limit::new(limit, 0));
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.statement.add_clause(Limit::new(0, offset));
        self
    }

    fn build_create(mut self, records: Vec<Record>) -> OrmResult<Statement<'a>> {
        let creating = self.statement.clauses().contains("CREATE TABLE");
        let columns: BTreeSet<String> = records.iter().flat_map(|r| r.keys().cloned()).collect();
        if columns.is_empty() && !creating {
            return Err(OrmError::validation("no values to insert"));
        }

        let rows: Vec<Vec<Value>> = records
            .into_iter()
            .map(|mut record| {
                columns
                    .iter()
                    .map(|c| record.remove(c).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        let columns = columns.into_iter().map(Column::new).collect();

        self.statement.add_clause(Insert::default());
        self.statement.add_clause(Values::new(columns, rows));
        self.statement.build(self.db.dialect.create_clauses());
        Ok(self.statement)
    }

    fn build_find(mut self) -> Statement<'a> {
        if !self.statement.clauses().contains("SELECT") {
            self.statement.add_clause(Select::default());
        }
        if !self.statement.clauses().contains("FROM") {
            self.statement.add_clause(FromClause::current());
        }
        self.statement.build(self.db.dialect.query_clauses());
        self.statement
    }

    /// SQL and bind values [`create`](Self::create) would run.
    pub fn to_create_sql(self, records: Vec<Record>) -> OrmResult<(String, Vec<Value>)> {
        Ok(self.build_create(records)?.into_parts())
    }

    /// SQL and bind values [`find`](Self::find) would run.
    pub fn to_find_sql(self) -> (String, Vec<Value>) {
        self.build_find().into_parts()
    }

    /// Insert `records`. Columns are the union of the record keys in
    /// ascending order; a record missing a column inserts NULL.
    ///
    /// With a `CREATE TABLE` clause attached only the DDL runs.
    pub async fn create(self, records: Vec<Record>) -> OrmResult<u64> {
        let db = self.db;
        let (sql, vars) = self.to_create_sql(records)?;
        db.run_exec(sql, vars).await
    }

    pub async fn find(self) -> OrmResult<Vec<Row>> {
        let db = self.db;
        let (sql, vars) = self.to_find_sql();
        db.run_query(sql, vars).await
    }

    pub async fn find_as<T: FromRow>(self) -> OrmResult<Vec<T>> {
        self.find().await?.iter().map(T::from_row).collect()
    }

    /// First row, or [`OrmError::NotFound`].
    pub async fn first(self) -> OrmResult<Row> {
        let table = self.statement.table().to_string();
        self.find()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| OrmError::not_found(format!("no rows in {table}")))
    }
}
