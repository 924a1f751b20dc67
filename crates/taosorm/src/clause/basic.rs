//! General-purpose clauses: SELECT, FROM, WHERE, GROUP BY, ORDER BY, LIMIT,
//! INSERT, VALUES and FOR.

use super::{Builder, Clause, ClauseExpr, Expression};
use crate::value::Value;

/// A column reference, optionally table-qualified and aliased.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub table: Option<String>,
    pub name: String,
    pub alias: Option<String>,
    /// Write `name` verbatim instead of through the dialect's quoting.
    pub raw: bool,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            table: None,
            name: name.into(),
            alias: None,
            raw: false,
        }
    }

    /// Column qualified by a table: `table.name`.
    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            ..Self::new(name)
        }
    }

    /// Raw SQL written as-is (e.g. `avg(value)`).
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            raw: true,
            ..Self::new(sql)
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

impl Expression for Column {
    fn build(&self, builder: &mut dyn Builder) {
        if let Some(table) = &self.table {
            builder.write_quoted(table);
            builder.write_char('.');
        }
        if self.raw {
            builder.write_str(&self.name);
        } else {
            builder.write_quoted(&self.name);
        }
        if let Some(alias) = &self.alias {
            builder.write_str(" AS ");
            builder.write_quoted(alias);
        }
    }
}

/// A table reference, optionally aliased.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub alias: Option<String>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

impl Expression for Table {
    fn build(&self, builder: &mut dyn Builder) {
        builder.write_quoted(&self.name);
        if let Some(alias) = &self.alias {
            builder.write_char(' ');
            builder.write_quoted(alias);
        }
    }
}

/// Raw SQL with `?` placeholders and the values that fill them.
///
/// Placeholders beyond the supplied values are written verbatim. A `?`
/// inside a single-quoted literal (`note = 'why?'`) is not a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub sql: String,
    pub vars: Vec<Value>,
}

impl Expr {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            vars: Vec::new(),
        }
    }

    pub fn with_vars(sql: impl Into<String>, vars: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            vars,
        }
    }

    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.vars.push(value.into());
        self
    }
}

impl Expression for Expr {
    fn build(&self, builder: &mut dyn Builder) {
        let mut vars = self.vars.iter();
        let mut in_quote = false;
        let mut escaped = false;
        let mut start = 0;
        for (i, ch) in self.sql.char_indices() {
            if in_quote {
                match ch {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '\'' => in_quote = false,
                    _ => {}
                }
                continue;
            }
            match ch {
                '\'' => in_quote = true,
                '?' => {
                    builder.write_str(&self.sql[start..i]);
                    match vars.next() {
                        Some(v) => builder.add_var(v.clone()),
                        None => builder.write_char('?'),
                    }
                    start = i + 1;
                }
                _ => {}
            }
        }
        builder.write_str(&self.sql[start..]);
    }
}

fn write_joined<T: Expression>(builder: &mut dyn Builder, items: &[T], sep: &str) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            builder.write_str(sep);
        }
        item.build(builder);
    }
}

/// `SELECT <columns>`; `*` when no columns are given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Select {
    pub columns: Vec<Column>,
    pub expression: Option<Expr>,
}

impl Select {
    pub fn columns(columns: Vec<Column>) -> Self {
        Self {
            columns,
            expression: None,
        }
    }

    /// Select list given as raw SQL (e.g. `max(value) as v`).
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            columns: Vec::new(),
            expression: Some(Expr::new(sql)),
        }
    }
}

impl Expression for Select {
    fn build(&self, builder: &mut dyn Builder) {
        if let Some(expr) = &self.expression {
            expr.build(builder);
        } else if self.columns.is_empty() {
            builder.write_char('*');
        } else {
            write_joined(builder, &self.columns, ",");
        }
    }
}

impl ClauseExpr for Select {
    fn name(&self) -> &'static str {
        "SELECT"
    }

    fn merge_clause(self: Box<Self>, clause: &mut Clause) {
        clause.expression = Some(self);
    }
}

/// `FROM <tables>`; the statement's table when none are given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct From {
    pub tables: Vec<Table>,
}

impl From {
    /// FROM the statement's own table.
    pub fn current() -> Self {
        Self::default()
    }

    pub fn tables(tables: Vec<Table>) -> Self {
        Self { tables }
    }
}

impl Expression for From {
    fn build(&self, builder: &mut dyn Builder) {
        if self.tables.is_empty() {
            let table = builder.current_table().to_string();
            builder.write_quoted(&table);
        } else {
            write_joined(builder, &self.tables, ",");
        }
    }
}

impl ClauseExpr for From {
    fn name(&self) -> &'static str {
        "FROM"
    }

    fn merge_clause(self: Box<Self>, clause: &mut Clause) {
        clause.expression = Some(self);
    }
}

/// `WHERE <expr> AND <expr> ...`; repeated WHERE clauses accumulate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Where {
    pub exprs: Vec<Expr>,
}

impl Where {
    pub fn new(expr: Expr) -> Self {
        Self { exprs: vec![expr] }
    }
}

impl Expression for Where {
    fn build(&self, builder: &mut dyn Builder) {
        write_joined(builder, &self.exprs, " AND ");
    }
}

impl ClauseExpr for Where {
    fn name(&self) -> &'static str {
        "WHERE"
    }

    fn merge_clause(self: Box<Self>, clause: &mut Clause) {
        let mut exprs = clause
            .expression_as::<Where>()
            .map(|w| w.exprs.clone())
            .unwrap_or_default();
        exprs.extend(self.exprs);
        if exprs.is_empty() {
            clause.expression = None;
        } else {
            clause.expression = Some(Box::new(Where { exprs }));
        }
    }
}

/// `GROUP BY <columns> [HAVING <exprs>]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupBy {
    pub columns: Vec<Column>,
    pub having: Vec<Expr>,
}

impl GroupBy {
    pub fn columns(columns: Vec<Column>) -> Self {
        Self {
            columns,
            having: Vec::new(),
        }
    }

    pub fn having(mut self, expr: Expr) -> Self {
        self.having.push(expr);
        self
    }
}

impl Expression for GroupBy {
    fn build(&self, builder: &mut dyn Builder) {
        write_joined(builder, &self.columns, ",");
        if !self.having.is_empty() {
            builder.write_str(" HAVING ");
            write_joined(builder, &self.having, " AND ");
        }
    }
}

impl ClauseExpr for GroupBy {
    fn name(&self) -> &'static str {
        "GROUP BY"
    }

    fn merge_clause(self: Box<Self>, clause: &mut Clause) {
        let merged = match clause.expression_as::<GroupBy>() {
            Some(prev) => {
                let mut merged = prev.clone();
                merged.columns.extend(self.columns);
                merged.having.extend(self.having);
                merged
            }
            None => *self,
        };
        clause.expression = Some(Box::new(merged));
    }
}

/// One `ORDER BY` item.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByColumn {
    pub column: Column,
    pub desc: bool,
}

impl Expression for OrderByColumn {
    fn build(&self, builder: &mut dyn Builder) {
        self.column.build(builder);
        if self.desc {
            builder.write_str(" DESC");
        }
    }
}

/// `ORDER BY <items>`; repeated ORDER BY clauses append.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBy {
    pub columns: Vec<OrderByColumn>,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            columns: vec![OrderByColumn {
                column: Column::new(column),
                desc: false,
            }],
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            columns: vec![OrderByColumn {
                column: Column::new(column),
                desc: true,
            }],
        }
    }
}

impl Expression for OrderBy {
    fn build(&self, builder: &mut dyn Builder) {
        write_joined(builder, &self.columns, ",");
    }
}

impl ClauseExpr for OrderBy {
    fn name(&self) -> &'static str {
        "ORDER BY"
    }

    fn merge_clause(self: Box<Self>, clause: &mut Clause) {
        let mut columns = clause
            .expression_as::<OrderBy>()
            .map(|o| o.columns.clone())
            .unwrap_or_default();
        columns.extend(self.columns);
        clause.expression = Some(Box::new(OrderBy { columns }));
    }
}

/// Merge rules shared by LIMIT and SLIMIT.
///
/// A zero limit keeps the previous non-zero limit, a zero offset keeps the
/// previous positive offset, and a negative offset resets to zero.
pub(crate) fn merge_limit_offset(
    limit: i64,
    offset: i64,
    prev: Option<(i64, i64)>,
) -> (i64, i64) {
    let (mut limit, mut offset) = (limit, offset);
    if let Some((prev_limit, prev_offset)) = prev {
        if limit == 0 && prev_limit != 0 {
            limit = prev_limit;
        }
        if offset == 0 && prev_offset > 0 {
            offset = prev_offset;
        } else if offset < 0 {
            offset = 0;
        }
    }
    (limit, offset)
}

/// `LIMIT n OFFSET m`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limit {
    pub limit: i64,
    pub offset: i64,
}

impl Limit {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }
}

impl Expression for Limit {
    fn build(&self, builder: &mut dyn Builder) {
        if self.limit > 0 {
            builder.write_str("LIMIT ");
            builder.write_str(&self.limit.to_string());
        }
        if self.offset > 0 {
            if self.limit > 0 {
                builder.write_char(' ');
            }
            builder.write_str("OFFSET ");
            builder.write_str(&self.offset.to_string());
        }
    }
}

impl ClauseExpr for Limit {
    fn name(&self) -> &'static str {
        "LIMIT"
    }

    fn merge_clause(self: Box<Self>, clause: &mut Clause) {
        clause.name.clear();
        let prev = clause.expression_as::<Limit>().map(|l| (l.limit, l.offset));
        let (limit, offset) = merge_limit_offset(self.limit, self.offset, prev);
        clause.expression = Some(Box::new(Limit { limit, offset }));
    }
}

/// `INSERT INTO <table>`; the statement's table when none is given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insert {
    pub table: Option<Table>,
}

impl Insert {
    pub fn into_table(table: impl Into<String>) -> Self {
        Self {
            table: Some(Table::new(table)),
        }
    }
}

impl Expression for Insert {
    fn build(&self, builder: &mut dyn Builder) {
        match &self.table {
            Some(table) => table.build(builder),
            None => {
                let table = builder.current_table().to_string();
                builder.write_quoted(&table);
            }
        }
    }
}

impl ClauseExpr for Insert {
    fn name(&self) -> &'static str {
        "INSERT"
    }

    fn merge_clause(self: Box<Self>, clause: &mut Clause) {
        clause.name = "INSERT INTO".to_string();
        clause.expression = Some(self);
    }
}

/// `(<columns>) VALUES (?,..),(?,..)`, or `DEFAULT VALUES` without columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Values {
    pub columns: Vec<Column>,
    pub values: Vec<Vec<Value>>,
}

impl Values {
    pub fn new(columns: Vec<Column>, values: Vec<Vec<Value>>) -> Self {
        Self { columns, values }
    }
}

impl Expression for Values {
    fn build(&self, builder: &mut dyn Builder) {
        if self.columns.is_empty() {
            builder.write_str("DEFAULT VALUES");
            return;
        }
        builder.write_char('(');
        write_joined(builder, &self.columns, ",");
        builder.write_str(") VALUES ");
        for (i, row) in self.values.iter().enumerate() {
            if i > 0 {
                builder.write_char(',');
            }
            builder.add_var_list(row.clone());
        }
    }
}

impl ClauseExpr for Values {
    fn name(&self) -> &'static str {
        "VALUES"
    }

    fn merge_clause(self: Box<Self>, clause: &mut Clause) {
        clause.name.clear();
        clause.expression = Some(self);
    }
}

/// Row locking (`FOR UPDATE`). TDengine has no row locks; its dialect drops
/// this clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Locking {
    pub strength: String,
}

impl Locking {
    pub fn update() -> Self {
        Self {
            strength: "UPDATE".to_string(),
        }
    }
}

impl Expression for Locking {
    fn build(&self, builder: &mut dyn Builder) {
        builder.write_str(&self.strength);
    }
}

impl ClauseExpr for Locking {
    fn name(&self) -> &'static str {
        "FOR"
    }

    fn merge_clause(self: Box<Self>, clause: &mut Clause) {
        clause.expression = Some(self);
    }
}
