//! `CREATE TABLE` / `CREATE STABLE`.
//!
//! A super-table (`STABLE`) declares data columns plus tag columns. A common
//! table either declares its own columns or is created from a super-table
//! with concrete tag values:
//!
//! ```text
//! CREATE STABLE IF NOT EXISTS meters (ts TIMESTAMP,current FLOAT) TAGS(location BINARY(64))
//! CREATE TABLE IF NOT EXISTS d1001 USING meters(location) TAGS (?)
//! ```

use super::{Builder, Clause, ClauseExpr, Expression};
use crate::value::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Column data types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Timestamp,
    Int,
    BigInt,
    Float,
    Double,
    Binary,
    SmallInt,
    TinyInt,
    Bool,
    NChar,
    /// Type text written verbatim.
    Other(String),
}

impl ColumnType {
    pub fn as_str(&self) -> &str {
        match self {
            ColumnType::Timestamp => "TIMESTAMP",
            ColumnType::Int => "INT",
            ColumnType::BigInt => "BIGINT",
            ColumnType::Float => "FLOAT",
            ColumnType::Double => "DOUBLE",
            ColumnType::Binary => "BINARY",
            ColumnType::SmallInt => "SMALLINT",
            ColumnType::TinyInt => "TINYINT",
            ColumnType::Bool => "BOOL",
            ColumnType::NChar => "NCHAR",
            ColumnType::Other(s) => s,
        }
    }

    /// Whether the type takes a `(length)` suffix.
    pub fn has_length(&self) -> bool {
        matches!(self, ColumnType::Binary | ColumnType::NChar)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A column (or tag column) definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    /// Only rendered for BINARY and NCHAR.
    pub length: u64,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            length: 0,
        }
    }

    pub fn with_length(name: impl Into<String>, column_type: ColumnType, length: u64) -> Self {
        Self {
            name: name.into(),
            column_type,
            length,
        }
    }

    pub fn timestamp(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Timestamp)
    }

    pub fn binary(name: impl Into<String>, length: u64) -> Self {
        Self::with_length(name, ColumnType::Binary, length)
    }

    pub fn nchar(name: impl Into<String>, length: u64) -> Self {
        Self::with_length(name, ColumnType::NChar, length)
    }

    /// `TYPE` or `TYPE(length)`.
    pub fn type_sql(&self) -> String {
        if self.column_type.has_length() {
            format!("{}({})", self.column_type, self.length)
        } else {
            self.column_type.to_string()
        }
    }

    /// `name TYPE` or `name TYPE(length)`.
    pub fn to_sql(&self) -> String {
        format!("{} {}", self.name, self.type_sql())
    }
}

/// Whether a table is a super-table or a common (child / standalone) table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableType {
    STable,
    Common,
}

/// A table to create.
///
/// A table without a `table_type` is malformed; building stops when one is
/// reached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub table_type: Option<TableType>,
    pub name: String,
    pub if_not_exists: bool,
    /// Super-table a common table is created from; empty for a standalone table.
    pub stable: String,
    /// Tag values for a table created from a super-table.
    pub tags: BTreeMap<String, Value>,
    pub columns: Vec<Column>,
    /// Tag column definitions of a super-table.
    pub tag_columns: Vec<Column>,
}

impl Table {
    /// A common table. With a non-empty `stable` it is created from that
    /// super-table using `tags`; otherwise from `columns`.
    pub fn common(
        name: impl Into<String>,
        if_not_exists: bool,
        columns: Vec<Column>,
        stable: impl Into<String>,
        tags: BTreeMap<String, Value>,
    ) -> Self {
        Self {
            table_type: Some(TableType::Common),
            name: name.into(),
            if_not_exists,
            stable: stable.into(),
            tags,
            columns,
            tag_columns: Vec::new(),
        }
    }

    /// A super-table with data columns and tag columns.
    pub fn stable(
        name: impl Into<String>,
        if_not_exists: bool,
        columns: Vec<Column>,
        tag_columns: Vec<Column>,
    ) -> Self {
        Self {
            table_type: Some(TableType::STable),
            name: name.into(),
            if_not_exists,
            stable: String::new(),
            tags: BTreeMap::new(),
            columns,
            tag_columns,
        }
    }

    fn uses_stable(&self) -> bool {
        self.table_type == Some(TableType::Common) && !self.stable.is_empty()
    }
}

fn write_columns(builder: &mut dyn Builder, columns: &[Column]) {
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            builder.write_char(',');
        }
        builder.write_str(&column.to_sql());
    }
}

/// The `CREATE TABLE` clause. Holds one or more tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateTable {
    tables: Vec<Table>,
}

impl CreateTable {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    pub fn add_tables(mut self, tables: impl IntoIterator<Item = Table>) -> Self {
        self.tables.extend(tables);
        self
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }
}

impl Expression for CreateTable {
    fn build(&self, builder: &mut dyn Builder) {
        for (i, table) in self.tables.iter().enumerate() {
            let keyword = match table.table_type {
                Some(TableType::Common) => "CREATE TABLE ",
                Some(TableType::STable) => "CREATE STABLE ",
                None => return,
            };
            if i > 0 {
                builder.write_char(' ');
            }
            builder.write_str(keyword);
            if table.if_not_exists {
                builder.write_str("IF NOT EXISTS ");
            }
            builder.write_str(&table.name);

            if table.uses_stable() {
                builder.write_str(" USING ");
                builder.write_str(&table.stable);
                builder.write_char('(');
                for (j, tag) in table.tags.keys().enumerate() {
                    if j > 0 {
                        builder.write_char(',');
                    }
                    builder.write_str(tag);
                }
                builder.write_str(") TAGS ");
                builder.add_var_list(table.tags.values().cloned().collect());
            } else {
                builder.write_str(" (");
                write_columns(builder, &table.columns);
                builder.write_char(')');
            }

            if table.table_type == Some(TableType::STable) {
                builder.write_str(" TAGS(");
                write_columns(builder, &table.tag_columns);
                builder.write_char(')');
            }
        }
    }
}

impl ClauseExpr for CreateTable {
    fn name(&self) -> &'static str {
        "CREATE TABLE"
    }

    fn merge_clause(self: Box<Self>, clause: &mut Clause) {
        clause.name.clear();
        clause.expression = Some(self);
    }
}
