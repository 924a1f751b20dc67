//! Schema migration on TDengine.
//!
//! TDengine can create tables and super-tables and modify a column's type,
//! but cannot rename columns or indexes, has no constraints, and cannot diff
//! a schema against the live database. Those operations fail with a
//! [`NotSupported`](crate::OrmError::NotSupported) error.

use crate::client::ConnPool;
use crate::clause::create::{Column as ColumnDef, CreateTable, Table as CreateTableDef};
use crate::clause::{Builder, Expression, Statement};
use crate::db::Db;
use crate::dialect::Dialect;
use crate::error::{OrmError, OrmResult};
use crate::row::Row;
use crate::schema::{Field, Schema};
use crate::value::Value;
use std::collections::BTreeMap;

/// A column as reported by `DESCRIBE`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    /// `YES` or `NO` when known.
    pub nullable: Option<String>,
    pub data_type: String,
    pub max_length: Option<i64>,
}

impl ColumnInfo {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn database_type_name(&self) -> &str {
        &self.data_type
    }

    /// Declared length, when the type has one.
    pub fn length(&self) -> Option<i64> {
        self.max_length
    }

    pub fn nullable(&self) -> Option<bool> {
        self.nullable.as_deref().map(|n| n == "YES")
    }

    /// Always `None`: TDengine has no DECIMAL type.
    pub fn decimal_size(&self) -> Option<(i64, i64)> {
        None
    }

    fn from_describe(row: &Row) -> OrmResult<Self> {
        let max_length = match row.get("length") {
            Some(Value::Int(n)) if *n > 0 => Some(*n),
            Some(Value::UInt(n)) if *n > 0 => i64::try_from(*n).ok(),
            _ => None,
        };
        Ok(Self {
            name: row.try_get("field")?,
            nullable: None,
            data_type: row.try_get("type")?,
            max_length,
        })
    }
}

/// Migration operations bound to a [`Db`].
pub struct Migrator<'a, C> {
    db: &'a Db<C>,
}

impl<'a, C: ConnPool> Migrator<'a, C> {
    pub(crate) fn new(db: &'a Db<C>) -> Self {
        Self { db }
    }

    /// Full column type for `field`, e.g. `NCHAR(64)`.
    pub fn full_data_type_of(&self, field: &Field) -> String {
        self.db.dialect().data_type_of(field)
    }

    /// `ALTER TABLE <table> MODIFY COLUMN <column> <type>` for the field named
    /// `field` (code name or column name).
    pub fn alter_column_sql(&self, schema: &Schema, field: &str) -> OrmResult<String> {
        let Some(field) = schema.look_up_field(field) else {
            return Err(OrmError::Other(format!(
                "failed to look up field with name: {field}"
            )));
        };
        let mut statement = Statement::new(self.db.dialect(), schema.table.clone());
        statement.write_str("ALTER TABLE ");
        statement.write_quoted(&schema.table);
        statement.write_str(" MODIFY COLUMN ");
        statement.write_quoted(&field.db_name);
        statement.write_char(' ');
        statement.write_str(&self.full_data_type_of(field));
        Ok(statement.sql().to_string())
    }

    pub async fn alter_column(&self, schema: &Schema, field: &str) -> OrmResult<()> {
        let sql = self.alter_column_sql(schema, field)?;
        self.db.run_exec(sql, Vec::new()).await?;
        Ok(())
    }

    fn columns_of<'f>(&self, fields: impl Iterator<Item = &'f Field>) -> Vec<ColumnDef> {
        fields.map(|f| self.db.dialect().column_of(f)).collect()
    }

    fn build_create(&self, table: &str, definition: CreateTableDef) -> (String, Vec<Value>) {
        let mut statement = Statement::new(self.db.dialect(), table);
        CreateTable::new(vec![definition]).build(&mut statement);
        statement.into_parts()
    }

    /// `CREATE TABLE IF NOT EXISTS` for the schema's data fields.
    pub fn create_table_sql(&self, schema: &Schema) -> (String, Vec<Value>) {
        let columns = self.columns_of(schema.data_fields());
        let table =
            CreateTableDef::common(schema.table.clone(), true, columns, "", BTreeMap::new());
        self.build_create(&schema.table, table)
    }

    /// `CREATE STABLE IF NOT EXISTS` with the schema's tag fields as tag columns.
    pub fn create_stable_sql(&self, schema: &Schema) -> (String, Vec<Value>) {
        let columns = self.columns_of(schema.data_fields());
        let tag_columns = self.columns_of(schema.tag_fields());
        let table = CreateTableDef::stable(schema.table.clone(), true, columns, tag_columns);
        self.build_create(&schema.table, table)
    }

    /// `CREATE TABLE IF NOT EXISTS <table> USING <stable>(...) TAGS (...)`.
    pub fn create_child_table_sql(
        &self,
        table: &str,
        stable: &str,
        tags: BTreeMap<String, Value>,
    ) -> (String, Vec<Value>) {
        let definition = CreateTableDef::common(table, true, Vec::new(), stable, tags);
        self.build_create(table, definition)
    }

    pub async fn create_table(&self, schema: &Schema) -> OrmResult<()> {
        let (sql, vars) = self.create_table_sql(schema);
        self.db.run_exec(sql, vars).await?;
        Ok(())
    }

    pub async fn create_stable(&self, schema: &Schema) -> OrmResult<()> {
        if schema.tag_fields().next().is_none() {
            return Err(OrmError::validation(format!(
                "super table {} needs at least one tag field",
                schema.table
            )));
        }
        let (sql, vars) = self.create_stable_sql(schema);
        self.db.run_exec(sql, vars).await?;
        Ok(())
    }

    pub async fn create_child_table(
        &self,
        table: &str,
        stable: &str,
        tags: BTreeMap<String, Value>,
    ) -> OrmResult<()> {
        let (sql, vars) = self.create_child_table_sql(table, stable, tags);
        self.db.run_exec(sql, vars).await?;
        Ok(())
    }

    /// Columns of `table` via `DESCRIBE`.
    pub async fn column_types(&self, table: &str) -> OrmResult<Vec<ColumnInfo>> {
        let rows = self.db.run_query(format!("DESCRIBE {table}"), Vec::new()).await?;
        rows.iter().map(ColumnInfo::from_describe).collect()
    }

    pub fn rename_column(
        &self,
        _schema: &Schema,
        _old_name: &str,
        _new_name: &str,
    ) -> OrmResult<()> {
        Err(OrmError::not_supported("RenameColumn"))
    }

    pub fn rename_index(
        &self,
        _schema: &Schema,
        _old_name: &str,
        _new_name: &str,
    ) -> OrmResult<()> {
        Err(OrmError::not_supported("RenameIndex"))
    }

    pub fn drop_constraint(&self, _schema: &Schema, _name: &str) -> OrmResult<()> {
        Err(OrmError::not_supported("DropConstraint"))
    }

    pub fn auto_migrate(&self, _schemas: &[Schema]) -> OrmResult<()> {
        Err(OrmError::not_supported("AutoMigrate"))
    }
}
