//! # taosorm
//!
//! A TDengine SQL dialect and clause toolkit for Rust.
//!
//! ## Features
//!
//! - **TDengine clauses**: `CREATE TABLE` / `CREATE STABLE`, `USING ... TAGS`,
//!   `INTERVAL` / `SESSION` / `STATE_WINDOW`, `FILL` and `SLIMIT`
//! - **Clause composition**: named clauses that merge with earlier clauses of
//!   the same name and render in dialect-defined order
//! - **Driver-agnostic**: bring your own connection pool via [`ConnPool`]
//! - **Explained SQL**: bind values interpolated the way the `taosSql` driver
//!   does, for execution and for logging
//!
//! ## Sessions
//!
//! ```ignore
//! use taosorm::prelude::*;
//!
//! let db = Db::open(TaosDialect::open(dsn), pool, Config::new())?;
//!
//! // CREATE STABLE IF NOT EXISTS stb_1 (ts TIMESTAMP,value DOUBLE) TAGS(tbn BINARY(64))
//! db.table("stb_1")
//!     .clause(CreateTable::new(vec![create::Table::stable(
//!         "stb_1",
//!         true,
//!         vec![create::Column::timestamp("ts"), create::Column::new("value", ColumnType::Double)],
//!         vec![create::Column::binary("tbn", 64)],
//!     )]))
//!     .create(vec![])
//!     .await?;
//!
//! // SELECT max(value) as v FROM tb_1 WHERE ts >= ... INTERVAL(1s) FILL (NULL)
//! let rows = db
//!     .table("tb_1")
//!     .select("max(value) as v")
//!     .where_("ts >= ?", vec![start.into()])
//!     .clause(Window::interval(Duration::seconds(1)))
//!     .clause(Fill::null())
//!     .find()
//!     .await?;
//! ```
//!
//! ## Statements without a pool
//!
//! ```ignore
//! use taosorm::clause::{From, Select, Statement};
//!
//! let dialect = TaosDialect::default();
//! let mut stmt = Statement::new(&dialect, "meters");
//! stmt.add_clause(Select::default()).add_clause(From::current()).add_clause(SLimit::new(10, 20));
//! stmt.build(dialect.query_clauses());
//! assert_eq!(stmt.sql(), "SELECT * FROM meters SLIMIT 10 SOFFSET 20");
//! ```

pub mod clause;
pub mod client;
pub mod config;
pub mod db;
pub mod dialect;
pub mod error;
pub mod migrator;
pub mod monitor;
pub mod prelude;
pub mod row;
pub mod schema;
pub mod value;

pub use clause::create::{self, ColumnType, CreateTable, TableType};
pub use clause::duration::{Duration, Unit};
pub use clause::fill::{Fill, FillType};
pub use clause::slimit::SLimit;
pub use clause::using::Using;
pub use clause::window::Window;
pub use client::ConnPool;
pub use config::{Config, ConfigFile, DatabaseConfig};
pub use db::{Db, Record, Session};
pub use dialect::{DRIVER_NAME, Dialect, TaosDialect};
pub use error::{OrmError, OrmResult};
pub use migrator::{ColumnInfo, Migrator};
pub use row::{FromRow, FromValue, Row};
pub use schema::{DataType, Field, Schema};
pub use value::Value;
