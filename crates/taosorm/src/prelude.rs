//! Convenient imports for typical `taosorm` usage.
//!
//! ```ignore
//! use taosorm::prelude::*;
//! ```

pub use crate::clause::{ClauseExpr, Expr, OrderBy};
pub use crate::{
    ColumnType, Config, ConnPool, CreateTable, Db, Dialect, Duration, Fill, FillType, FromRow,
    OrmError, OrmResult, Record, Row, SLimit, TaosDialect, Unit, Using, Value, Window, create,
};
