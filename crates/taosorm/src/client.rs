//! Connection pool abstraction.

use crate::error::OrmResult;
use crate::row::Row;
use crate::value::Value;
use std::sync::Arc;

/// A pool of TDengine connections.
///
/// taosorm only builds SQL; implement this over whichever driver reaches the
/// server (native `taosc`, WebSocket or REST). `sql` uses `?` placeholders,
/// one per entry of `vars`. When the session interpolates parameters,
/// `vars` is empty and `sql` is ready to run.
pub trait ConnPool: Send + Sync {
    /// Execute a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        vars: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send;

    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        vars: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<Vec<Row>>> + Send;
}

impl<P: ConnPool> ConnPool for &P {
    fn execute(
        &self,
        sql: &str,
        vars: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send {
        (**self).execute(sql, vars)
    }

    fn query(
        &self,
        sql: &str,
        vars: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<Vec<Row>>> + Send {
        (**self).query(sql, vars)
    }
}

impl<P: ConnPool> ConnPool for Arc<P> {
    fn execute(
        &self,
        sql: &str,
        vars: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send {
        (**self).execute(sql, vars)
    }

    fn query(
        &self,
        sql: &str,
        vars: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<Vec<Row>>> + Send {
        (**self).query(sql, vars)
    }
}
