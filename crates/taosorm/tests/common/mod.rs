#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;
use taosorm::{ConnPool, OrmError, OrmResult, Row, Value};

/// In-memory pool that records every statement it is handed.
#[derive(Default)]
pub struct RecordingPool {
    calls: Mutex<Vec<(String, Vec<Value>)>>,
    rows: Vec<Row>,
    delay: Option<Duration>,
    failure: Option<String>,
}

impl RecordingPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows returned by every query.
    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sqls(&self) -> Vec<String> {
        self.calls().into_iter().map(|(sql, _)| sql).collect()
    }

    pub fn last_sql(&self) -> String {
        self.sqls().pop().unwrap_or_default()
    }

    async fn record(&self, sql: &str, vars: &[Value]) -> OrmResult<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.calls
            .lock()
            .unwrap()
            .push((sql.to_string(), vars.to_vec()));
        match &self.failure {
            Some(message) => Err(OrmError::query(message.clone())),
            None => Ok(()),
        }
    }
}

impl ConnPool for RecordingPool {
    async fn execute(&self, sql: &str, vars: &[Value]) -> OrmResult<u64> {
        self.record(sql, vars).await?;
        Ok(1)
    }

    async fn query(&self, sql: &str, vars: &[Value]) -> OrmResult<Vec<Row>> {
        self.record(sql, vars).await?;
        Ok(self.rows.clone())
    }
}
