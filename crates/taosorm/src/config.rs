//! Session configuration, in code or loaded from a TOML file.
//!
//! ```toml
//! version = "1"
//! engine = "tdengine"
//!
//! [database]
//! dsn = "root:${TAOS_PASSWORD}@tcp(127.0.0.1:6030)/power?loc=Local"
//!
//! [session]
//! query_timeout_ms = 5000
//! log_sql = true
//! ```

use crate::dialect::TaosDialect;
use crate::error::{OrmError, OrmResult};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Session behaviour. Dialect initialization may override some of it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Do not wrap writes in an implicit transaction.
    pub skip_default_transaction: bool,
    pub disable_nested_transaction: bool,
    /// Do not ping the connection when opening.
    pub disable_automatic_ping: bool,
    pub disable_foreign_key_constraint_when_migrating: bool,
    /// Inline bind values into the SQL before handing it to the pool.
    pub interpolate_params: bool,
    /// Per-statement timeout.
    pub query_timeout_ms: Option<u64>,
    /// Log every statement (the dialect-explained SQL) at debug level.
    pub log_sql: bool,
    /// Truncate logged SQL to this many bytes. `None` means no truncation.
    pub max_sql_length: Option<usize>,
    /// Warn about statements slower than this.
    pub slow_query_threshold_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            skip_default_transaction: false,
            disable_nested_transaction: false,
            disable_automatic_ping: false,
            disable_foreign_key_constraint_when_migrating: false,
            interpolate_params: true,
            query_timeout_ms: None,
            log_sql: false,
            max_sql_length: Some(200),
            slow_query_threshold_ms: None,
        }
    }
}

impl Config {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-statement timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.query_timeout_ms = Some(duration.as_millis() as u64);
        self
    }

    /// Log every statement.
    pub fn debug(mut self) -> Self {
        self.log_sql = true;
        self
    }

    /// Hand the pool `?` placeholders and bind values instead of inlined SQL.
    pub fn keep_placeholders(mut self) -> Self {
        self.interpolate_params = false;
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Set slow query threshold.
    pub fn slow_query_threshold(mut self, duration: Duration) -> Self {
        self.slow_query_threshold_ms = Some(duration.as_millis() as u64);
        self
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout_ms.map(Duration::from_millis)
    }

    pub fn slow_query_threshold_duration(&self) -> Option<Duration> {
        self.slow_query_threshold_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub dsn: String,
    #[serde(default)]
    pub driver_name: Option<String>,
}

/// Contents of a `taosorm.toml` file.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    pub engine: Option<String>,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub session: Config,
}

impl ConfigFile {
    /// Parse, expand `${VAR}` references and validate.
    pub fn from_toml_str(raw: &str) -> OrmResult<Self> {
        let mut file: ConfigFile = toml::from_str(raw)?;
        file.expand_env()?;
        file.validate()?;
        Ok(file)
    }

    /// Load from a file path.
    pub fn load(path: impl AsRef<Path>) -> OrmResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            OrmError::config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Dialect described by the `[database]` table.
    pub fn dialect(&self) -> TaosDialect {
        let dialect = TaosDialect::open(self.database.dsn.clone());
        match &self.database.driver_name {
            Some(driver) => dialect.with_driver_name(driver.clone()),
            None => dialect,
        }
    }

    fn expand_env(&mut self) -> OrmResult<()> {
        self.database.dsn = expand_env_vars(&self.database.dsn)?;
        if let Some(driver) = self.database.driver_name.as_mut() {
            *driver = expand_env_vars(driver)?;
        }
        Ok(())
    }

    fn validate(&self) -> OrmResult<()> {
        if self.version.trim() != "1" {
            return Err(OrmError::config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        if let Some(engine) = &self.engine {
            if engine != "tdengine" {
                return Err(OrmError::config(format!("unsupported engine: {engine}")));
            }
        }
        if self.database.dsn.trim().is_empty() {
            return Err(OrmError::config("database.dsn must not be empty"));
        }
        Ok(())
    }
}

fn expand_env_vars(input: &str) -> OrmResult<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut key = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                key.push(ch);
            }

            if !closed {
                return Err(OrmError::config(format!(
                    "unterminated env var reference: ${{{key}}}"
                )));
            }
            if key.is_empty() {
                return Err(OrmError::config("invalid env var reference: ${}"));
            }

            let v = std::env::var(&key).map_err(|_| {
                OrmError::config(format!("missing env var for config expansion: {key}"))
            })?;
            out.push_str(&v);
            continue;
        }

        out.push(c);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_file_with_session_defaults() {
        let file = ConfigFile::from_toml_str(
            r#"
            version = "1"
            [database]
            dsn = "root:taosdata@/tcp(127.0.0.1:6030)/power"
            "#,
        )
        .unwrap();
        assert_eq!(file.session, Config::default());
        assert!(file.session.interpolate_params);
        let dialect = file.dialect();
        assert_eq!(dialect.dsn, "root:taosdata@/tcp(127.0.0.1:6030)/power");
        assert!(dialect.driver_name.is_empty());
    }

    #[test]
    fn parses_session_overrides() {
        let file = ConfigFile::from_toml_str(
            r#"
            version = "1"
            engine = "tdengine"
            [database]
            dsn = "x"
            driver_name = "taosWS"
            [session]
            query_timeout_ms = 1500
            log_sql = true
            interpolate_params = false
            "#,
        )
        .unwrap();
        assert_eq!(
            file.session.query_timeout(),
            Some(Duration::from_millis(1500))
        );
        assert!(file.session.log_sql);
        assert!(!file.session.interpolate_params);
        assert_eq!(file.dialect().driver_name, "taosWS");
    }

    #[test]
    fn rejects_wrong_engine_and_version() {
        let err = ConfigFile::from_toml_str(
            "version = \"1\"\nengine = \"postgres\"\n[database]\ndsn = \"x\"\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("unsupported engine"));

        let err = ConfigFile::from_toml_str("version = \"2\"\n[database]\ndsn = \"x\"\n")
            .unwrap_err();
        assert!(err.to_string().contains("unsupported config version"));
    }

    #[test]
    fn rejects_empty_dsn() {
        let err = ConfigFile::from_toml_str("version = \"1\"\n[database]\ndsn = \"  \"\n")
            .unwrap_err();
        assert!(matches!(err, OrmError::Config(_)));
    }

    #[test]
    fn expands_env_vars_in_dsn() {
        // SAFETY: test-only, variable name is unique to this test.
        unsafe { std::env::set_var("TAOSORM_TEST_CONFIG_PASSWORD", "secret") };
        let out = expand_env_vars("root:${TAOSORM_TEST_CONFIG_PASSWORD}@/tcp").unwrap();
        assert_eq!(out, "root:secret@/tcp");

        assert!(expand_env_vars("${UNTERMINATED").is_err());
        assert!(expand_env_vars("${}").is_err());
        assert!(expand_env_vars("${TAOSORM_TEST_CONFIG_MISSING_VAR}").is_err());
    }

    #[test]
    fn builder_setters() {
        let cfg = Config::new()
            .timeout(Duration::from_secs(2))
            .debug()
            .keep_placeholders()
            .no_truncate();
        assert_eq!(cfg.query_timeout_ms, Some(2000));
        assert!(cfg.log_sql);
        assert!(!cfg.interpolate_params);
        assert_eq!(cfg.max_sql_length, None);
    }
}
