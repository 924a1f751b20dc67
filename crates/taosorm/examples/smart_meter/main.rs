//! Smart-meter walkthrough: super-table, child tables, auto-create on insert
//! and windowed aggregation.
//!
//! Run with: cargo run --example smart_meter -p taosorm
//!
//! No server is needed: statements go to a pool that prints them. Set
//! TAOS_DSN in a .env file or the environment to change the DSN shown.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use colored::Colorize;
use std::env;
use taosorm::prelude::*;
use taosorm::{DataType, Field, Schema};

/// Pool that prints every statement and answers queries with canned rows.
struct PrintingPool {
    rows: Vec<Row>,
}

impl ConnPool for PrintingPool {
    async fn execute(&self, sql: &str, _vars: &[Value]) -> OrmResult<u64> {
        println!("  {} {}", "exec".green().bold(), sql);
        Ok(1)
    }

    async fn query(&self, sql: &str, _vars: &[Value]) -> OrmResult<Vec<Row>> {
        println!("  {} {}", "query".blue().bold(), sql);
        Ok(self.rows.clone())
    }
}

fn print_header(title: &str) {
    println!();
    println!("{}", "─".repeat(70).bright_black());
    println!("{}", title.bold().cyan());
    println!("{}", "─".repeat(70).bright_black());
}

fn reading(ts: DateTime<Utc>, value: impl Into<Value>) -> Record {
    Record::from([
        ("ts".to_string(), Value::from(ts)),
        ("value".to_string(), value.into()),
    ])
}

#[derive(Debug)]
struct Bucket {
    ts: DateTime<Utc>,
    v: Option<f64>,
}

impl FromRow for Bucket {
    fn from_row(row: &Row) -> OrmResult<Self> {
        Ok(Self {
            ts: row.try_get("ts")?,
            v: row.try_get("v")?,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let dsn = env::var("TAOS_DSN")
        .unwrap_or_else(|_| "root:taosdata@/tcp(127.0.0.1:6030)/gorm_test?loc=Local".to_string());

    let now = Utc::now();
    let second = ChronoDuration::seconds(1);
    let canned = (1..=4)
        .map(|i| {
            let v = if i < 4 {
                Value::from(10.0 + f64::from(i))
            } else {
                Value::Null
            };
            Row::new().with("ts", now + second * i).with("v", v)
        })
        .collect();

    let db = Db::open(
        TaosDialect::open(dsn),
        PrintingPool { rows: canned },
        Config::new().debug(),
    )?;
    println!("driver: {}  dsn: {}", db.dialect().driver_name, db.dialect().dsn);

    print_header("Super-table from a schema");
    let schema = Schema::new(
        "stb_1",
        vec![
            Field::new("ts", DataType::Time),
            Field::new("value", DataType::Float),
            Field::new("tbn", DataType::Bytes).tag(),
        ],
    );
    db.migrator().create_stable(&schema).await?;

    print_header("Child table using the super-table");
    let child = create::Table::common(
        "tb_1",
        true,
        Vec::new(),
        "stb_1",
        [("tbn".to_string(), Value::from("tb_1"))].into(),
    );
    db.table("tb_1")
        .clause(CreateTable::new(vec![child]))
        .create(Vec::new())
        .await?;

    print_header("Inserts");
    db.table("tb_1").create(vec![reading(now, 0.6)]).await?;
    db.table("tb_aggregate")
        .clause(Using::stable("stb_1").add_tag_pair("tbn", "tb_aggregate"))
        .create(vec![
            reading(now + second, 11),
            reading(now + second * 2, 12),
            reading(now + second * 3, 13),
        ])
        .await?;

    print_header("Windowed aggregate");
    let buckets: Vec<Bucket> = db
        .table("tb_aggregate")
        .select("max(value) as v")
        .where_(
            "ts >= ? and ts <= ?",
            vec![(now + second).into(), (now + second * 4).into()],
        )
        .clause(Window::interval(Duration::try_from(std::time::Duration::from_secs(1))?))
        .clause(Fill::null())
        .find_as()
        .await?;
    for bucket in &buckets {
        let v = bucket
            .v
            .map(|v| v.to_string())
            .unwrap_or_else(|| "NULL".dimmed().to_string());
        println!("  {}  {}", bucket.ts.format("%H:%M:%S%.3f"), v);
    }

    print_header("Unsupported migrations");
    if let Err(e) = db.migrator().rename_column(&schema, "value", "current") {
        println!("  {} {}", "✗".red().bold(), e);
    }

    Ok(())
}
