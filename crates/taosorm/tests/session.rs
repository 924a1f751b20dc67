mod common;

use chrono::{DateTime, TimeZone, Utc};
use common::RecordingPool;
use std::time::Duration as StdDuration;
use taosorm::prelude::*;

fn at(sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 8, 11, 9, 43, sec).unwrap()
}

fn open(pool: RecordingPool) -> Db<RecordingPool> {
    let dialect = TaosDialect::open("root:taosdata@/tcp(127.0.0.1:6030)/gorm_test");
    Db::open(dialect, pool, Config::new()).unwrap()
}

fn record(pairs: &[(&str, Value)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[tokio::test]
async fn open_initializes_dialect() {
    let db = open(RecordingPool::new());
    assert_eq!(db.dialect().driver_name, taosorm::DRIVER_NAME);
    assert!(db.config().skip_default_transaction);
    assert!(db.config().disable_automatic_ping);
}

#[tokio::test]
async fn create_stable_emits_only_ddl() {
    let db = open(RecordingPool::new());
    let stable = create::Table::stable(
        "stb_1",
        true,
        vec![
            create::Column::timestamp("ts"),
            create::Column::new("value", ColumnType::Double),
        ],
        vec![create::Column::binary("tbn", 64)],
    );
    db.table("stb_1")
        .clause(CreateTable::new(vec![stable]))
        .create(vec![])
        .await
        .unwrap();

    assert_eq!(
        db.pool().calls(),
        vec![(
            "CREATE STABLE IF NOT EXISTS stb_1 (ts TIMESTAMP,value DOUBLE) TAGS(tbn BINARY(64))"
                .to_string(),
            Vec::<Value>::new()
        )]
    );
}

#[tokio::test]
async fn create_table_using_stable() {
    let db = open(RecordingPool::new());
    let table = create::Table::common(
        "tb_1",
        true,
        vec![],
        "stb_1",
        [("tbn".to_string(), Value::from("tb_1"))].into(),
    );
    db.table("tb_1")
        .clause(CreateTable::new(vec![table]))
        .create(vec![record(&[("ignored", Value::from(1))])])
        .await
        .unwrap();

    assert_eq!(
        db.pool().last_sql(),
        "CREATE TABLE IF NOT EXISTS tb_1 USING stb_1(tbn) TAGS ('tb_1')"
    );
}

#[tokio::test]
async fn insert_orders_columns() {
    let db = open(RecordingPool::new());
    db.table("tb_1")
        .create(vec![record(&[("value", 0.5.into()), ("ts", at(0).into())])])
        .await
        .unwrap();

    assert_eq!(
        db.pool().last_sql(),
        "INSERT INTO tb_1 (ts,value) VALUES ('2021-08-11T09:43:00Z',0.5)"
    );
}

#[tokio::test]
async fn insert_with_automatic_table_creation() {
    let db = open(RecordingPool::new());
    db.table("tb_aggregate")
        .clause(Using::stable("stb_1").add_tag_pair("tbn", "tb_aggregate"))
        .create(vec![
            record(&[("ts", at(1).into()), ("value", 11.into())]),
            record(&[("ts", at(2).into()), ("value", 12.into())]),
            record(&[("ts", at(3).into())]),
        ])
        .await
        .unwrap();

    assert_eq!(
        db.pool().last_sql(),
        "INSERT INTO tb_aggregate USING stb_1('tbn') TAGS('tb_aggregate') (ts,value) VALUES \
         ('2021-08-11T09:43:01Z',11),('2021-08-11T09:43:02Z',12),('2021-08-11T09:43:03Z',NULL)"
    );
}

#[tokio::test]
async fn binary_values_must_be_utf8_to_inline() {
    let payload = vec![0xffu8, 0x00, 0x41];
    let db = open(RecordingPool::new());
    let err = db
        .table("tb_1")
        .create(vec![record(&[("ts", at(0).into()), ("raw", payload.clone().into())])])
        .await
        .unwrap_err();
    assert!(matches!(err, OrmError::Validation(_)));
    assert!(db.pool().calls().is_empty());

    let db = Db::open(
        TaosDialect::default(),
        RecordingPool::new(),
        Config::new().keep_placeholders(),
    )
    .unwrap();
    db.table("tb_1")
        .create(vec![record(&[("ts", at(0).into()), ("raw", payload.clone().into())])])
        .await
        .unwrap();
    assert_eq!(
        db.pool().calls(),
        vec![(
            "INSERT INTO tb_1 (raw,ts) VALUES (?,?)".to_string(),
            vec![Value::from(payload), Value::from(at(0))]
        )]
    );
}

#[tokio::test]
async fn create_without_values_is_rejected() {
    let db = open(RecordingPool::new());
    let err = db.table("tb_1").create(vec![]).await.unwrap_err();
    assert!(matches!(err, OrmError::Validation(_)));

    let err = db
        .table("tb_1")
        .create(vec![Record::new()])
        .await
        .unwrap_err();
    assert!(matches!(err, OrmError::Validation(_)));
    assert!(db.pool().calls().is_empty());
}

#[tokio::test]
async fn windowed_aggregate_query() {
    let db = open(RecordingPool::new());
    db.table("tb_aggregate")
        .select("max(value) as v")
        .where_("ts >= ? and ts <= ?", vec![at(1).into(), at(4).into()])
        .clause(Window::interval(
            Duration::from_std(StdDuration::from_secs(1)).unwrap(),
        ))
        .clause(Fill::null())
        .find()
        .await
        .unwrap();

    assert_eq!(
        db.pool().last_sql(),
        "SELECT max(value) as v FROM tb_aggregate WHERE ts >= '2021-08-11T09:43:01Z' and ts <= \
         '2021-08-11T09:43:04Z' INTERVAL(1000000u) FILL (NULL)"
    );
}

#[tokio::test]
async fn query_clause_order() {
    let db = open(RecordingPool::new());
    let (sql, vars) = db
        .table("meters")
        .limit(10)
        .clause(SLimit::limit(1))
        .order(OrderBy::desc("ts"))
        .where_("location = ?", vec!["California".into()])
        .clause(Window::session("ts", Duration::seconds(30)))
        .to_find_sql();

    assert_eq!(
        sql,
        "SELECT * FROM meters WHERE location = '?' SESSION(ts,30s) ORDER BY ts DESC SLIMIT 1 LIMIT 10"
    );
    assert_eq!(vars, vec![Value::from("California")]);
}

#[tokio::test]
async fn to_create_sql_does_not_execute() {
    let db = open(RecordingPool::new());
    let (sql, vars) = db
        .table("tb_1")
        .to_create_sql(vec![record(&[("ts", at(0).into()), ("note", "hi".into())])])
        .unwrap();
    assert_eq!(sql, "INSERT INTO tb_1 (note,ts) VALUES ('?',?)");
    assert_eq!(vars, vec![Value::from("hi"), Value::from(at(0))]);
    assert!(db.pool().calls().is_empty());
}

#[tokio::test]
async fn placeholders_are_kept_when_configured() {
    let db = Db::open(
        TaosDialect::default(),
        RecordingPool::new(),
        Config::new().keep_placeholders(),
    )
    .unwrap();
    db.table("tb_1")
        .where_("ts = ?", vec![at(0).into()])
        .find()
        .await
        .unwrap();

    assert_eq!(
        db.pool().calls(),
        vec![(
            "SELECT * FROM tb_1 WHERE ts = ?".to_string(),
            vec![Value::from(at(0))]
        )]
    );
}

#[derive(Debug, PartialEq)]
struct Reading {
    ts: DateTime<Utc>,
    v: Option<f64>,
}

impl FromRow for Reading {
    fn from_row(row: &Row) -> OrmResult<Self> {
        Ok(Self {
            ts: row.try_get("ts")?,
            v: row.try_get("v")?,
        })
    }
}

#[tokio::test]
async fn find_as_maps_rows() {
    let pool = RecordingPool::new().with_rows(vec![
        Row::new().with("ts", at(1)).with("v", 11.0),
        Row::new().with("ts", at(4)).with("v", Value::Null),
    ]);
    let db = open(pool);
    let readings: Vec<Reading> = db
        .table("tb_aggregate")
        .select("max(value) as v")
        .find_as()
        .await
        .unwrap();

    assert_eq!(
        readings,
        vec![
            Reading {
                ts: at(1),
                v: Some(11.0)
            },
            Reading { ts: at(4), v: None },
        ]
    );
}

#[tokio::test]
async fn find_as_reports_decode_errors() {
    let pool =
        RecordingPool::new().with_rows(vec![Row::new().with("ts", "oops").with("v", 1.0)]);
    let db = open(pool);
    let err = db.table("t").find_as::<Reading>().await.unwrap_err();
    assert!(matches!(err, OrmError::Decode { ref column, .. } if column == "ts"));
}

#[tokio::test]
async fn first_on_empty_result_is_not_found() {
    let db = open(RecordingPool::new());
    let err = db.table("tb_1").first().await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn raw_exec_binds_values() {
    let db = open(RecordingPool::new());
    db.exec(
        "INSERT INTO tb_1 VALUES (now, ?, ?)",
        vec![12.into(), "it's".into()],
    )
    .await
    .unwrap();
    db.raw("SELECT * FROM tb_1 LIMIT ?", vec![1.into()])
        .await
        .unwrap();

    assert_eq!(
        db.pool().sqls(),
        vec![
            "INSERT INTO tb_1 VALUES (now, 12, 'it\\'s')".to_string(),
            "SELECT * FROM tb_1 LIMIT 1".to_string(),
        ]
    );
}

#[tokio::test]
async fn slow_pool_times_out() {
    let db = Db::open(
        TaosDialect::default(),
        RecordingPool::new().with_delay(StdDuration::from_millis(500)),
        Config::new().timeout(StdDuration::from_millis(20)),
    )
    .unwrap();
    let err = db.table("tb_1").find().await.unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test]
async fn pool_errors_propagate() {
    let db = open(RecordingPool::new().failing("syntax error"));
    let err = db.exec("select * rfom tb_1", vec![]).await.unwrap_err();
    assert!(matches!(err, OrmError::Query(ref m) if m == "syntax error"));
}
