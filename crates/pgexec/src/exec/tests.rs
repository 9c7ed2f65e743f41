use super::*;
use crate::client::{Executor, PoolExecutor, TxExecutor};
use crate::config::DbConfig;
use crate::db::{Db, DbTx};
use crate::error::{ExecError, ExecResult};
use crate::log::SqlLogger;
use crate::sql::{Sql, SqlStr, sql};
use async_trait::async_trait;
use std::fmt;
use std::sync::{Arc, Mutex};
use tokio_postgres::types::ToSql;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Metadata, Subscriber};

// ── Mock connection shared by the dispatcher tests ──

#[derive(Debug, Clone, PartialEq)]
struct Call {
    on: &'static str,
    sql: String,
    params: String,
}

#[derive(Clone)]
struct MockConn {
    on: &'static str,
    calls: Arc<Mutex<Vec<Call>>>,
    reply: Result<RawResult, String>,
}

impl MockConn {
    fn new(reply: Result<RawResult, String>) -> Self {
        Self {
            on: "pool",
            calls: Arc::default(),
            reply,
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Executor for MockConn {
    async fn exec(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> ExecResult<RawResult> {
        self.calls.lock().unwrap().push(Call {
            on: self.on,
            sql: sql.to_string(),
            params: format!("{params:?}"),
        });
        self.reply.clone().map_err(ExecError::Other)
    }
}

#[async_trait]
impl PoolExecutor for MockConn {
    async fn begin(&self) -> ExecResult<Box<dyn TxExecutor>> {
        let mut tx = self.clone();
        tx.on = "tx";
        Ok(Box::new(tx))
    }
}

#[async_trait]
impl TxExecutor for MockConn {
    async fn commit(self: Box<Self>) -> ExecResult<()> {
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> ExecResult<()> {
        Ok(())
    }
}

fn affected(rows: u64, id: Option<i64>) -> MockConn {
    MockConn::new(Ok(RawResult::new(rows, id)))
}

// ==================== Classification ====================

#[test]
fn classifies_leading_verb() {
    assert_eq!(StatementKind::classify("UPDATE t SET x=1"), Some(StatementKind::Update));
    assert_eq!(StatementKind::classify("delete from t"), Some(StatementKind::Delete));
    assert_eq!(
        StatementKind::classify("  \n\tInsert into t values (1)"),
        Some(StatementKind::Insert)
    );
    assert_eq!(StatementKind::classify("replace into t values (1)"), Some(StatementKind::Replace));
    assert_eq!(StatementKind::classify("select 1"), None);
    assert_eq!(StatementKind::classify("with x as (select 1) delete from t"), None);
    assert_eq!(StatementKind::classify(""), None);
    assert_eq!(StatementKind::classify("upd"), None);
}

#[test]
fn classification_is_a_prefix_test() {
    // No word-boundary check: any text starting with the verb matches.
    assert_eq!(StatementKind::classify("updated_rows"), Some(StatementKind::Update));
}

#[test]
fn comments_are_not_skipped() {
    assert_eq!(StatementKind::classify("-- bump\nupdate t set x = 1"), None);
}

#[test]
fn kinds_map_to_outcomes() {
    assert_eq!(StatementKind::Update.outcome(), Outcome::RowsAffected);
    assert_eq!(StatementKind::Delete.outcome(), Outcome::RowsAffected);
    assert_eq!(StatementKind::Insert.outcome(), Outcome::LastInsertId);
    assert_eq!(StatementKind::Replace.outcome(), Outcome::LastInsertId);
}

// ==================== Interpretation ====================

#[test]
fn update_and_delete_report_rows_affected() {
    let result = RawResult::new(3, Some(99));
    assert_eq!(interpret("UPDATE t SET x=1", &result).unwrap(), 3);
    assert_eq!(interpret("delete from t", &result).unwrap(), 3);
}

#[test]
fn insert_and_replace_report_generated_id() {
    let result = RawResult::new(1, Some(42));
    assert_eq!(interpret("insert into t (a) values ($1) returning id", &result).unwrap(), 42);
    assert_eq!(interpret("replace into t values (1)", &result).unwrap(), 42);
}

#[test]
fn insert_without_returning_has_no_id() {
    let err = interpret("insert into t (a) values (1)", &RawResult::new(1, None)).unwrap_err();
    assert!(matches!(err, ExecError::NoGeneratedId));
}

#[test]
fn select_is_unsupported() {
    let err = interpret("select 1", &RawResult::default()).unwrap_err();
    match err {
        ExecError::UnsupportedStatementKind(verb) => assert_eq!(verb, "select"),
        other => panic!("unexpected error: {other:?}"),
    }
}

// ==================== Dispatch ====================

#[tokio::test]
async fn blank_pool_is_uninitialized() {
    let db = Db::blank();
    let err = ExecTarget::Pool(&db)
        .exec("select 1", &[], None)
        .await
        .unwrap_err();
    assert!(err.is_uninitialized());
}

#[tokio::test]
async fn blank_tx_is_uninitialized() {
    let err = sql("update t set x = 1").exec(&DbTx::blank()).await.unwrap_err();
    assert!(err.is_uninitialized());
}

#[tokio::test]
async fn blank_target_with_logging_is_still_uninitialized() {
    let db = Db::blank().with_config(DbConfig::new().enable_sql_logging());
    let err = sql("update t set x = 1").exec(&db).await.unwrap_err();
    assert!(err.is_uninitialized());
}

#[tokio::test]
async fn end_to_end_through_mock_pool() {
    let conn = affected(3, None);
    let db = Db::from_executor(conn.clone());

    let q = sql("select * from users")
        .where_in("id", ["1", "2", "3"])
        .limit(10);
    let err = q.exec(&db).await.unwrap_err();

    // The pool saw the exact text and parameters even though `select`
    // has no defined outcome.
    assert_eq!(
        conn.calls(),
        vec![Call {
            on: "pool",
            sql: "select * from users where id in ($1,$2,$3)  limit 10".to_string(),
            params: r#"["1", "2", "3"]"#.to_string(),
        }]
    );
    assert!(matches!(err, ExecError::UnsupportedStatementKind(_)));
}

#[tokio::test]
async fn delete_through_pool_returns_rows_affected() {
    let conn = affected(2, None);
    let db = Db::from_executor(conn.clone());

    let n = sql("delete from users")
        .where_in("id", ["7", "9"])
        .exec(&db)
        .await
        .unwrap();
    assert_eq!(n, 2);
    assert_eq!(conn.calls()[0].sql, "delete from users where id in ($1,$2) ");
}

#[tokio::test]
async fn insert_through_tx_returns_generated_id() {
    let conn = affected(1, Some(1001));
    let db = Db::from_executor(conn.clone()).with_config(DbConfig::new().enable_sql_logging());
    let tx = db.begin().await.unwrap();

    let id = sql("insert into users (name) values ($1) returning id")
        .bind("alice")
        .tagged("users.create")
        .exec(&tx)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(id, 1001);
    let calls = conn.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].on, "tx");
    assert_eq!(calls[0].params, r#"["alice"]"#);
}

#[tokio::test]
async fn driver_errors_propagate_unchanged() {
    let db = Db::from_executor(MockConn::new(Err("relation \"t\" does not exist".to_string())));
    let err = sql("update t set x = 1").exec(&db).await.unwrap_err();
    assert_eq!(err.to_string(), "relation \"t\" does not exist");
}

#[tokio::test]
async fn bare_fragment_executes_without_params() {
    let conn = affected(5, None);
    let db = Db::from_executor(conn.clone());

    let n = SqlStr::from("update users set active = false").exec(&db).await.unwrap();
    assert_eq!(n, 5);
    assert_eq!(conn.calls()[0].params, "[]");
}

// ==================== Type-erased sources ====================

#[tokio::test]
async fn exec_any_accepts_db_and_tx() {
    let conn = affected(4, None);
    let db = Db::from_executor(conn.clone());
    let tx = db.begin().await.unwrap();

    let q = sql("update t set x = 1");
    assert_eq!(q.exec_any(&db).await.unwrap(), 4);
    assert_eq!(q.exec_any(&tx).await.unwrap(), 4);
    assert_eq!(
        conn.calls().iter().map(|c| c.on).collect::<Vec<_>>(),
        vec!["pool", "tx"]
    );
}

#[tokio::test]
async fn exec_any_rejects_other_sources() {
    let not_a_target = String::from("postgres://localhost");
    let err = sql("update t set x = 1")
        .exec_any(&not_a_target)
        .await
        .unwrap_err();
    assert!(matches!(err, ExecError::UnsupportedTarget));

    let err = SqlStr::from("update t set x = 1").exec_any(&42_u8).await.unwrap_err();
    assert!(matches!(err, ExecError::UnsupportedTarget));
}

#[test]
fn from_any_checks_blank_later() {
    // Resolution only looks at the type; blankness is checked at execution.
    let db = Db::blank();
    assert!(matches!(ExecTarget::from_any(&db), Ok(ExecTarget::Pool(_))));
}

// ==================== Statement logging ====================

#[derive(Debug, Clone)]
struct Captured {
    target: String,
    level: Level,
    fields: Vec<(String, String)>,
}

impl Captured {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

struct FieldText<'a>(&'a mut Vec<(String, String)>);

impl Visit for FieldText<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
}

/// Keeps every event it sees; spans are ignored.
#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<Captured>>>);

impl Recorder {
    fn sql_events(&self) -> Vec<Captured> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.target == "pgexec.sql")
            .cloned()
            .collect()
    }
}

impl Subscriber for Recorder {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _: &Id, _: &Record<'_>) {}

    fn record_follows_from(&self, _: &Id, _: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let mut fields = Vec::new();
        event.record(&mut FieldText(&mut fields));
        self.0.lock().unwrap().push(Captured {
            target: event.metadata().target().to_string(),
            level: *event.metadata().level(),
            fields,
        });
    }

    fn enter(&self, _: &Id) {}

    fn exit(&self, _: &Id) {}
}

async fn run_logged(config: DbConfig, q: &Sql) -> (Vec<Captured>, MockConn) {
    let recorder = Recorder::default();
    let _guard = tracing::subscriber::set_default(recorder.clone());

    let conn = affected(2, None);
    let db = Db::from_executor(conn.clone()).with_config(config);
    q.exec(&db).await.unwrap();
    (recorder.sql_events(), conn)
}

#[tokio::test]
async fn enabled_logging_emits_text_tag_and_params() {
    let q = sql("delete from users")
        .where_in("id", ["1", "2"])
        .tagged("users.purge");
    let (events, _) = run_logged(DbConfig::new().enable_sql_logging(), &q).await;

    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.level, Level::DEBUG);
    assert_eq!(event.field("sql"), Some("delete from users where id in ($1,$2) "));
    assert_eq!(event.field("params"), Some(r#"["1", "2"]"#));
    assert_eq!(event.field("tag"), Some("users.purge"));
    assert_eq!(event.field("kind"), Some("pool"));
    assert_eq!(event.field("param_count"), Some("2"));
}

#[tokio::test]
async fn untagged_statement_logs_placeholder_tag() {
    let q = sql("update users set active = true");
    let (events, _) = run_logged(DbConfig::new().enable_sql_logging(), &q).await;

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].field("tag"), Some("-"));
    assert_eq!(events[0].field("params"), Some("[]"));
}

#[tokio::test]
async fn disabled_logging_emits_nothing() {
    let q = sql("delete from users").where_in("id", ["1"]);

    let (events, conn) = run_logged(DbConfig::new(), &q).await;
    assert!(events.is_empty());
    assert_eq!(conn.calls().len(), 1);

    let config = DbConfig::new().enable_sql_logging().disable_sql_logging();
    let (events, conn) = run_logged(config, &q).await;
    assert!(events.is_empty());
    assert_eq!(conn.calls().len(), 1);
}

#[tokio::test]
async fn configured_level_is_used() {
    let q = sql("update users set x = 1");

    let config = DbConfig::new().enable_sql_logging().sql_log_level(Level::INFO);
    let (events, _) = run_logged(config, &q).await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, Level::INFO);

    let config = DbConfig::new()
        .enable_sql_logging()
        .sql_logger(SqlLogger::new().level(Level::WARN).max_sql_length(12));
    let (events, _) = run_logged(config, &q).await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, Level::WARN);
    assert_eq!(events[0].field("sql"), Some("update users..."));
}

#[tokio::test]
async fn blank_target_logs_nothing() {
    let recorder = Recorder::default();
    let _guard = tracing::subscriber::set_default(recorder.clone());

    let db = Db::blank().with_config(DbConfig::new().enable_sql_logging());
    let err = sql("update t set x = 1").exec(&db).await.unwrap_err();
    assert!(err.is_uninitialized());

    let err = sql("update t set x = 1")
        .exec(&DbTx::blank())
        .await
        .unwrap_err();
    assert!(err.is_uninitialized());

    assert!(recorder.sql_events().is_empty());
}
