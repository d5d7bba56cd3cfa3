//! 集成测试 - 轮转加回放的端到端场景

use pg_replayer::{
    ExecutedStatement, ExecutionError, Executor, RecordingExecutor, ReplayConfig, ReplayEngine,
    ReplayError, Snapshot, parse_statements_from_file, run_once,
};
use std::fs;
use std::io::Write;
use tempfile::TempDir;

const SEP: u8 = 0x19;

fn rec(tag: u8, payload: &str) -> Vec<u8> {
    let mut out = vec![tag];
    out.extend_from_slice(&(payload.len() as u32 + 4).to_be_bytes());
    out.extend_from_slice(payload.as_bytes());
    out.push(SEP);
    out
}

fn write_capture(dir: &TempDir, records: &[Vec<u8>]) -> ReplayConfig {
    let path = dir.path().join("pgbouncer_queries.bin");
    let mut file = fs::File::create(&path).unwrap();
    for record in records {
        file.write_all(record).unwrap();
    }
    ReplayConfig::new(path)
}

fn golden_records() -> Vec<Vec<u8>> {
    vec![
        rec(b'Q', "SELECT * FROM users"),
        rec(b'P', "SELECT * FROM users WHERE field = $1"),
        rec(b'B', "234"),
        rec(b'Q', "SELECT * FROM users LIMIT 1"),
    ]
}

fn executed(statement: &str, parameters: &[&str]) -> ExecutedStatement {
    ExecutedStatement {
        statement: statement.as_bytes().to_vec(),
        parameters: parameters.iter().map(|p| p.as_bytes().to_vec()).collect(),
    }
}

/// 第 n 条语句（从 1 开始）执行失败的执行器
struct FailAt {
    calls: usize,
    fail_at: usize,
    seen: Vec<ExecutedStatement>,
}

impl Executor for FailAt {
    fn execute(&mut self, statement: &[u8], parameters: &[&[u8]]) -> Result<(), ExecutionError> {
        self.calls += 1;
        if self.calls == self.fail_at {
            return Err(ExecutionError::new("mirror rejected statement"));
        }
        self.seen.push(ExecutedStatement::new(statement, parameters));
        Ok(())
    }
}

#[test]
fn test_golden_capture_end_to_end() {
    let dir = TempDir::new().unwrap();
    let config = write_capture(&dir, &golden_records());
    let mut executor = RecordingExecutor::new();

    let stats = run_once(&config, &mut executor).unwrap();

    assert_eq!(stats.executed, 3);
    assert_eq!(stats.records, 4);
    assert_eq!(
        executor.executed(),
        &[
            executed("SELECT * FROM users", &[]),
            executed("SELECT * FROM users WHERE field = $1", &["234"]),
            executed("SELECT * FROM users LIMIT 1", &[]),
        ]
    );
}

#[test]
fn test_empty_capture_executes_nothing() {
    let dir = TempDir::new().unwrap();
    let config = write_capture(&dir, &[]);
    let mut executor = RecordingExecutor::new();

    let stats = run_once(&config, &mut executor).unwrap();

    assert_eq!(stats.executed, 0);
    assert!(executor.executed().is_empty());
    assert_eq!(fs::metadata(&config.capture_path).unwrap().len(), 0);
}

#[test]
fn test_snapshot_removed_after_successful_pass() {
    let dir = TempDir::new().unwrap();
    let config = write_capture(&dir, &golden_records());

    run_once(&config, RecordingExecutor::new()).unwrap();

    let mut names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["pgbouncer_queries.bin", "pgbouncer_queries.bin.lock"]);
}

#[test]
fn test_snapshot_kept_when_configured() {
    let dir = TempDir::new().unwrap();
    let config = write_capture(&dir, &golden_records()).with_keep_snapshot(true);

    run_once(&config, RecordingExecutor::new()).unwrap();

    let snapshots: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| {
            let name = path.file_name().unwrap().to_string_lossy();
            name != "pgbouncer_queries.bin" && name != "pgbouncer_queries.bin.lock"
        })
        .collect();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(fs::read(&snapshots[0]).unwrap(), golden_records().concat());
}

#[test]
fn test_failed_pass_aborts_and_keeps_snapshot() {
    let dir = TempDir::new().unwrap();
    let config = write_capture(&dir, &golden_records());
    let mut executor = FailAt {
        calls: 0,
        fail_at: 2,
        seen: Vec::new(),
    };

    let err = run_once(&config, &mut executor).unwrap_err();

    assert!(matches!(err, ReplayError::Execution(_)));
    assert!(!err.is_config());
    // 第三条语句不会被回放
    assert_eq!(executor.calls, 2);
    assert_eq!(executor.seen, vec![executed("SELECT * FROM users", &[])]);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 3);
}

#[test]
fn test_missing_capture_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let config = ReplayConfig::new(dir.path().join("nope.bin"));

    let err = run_once(&config, RecordingExecutor::new()).unwrap_err();

    assert!(err.is_config());
    assert!(err.to_string().ends_with("nope.bin does not exist"));
    assert!(!dir.path().join("nope.bin.lock").exists());
}

#[test]
fn test_replaying_same_snapshot_twice_is_identical() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snapshot.bin");
    let mut records = golden_records();
    records.push(rec(b'P', "UPDATE t SET a = $1 WHERE b = $2"));
    records.push(rec(b'B', "x"));
    records.push(rec(b'B', "y"));
    records.push(rec(b'E', ""));
    fs::write(&path, records.concat()).unwrap();

    let snapshot = Snapshot::from_path(&path);
    let config = ReplayConfig::default();

    let mut first = ReplayEngine::new(RecordingExecutor::new(), &config);
    first.replay_snapshot(&snapshot).unwrap();
    let mut second = ReplayEngine::new(RecordingExecutor::new(), &config);
    second.replay_snapshot(&snapshot).unwrap();

    assert_eq!(first.executor().executed(), second.executor().executed());
    assert_eq!(
        parse_statements_from_file(&path, SEP).unwrap(),
        first.into_executor().into_executed()
    );
    assert!(path.exists());
}

#[test]
fn test_parse_from_missing_file() {
    let err = parse_statements_from_file("/nonexistent/capture.bin", SEP).unwrap_err();
    assert!(matches!(err, ReplayError::Read { .. }));
}
