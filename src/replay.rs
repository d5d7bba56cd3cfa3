//! 回放引擎
//!
//! 把一个快照的全部内容解析为语句单元，并按原始顺序逐条提交给执行能力。
//! 执行失败会中止本轮回放，剩余语句不再回放。

use crate::config::ReplayConfig;
use crate::error::ReplayError;
use crate::executor::Executor;
use crate::parser::StatementParser;
use crate::rotator::{Rotator, Snapshot};
use crate::tools::is_transaction_control;
use std::time::{Duration, Instant};

/// 一轮回放的统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayStats {
    /// 读取的非空记录数
    pub records: usize,
    /// 短于头部长度的记录数
    pub truncated_records: usize,
    /// 标签未知的记录数
    pub unknown_records: usize,
    /// 成功提交的语句数
    pub executed: usize,
    /// 因事务控制而跳过的语句数
    pub skipped: usize,
    /// 本轮耗时
    pub elapsed: Duration,
}

/// 回放引擎
pub struct ReplayEngine<E> {
    executor: E,
    separator: u8,
    skip_transaction_control: bool,
}

impl<E: Executor> ReplayEngine<E> {
    pub fn new(executor: E, config: &ReplayConfig) -> Self {
        Self {
            executor,
            separator: config.separator,
            skip_transaction_control: config.skip_transaction_control,
        }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn into_executor(self) -> E {
        self.executor
    }

    /// 回放一段内存中的抓包内容
    pub fn replay_bytes(&mut self, data: &[u8]) -> Result<ReplayStats, ReplayError> {
        let start = Instant::now();
        let mut stats = ReplayStats::default();
        let mut parser = StatementParser::new(data, self.separator);

        for unit in parser.by_ref() {
            if self.skip_transaction_control && is_transaction_control(unit.statement) {
                tracing::debug!(statement = %unit.statement_lossy(), "skipping transaction control");
                stats.skipped += 1;
                continue;
            }

            tracing::debug!(
                statement = %unit.statement_lossy(),
                parameters = unit.parameter_count(),
                "replaying statement"
            );
            self.executor.execute(unit.statement, &unit.parameters)?;
            stats.executed += 1;
        }

        let parsed = parser.stats();
        stats.records = parsed.records;
        stats.truncated_records = parsed.truncated_records;
        stats.unknown_records = parsed.unknown_records;
        stats.elapsed = start.elapsed();
        Ok(stats)
    }

    /// 读入并回放一个快照
    pub fn replay_snapshot(&mut self, snapshot: &Snapshot) -> Result<ReplayStats, ReplayError> {
        let data = snapshot.read()?;
        let stats = self.replay_bytes(&data)?;

        tracing::info!(
            snapshot = %snapshot.path().display(),
            executed = stats.executed,
            skipped = stats.skipped,
            records = stats.records,
            truncated = stats.truncated_records,
            unknown = stats.unknown_records,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "replay pass finished"
        );
        Ok(stats)
    }
}

/// 执行一轮完整流程：轮转、回放、处理快照
///
/// 回放成功后删除快照，除非配置了 `keep_snapshot`；
/// 回放失败时快照总是保留在磁盘上以便排查。
///
/// 语句已经全部提交后，删除快照失败只记录 warn 日志，仍然返回本轮统计。
///
/// # 示例
///
/// ```no_run
/// use pg_replayer::{DryRunExecutor, ReplayConfig, run_once};
///
/// let config = ReplayConfig::new("/tmp/pgbouncer_queries.bin");
/// let stats = run_once(&config, DryRunExecutor)?;
/// println!("replayed {} statements", stats.executed);
/// # Ok::<(), pg_replayer::ReplayError>(())
/// ```
pub fn run_once<E: Executor>(config: &ReplayConfig, executor: E) -> Result<ReplayStats, ReplayError> {
    let rotator = Rotator::new(config)?;
    let snapshot = rotator.rotate()?;

    let mut engine = ReplayEngine::new(executor, config);
    match engine.replay_snapshot(&snapshot) {
        Ok(stats) => {
            discard_snapshot(snapshot, config.keep_snapshot);
            Ok(stats)
        }
        Err(e) => {
            tracing::warn!(
                snapshot = %snapshot.path().display(),
                error = %e,
                "replay pass aborted, keeping snapshot"
            );
            Err(e)
        }
    }
}

/// 处理回放成功后的快照，返回快照是否已被删除
fn discard_snapshot(snapshot: Snapshot, keep: bool) -> bool {
    if keep {
        return false;
    }
    match snapshot.remove() {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "failed to remove replayed snapshot");
            false
        }
    }
}
