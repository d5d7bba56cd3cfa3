//! # PG Replayer
//!
//! 把连接池代理（如 PgBouncer）抓取的协议数据包回放到一个镜像数据库。
//!
//! ## 功能特性
//!
//! - **安全轮转**: 在锁文件的排他锁保护下把抓包文件换成快照，代理无需停顿
//! - **零拷贝解析**: 语句单元直接借用快照字节，解析过程是纯函数
//! - **可替换的执行能力**: 回放引擎只依赖 [`Executor`] 接口
//! - **详细的错误信息**: 配置、轮转、执行三类错误分开报告
//!
//! ## 快速开始
//!
//! ### 解析抓包内容
//!
//! ```rust
//! use pg_replayer::parse_statements;
//!
//! // Q 记录 + 4 字节长度 + 语句文本，以 0x19 结尾
//! let data = b"Q\x00\x00\x00\x17SELECT * FROM users\x19";
//! let units = parse_statements(data, 0x19);
//!
//! assert_eq!(units.len(), 1);
//! assert_eq!(units[0].statement_lossy(), "SELECT * FROM users");
//! ```
//!
//! ### 轮转并回放
//!
//! ```rust,no_run
//! use pg_replayer::{DryRunExecutor, ReplayConfig, run_once};
//!
//! let config = ReplayConfig::new("/tmp/pgbouncer_queries.bin");
//! let stats = run_once(&config, DryRunExecutor)?;
//!
//! println!("回放 {} 条语句", stats.executed);
//! # Ok::<(), pg_replayer::ReplayError>(())
//! ```
//!
//! ## 抓包格式
//!
//! ```text
//! Tag(1 字节) || Length(4 字节，不参与切分) || Payload ... SEP ... SEP
//! ```
//!
//! 标签：`Q` 简单查询、`P` 预处理语句、`B` 绑定参数、`E` 执行。
//! 分隔符默认为 0x19，payload 中不得出现分隔符。

pub mod config;
pub mod error;
pub mod executor;
pub mod parser;
pub mod replay;
pub mod rotator;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod statement;
pub mod tools;

pub use config::{ReplayConfig, parse_separator};
pub use error::{ExecutionError, ReplayError};
pub use executor::{DryRunExecutor, Executor, RecordingExecutor};
pub use parser::{ParseStats, StatementParser, parse_statements, parse_statements_from_file};
pub use replay::{ReplayEngine, ReplayStats, run_once};
pub use rotator::{RotationLock, Rotator, Snapshot};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteExecutor;
pub use statement::{ExecutedStatement, StatementUnit};
