//! 错误类型定义
//!
//! 定义了轮转、解析回放以及执行过程中可能出现的所有错误类型。

use std::error::Error as StdError;
use std::io;
use thiserror::Error;

/// 回放错误类型
///
/// 分为三类：
/// - 配置错误：启动时即致命，进程不应继续
/// - 轮转错误：加锁、重命名、重建抓包文件失败，交给调用方处理
/// - 回放错误：快照读取或执行能力失败，中止当前这一轮回放
#[derive(Debug, Error)]
pub enum ReplayError {
    /// 未配置目标数据库连接串
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,

    /// 抓包文件不存在
    #[error("{path} does not exist")]
    CaptureFileNotFound {
        /// 配置的抓包文件路径
        path: String,
    },

    /// 分隔符配置无法解析为单个字节
    #[error("invalid line separator: expected a hex byte like '19', got '{0}'")]
    InvalidSeparator(String),

    /// 无法获取锁文件上的排他锁
    #[error("failed to lock {path}: {source}")]
    Lock {
        path: String,
        #[source]
        source: io::Error,
    },

    /// 重命名抓包文件失败
    #[error("failed to rename {from} to {to}: {source}")]
    Rename {
        from: String,
        to: String,
        #[source]
        source: io::Error,
    },

    /// 重建空抓包文件失败
    #[error("failed to create {path}: {source}")]
    Create {
        path: String,
        #[source]
        source: io::Error,
    },

    /// 读取快照失败
    #[error("failed to read snapshot {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    /// 删除快照失败
    #[error("failed to remove snapshot {path}: {source}")]
    Remove {
        path: String,
        #[source]
        source: io::Error,
    },

    /// 执行能力返回的错误
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl ReplayError {
    /// 是否为启动阶段的配置错误
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::MissingDatabaseUrl | Self::CaptureFileNotFound { .. } | Self::InvalidSeparator(_)
        )
    }
}

/// 执行能力（目标数据库）返回的错误
#[derive(Debug, Error)]
#[error("execution failed: {message}")]
pub struct ExecutionError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl ExecutionError {
    /// 仅带描述信息的执行错误
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// 包装底层数据库驱动的错误
    pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
