//! 回放配置模块
//!
//! 启动时构造一次 [`ReplayConfig`]，再以引用形式传给轮转器和回放引擎，
//! 不使用任何全局状态。

use crate::error::ReplayError;
use crate::parser::constants::{DEFAULT_CAPTURE_PATH, DEFAULT_SEPARATOR};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// 回放配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayConfig {
    /// 目标（镜像）数据库连接串
    pub database_url: Option<String>,

    /// 代理持续追加的抓包文件路径
    pub capture_path: PathBuf,

    /// 记录分隔符
    pub separator: u8,

    /// 回放成功后是否保留快照文件
    pub keep_snapshot: bool,

    /// 是否跳过事务控制语句（BEGIN/END/COMMIT/ROLLBACK）
    pub skip_transaction_control: bool,
}

impl ReplayConfig {
    /// 以指定抓包文件路径创建配置，其余字段取默认值
    pub fn new<P: Into<PathBuf>>(capture_path: P) -> Self {
        Self {
            capture_path: capture_path.into(),
            ..Self::default()
        }
    }

    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_keep_snapshot(mut self, keep: bool) -> Self {
        self.keep_snapshot = keep;
        self
    }

    pub fn with_skip_transaction_control(mut self, skip: bool) -> Self {
        self.skip_transaction_control = skip;
        self
    }

    /// 锁文件路径：`<capture_path>.lock`
    pub fn lock_path(&self) -> PathBuf {
        sibling_path(&self.capture_path, "lock")
    }

    /// 返回连接串，未配置时报配置错误
    pub fn require_database_url(&self) -> Result<&str, ReplayError> {
        self.database_url
            .as_deref()
            .ok_or(ReplayError::MissingDatabaseUrl)
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            capture_path: PathBuf::from(DEFAULT_CAPTURE_PATH),
            separator: DEFAULT_SEPARATOR,
            keep_snapshot: false,
            skip_transaction_control: false,
        }
    }
}

/// 在路径后追加 `.<suffix>`，如 `/tmp/q.bin` -> `/tmp/q.bin.lock`
pub(crate) fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// 解析十六进制形式的分隔符，如 `19` 或 `0x19`
pub fn parse_separator(value: &str) -> Result<u8, ReplayError> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() || digits.len() > 2 {
        return Err(ReplayError::InvalidSeparator(value.to_string()));
    }

    u8::from_str_radix(digits, 16).map_err(|_| ReplayError::InvalidSeparator(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReplayConfig::default();
        assert_eq!(config.capture_path, PathBuf::from("/tmp/pgbouncer_queries.bin"));
        assert_eq!(config.separator, 0x19);
        assert!(config.database_url.is_none());
        assert!(!config.keep_snapshot);
        assert!(!config.skip_transaction_control);
    }

    #[test]
    fn test_lock_path() {
        let config = ReplayConfig::new("/var/tmp/capture.bin");
        assert_eq!(config.lock_path(), PathBuf::from("/var/tmp/capture.bin.lock"));
    }

    #[test]
    fn test_require_database_url() {
        let config = ReplayConfig::default();
        assert!(matches!(
            config.require_database_url(),
            Err(ReplayError::MissingDatabaseUrl)
        ));

        let config = config.with_database_url("sqlite::memory:");
        assert_eq!(config.require_database_url().unwrap(), "sqlite::memory:");
    }

    #[test]
    fn test_parse_separator() {
        assert_eq!(parse_separator("19").unwrap(), 0x19);
        assert_eq!(parse_separator("0x7e").unwrap(), b'~');
        assert_eq!(parse_separator(" 0A ").unwrap(), b'\n');
        assert!(parse_separator("").is_err());
        assert!(parse_separator("123").is_err());
        assert!(parse_separator("zz").is_err());
    }
}
