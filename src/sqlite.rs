//! 基于 SQLite 的执行能力
//!
//! 参数按原始字节绑定：合法 UTF-8 绑定为 TEXT，否则绑定为 BLOB。
//! 第 N 个参数绑定到名为 `$N` 的占位符，语句中未出现的占位符不绑定。
//! 查询结果只被读尽丢弃，不做校验。

use crate::error::ExecutionError;
use crate::executor::Executor;
use rusqlite::types::Value;
use rusqlite::Connection;

const URL_PREFIX: &str = "sqlite://";
const MEMORY_URL: &str = "sqlite::memory:";
const SCHEME_SEPARATOR: &str = "://";

/// 把语句回放到 SQLite 数据库的执行器
#[derive(Debug)]
pub struct SqliteExecutor {
    conn: Connection,
}

impl SqliteExecutor {
    /// 根据连接串打开目标数据库
    ///
    /// 支持 `sqlite://<path>`、`sqlite::memory:` 以及不带协议的裸路径，
    /// 其他协议（如 `postgres://`）直接报错。
    pub fn open(url: &str) -> Result<Self, ExecutionError> {
        let conn = if url == MEMORY_URL {
            Connection::open_in_memory()
        } else if let Some(path) = url.strip_prefix(URL_PREFIX) {
            Connection::open(path)
        } else if let Some((scheme, _)) = url.split_once(SCHEME_SEPARATOR) {
            return Err(ExecutionError::new(format!(
                "unsupported database scheme '{scheme}': expected {URL_PREFIX}<path>, {MEMORY_URL} or a file path"
            )));
        } else {
            Connection::open(url)
        }
        .map_err(|e| ExecutionError::with_source(format!("failed to open {url}"), e))?;

        Ok(Self { conn })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn bind_value(raw: &[u8]) -> Value {
    match std::str::from_utf8(raw) {
        Ok(text) => Value::Text(text.to_owned()),
        Err(_) => Value::Blob(raw.to_vec()),
    }
}

impl Executor for SqliteExecutor {
    fn execute(&mut self, statement: &[u8], parameters: &[&[u8]]) -> Result<(), ExecutionError> {
        let sql = std::str::from_utf8(statement)
            .map_err(|e| ExecutionError::with_source("statement is not valid UTF-8", e))?;

        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| ExecutionError::with_source(format!("failed to prepare: {sql}"), e))?;

        for (i, raw) in parameters.iter().enumerate() {
            let name = format!("${}", i + 1);
            let bind_error =
                |e: rusqlite::Error| ExecutionError::with_source(format!("failed to bind {name}: {sql}"), e);
            let Some(index) = stmt.parameter_index(&name).map_err(bind_error)? else {
                continue;
            };
            stmt.raw_bind_parameter(index, bind_value(raw))
                .map_err(bind_error)?;
        }

        let mut rows = stmt.raw_query();

        while rows
            .next()
            .map_err(|e| ExecutionError::with_source(format!("failed to step: {sql}"), e))?
            .is_some()
        {}

        Ok(())
    }
}
