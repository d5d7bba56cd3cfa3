//! 便捷 API 函数
//!
//! 提供了一组方便使用的高层 API，用于快速把抓包内容还原为语句单元。

use crate::error::ReplayError;
use crate::parser::statement_parser::StatementParser;
use crate::statement::{ExecutedStatement, StatementUnit};
use std::fs;
use std::path::Path;

/// 把字节内容解析为语句单元列表
///
/// 纯函数，不涉及任何 I/O，相同输入总是得到相同输出。
///
/// # 参数
///
/// * `data` - 快照的完整内容
/// * `separator` - 记录分隔符
///
/// # 示例
///
/// ```
/// use pg_replayer::parse_statements;
///
/// let data = b"P\x00\x00\x00\x10SELECT $1\x19B\x00\x00\x00\x0642\x19";
/// let units = parse_statements(data, 0x19);
///
/// assert_eq!(units.len(), 1);
/// assert_eq!(units[0].statement, b"SELECT $1");
/// assert_eq!(units[0].parameters, vec![&b"42"[..]]);
/// ```
pub fn parse_statements(data: &[u8], separator: u8) -> Vec<StatementUnit<'_>> {
    StatementParser::new(data, separator).collect()
}

/// 从文件读取并解析为语句单元（拥有所有权）
///
/// # 参数
///
/// * `path` - 快照或抓包文件路径
/// * `separator` - 记录分隔符
///
/// # 返回
///
/// * `Ok(Vec<ExecutedStatement>)` - 按顺序排列的语句单元
/// * `Err(ReplayError)` - 文件读取错误
pub fn parse_statements_from_file<P>(
    path: P,
    separator: u8,
) -> Result<Vec<ExecutedStatement>, ReplayError>
where
    P: AsRef<Path>,
{
    let path_ref = path.as_ref();
    let data = fs::read(path_ref).map_err(|source| ReplayError::Read {
        path: path_ref.display().to_string(),
        source,
    })?;

    Ok(StatementParser::new(&data, separator)
        .map(|unit| unit.to_executed())
        .collect())
}
