//! StatementParser - 把分段流还原为语句单元
//!
//! 状态机只记录三样东西：当前语句、已累积的参数、上一条记录的标签。
//!
//! 刷出（提交给执行能力）的时机：
//! - `Q`/`P` 到来且上一条标签为 `Q` 或 `B`：先刷出当前单元，再开启新语句。
//!   上一条为 `P`、`E` 或未知标签时不预刷出。
//! - `E`：立即刷出，但不清除语句文本和参数。
//! - 遇到第一个空分段（流结束）：刷出后停止。
//! - 分段耗尽却没有遇到空分段（抓包被截断）：同样刷出一次。
//!
//! 刷出只在已有语句时发生。

use crate::parser::record::{Record, Tag};
use crate::parser::segments::Segments;
use crate::statement::StatementUnit;

/// 一次解析过程的统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseStats {
    /// 读取的非空记录数
    pub records: usize,
    /// 短于 5 字节头部的记录数
    pub truncated_records: usize,
    /// 标签未知、被忽略的记录数
    pub unknown_records: usize,
    /// 刷出的语句单元数
    pub units: usize,
}

/// 语句单元迭代器
///
/// 借用整个快照内容，每次 `next` 最多消费到产生一个单元为止，
/// 调用方可以在任意单元处停止（例如执行失败时中止本轮回放）。
///
/// # 示例
///
/// ```
/// use pg_replayer::parser::StatementParser;
///
/// let data = b"Q\x00\x00\x00\x0cSELECT 1\x19";
/// let units: Vec<_> = StatementParser::new(data, 0x19).collect();
///
/// assert_eq!(units.len(), 1);
/// assert_eq!(units[0].statement, b"SELECT 1");
/// ```
#[derive(Debug, Clone)]
pub struct StatementParser<'a> {
    segments: Segments<'a>,
    statement: Option<&'a [u8]>,
    parameters: Vec<&'a [u8]>,
    prev_tag: Option<Tag>,
    finished: bool,
    stats: ParseStats,
}

impl<'a> StatementParser<'a> {
    pub fn new(data: &'a [u8], separator: u8) -> Self {
        Self {
            segments: Segments::new(data, separator),
            statement: None,
            parameters: Vec::new(),
            prev_tag: None,
            finished: false,
            stats: ParseStats::default(),
        }
    }

    /// 目前为止的统计信息
    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    /// 构造当前单元；没有语句时返回 `None`
    fn flush(&mut self) -> Option<StatementUnit<'a>> {
        let statement = self.statement?;
        self.stats.units += 1;
        Some(StatementUnit {
            statement,
            parameters: self.parameters.clone(),
        })
    }

    /// 开启新语句
    ///
    /// 还没有语句时保留已累积的参数，它们归属于第一条语句。
    fn start(&mut self, statement: &'a [u8]) {
        if self.statement.is_some() {
            self.parameters.clear();
        }
        self.statement = Some(statement);
    }

    /// 处理一条记录，返回需要刷出的单元
    fn step(&mut self, record: Record<'a>) -> Option<StatementUnit<'a>> {
        self.stats.records += 1;
        if record.is_truncated() {
            self.stats.truncated_records += 1;
        }

        let unit = match record.tag {
            Tag::Query | Tag::Parse => {
                let unit = match self.prev_tag {
                    Some(Tag::Query | Tag::Bind) => self.flush(),
                    _ => None,
                };
                self.start(record.payload);
                unit
            }
            Tag::Bind => {
                self.parameters.push(record.payload);
                None
            }
            Tag::Execute => self.flush(),
            Tag::Other(byte) => {
                self.stats.unknown_records += 1;
                tracing::debug!(tag = byte, "ignoring record with unknown tag");
                None
            }
        };

        self.prev_tag = Some(record.tag);
        unit
    }
}

impl<'a> Iterator for StatementParser<'a> {
    type Item = StatementUnit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            let Some(segment) = self.segments.next() else {
                // 截断的抓包：没有末尾空分段
                self.finished = true;
                return self.flush();
            };

            let Some(record) = Record::parse(segment) else {
                // 空分段即流结束
                self.finished = true;
                return self.flush();
            };

            if let Some(unit) = self.step(record) {
                return Some(unit);
            }
        }
        None
    }
}
