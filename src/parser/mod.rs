//! Parser 模块 - 解析连接池代理写出的抓包文件
//!
//! 此模块提供了完整的抓包解析功能,包括:
//! - 按分隔符切分
//! - Record 结构和解析
//! - 还原语句单元的状态机
//! - 便捷 API 函数

mod api;
pub mod constants;
pub mod record;
pub mod segments;
pub mod statement_parser;

pub use api::{parse_statements, parse_statements_from_file};
pub use record::{Record, Tag};
pub use segments::Segments;
pub use statement_parser::{ParseStats, StatementParser};
