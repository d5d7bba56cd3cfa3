//! 解析器使用的常量定义
//!
//! 定义了抓包文件格式中的标签字节、头部长度以及默认配置。

/// 默认的记录分隔符（0x19，EM 控制字符）
pub const DEFAULT_SEPARATOR: u8 = 0x19;

/// 默认的抓包文件路径
pub const DEFAULT_CAPTURE_PATH: &str = "/tmp/pgbouncer_queries.bin";

// 记录头部布局

/// 标签字节长度
pub const TAG_LENGTH: usize = 1;

/// 长度字段长度（仅作参考，不参与切分）
pub const LENGTH_FIELD_LENGTH: usize = 4;

/// 头部总长度，payload 从此偏移开始
pub const HEADER_LENGTH: usize = TAG_LENGTH + LENGTH_FIELD_LENGTH;

// 标签字节

/// 简单查询
pub const TAG_QUERY: u8 = b'Q';

/// 预处理语句
pub const TAG_PARSE: u8 = b'P';

/// 绑定参数
pub const TAG_BIND: u8 = b'B';

/// 执行标记
pub const TAG_EXECUTE: u8 = b'E';
