//! Record 结构定义和相关方法
//!
//! Record 表示抓包文件中被分隔符切出的一段原始数据包：
//! `Tag(1 字节) || Length(4 字节) || Payload(剩余字节)`。

use crate::parser::constants::{
    HEADER_LENGTH, TAG_BIND, TAG_EXECUTE, TAG_LENGTH, TAG_PARSE, TAG_QUERY,
};

/// 记录标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// `Q` 简单查询文本
    Query,
    /// `P` 预处理语句文本
    Parse,
    /// `B` 绑定参数值
    Bind,
    /// `E` 显式执行标记
    Execute,
    /// 其他未知标签（保留原始字节）
    Other(u8),
}

impl Tag {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            TAG_QUERY => Tag::Query,
            TAG_PARSE => Tag::Parse,
            TAG_BIND => Tag::Bind,
            TAG_EXECUTE => Tag::Execute,
            other => Tag::Other(other),
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Tag::Query => TAG_QUERY,
            Tag::Parse => TAG_PARSE,
            Tag::Bind => TAG_BIND,
            Tag::Execute => TAG_EXECUTE,
            Tag::Other(byte) => byte,
        }
    }
}

/// 一条原始记录的零拷贝视图
///
/// 长度字段只是参考信息：切分完全依赖分隔符，解析时直接跳过。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    /// 记录标签
    pub tag: Tag,
    length: Option<&'a [u8]>,
    /// 头部之后的全部字节，不做任何解码
    pub payload: &'a [u8],
}

impl<'a> Record<'a> {
    /// 从一段非空的分段解析记录
    ///
    /// 不足 5 字节的分段不会被拒绝：标签照常读取，payload 视为空。
    ///
    /// 空分段表示流结束，由调用方处理，此时返回 `None`。
    pub fn parse(segment: &'a [u8]) -> Option<Self> {
        let (&tag, _) = segment.split_first()?;
        Some(Self {
            tag: Tag::from_byte(tag),
            length: segment.get(TAG_LENGTH..HEADER_LENGTH),
            payload: segment.get(HEADER_LENGTH..).unwrap_or(&[]),
        })
    }

    /// 头部声明的长度（大端序）
    ///
    /// 仅用于诊断，分段不足 5 字节时返回 `None`。
    pub fn advertised_length(&self) -> Option<u32> {
        let bytes: [u8; 4] = self.length?.try_into().ok()?;
        Some(u32::from_be_bytes(bytes))
    }

    /// 分段是否短于完整头部
    pub fn is_truncated(&self) -> bool {
        self.length.is_none()
    }
}
