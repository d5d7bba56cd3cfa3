//! Segments - 按分隔符切分快照内容
//!
//! 切分语义与按单字节 `split` 完全一致：
//! - 空输入产生一个空分段
//! - 末尾的分隔符产生一个末尾空分段（即流结束标志）
//! - 连续两个分隔符之间产生一个空分段

use memchr::memchr;

/// 按分隔符切分字节切片的迭代器
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    rest: Option<&'a [u8]>,
    separator: u8,
}

impl<'a> Segments<'a> {
    pub fn new(data: &'a [u8], separator: u8) -> Self {
        Self {
            rest: Some(data),
            separator,
        }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest.take()?;
        match memchr(self.separator, rest) {
            Some(pos) => {
                self.rest = Some(&rest[pos + 1..]);
                Some(&rest[..pos])
            }
            None => Some(rest),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(data: &[u8]) -> Vec<&[u8]> {
        Segments::new(data, b'~').collect()
    }

    #[test]
    fn test_empty_input_yields_single_empty_segment() {
        assert_eq!(split(b""), [&b""[..]]);
    }

    #[test]
    fn test_trailing_separator_yields_empty_tail() {
        assert_eq!(split(b"a~b~"), [&b"a"[..], &b"b"[..], &b""[..]]);
    }

    #[test]
    fn test_missing_trailing_separator() {
        assert_eq!(split(b"a~b"), [&b"a"[..], &b"b"[..]]);
    }

    #[test]
    fn test_consecutive_separators() {
        assert_eq!(split(b"a~~b"), [&b"a"[..], &b""[..], &b"b"[..]]);
    }
}
