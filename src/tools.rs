use rand::Rng;

// 事务控制语句前缀，按语句开头匹配
const TRANSACTION_CONTROL_PREFIXES: [&[u8]; 4] = [b"BEGIN", b"END", b"COMMIT", b"ROLLBACK"];

// 快照文件名后缀使用的字符集
const SUFFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

///
/// 判断语句是否为事务控制语句。
///
/// 判断标准：语句以 `BEGIN`、`END`、`COMMIT` 或 `ROLLBACK` 开头（区分大小写）。
#[inline]
pub fn is_transaction_control(statement: &[u8]) -> bool {
    TRANSACTION_CONTROL_PREFIXES
        .iter()
        .any(|prefix| statement.starts_with(prefix))
}

/// 生成由大写字母和数字组成的随机串
pub fn random_suffix(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())] as char)
        .collect()
}
