use std::borrow::Cow;

/// 语句单元
///
/// 由最近一条 `Q`/`P` 记录的语句文本，以及此后累积的 `B` 参数组成。
/// 借用快照字节，不做任何解码。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatementUnit<'a> {
    /// 语句文本（原始字节）
    pub statement: &'a [u8],

    /// 按到达顺序排列的参数值
    pub parameters: Vec<&'a [u8]>,
}

impl<'a> StatementUnit<'a> {
    /// 以有损 UTF-8 形式返回语句文本，用于日志
    pub fn statement_lossy(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.statement)
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    /// 转换为拥有所有权的形式
    pub fn to_executed(&self) -> ExecutedStatement {
        ExecutedStatement::new(self.statement, &self.parameters)
    }
}

/// 已提交给执行能力的语句（拥有所有权）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutedStatement {
    pub statement: Vec<u8>,
    pub parameters: Vec<Vec<u8>>,
}

impl ExecutedStatement {
    pub fn new(statement: &[u8], parameters: &[&[u8]]) -> Self {
        Self {
            statement: statement.to_vec(),
            parameters: parameters.iter().map(|p| p.to_vec()).collect(),
        }
    }

    pub fn statement_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.statement)
    }
}
