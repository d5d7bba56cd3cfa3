//! 执行能力
//!
//! 回放引擎只依赖 [`Executor`] 这一个接口：把语句与参数的原始字节交给目标数据库。
//! 返回值不被使用，失败时由引擎中止本轮回放。

use crate::error::ExecutionError;
use crate::statement::ExecutedStatement;

/// 把语句提交到目标数据库的执行能力
pub trait Executor {
    /// 执行一条语句
    ///
    /// # 参数
    ///
    /// * `statement` - 语句文本的原始字节
    /// * `parameters` - 按顺序排列的参数原始字节
    fn execute(&mut self, statement: &[u8], parameters: &[&[u8]]) -> Result<(), ExecutionError>;
}

impl<E: Executor + ?Sized> Executor for &mut E {
    fn execute(&mut self, statement: &[u8], parameters: &[&[u8]]) -> Result<(), ExecutionError> {
        (**self).execute(statement, parameters)
    }
}

impl<E: Executor + ?Sized> Executor for Box<E> {
    fn execute(&mut self, statement: &[u8], parameters: &[&[u8]]) -> Result<(), ExecutionError> {
        (**self).execute(statement, parameters)
    }
}

/// 只记录日志、不连接数据库的执行器
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunExecutor;

impl Executor for DryRunExecutor {
    fn execute(&mut self, statement: &[u8], parameters: &[&[u8]]) -> Result<(), ExecutionError> {
        tracing::info!(
            statement = %String::from_utf8_lossy(statement),
            parameters = parameters.len(),
            "executing"
        );
        Ok(())
    }
}

/// 按顺序记录所有语句的执行器
#[derive(Debug, Default, Clone)]
pub struct RecordingExecutor {
    executed: Vec<ExecutedStatement>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn executed(&self) -> &[ExecutedStatement] {
        &self.executed
    }

    pub fn into_executed(self) -> Vec<ExecutedStatement> {
        self.executed
    }
}

impl Executor for RecordingExecutor {
    fn execute(&mut self, statement: &[u8], parameters: &[&[u8]]) -> Result<(), ExecutionError> {
        self.executed
            .push(ExecutedStatement::new(statement, parameters));
        Ok(())
    }
}
