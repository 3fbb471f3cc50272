//! 应用日志
//!
//! [`Logger`] 按级别把日志记录分发到多个日志目标；
//! 目标本身实现 [`Log`]，例如写入流的 [`StreamLogger`] 和转发到 `tracing` 的 [`TracingLogger`]。

pub mod dispatcher;
pub mod formatter;
pub mod level;
pub mod stream;
pub mod tracing_logger;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::errors::LogError;

pub use dispatcher::Logger;
pub use formatter::{ConsoleFormatter, Formatter, LineFormatter};
pub use level::LogLevel;
pub use stream::{LogBuffer, Stream, StreamLogger};
pub use tracing_logger::TracingLogger;

/// 日志上下文，用于替换消息中的 `{key}` 占位符
pub type Context = BTreeMap<String, Value>;

/// 在容器中共享的日志目标
pub type SharedLog = Arc<dyn Log>;

/// 日志目标
pub trait Log: Send + Sync {
    /// 记录一条日志；不支持该级别时返回 [`LogError::UnsupportedLevel`]
    fn log(&self, level: LogLevel, message: &str, context: &Context) -> Result<(), LogError>;

    fn emergency(&self, message: &str, context: &Context) -> Result<(), LogError> {
        self.log(LogLevel::Emergency, message, context)
    }

    fn alert(&self, message: &str, context: &Context) -> Result<(), LogError> {
        self.log(LogLevel::Alert, message, context)
    }

    fn critical(&self, message: &str, context: &Context) -> Result<(), LogError> {
        self.log(LogLevel::Critical, message, context)
    }

    fn error(&self, message: &str, context: &Context) -> Result<(), LogError> {
        self.log(LogLevel::Error, message, context)
    }

    fn warning(&self, message: &str, context: &Context) -> Result<(), LogError> {
        self.log(LogLevel::Warning, message, context)
    }

    fn notice(&self, message: &str, context: &Context) -> Result<(), LogError> {
        self.log(LogLevel::Notice, message, context)
    }

    fn info(&self, message: &str, context: &Context) -> Result<(), LogError> {
        self.log(LogLevel::Info, message, context)
    }

    fn debug(&self, message: &str, context: &Context) -> Result<(), LogError> {
        self.log(LogLevel::Debug, message, context)
    }
}

/// 用上下文中的标量值替换 `{key}` 占位符
///
/// 字符串、数字和布尔值按其文本替换，`null` 替换为空字符串；
/// 数组和对象不参与替换，对应的占位符保持原样。
pub fn interpolate(message: &str, context: &Context) -> String {
    let mut result = String::with_capacity(message.len());
    let mut rest = message;

    while let Some(start) = rest.find('{') {
        result.push_str(&rest[..start]);
        let candidate = &rest[start + 1..];

        let replacement = candidate
            .find('}')
            .and_then(|end| placeholder(context, &candidate[..end]).map(|value| (end, value)));

        match replacement {
            Some((end, value)) => {
                result.push_str(&value);
                rest = &candidate[end + 1..];
            }
            None => {
                result.push('{');
                rest = candidate;
            }
        }
    }

    result.push_str(rest);
    result
}

fn placeholder(context: &Context, key: &str) -> Option<String> {
    match context.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}
