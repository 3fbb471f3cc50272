use std::collections::BTreeMap;
use std::fmt;

use parking_lot::RwLock;

use crate::errors::LogError;

use super::{Context, Log, LogLevel, SharedLog};

/// 按级别分发日志的聚合日志器
#[derive(Default)]
pub struct Logger {
    destinations: RwLock<BTreeMap<LogLevel, Vec<SharedLog>>>,
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为给定级别注册日志目标；`None` 表示全部级别
    pub fn add_logger(&self, destination: SharedLog, levels: Option<&[LogLevel]>) {
        let levels = levels.unwrap_or(&LogLevel::ALL);
        let mut destinations = self.destinations.write();

        for level in levels {
            destinations.entry(*level).or_default().push(destination.clone());
        }
    }

    /// 使用级别名称注册；任一名称无效时不注册任何级别
    pub fn add_logger_for(&self, destination: SharedLog, levels: &[&str]) -> Result<(), LogError> {
        let levels = levels
            .iter()
            .map(|name| name.parse::<LogLevel>())
            .collect::<Result<Vec<_>, _>>()?;
        self.add_logger(destination, Some(levels.as_slice()));
        Ok(())
    }

    /// 某个级别上注册的日志目标数量
    pub fn destination_count(&self, level: LogLevel) -> usize {
        self.destinations.read().get(&level).map_or(0, Vec::len)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: BTreeMap<LogLevel, usize> = self
            .destinations
            .read()
            .iter()
            .map(|(level, destinations)| (*level, destinations.len()))
            .collect();
        f.debug_struct("Logger").field("destinations", &counts).finish()
    }
}

impl Log for Logger {
    fn log(&self, level: LogLevel, message: &str, context: &Context) -> Result<(), LogError> {
        // 分发前释放锁，日志目标可以再次调用本日志器
        let destinations = self.destinations.read().get(&level).cloned().unwrap_or_default();

        for destination in destinations {
            match destination.log(level, message, context) {
                Ok(()) | Err(LogError::UnsupportedLevel(_)) => {}
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }
}
