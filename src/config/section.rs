use std::sync::Arc;

use serde_json::{Map, Value};

use super::{Config, Settings};

/// 带前缀的配置分区，所有操作都委托给共享的 [`Config`]
#[derive(Debug, Clone)]
pub struct ConfigSection {
    prefix: String,
    config: Arc<Config>,
}

impl ConfigSection {
    /// 前缀两端的 `.` 会被去掉；前缀不存在时创建一个空对象
    pub fn new(prefix: &str, config: Arc<Config>) -> Self {
        let prefix = prefix.trim_matches('.').to_string();

        if !config.has(&prefix) {
            config.put(&prefix, Value::Object(Map::new()));
        }

        Self { prefix, config }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn field(&self, path: &str) -> String {
        format!("{}.{}", self.prefix, path)
    }
}

impl Settings for ConfigSection {
    fn set(&self, settings: Map<String, Value>) {
        self.config.put(&self.prefix, Value::Object(settings));
    }

    fn has(&self, path: &str) -> bool {
        self.config.has(&self.field(path))
    }

    fn get(&self, path: &str) -> Option<Value> {
        self.config.get(&self.field(path))
    }

    /// 分区根节点
    fn all(&self) -> Value {
        self.config.get(&self.prefix).unwrap_or_else(|| Value::Object(Map::new()))
    }

    fn put(&self, path: &str, value: Value) {
        self.config.put(&self.field(path), value);
    }

    fn merge(&self, settings: Map<String, Value>, field: Option<&str>, merge_arrays: bool) {
        let field = match field {
            Some(path) => self.field(path),
            None => self.prefix.clone(),
        };
        self.config.merge(settings, Some(&field), merge_arrays);
    }
}
