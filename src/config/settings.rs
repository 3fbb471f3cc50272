use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// 点分路径设置存储的通用接口
///
/// 路径按 `.` 切分，每一段都必须是上一层对象的键（数组可用下标访问）。
pub trait Settings {
    /// 替换全部配置
    fn set(&self, settings: Map<String, Value>);

    fn has(&self, path: &str) -> bool;

    fn get(&self, path: &str) -> Option<Value>;

    /// 全部设置
    fn all(&self) -> Value;

    /// 设置 `path` 处的值，必要时创建中间对象
    fn put(&self, path: &str, value: Value);

    /// 将 `settings` 递归合并到 `field`（为 `None` 时合并到根）
    ///
    /// 两边都是非空对象时递归合并；`merge_arrays` 为真且两边都是数组时拼接并去重；
    /// 其余情况由新值覆盖旧值。
    fn merge(&self, settings: Map<String, Value>, field: Option<&str>, merge_arrays: bool);

    fn get_or(&self, path: &str, default: Value) -> Value {
        self.get(path).unwrap_or(default)
    }

    /// 读取并反序列化为指定类型
    fn get_as<T: DeserializeOwned>(&self, path: &str) -> Option<T>
    where
        Self: Sized,
    {
        self.get(path).and_then(|value| serde_json::from_value(value).ok())
    }
}

/// 应用设置
#[derive(Debug, Default)]
pub struct Config {
    settings: RwLock<Map<String, Value>>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Map<String, Value>) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }
}

impl Settings for Config {
    fn set(&self, settings: Map<String, Value>) {
        *self.settings.write() = settings;
    }

    fn has(&self, path: &str) -> bool {
        lookup(&self.settings.read(), path).is_some()
    }

    fn get(&self, path: &str) -> Option<Value> {
        lookup(&self.settings.read(), path).cloned()
    }

    fn all(&self) -> Value {
        Value::Object(self.settings.read().clone())
    }

    fn put(&self, path: &str, value: Value) {
        let segments: Vec<&str> = path.split('.').collect();
        assign(&mut self.settings.write(), &segments, value);
    }

    fn merge(&self, settings: Map<String, Value>, field: Option<&str>, merge_arrays: bool) {
        let mut root = self.settings.write();

        let current = match field {
            Some(path) => lookup(&root, path).cloned(),
            None => Some(Value::Object(root.clone())),
        };
        let base = match current {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        let merged = merge_settings(base, settings, merge_arrays);

        match field {
            Some(path) => {
                let segments: Vec<&str> = path.split('.').collect();
                assign(&mut root, &segments, Value::Object(merged));
            }
            None => *root = merged,
        }
    }
}

fn lookup<'a>(root: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = root.get(segments.next()?)?;

    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}

fn assign(target: &mut Map<String, Value>, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [last] => {
            target.insert((*last).to_string(), value);
        }
        [head, rest @ ..] => {
            let entry = target.entry((*head).to_string()).or_insert(Value::Null);
            // 只有非空对象会被保留，空对象、数组和标量都会被替换
            match entry {
                Value::Object(map) if !map.is_empty() => assign(map, rest, value),
                _ => {
                    let mut map = Map::new();
                    assign(&mut map, rest, value);
                    *entry = Value::Object(map);
                }
            }
        }
    }
}

fn merge_settings(mut base: Map<String, Value>, incoming: Map<String, Value>, merge_arrays: bool) -> Map<String, Value> {
    for (key, value) in incoming {
        match base.get_mut(&key) {
            Some(existing) => {
                let current = std::mem::take(existing);
                *existing = merge_values(current, value, merge_arrays);
            }
            None => {
                base.insert(key, value);
            }
        }
    }
    base
}

fn merge_values(current: Value, incoming: Value, merge_arrays: bool) -> Value {
    match (current, incoming) {
        (Value::Object(a), Value::Object(b)) if !a.is_empty() && !b.is_empty() => {
            Value::Object(merge_settings(a, b, merge_arrays))
        }
        (Value::Array(a), Value::Array(b)) if merge_arrays => {
            let mut unique: Vec<Value> = Vec::with_capacity(a.len() + b.len());
            for value in a.into_iter().chain(b) {
                if !unique.contains(&value) {
                    unique.push(value);
                }
            }
            Value::Array(unique)
        }
        (_, incoming) => incoming,
    }
}
