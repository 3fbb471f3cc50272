use std::{fs, path::{Path, PathBuf}};

use serde_json::{Map, Value};

use crate::errors::ConfigError;

/// 应用目录下的配置文件名
pub const CONFIG_FILE_NAME: &str = "config.json";

/// 配置加载器，负责读取应用目录下的配置文件
pub struct ConfigLoader {
    base_path: PathBuf,
}

impl ConfigLoader {
    /// 为指定应用目录创建加载器
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self { base_path: base_path.into() }
    }

    /// 配置文件的完整路径
    pub fn config_path(&self) -> PathBuf {
        self.base_path.join(CONFIG_FILE_NAME)
    }

    /// 加载配置文件，失败时返回具体原因
    pub fn try_load(&self) -> Result<Map<String, Value>, ConfigError> {
        let path = self.config_path();
        let location = path.to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::FileRead(location.clone(), e))?;
        let value: Value = serde_json::from_str(&content).map_err(|e| ConfigError::JsonParse(location.clone(), e))?;

        match value {
            Value::Object(settings) => {
                tracing::info!("已加载配置文件: {}", location);
                Ok(settings)
            }
            _ => Err(ConfigError::NotAnObject(location)),
        }
    }

    /// 配置文件存在且为 JSON 对象时加载
    pub fn load(&self) -> Option<Map<String, Value>> {
        match self.try_load() {
            Ok(settings) => Some(settings),
            Err(ConfigError::FileRead(path, e)) => {
                tracing::debug!("配置文件不可读，跳过: {} ({})", path, e);
                None
            }
            Err(e) => {
                tracing::warn!("配置文件无效，跳过: {}", e);
                None
            }
        }
    }
}

/// 读取 `<directory>/config.json`；不可读、不是合法 JSON 或不是对象时返回 `None`
pub fn load_config(directory: &Path) -> Option<Map<String, Value>> {
    ConfigLoader::new(directory).load()
}
