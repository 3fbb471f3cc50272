//! 配置管理
//!
//! 以 JSON 对象保存设置，支持点分路径访问、递归合并和带前缀的配置分区。

pub mod loader;
pub mod section;
pub mod settings;

pub use loader::{load_config, ConfigLoader, CONFIG_FILE_NAME};
pub use section::ConfigSection;
pub use settings::{Config, Settings};
