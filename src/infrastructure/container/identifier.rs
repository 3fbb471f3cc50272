//! 标识符与值
//!
//! 标识符是绑定、实例和别名共用的键空间；值是类型擦除后的解析结果。

use std::any::{type_name, Any};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// 已解析的值，通过 `Arc::ptr_eq` 判断是否为同一实例
pub type Value = Arc<dyn Any + Send + Sync>;

/// 标识符：抽象类型、具体类型或任意字符串
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(Arc<str>);

impl Identifier {
    /// 由 `T` 的类型名派生的标识符
    pub fn of<T: ?Sized + 'static>() -> Self {
        Identifier(Arc::from(type_name::<T>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier(Arc::from(value))
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Identifier(Arc::from(value))
    }
}

impl From<&String> for Identifier {
    fn from(value: &String) -> Self {
        Identifier(Arc::from(value.as_str()))
    }
}

impl From<&Identifier> for Identifier {
    fn from(value: &Identifier) -> Self {
        value.clone()
    }
}

/// 将调用方传入的位置参数转换为 [`Value`]
///
/// 标量会被包装成新的值；`Arc<T>` 和 `Value` 原样传递，保持实例同一性。
pub trait IntoParameter {
    fn into_parameter(self) -> Value;
}

impl IntoParameter for Value {
    fn into_parameter(self) -> Value {
        self
    }
}

impl<T: Any + Send + Sync> IntoParameter for Arc<T> {
    fn into_parameter(self) -> Value {
        self
    }
}

impl IntoParameter for &str {
    fn into_parameter(self) -> Value {
        Arc::new(self.to_string())
    }
}

macro_rules! impl_scalar_parameter {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoParameter for $ty {
                fn into_parameter(self) -> Value {
                    Arc::new(self)
                }
            }
        )*
    };
}

impl_scalar_parameter!(String, bool, i32, i64, u32, u64, usize, f64, serde_json::Value);

/// 由混合类型的实参构建位置参数列表
#[macro_export]
macro_rules! params {
    ($($param:expr),* $(,)?) => {
        vec![$($crate::infrastructure::container::IntoParameter::into_parameter($param)),*]
    };
}
