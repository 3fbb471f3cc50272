//! 依赖注入容器
//!
//! 标识符可以是任意字符串，也可以是由类型派生的 [`Identifier::of`]。
//! 构造函数签名通过 [`ClassDefinition`] 在注册时声明。

mod alias;
mod binding;
mod resolver;
mod error;
mod identifier;
mod reflection;
mod stack;

pub use self::binding::{Concrete, Factory};
pub use self::resolver::{Container, ContainerStats};
pub use self::error::ContainerError;
pub use self::identifier::{Identifier, IntoParameter, Value};
pub use self::reflection::{Arguments, ClassDefinition, ClassKind, Injectable, Parameter, ParameterType};
