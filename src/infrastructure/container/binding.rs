//! 绑定注册表与工厂

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use super::{Container, ContainerError, Identifier, Value};

type FactoryFn = dyn Fn(&Container, &[Value]) -> Result<Value, ContainerError>;

/// 工厂函数：接收容器和调用方传入的位置参数
#[derive(Clone)]
pub struct Factory {
    inner: Rc<FactoryFn>,
}

impl Factory {
    /// 包装返回具体类型 `T` 的工厂
    pub fn new<T, F>(factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Container, &[Value]) -> Result<T, ContainerError> + 'static,
    {
        Self {
            inner: Rc::new(move |container, parameters| {
                factory(container, parameters).map(|service| Arc::new(service) as Value)
            }),
        }
    }

    pub(crate) fn invoke(&self, container: &Container, parameters: &[Value]) -> Result<Value, ContainerError> {
        (self.inner)(container, parameters)
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Factory(..)")
    }
}

/// 绑定的具体实现
#[derive(Debug, Clone)]
pub enum Concrete {
    Factory(Factory),
    /// 构造该标识符对应的类；与绑定标识符不同时表示间接解析
    Class(Identifier),
}

#[derive(Debug, Clone)]
pub(crate) struct Binding {
    pub(crate) concrete: Concrete,
    pub(crate) shared: bool,
}

#[derive(Debug, Default)]
pub(crate) struct BindingRegistry {
    bindings: HashMap<Identifier, Binding>,
}

impl BindingRegistry {
    /// 后注册的绑定覆盖先前的绑定
    pub(crate) fn insert(&mut self, abstract_: Identifier, concrete: Concrete, shared: bool) {
        self.bindings.insert(abstract_, Binding { concrete, shared });
    }

    pub(crate) fn get(&self, abstract_: &str) -> Option<&Binding> {
        self.bindings.get(abstract_)
    }

    pub(crate) fn contains(&self, abstract_: &str) -> bool {
        self.bindings.contains_key(abstract_)
    }

    pub(crate) fn is_shared(&self, abstract_: &str) -> bool {
        self.bindings.get(abstract_).is_some_and(|binding| binding.shared)
    }

    pub(crate) fn len(&self) -> usize {
        self.bindings.len()
    }
}
