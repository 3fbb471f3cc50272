//! 循环依赖检测栈

use std::cell::RefCell;

use super::{ContainerError, Identifier};

/// 正在解析的标识符，最外层在前
#[derive(Debug, Default)]
pub(crate) struct DependencyStack {
    frames: Vec<Identifier>,
}

impl DependencyStack {
    pub(crate) fn check(&self, abstract_: &Identifier) -> Result<(), ContainerError> {
        if self.frames.contains(abstract_) {
            return Err(ContainerError::CircularDependency {
                identifier: abstract_.clone(),
                resolution_stack: self.frames.clone(),
            });
        }
        Ok(())
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }
}

/// 解析栈帧：创建时入栈，drop 时出栈，失败路径同样成立
pub(crate) struct StackFrame<'a> {
    stack: &'a RefCell<DependencyStack>,
    abstract_: Identifier,
}

impl<'a> StackFrame<'a> {
    pub(crate) fn push(stack: &'a RefCell<DependencyStack>, abstract_: Identifier) -> Self {
        stack.borrow_mut().frames.push(abstract_.clone());
        Self { stack, abstract_ }
    }
}

impl Drop for StackFrame<'_> {
    fn drop(&mut self) {
        let mut stack = self.stack.borrow_mut();
        if let Some(position) = stack.frames.iter().rposition(|id| *id == self.abstract_) {
            stack.frames.remove(position);
        }
    }
}
