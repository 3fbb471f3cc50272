//! 别名表

use std::collections::HashMap;

use super::{ContainerError, Identifier};

/// 别名 → 规范标识符；每个别名只能写入一次
#[derive(Debug, Default)]
pub(crate) struct AliasTable {
    aliases: HashMap<Identifier, Identifier>,
}

impl AliasTable {
    pub(crate) fn insert(&mut self, target: Identifier, alias: Identifier) -> Result<(), ContainerError> {
        if let Some(existing) = self.aliases.get(&alias) {
            return Err(ContainerError::AliasConflict {
                alias: alias.to_string(),
                existing: existing.clone(),
            });
        }
        self.aliases.insert(alias, target);
        Ok(())
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    /// 单跳解析：别名指向另一个别名时不会继续展开
    pub(crate) fn resolve(&self, name: &Identifier) -> Identifier {
        self.aliases.get(name).cloned().unwrap_or_else(|| name.clone())
    }

    pub(crate) fn len(&self) -> usize {
        self.aliases.len()
    }
}
