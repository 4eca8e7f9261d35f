//! 内存命名空间树
//!
//! 通过静态注册构建的命名空间树实现，可用于应用启动代码和测试

use crate::adapter::{Callable, ConstructibleType};
use crate::namespace::{Namespace, NamespaceRoot, Node};
use hexwire_common::naming::split_path;
use hexwire_common::{ResolutionError, ResolutionResult};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
enum MemoryEntry {
    Namespace(Arc<MemoryNamespace>),
    Leaf(Node),
}

/// 内存命名空间
#[derive(Clone, Default)]
pub struct MemoryNamespace {
    name: String,
    entries: BTreeMap<String, MemoryEntry>,
}

impl MemoryNamespace {
    /// 创建空的命名空间
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    /// 插入节点，同名节点被替换
    pub fn insert(&mut self, name: impl Into<String>, node: Node) {
        self.entries.insert(name.into(), MemoryEntry::Leaf(node));
    }

    /// 插入子命名空间
    pub fn insert_namespace(&mut self, namespace: Self) {
        self.entries.insert(
            namespace.name.clone(),
            MemoryEntry::Namespace(Arc::new(namespace)),
        );
    }

    /// 添加子命名空间
    pub fn with_namespace(mut self, namespace: Self) -> Self {
        self.insert_namespace(namespace);
        self
    }

    /// 添加可构造类型，以类型名为键
    pub fn with_constructible(mut self, constructible: ConstructibleType) -> Self {
        let name = crate::namespace::Constructible::name(&constructible).to_string();
        self.insert(name, constructible.into_node());
        self
    }

    /// 添加可调用对象，以函数名为键
    pub fn with_callable(mut self, callable: Callable) -> Self {
        let name = callable.name().to_string();
        self.insert(name, callable.into_node());
        self
    }

    /// 按点分路径插入节点，自动创建中间命名空间
    ///
    /// 路径最后一段是节点名。
    pub fn insert_path(&mut self, path: &str, node: Node) -> ResolutionResult<()> {
        let segments = split_path(path);
        let Some((leaf, parents)) = segments.split_last() else {
            return Err(ResolutionError::adapter_path(path, "路径为空"));
        };

        let mut current = self;
        for segment in parents {
            let entry = current
                .entries
                .entry((*segment).to_string())
                .or_insert_with(|| MemoryEntry::Namespace(Arc::new(Self::new(*segment))));
            current = match entry {
                MemoryEntry::Namespace(namespace) => Arc::make_mut(namespace),
                MemoryEntry::Leaf(node) => {
                    return Err(ResolutionError::adapter_path(
                        path,
                        format!("{segment} 是 {}，无法在其下插入", node.kind()),
                    ))
                }
            };
        }

        current.insert(*leaf, node);
        Ok(())
    }

    /// 按点分路径添加节点
    pub fn with_path(mut self, path: &str, node: Node) -> ResolutionResult<Self> {
        self.insert_path(path, node)?;
        Ok(self)
    }
}

impl Namespace for MemoryNamespace {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, name: &str) -> Option<Node> {
        self.entries.get(name).map(|entry| match entry {
            MemoryEntry::Namespace(namespace) => Node::Namespace(namespace.clone()),
            MemoryEntry::Leaf(node) => node.clone(),
        })
    }

    fn items(&self) -> Vec<(String, Node)> {
        self.entries
            .keys()
            .filter_map(|name| self.get(name).map(|node| (name.clone(), node)))
            .collect()
    }

    fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

/// 内存命名空间树的根
///
/// 可以登记若干备用根，`change_root(token)` 按名称切换。
#[derive(Clone)]
pub struct MemoryRoot {
    tree: Arc<MemoryNamespace>,
    alternates: BTreeMap<String, Arc<MemoryRoot>>,
}

impl MemoryRoot {
    /// 创建根
    pub fn new(tree: MemoryNamespace) -> Self {
        Self {
            tree: Arc::new(tree),
            alternates: BTreeMap::new(),
        }
    }

    /// 登记备用根
    pub fn with_alternate(mut self, token: impl Into<String>, root: Self) -> Self {
        self.alternates.insert(token.into(), Arc::new(root));
        self
    }

    /// 转换为共享的根对象
    pub fn into_shared(self) -> Arc<dyn NamespaceRoot> {
        Arc::new(self)
    }
}

impl Namespace for MemoryRoot {
    fn name(&self) -> &str {
        self.tree.name()
    }

    fn get(&self, name: &str) -> Option<Node> {
        self.tree.get(name)
    }

    fn items(&self) -> Vec<(String, Node)> {
        self.tree.items()
    }

    fn contains(&self, name: &str) -> bool {
        self.tree.contains(name)
    }
}

impl NamespaceRoot for MemoryRoot {
    fn change_root(&self, token: &str) -> ResolutionResult<Arc<dyn NamespaceRoot>> {
        debug!("切换根命名空间: {}", token);
        let root = self.alternates.get(token).ok_or_else(|| {
            ResolutionError::adapter_path(token, "未登记的备用根命名空间")
        })?;
        Ok(root.clone())
    }
}
