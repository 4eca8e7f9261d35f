//! 命名空间树契约
//!
//! 引擎只通过这些只读接口浏览适配器所在的层级结构，从不实现它们

use crate::adapter::Callable;
use crate::argument::Argument;
use crate::value::{Instance, Value};
use hexwire_common::{BoxError, ResolutionResult};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// 命名空间树中的节点
#[derive(Clone)]
pub enum Node {
    /// 可继续浏览的分组或子命名空间
    Namespace(Arc<dyn Namespace>),
    /// 可构造类型
    Constructible(Arc<dyn Constructible>),
    /// 可调用对象
    Callable(Callable),
}

impl Node {
    /// 节点种类描述
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Namespace(_) => "namespace",
            Self::Constructible(_) => "constructible",
            Self::Callable(_) => "callable",
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Namespace(ns) => write!(f, "Namespace({})", ns.name()),
            Self::Constructible(ct) => write!(f, "Constructible({})", ct.name()),
            Self::Callable(callable) => write!(f, "Callable({})", callable.name()),
        }
    }
}

/// 分组或子命名空间
pub trait Namespace: Send + Sync {
    /// 命名空间名称
    fn name(&self) -> &str;

    /// 按名称查找子节点
    fn get(&self, name: &str) -> Option<Node>;

    /// 所有子节点
    fn items(&self) -> Vec<(String, Node)>;

    /// 是否包含指定名称的子节点
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// 命名空间树的根
pub trait NamespaceRoot: Namespace {
    /// 切换到另一棵树
    ///
    /// `token` 对引擎是不透明的，由具体实现解释（文件路径、序列化快照名等）。
    fn change_root(&self, token: &str) -> ResolutionResult<Arc<dyn NamespaceRoot>>;
}

/// 可构造类型
pub trait Constructible: Send + Sync {
    /// 类型名称
    fn name(&self) -> &str;

    /// 按声明顺序的参数列表
    fn parameters(&self) -> &[Argument];

    /// 按名称获取参数
    fn parameter(&self, name: &str) -> Option<&Argument> {
        self.parameters().iter().find(|p| p.name == name)
    }

    /// 使用绑定好的实参构造实例
    fn invoke(
        &self,
        positional: Vec<Value>,
        keyword: BTreeMap<String, Value>,
    ) -> Result<Instance, BoxError>;
}
