//! 适配器查找
//!
//! 在命名空间中先按类名找可构造类型，再按函数名找可调用对象或同名子命名空间

use hexwire_abstractions::{Callable, Constructible, Namespace, Node};
use hexwire_common::{ResolutionError, ResolutionResult};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 找到的适配器
#[derive(Clone)]
pub enum FoundAdapter {
    /// 需要构造的类型
    Constructible(Arc<dyn Constructible>),
    /// 原样返回的可调用对象
    Callable(Callable),
}

impl FoundAdapter {
    /// 适配器名称
    pub fn name(&self) -> &str {
        match self {
            Self::Constructible(constructible) => constructible.name(),
            Self::Callable(callable) => callable.name(),
        }
    }
}

impl fmt::Debug for FoundAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constructible(constructible) => write!(f, "Constructible({})", constructible.name()),
            Self::Callable(callable) => write!(f, "Callable({})", callable.name()),
        }
    }
}

/// 在命名空间中查找适配器
///
/// 按顺序尝试：
/// 1. 名为 `interface_name` 的可构造类型
/// 2. 名为 `snake_name` 的可调用对象
/// 3. 名为 `snake_name` 的子命名空间中，名为 `interface_name` 的可构造类型或名为 `snake_name` 的可调用对象
pub fn find_adapter(
    namespace: &dyn Namespace,
    interface_name: &str,
    snake_name: &str,
) -> ResolutionResult<FoundAdapter> {
    if let Some(Node::Constructible(constructible)) = namespace.get(interface_name) {
        debug!("找到可构造类型: {}.{}", namespace.name(), interface_name);
        return Ok(FoundAdapter::Constructible(constructible));
    }

    match namespace.get(snake_name) {
        Some(Node::Callable(callable)) => {
            debug!("找到可调用对象: {}.{}", namespace.name(), snake_name);
            return Ok(FoundAdapter::Callable(callable));
        }
        Some(Node::Namespace(inner)) => {
            if let Some(Node::Constructible(constructible)) = inner.get(interface_name) {
                debug!("在子命名空间 {} 中找到可构造类型: {}", snake_name, interface_name);
                return Ok(FoundAdapter::Constructible(constructible));
            }
            if let Some(Node::Callable(callable)) = inner.get(snake_name) {
                debug!("在子命名空间 {} 中找到可调用对象", snake_name);
                return Ok(FoundAdapter::Callable(callable));
            }
        }
        _ => {}
    }

    Err(ResolutionError::AdapterNotFound {
        namespace: namespace.name().to_string(),
        class_name: interface_name.to_string(),
        function_name: snake_name.to_string(),
    })
}
