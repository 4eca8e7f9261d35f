//! 适配器路径解析
//!
//! 把端口配置转换为命名空间树中的位置：适配器路径的各段，再加上端口名的最后一段

use hexwire_abstractions::{Namespace, NamespaceRoot, Node};
use hexwire_common::naming::split_path;
use hexwire_common::{Port, ResolutionError, ResolutionResult};
use hexwire_config::PortConfiguration;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 根命名空间及切换过的根的缓存
///
/// 同一标记只调用一次 [`NamespaceRoot::change_root`]，之后复用结果，直到 [`RootCache::clear`]。
pub struct RootCache {
    root: Arc<dyn NamespaceRoot>,
    switched: Mutex<HashMap<String, Arc<dyn NamespaceRoot>>>,
}

impl RootCache {
    /// 以默认根创建
    pub fn new(root: Arc<dyn NamespaceRoot>) -> Self {
        Self {
            root,
            switched: Mutex::new(HashMap::new()),
        }
    }

    /// 默认根
    pub fn root(&self) -> Arc<dyn NamespaceRoot> {
        self.root.clone()
    }

    /// 按标记获取根，`None` 为默认根
    pub fn root_for(&self, token: Option<&str>) -> ResolutionResult<Arc<dyn NamespaceRoot>> {
        let Some(token) = token else {
            return Ok(self.root.clone());
        };

        let mut switched = self.switched.lock();
        if let Some(root) = switched.get(token) {
            return Ok(root.clone());
        }

        debug!("切换根命名空间并缓存: {}", token);
        let root = self.root.change_root(token)?;
        switched.insert(token.to_string(), root.clone());
        Ok(root)
    }

    /// 清空缓存
    pub fn clear(&self) {
        self.switched.lock().clear();
    }

    /// 已缓存的标记，按字母序
    pub fn cached_tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self.switched.lock().keys().cloned().collect();
        tokens.sort();
        tokens
    }
}

impl fmt::Debug for RootCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootCache")
            .field("root", &self.root.name())
            .field("switched", &self.cached_tokens())
            .finish()
    }
}

/// 适配器所在的命名空间
#[derive(Clone)]
pub struct AdapterNamespace {
    /// 配置中的适配器路径
    pub adapter_path: String,
    /// 完整的点分位置，包含端口名最后一段
    pub location: String,
    /// 命名空间
    pub namespace: Arc<dyn Namespace>,
}

impl fmt::Debug for AdapterNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterNamespace")
            .field("adapter_path", &self.adapter_path)
            .field("location", &self.location)
            .finish()
    }
}

/// 解析端口配置对应的命名空间
///
/// 扇出配置必须由调用方先展开；接口映射形式的 `adapter` 只能用于构造参数。
pub fn resolve_adapter_namespace(
    roots: &RootCache,
    config: &PortConfiguration,
    port: &Port,
) -> ResolutionResult<AdapterNamespace> {
    let (adapter_path, token) = match config {
        PortConfiguration::Path(path) => (path.as_str(), None),
        PortConfiguration::Structured(structured) => {
            let path = structured.adapter_path().ok_or_else(|| {
                ResolutionError::configuration(
                    port.as_str(),
                    "接口映射形式的 adapter 只能用于接口映射参数，不能直接选择端口的适配器",
                )
            })?;
            (path, structured.root_override.as_deref())
        }
        PortConfiguration::Fanout(_) => {
            return Err(ResolutionError::configuration(
                port.as_str(),
                "扇出配置需要先展开为单项配置",
            ))
        }
    };

    let root = roots.root_for(token)?;
    let mut segments = split_path(adapter_path);
    segments.push(port.leaf());
    let location = segments.join(".");
    debug!("解析适配器路径: {} (端口 {})", location, port);

    let mut current: Option<Arc<dyn Namespace>> = None;
    for (index, segment) in segments.iter().enumerate() {
        let node = match &current {
            Some(namespace) => namespace.get(segment),
            None => root.get(segment),
        };
        let walked = segments[..=index].join(".");
        current = match node {
            Some(Node::Namespace(namespace)) => Some(namespace),
            Some(other) => {
                return Err(ResolutionError::adapter_path(
                    walked,
                    format!("`{segment}` 是 {}，不是命名空间", other.kind()),
                ))
            }
            None => {
                return Err(ResolutionError::adapter_path(
                    walked,
                    format!("`{segment}` 不存在"),
                ))
            }
        };
    }

    let namespace = current
        .ok_or_else(|| ResolutionError::adapter_path(location.as_str(), "路径为空"))?;

    Ok(AdapterNamespace {
        adapter_path: adapter_path.to_string(),
        location,
        namespace,
    })
}
