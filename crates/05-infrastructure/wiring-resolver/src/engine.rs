//! 解析引擎
//!
//! [`Resolver`] 是显式的上下文对象：持有根命名空间、切换过的根的缓存和选项。
//! 每次公开调用创建一个会话，会话记录正在解析的 (接口, 端口映射)，用于发现循环依赖。

use crate::binder::BoundArguments;
use crate::finder::{find_adapter, FoundAdapter};
use crate::options::ResolverOptions;
use crate::path::{resolve_adapter_namespace, RootCache};
use hexwire_abstractions::{Argument, Instance, NamespaceRoot, Resolve, Value};
use hexwire_common::{Interface, InterfaceInfo, ResolutionError, ResolutionResult};
use hexwire_config::{PortConfiguration, PortsMapping};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, debug_span, error, warn};

/// 解析引擎
///
/// 克隆得到的解析器共享根命名空间缓存。
#[derive(Clone)]
pub struct Resolver {
    inner: Arc<ResolverInner>,
}

struct ResolverInner {
    roots: RootCache,
    options: ResolverOptions,
}

impl Resolver {
    /// 以默认选项创建
    pub fn new(root: Arc<dyn NamespaceRoot>) -> Self {
        Self::with_options(root, ResolverOptions::default())
    }

    /// 以指定选项创建
    pub fn with_options(root: Arc<dyn NamespaceRoot>, options: ResolverOptions) -> Self {
        Self {
            inner: Arc::new(ResolverInner {
                roots: RootCache::new(root),
                options,
            }),
        }
    }

    /// 选项
    pub fn options(&self) -> &ResolverOptions {
        &self.inner.options
    }

    /// 默认根命名空间
    pub fn root(&self) -> Arc<dyn NamespaceRoot> {
        self.inner.roots.root()
    }

    /// 解析接口，返回动态取值
    ///
    /// 扇出配置返回 [`Value::Tuple`]，可调用对象返回 [`Value::Callable`]，其余返回 [`Value::Instance`]。
    pub fn resolve_value(
        &self,
        interface: &InterfaceInfo,
        mapping: &PortsMapping,
    ) -> ResolutionResult<Value> {
        let span = debug_span!("resolve", interface = %interface.qualified_name());
        let _guard = span.enter();

        let result = Session::new(self).resolve(interface, mapping);
        if let Err(error) = &result {
            self.log_failure(interface, error);
        }
        result
    }

    /// 解析接口并还原为 `Arc<I>`
    pub fn resolve<I: Interface + ?Sized>(&self, mapping: &PortsMapping) -> ResolutionResult<Arc<I>> {
        let info = I::info();
        let value = self.resolve_value(&info, mapping)?;
        downcast_value::<I>(&info, &value)
    }

    /// 解析接口的所有适配器
    ///
    /// 扇出配置逐项还原，单项配置返回一个元素。
    pub fn resolve_all<I: Interface + ?Sized>(
        &self,
        mapping: &PortsMapping,
    ) -> ResolutionResult<Vec<Arc<I>>> {
        let info = I::info();
        match self.resolve_value(&info, mapping)? {
            Value::Tuple(items) => items
                .iter()
                .map(|item| downcast_value::<I>(&info, item))
                .collect(),
            single => Ok(vec![downcast_value::<I>(&info, &single)?]),
        }
    }

    /// 按参数声明准备实参
    pub fn bind(
        &self,
        parameters: &[Argument],
        kwargs: &BTreeMap<String, JsonValue>,
        mapping: &PortsMapping,
    ) -> ResolutionResult<BoundArguments> {
        let result = Session::new(self).bind_arguments("<bind>", parameters, kwargs, mapping);
        if let Err(error) = &result {
            if self.inner.options.log_failures {
                warn!("参数绑定失败: {}", error);
            }
        }
        result
    }

    /// 清空切换过的根命名空间缓存
    pub fn reset(&self) {
        debug!("清空根命名空间缓存");
        self.inner.roots.clear();
    }

    /// 已缓存的根切换标记
    pub fn cached_roots(&self) -> Vec<String> {
        self.inner.roots.cached_tokens()
    }

    fn log_failure(&self, interface: &InterfaceInfo, error: &ResolutionError) {
        if !self.inner.options.log_failures {
            return;
        }
        match error {
            ResolutionError::Instantiation { adapter, source } => {
                error!("适配器实例化失败: {} (解析 {}), 原因: {}", adapter, interface, source);
            }
            other => warn!("解析接口失败: {}, 原因: {}", interface, other),
        }
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("roots", &self.inner.roots)
            .field("options", &self.inner.options)
            .finish()
    }
}

fn downcast_value<I: Interface + ?Sized>(
    info: &InterfaceInfo,
    value: &Value,
) -> ResolutionResult<Arc<I>> {
    value
        .downcast::<I>()
        .ok_or_else(|| ResolutionError::type_mismatch(info.name, info.type_name, value.describe()))
}

/// 绑定了端口映射的解析器，作为 `dyn Resolve` 注入给适配器
struct BoundResolver {
    resolver: Resolver,
    mapping: PortsMapping,
}

impl Resolve for BoundResolver {
    fn resolve_interface(&self, interface: &InterfaceInfo) -> ResolutionResult<Value> {
        self.resolver.resolve_value(interface, &self.mapping)
    }
}

struct Frame {
    interface: InterfaceInfo,
    mapping: PortsMapping,
}

/// 一次公开调用内的解析状态
pub(crate) struct Session<'a> {
    resolver: &'a Resolver,
    in_progress: Vec<Frame>,
}

impl<'a> Session<'a> {
    fn new(resolver: &'a Resolver) -> Self {
        Self {
            resolver,
            in_progress: Vec::new(),
        }
    }

    pub(crate) fn options(&self) -> &ResolverOptions {
        &self.resolver.inner.options
    }

    /// 解析接口
    pub(crate) fn resolve(
        &mut self,
        interface: &InterfaceInfo,
        mapping: &PortsMapping,
    ) -> ResolutionResult<Value> {
        let port = interface.port();
        let Some(config) = mapping.get(port.as_str()) else {
            if interface.is::<dyn Resolve>() {
                debug!("注入绑定当前端口映射的解析器");
                let bound: Arc<dyn Resolve> = Arc::new(BoundResolver {
                    resolver: self.resolver.clone(),
                    mapping: mapping.clone(),
                });
                return Ok(Value::Instance(Instance::new(bound)));
            }
            return Err(ResolutionError::PortNotConfigured {
                port: port.to_string(),
                interface: interface.name.to_string(),
            });
        };

        if let PortConfiguration::Fanout(entries) = config {
            debug!("展开扇出配置: {} 项 (端口 {})", entries.len(), port);
            let values = entries
                .iter()
                .map(|entry| {
                    let overlay = mapping.merge(&PortsMapping::new().with(port.clone(), entry.clone()));
                    self.resolve(interface, &overlay)
                })
                .collect::<ResolutionResult<Vec<_>>>()?;
            return Ok(Value::Tuple(values));
        }

        self.enter(interface, mapping)?;
        let result = self.construct(interface, config, mapping);
        self.in_progress.pop();
        result
    }

    fn enter(&mut self, interface: &InterfaceInfo, mapping: &PortsMapping) -> ResolutionResult<()> {
        let revisited = self
            .in_progress
            .iter()
            .any(|frame| frame.interface == *interface && frame.mapping == *mapping);
        let too_deep = self.in_progress.len() >= self.options().max_depth;

        if revisited || too_deep {
            let mut chain: Vec<&str> = self.in_progress.iter().map(|frame| frame.interface.name).collect();
            chain.push(interface.name);
            let mut chain = chain.join(" -> ");
            if !revisited {
                chain.push_str(&format!(" (超过最大解析深度 {})", self.options().max_depth));
            }
            return Err(ResolutionError::CyclicDependency { chain });
        }

        self.in_progress.push(Frame {
            interface: *interface,
            mapping: mapping.clone(),
        });
        Ok(())
    }

    fn construct(
        &mut self,
        interface: &InterfaceInfo,
        config: &PortConfiguration,
        mapping: &PortsMapping,
    ) -> ResolutionResult<Value> {
        let port = interface.port();
        let located = resolve_adapter_namespace(&self.resolver.inner.roots, config, &port)?;
        let adapter = find_adapter(
            located.namespace.as_ref(),
            interface.name,
            &interface.snake_name(),
        )?;

        match adapter {
            FoundAdapter::Callable(callable) => {
                debug!("返回可调用对象: {}.{}", located.location, callable.name());
                Ok(Value::Callable(callable))
            }
            FoundAdapter::Constructible(constructible) => {
                let adapter_name = format!("{}.{}", located.location, constructible.name());
                debug!("构造适配器: {}", adapter_name);

                let merged = mapping.merge(&config.nested_ports());
                let bound = self.bind_arguments(
                    &adapter_name,
                    constructible.parameters(),
                    &config.kwargs(),
                    &merged,
                )?;
                let instance = constructible
                    .invoke(bound.positional, bound.keyword)
                    .map_err(|source| ResolutionError::Instantiation {
                        adapter: adapter_name,
                        source,
                    })?;
                Ok(Value::Instance(instance))
            }
        }
    }
}
