//! 端口配置模型
//!
//! 所有配置值都是不可变的值对象，合并总是产生新的映射

use hexwire_common::{ConfigError, ConfigResult, Port};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// 接口映射：键 → 端口配置
///
/// 用于构造参数声明为“接口映射”的场景，每个键各解析出一个适配器。
pub type InterfaceMapping = BTreeMap<String, PortConfiguration>;

/// 单个端口的配置
#[derive(Debug, Clone, PartialEq)]
pub enum PortConfiguration {
    /// 适配器所在的命名空间路径
    Path(String),
    /// 结构化配置
    Structured(StructuredConfig),
    /// 扇出：每一项各解析出一个适配器
    Fanout(Vec<PortConfiguration>),
}

impl PortConfiguration {
    /// 路径配置
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    /// 扇出配置
    pub fn fanout(entries: impl IntoIterator<Item = PortConfiguration>) -> Self {
        Self::Fanout(entries.into_iter().collect())
    }

    /// 结构化部分
    pub fn structured(&self) -> Option<&StructuredConfig> {
        match self {
            Self::Structured(config) => Some(config),
            _ => None,
        }
    }

    /// 是否为扇出配置
    pub fn is_fanout(&self) -> bool {
        matches!(self, Self::Fanout(_))
    }

    /// 构造适配器时使用的字面参数
    pub fn kwargs(&self) -> BTreeMap<String, JsonValue> {
        self.structured()
            .map(|config| config.kwargs.clone())
            .unwrap_or_default()
    }

    /// 构造适配器时追加的端口配置
    pub fn nested_ports(&self) -> PortsMapping {
        self.structured()
            .map(|config| config.nested_ports.clone())
            .unwrap_or_default()
    }

    /// 根命名空间切换标记
    pub fn root_override(&self) -> Option<&str> {
        self.structured()
            .and_then(|config| config.root_override.as_deref())
    }
}

impl From<StructuredConfig> for PortConfiguration {
    fn from(config: StructuredConfig) -> Self {
        Self::Structured(config)
    }
}

impl From<&str> for PortConfiguration {
    fn from(path: &str) -> Self {
        Self::path(path)
    }
}

/// 结构化配置中的 `adapter` 字段
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterSelector {
    /// 命名空间路径
    Path(String),
    /// 接口映射
    Mapping(InterfaceMapping),
}

/// 结构化端口配置
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredConfig {
    /// 适配器选择
    pub adapter: AdapterSelector,
    /// 构造参数的字面值
    pub kwargs: BTreeMap<String, JsonValue>,
    /// 构造该适配器时覆盖的端口配置
    pub nested_ports: PortsMapping,
    /// 从另一棵命名空间树查找适配器
    pub root_override: Option<String>,
}

impl StructuredConfig {
    /// 以路径选择适配器
    pub fn new(path: impl Into<String>) -> Self {
        Self::with_adapter(AdapterSelector::Path(path.into()))
    }

    /// 以接口映射选择适配器
    pub fn mapping(entries: impl IntoIterator<Item = (String, PortConfiguration)>) -> Self {
        Self::with_adapter(AdapterSelector::Mapping(entries.into_iter().collect()))
    }

    fn with_adapter(adapter: AdapterSelector) -> Self {
        Self {
            adapter,
            kwargs: BTreeMap::new(),
            nested_ports: PortsMapping::new(),
            root_override: None,
        }
    }

    /// 添加字面参数
    pub fn with_kwarg(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.kwargs.insert(name.into(), value.into());
        self
    }

    /// 添加嵌套端口配置
    pub fn with_nested_port(
        mut self,
        port: impl Into<Port>,
        config: impl Into<PortConfiguration>,
    ) -> Self {
        self.nested_ports.insert(port, config);
        self
    }

    /// 设置根命名空间切换标记
    pub fn with_root(mut self, token: impl Into<String>) -> Self {
        self.root_override = Some(token.into());
        self
    }

    /// 适配器路径，接口映射返回 `None`
    pub fn adapter_path(&self) -> Option<&str> {
        match &self.adapter {
            AdapterSelector::Path(path) => Some(path),
            AdapterSelector::Mapping(_) => None,
        }
    }

    /// 接口映射，路径返回 `None`
    pub fn interface_mapping(&self) -> Option<&InterfaceMapping> {
        match &self.adapter {
            AdapterSelector::Mapping(mapping) => Some(mapping),
            AdapterSelector::Path(_) => None,
        }
    }

    /// 以当前配置为底，叠加接口映射中的一项
    ///
    /// 适配器取自条目；字面参数合并且条目优先；嵌套端口合并且条目优先；
    /// 根切换标记优先取条目的。
    pub fn layer(&self, key: &str, entry: &PortConfiguration) -> ConfigResult<PortConfiguration> {
        let layered = match entry {
            PortConfiguration::Path(path) => Self {
                adapter: AdapterSelector::Path(path.clone()),
                kwargs: self.kwargs.clone(),
                nested_ports: self.nested_ports.clone(),
                root_override: self.root_override.clone(),
            },
            PortConfiguration::Structured(config) => {
                let mut kwargs = self.kwargs.clone();
                kwargs.extend(config.kwargs.clone());
                Self {
                    adapter: config.adapter.clone(),
                    kwargs,
                    nested_ports: self.nested_ports.merge(&config.nested_ports),
                    root_override: config
                        .root_override
                        .clone()
                        .or_else(|| self.root_override.clone()),
                }
            }
            PortConfiguration::Fanout(_) => {
                return Err(ConfigError::invalid_shape(key, "接口映射的条目不能是扇出配置"))
            }
        };
        Ok(PortConfiguration::Structured(layered))
    }
}

/// 端口 → 配置的映射
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PortsMapping {
    ports: BTreeMap<Port, PortConfiguration>,
}

impl PortsMapping {
    /// 创建空映射
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加端口配置
    pub fn with(mut self, port: impl Into<Port>, config: impl Into<PortConfiguration>) -> Self {
        self.insert(port, config);
        self
    }

    /// 插入端口配置，已有的被替换
    pub fn insert(&mut self, port: impl Into<Port>, config: impl Into<PortConfiguration>) {
        self.ports.insert(port.into(), config.into());
    }

    /// 获取端口配置
    pub fn get(&self, port: &str) -> Option<&PortConfiguration> {
        self.ports.get(port)
    }

    /// 是否配置了端口
    pub fn contains(&self, port: &str) -> bool {
        self.ports.contains_key(port)
    }

    /// 合并，`nested` 中的端口覆盖当前映射中的同名端口
    ///
    /// 整项替换，不做深度合并。
    pub fn merge(&self, nested: &PortsMapping) -> PortsMapping {
        let mut ports = self.ports.clone();
        ports.extend(
            nested
                .ports
                .iter()
                .map(|(port, config)| (port.clone(), config.clone())),
        );
        Self { ports }
    }

    /// 按端口名遍历
    pub fn iter(&self) -> impl Iterator<Item = (&Port, &PortConfiguration)> {
        self.ports.iter()
    }

    /// 端口数量
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

impl FromIterator<(Port, PortConfiguration)> for PortsMapping {
    fn from_iter<T: IntoIterator<Item = (Port, PortConfiguration)>>(iter: T) -> Self {
        Self {
            ports: iter.into_iter().collect(),
        }
    }
}
