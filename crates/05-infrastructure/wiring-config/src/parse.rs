//! 配置解析
//!
//! 从 JSON 形态的树（TOML、YAML 先转换为同样的树）解析端口配置，并提供反向序列化

use crate::model::{AdapterSelector, PortConfiguration, PortsMapping, StructuredConfig};
use hexwire_common::{ConfigError, ConfigResult, Port};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use tracing::debug;

const KEY_ADAPTER: &str = "adapter";
const KEY_KWARGS: &str = "kwargs";
const KEY_PORTS: &str = "ports";
const KEY_ROOT: &str = "root";
const STRUCTURED_KEYS: [&str; 4] = [KEY_ADAPTER, KEY_KWARGS, KEY_PORTS, KEY_ROOT];

fn shape_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "list",
        JsonValue::Object(_) => "object",
    }
}

impl PortConfiguration {
    /// 从 JSON 值解析
    ///
    /// `key` 只用于错误信息中定位出错的配置项。
    pub fn from_json(key: &str, value: &JsonValue) -> ConfigResult<Self> {
        match value {
            JsonValue::String(path) => Ok(Self::Path(path.clone())),
            JsonValue::Array(items) => {
                let entries = items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        let entry_key = format!("{key}[{index}]");
                        if item.is_array() {
                            return Err(ConfigError::invalid_shape(entry_key, "扇出配置不能嵌套"));
                        }
                        Self::from_json(&entry_key, item)
                    })
                    .collect::<ConfigResult<Vec<_>>>()?;
                Ok(Self::Fanout(entries))
            }
            JsonValue::Object(fields) => StructuredConfig::from_json(key, fields).map(Self::Structured),
            other => Err(ConfigError::invalid_shape(
                key,
                format!("端口配置必须是字符串、表或数组，实际为 {}", shape_name(other)),
            )),
        }
    }

    /// 转换为 JSON 值
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Path(path) => JsonValue::String(path.clone()),
            Self::Structured(config) => config.to_json(),
            Self::Fanout(entries) => JsonValue::Array(entries.iter().map(Self::to_json).collect()),
        }
    }
}

impl StructuredConfig {
    fn from_json(key: &str, fields: &Map<String, JsonValue>) -> ConfigResult<Self> {
        if let Some(unknown) = fields
            .keys()
            .find(|field| !STRUCTURED_KEYS.contains(&field.as_str()))
        {
            return Err(ConfigError::invalid_shape(
                key,
                format!("未知的配置字段 `{unknown}`，允许的字段: {}", STRUCTURED_KEYS.join(", ")),
            ));
        }

        let adapter = match fields.get(KEY_ADAPTER) {
            Some(JsonValue::String(path)) => AdapterSelector::Path(path.clone()),
            Some(JsonValue::Object(entries)) => AdapterSelector::Mapping(
                entries
                    .iter()
                    .map(|(name, entry)| {
                        PortConfiguration::from_json(&format!("{key}.{KEY_ADAPTER}.{name}"), entry)
                            .map(|config| (name.clone(), config))
                    })
                    .collect::<ConfigResult<_>>()?,
            ),
            Some(other) => {
                return Err(ConfigError::invalid_shape(
                    key,
                    format!("`adapter` 必须是字符串或表，实际为 {}", shape_name(other)),
                ))
            }
            None => return Err(ConfigError::invalid_shape(key, "结构化配置缺少 `adapter` 字段")),
        };

        let kwargs: BTreeMap<String, JsonValue> = match fields.get(KEY_KWARGS) {
            Some(JsonValue::Object(kwargs)) => kwargs
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            Some(other) => {
                return Err(ConfigError::invalid_shape(
                    key,
                    format!("`kwargs` 必须是表，实际为 {}", shape_name(other)),
                ))
            }
            None => BTreeMap::new(),
        };

        let nested_ports = match fields.get(KEY_PORTS) {
            Some(ports) => PortsMapping::from_json_at(&format!("{key}.{KEY_PORTS}"), ports)?,
            None => PortsMapping::new(),
        };

        let root_override = match fields.get(KEY_ROOT) {
            Some(JsonValue::String(token)) => Some(token.clone()),
            Some(other) => {
                return Err(ConfigError::invalid_shape(
                    key,
                    format!("`root` 必须是字符串，实际为 {}", shape_name(other)),
                ))
            }
            None => None,
        };

        Ok(Self {
            adapter,
            kwargs,
            nested_ports,
            root_override,
        })
    }

    fn to_json(&self) -> JsonValue {
        let mut fields = Map::new();
        let adapter = match &self.adapter {
            AdapterSelector::Path(path) => JsonValue::String(path.clone()),
            AdapterSelector::Mapping(mapping) => JsonValue::Object(
                mapping
                    .iter()
                    .map(|(name, config)| (name.clone(), config.to_json()))
                    .collect(),
            ),
        };
        fields.insert(KEY_ADAPTER.to_string(), adapter);
        if !self.kwargs.is_empty() {
            fields.insert(
                KEY_KWARGS.to_string(),
                JsonValue::Object(self.kwargs.clone().into_iter().collect()),
            );
        }
        if !self.nested_ports.is_empty() {
            fields.insert(KEY_PORTS.to_string(), self.nested_ports.to_json());
        }
        if let Some(token) = &self.root_override {
            fields.insert(KEY_ROOT.to_string(), JsonValue::String(token.clone()));
        }
        JsonValue::Object(fields)
    }
}

impl PortsMapping {
    /// 从 JSON 值解析，值必须是以端口名为键的表
    pub fn from_json(value: &JsonValue) -> ConfigResult<Self> {
        Self::from_json_at(KEY_PORTS, value)
    }

    fn from_json_at(key: &str, value: &JsonValue) -> ConfigResult<Self> {
        let JsonValue::Object(ports) = value else {
            return Err(ConfigError::invalid_shape(
                key,
                format!("端口映射必须是表，实际为 {}", shape_name(value)),
            ));
        };

        ports
            .iter()
            .map(|(port, config)| {
                PortConfiguration::from_json(port, config).map(|config| (Port::new(port.as_str()), config))
            })
            .collect()
    }

    /// 转换为 JSON 值
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(
            self.iter()
                .map(|(port, config)| (port.to_string(), config.to_json()))
                .collect(),
        )
    }

    /// 从 TOML 文本解析
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        debug!("解析 TOML 端口配置");
        let value: JsonValue = toml::from_str(content).map_err(ConfigError::parse)?;
        Self::from_json(&value)
    }

    /// 从 JSON 文本解析
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        debug!("解析 JSON 端口配置");
        let value: JsonValue = serde_json::from_str(content).map_err(ConfigError::parse)?;
        Self::from_json(&value)
    }

    /// 从 YAML 文本解析
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        debug!("解析 YAML 端口配置");
        let value: JsonValue = serde_yaml::from_str(content).map_err(ConfigError::parse)?;
        Self::from_json(&value)
    }
}

impl Serialize for PortConfiguration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PortConfiguration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        Self::from_json("<port>", &value).map_err(D::Error::custom)
    }
}

impl Serialize for PortsMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PortsMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        Self::from_json(&value).map_err(D::Error::custom)
    }
}
