//! 配置来源
//!
//! 端口配置节直接从原始文件解析，保留键的大小写；其他类型化的配置节通过 config crate
//! 组合配置文件与环境变量后绑定

use crate::model::{PortConfiguration, PortsMapping};
use hexwire_common::{ConfigError, ConfigResult};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// 默认的端口配置节
pub const DEFAULT_PORTS_SECTION: &str = "ports";

const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone)]
struct FileSource {
    path: PathBuf,
    required: bool,
}

/// 端口配置加载器
///
/// 文件按添加顺序叠加，后添加的覆盖先添加的；环境变量最后叠加。
/// 文件格式由扩展名决定（`.toml`、`.json`、`.yaml`/`.yml`）。
///
/// 端口配置保留文件中键的大小写。环境变量中的端口名按小写处理，
/// 类型化配置节的键由 config crate 统一转换为小写。
#[derive(Debug, Clone)]
pub struct PortsConfigLoader {
    files: Vec<FileSource>,
    env_prefix: Option<String>,
    section: String,
}

impl Default for PortsConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PortsConfigLoader {
    /// 创建加载器
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            env_prefix: None,
            section: DEFAULT_PORTS_SECTION.to_string(),
        }
    }

    /// 添加必需的配置文件
    pub fn add_file(mut self, path: impl AsRef<Path>) -> Self {
        self.files.push(FileSource {
            path: path.as_ref().to_path_buf(),
            required: true,
        });
        self
    }

    /// 添加可选的配置文件，不存在时跳过
    pub fn add_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        self.files.push(FileSource {
            path: path.as_ref().to_path_buf(),
            required: false,
        });
        self
    }

    /// 叠加环境变量，层级分隔符为 `__`
    ///
    /// 例如前缀 `HEXWIRE` 时，`HEXWIRE__RESOLVER__MAX_DEPTH` 对应 `resolver.max_depth`。
    /// 端口用 `HEXWIRE__PORTS__APP.SHAPES` 或 `HEXWIRE__PORTS__APP__SHAPES` 覆盖 `app.shapes`，
    /// 值为适配器路径，或表示结构化配置、扇出配置的 JSON 文本。
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// 设置端口配置节的名称
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }

    /// 加载所有来源
    pub fn load(&self) -> ConfigResult<LoadedConfiguration> {
        let mut builder = config::Config::builder();
        let mut file_ports: Option<JsonValue> = None;

        for file in &self.files {
            if !file.path.exists() {
                if file.required {
                    error!("配置文件不存在: {}", file.path.display());
                    return Err(ConfigError::FileNotFound {
                        path: file.path.display().to_string(),
                    });
                }
                debug!("跳过不存在的可选配置文件: {}", file.path.display());
                continue;
            }
            debug!("添加配置文件: {} (必需: {})", file.path.display(), file.required);
            builder = builder.add_source(config::File::from(file.path.as_path()).required(file.required));

            let document = read_document(&file.path)?;
            if let Some(section) = lookup_section(&document, &self.section) {
                file_ports = Some(match file_ports.take() {
                    Some(base) => merge_json(base, section.clone()),
                    None => section.clone(),
                });
            }
        }

        let mut env_ports = BTreeMap::new();
        if let Some(prefix) = &self.env_prefix {
            debug!("添加环境变量配置源: {}", prefix);
            let marker = env_ports_marker(prefix, &self.section);
            let (port_vars, other_vars): (Vec<_>, Vec<_>) = std::env::vars_os()
                .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
                .partition(|(key, _)| key.to_uppercase().starts_with(&marker));

            // 端口名本身含 `.`，不交给 config crate 按层级拆分
            builder = builder.add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .source(Some(other_vars.into_iter().collect())),
            );
            env_ports = env_port_overrides(&marker, port_vars);
        }

        let config = builder.build().map_err(|e| {
            error!("配置构建失败: {}", e);
            ConfigError::parse(e)
        })?;

        Ok(LoadedConfiguration {
            config,
            section: self.section.clone(),
            file_ports,
            env_ports,
        })
    }

    /// 加载并取出端口映射
    pub fn load_ports(&self) -> ConfigResult<PortsMapping> {
        self.load()?.ports()
    }
}

/// 按扩展名解析配置文件为 JSON 形态的树，键保持原样
fn read_document(path: &Path) -> ConfigResult<JsonValue> {
    let content = std::fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "toml" => toml::from_str(&content).map_err(ConfigError::parse),
        "json" => serde_json::from_str(&content).map_err(ConfigError::parse),
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(ConfigError::parse),
        other => Err(ConfigError::parse(format!(
            "不支持的配置文件格式 `{other}`: {}",
            path.display()
        ))),
    }
}

fn lookup_section<'a>(document: &'a JsonValue, section: &str) -> Option<&'a JsonValue> {
    section
        .split('.')
        .try_fold(document, |node, segment| node.as_object()?.get(segment))
}

/// 深度合并：两侧都是表时逐键合并，否则以覆盖值为准
fn merge_json(base: JsonValue, overlay: JsonValue) -> JsonValue {
    match (base, overlay) {
        (JsonValue::Object(mut base), JsonValue::Object(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            JsonValue::Object(base)
        }
        (_, overlay) => overlay,
    }
}

fn env_ports_marker(prefix: &str, section: &str) -> String {
    format!(
        "{}{ENV_SEPARATOR}{}{ENV_SEPARATOR}",
        prefix.to_uppercase(),
        section.replace('.', ENV_SEPARATOR).to_uppercase()
    )
}

/// 收集环境变量中的端口覆盖
///
/// 端口名由配置节之后的各段以 `.` 连接并转换为小写。
fn env_port_overrides(
    marker: &str,
    mut variables: Vec<(String, String)>,
) -> BTreeMap<String, JsonValue> {
    variables.sort();

    let mut overrides = BTreeMap::new();
    for (key, raw) in variables {
        let Some(rest) = key.get(marker.len()..) else {
            continue;
        };
        let port = rest
            .split(ENV_SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join(".")
            .to_lowercase();
        if port.is_empty() {
            warn!("忽略缺少端口名的环境变量: {}", key);
            continue;
        }

        let value = match serde_json::from_str::<JsonValue>(&raw) {
            Ok(parsed @ (JsonValue::Object(_) | JsonValue::Array(_))) => parsed,
            _ => JsonValue::String(raw),
        };
        debug!("环境变量覆盖端口: {} <- {}", port, key);
        overrides.insert(port, value);
    }
    overrides
}

/// 已加载的配置
#[derive(Debug, Clone)]
pub struct LoadedConfiguration {
    config: config::Config,
    section: String,
    file_ports: Option<JsonValue>,
    env_ports: BTreeMap<String, JsonValue>,
}

impl LoadedConfiguration {
    /// 取出端口映射，文件和环境变量中都没有端口配置时返回 [`ConfigError::SectionNotFound`]
    ///
    /// 环境变量中的端口整体替换文件中的同名端口。
    pub fn ports(&self) -> ConfigResult<PortsMapping> {
        let mut mapping = match &self.file_ports {
            Some(value) => PortsMapping::from_json(value)?,
            None if self.env_ports.is_empty() => {
                return Err(ConfigError::SectionNotFound {
                    key: self.section.clone(),
                })
            }
            None => PortsMapping::new(),
        };

        for (port, value) in &self.env_ports {
            mapping.insert(port.as_str(), PortConfiguration::from_json(port, value)?);
        }

        debug!("加载端口配置: {} 个端口", mapping.len());
        Ok(mapping)
    }

    /// 绑定配置节到类型，配置节不存在时返回 `None`
    pub fn section<T: DeserializeOwned>(&self, key: &str) -> ConfigResult<Option<T>> {
        match self.config.get::<T>(key) {
            Ok(value) => {
                debug!("绑定配置节: {} -> {}", key, std::any::type_name::<T>());
                Ok(Some(value))
            }
            Err(config::ConfigError::NotFound(_)) => Ok(None),
            Err(e) => {
                error!("配置绑定失败: key={}, error={}", key, e);
                Err(ConfigError::parse(e))
            }
        }
    }
}
