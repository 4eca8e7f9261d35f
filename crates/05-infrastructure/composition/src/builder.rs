//! 装配构建器

use crate::wiring::Wiring;
use hexwire_abstractions::NamespaceRoot;
use hexwire_common::{ConfigError, Port, WiringError, WiringResult};
use hexwire_config::{PortConfiguration, PortsConfigLoader, PortsMapping};
use hexwire_resolver::{Resolver, ResolverOptions};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// 解析器选项所在的配置节
pub const RESOLVER_OPTIONS_SECTION: &str = "resolver";

/// 装配构建器
///
/// 使用建造者模式组合装配上下文。端口配置的优先级从低到高：
/// 配置文件（按添加顺序）、环境变量、代码中添加的端口。
pub struct WiringBuilder {
    /// 根命名空间
    root: Option<Arc<dyn NamespaceRoot>>,
    /// 代码中添加的端口配置
    ports: PortsMapping,
    /// 文件与环境变量配置源
    loader: PortsConfigLoader,
    /// 是否添加过配置源
    has_sources: bool,
    /// 显式设置的解析器选项
    options: Option<ResolverOptions>,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl WiringBuilder {
    /// 创建新的装配构建器
    pub fn new() -> Self {
        Self {
            root: None,
            ports: PortsMapping::new(),
            loader: PortsConfigLoader::new(),
            has_sources: false,
            options: None,
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: LoggingConfig::default(),
        }
    }

    /// 设置根命名空间
    pub fn with_root(mut self, root: Arc<dyn NamespaceRoot>) -> Self {
        self.root = Some(root);
        self
    }

    /// 添加单个端口配置
    pub fn with_port(
        mut self,
        port: impl Into<Port>,
        config: impl Into<PortConfiguration>,
    ) -> Self {
        self.ports.insert(port, config);
        self
    }

    /// 合并一组端口配置
    pub fn with_ports(mut self, ports: &PortsMapping) -> Self {
        self.ports = self.ports.merge(ports);
        self
    }

    /// 添加必需的配置文件（TOML、JSON 或 YAML）
    pub fn add_config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        info!("添加配置文件: {}", path.as_ref().display());
        self.loader = self.loader.add_file(path);
        self.has_sources = true;
        self
    }

    /// 添加可选的配置文件
    pub fn add_optional_config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        debug!("添加可选配置文件: {}", path.as_ref().display());
        self.loader = self.loader.add_optional_file(path);
        self.has_sources = true;
        self
    }

    /// 添加环境变量配置源
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        let prefix = prefix.into();
        info!("添加环境变量配置源，前缀: {}", prefix);
        self.loader = self.loader.with_env_prefix(prefix);
        self.has_sources = true;
        self
    }

    /// 设置端口配置节的名称，默认 `ports`
    pub fn with_ports_section<S: Into<String>>(mut self, section: S) -> Self {
        self.loader = self.loader.with_section(section);
        self
    }

    /// 设置解析器选项，优先于配置文件中的 `resolver` 节
    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true; // 启用日志初始化
        self
    }

    /// 构建装配上下文
    pub fn build(self) -> WiringResult<Wiring> {
        // 只有在明确配置了日志时才初始化日志
        // 避免在测试环境中重复初始化
        if self.logging_enabled {
            self.initialize_logging()?;
        }

        info!("开始构建装配上下文");

        let root = self.root.ok_or_else(|| WiringError::BootstrapFailed {
            message: "未设置根命名空间".to_string(),
        })?;

        let mut file_ports = PortsMapping::new();
        let mut file_options = None;
        if self.has_sources {
            let loaded = self.loader.load()?;
            match loaded.ports() {
                Ok(ports) => file_ports = ports,
                Err(ConfigError::SectionNotFound { key }) => {
                    debug!("配置源中没有端口配置节: {}", key);
                }
                Err(e) => return Err(e.into()),
            }
            file_options = loaded.section::<ResolverOptions>(RESOLVER_OPTIONS_SECTION)?;
        }

        let ports = file_ports.merge(&self.ports);
        let options = self.options.or(file_options).unwrap_or_default();
        debug!("解析器选项: {:?}", options);

        let wiring = Wiring::new(Resolver::with_options(root, options), ports);
        info!("装配上下文构建完成: {} 个端口", wiring.ports().len());
        Ok(wiring)
    }

    /// 初始化日志系统
    ///
    /// 设置了 `RUST_LOG` 时以其为准，否则使用配置的日志级别。
    fn initialize_logging(&self) -> WiringResult<()> {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(self.logging_config.env_filter())
            .with_target(self.logging_config.show_target)
            .with_thread_ids(self.logging_config.show_thread_ids)
            .with_file(self.logging_config.show_file)
            .with_line_number(self.logging_config.show_line_number);

        if self.logging_config.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }
        .map_err(|e| WiringError::BootstrapFailed {
            message: format!("日志初始化失败: {}", e),
        })?;

        info!("日志系统初始化完成");
        Ok(())
    }
}

impl Default for WiringBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 日志过滤器：优先读取 `RUST_LOG`，否则按 `level` 过滤
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.to_string().to_lowercase()))
    }

    /// 开发环境：输出解析过程的调试日志
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 生产环境
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }
}
