//! 错误类型定义

use thiserror::Error;

/// 适配器构造函数返回的通用错误类型
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError { source: BoxError },

    #[error("端口配置结构无效: {key}, 原因: {message}")]
    InvalidShape { key: String, message: String },

    #[error("配置节不存在: {key}")]
    SectionNotFound { key: String },
}

impl ConfigError {
    /// 创建结构无效错误
    pub fn invalid_shape(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidShape {
            key: key.into(),
            message: message.into(),
        }
    }

    /// 包装底层解析错误
    pub fn parse(source: impl Into<BoxError>) -> Self {
        Self::ParseError {
            source: source.into(),
        }
    }
}

/// 解析错误类型
///
/// 所有变体都会原样传递给公开入口的调用方，引擎不做重试。
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("端口未配置: {port} (解析接口 {interface})")]
    PortNotConfigured { port: String, interface: String },

    #[error("端口配置无效: {port}, 原因: {message}")]
    Configuration { port: String, message: String },

    #[error("适配器路径无效: {path}, 原因: {message}")]
    AdapterPath { path: String, message: String },

    #[error("未找到适配器: 在 {namespace} 中既没有类型 {class_name} 也没有函数 {function_name}")]
    AdapterNotFound {
        namespace: String,
        class_name: String,
        function_name: String,
    },

    #[error("参数类型不匹配: {parameter}, 期望 {expected}, 实际 {actual}")]
    TypeMismatch {
        parameter: String,
        expected: String,
        actual: String,
    },

    #[error("缺少必需参数: {parameter} ({adapter})")]
    MissingRequiredParameter { parameter: String, adapter: String },

    #[error("联合接口参数没有可用的适配器: {parameter}, 候选: {candidates}")]
    NoAdapterInUnion { parameter: String, candidates: String },

    #[error("参数声明顺序无效: {parameter}, 原因: {message}")]
    InvalidParameterOrder { parameter: String, message: String },

    #[error("检测到循环依赖: {chain}")]
    CyclicDependency { chain: String },

    #[error("意外的参数: {argument} ({callee})")]
    UnexpectedArgument { argument: String, callee: String },

    #[error("适配器实例化失败: {adapter}, 原因: {source}")]
    Instantiation { adapter: String, source: BoxError },
}

impl ResolutionError {
    /// 创建端口配置无效错误
    pub fn configuration(port: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            port: port.into(),
            message: message.into(),
        }
    }

    /// 创建适配器路径错误
    pub fn adapter_path(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AdapterPath {
            path: path.into(),
            message: message.into(),
        }
    }

    /// 创建类型不匹配错误
    pub fn type_mismatch(
        parameter: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            parameter: parameter.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// 是否为循环依赖错误
    pub fn is_cyclic(&self) -> bool {
        matches!(self, Self::CyclicDependency { .. })
    }
}

impl From<ConfigError> for ResolutionError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::InvalidShape { key, message } => Self::Configuration { port: key, message },
            other => Self::Configuration {
                port: String::new(),
                message: other.to_string(),
            },
        }
    }
}

/// 装配启动错误类型
#[derive(Error, Debug)]
pub enum WiringError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("解析错误: {source}")]
    ResolutionError {
        #[from]
        source: ResolutionError,
    },

    #[error("接口未注册: {name}")]
    InterfaceNotRegistered { name: String },

    #[error("装配启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type ResolutionResult<T> = Result<T, ResolutionError>;
pub type WiringResult<T> = Result<T, WiringError>;
