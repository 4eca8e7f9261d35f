//! 解析器选项

use serde::{Deserialize, Serialize};

/// 默认最大解析深度
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// 解析器选项
///
/// 可以从配置文件的 `resolver` 节加载，缺省字段取默认值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    /// 递归解析的最大深度，超过时按循环依赖处理
    pub max_depth: usize,
    /// 可变关键字参数收到非映射值时，是否以参数名为键放入，而不是报错
    pub lenient_var_keyword: bool,
    /// 是否在公开入口记录解析失败
    pub log_failures: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            lenient_var_keyword: false,
            log_failures: true,
        }
    }
}

impl ResolverOptions {
    /// 设置最大解析深度
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// 设置可变关键字参数的宽松模式
    pub fn with_lenient_var_keyword(mut self, lenient: bool) -> Self {
        self.lenient_var_keyword = lenient;
        self
    }

    /// 设置是否记录解析失败
    pub fn with_log_failures(mut self, log_failures: bool) -> Self {
        self.log_failures = log_failures;
        self
    }
}
