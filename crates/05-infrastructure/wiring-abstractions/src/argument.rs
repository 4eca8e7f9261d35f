//! 参数声明
//!
//! 可构造类型与可调用对象的参数模型

use crate::value::{json_type_name, Value};
use hexwire_common::{Interface, InterfaceInfo};
use serde_json::Value as JsonValue;
use std::fmt;

/// 参数种类
///
/// 声明顺序必须满足 `PositionalOnly < PositionalOrKeyword < VarPositional < KeywordOnly < VarKeyword`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParameterKind {
    /// 仅位置参数
    PositionalOnly,
    /// 位置或关键字参数
    PositionalOrKeyword,
    /// 可变位置参数
    VarPositional,
    /// 仅关键字参数
    KeywordOnly,
    /// 可变关键字参数
    VarKeyword,
}

impl ParameterKind {
    /// 是否按位置放置
    pub fn is_positional(self) -> bool {
        matches!(self, Self::PositionalOnly | Self::PositionalOrKeyword)
    }

    /// 是否为可变参数
    pub fn is_variadic(self) -> bool {
        matches!(self, Self::VarPositional | Self::VarKeyword)
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PositionalOnly => "positional-only",
            Self::PositionalOrKeyword => "positional-or-keyword",
            Self::VarPositional => "var-positional",
            Self::KeywordOnly => "keyword-only",
            Self::VarKeyword => "var-keyword",
        };
        f.write_str(name)
    }
}

/// 参数类型注解
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// 任意值，不做校验
    Any,
    /// 布尔值
    Bool,
    /// 整数
    Integer,
    /// 浮点数，同时接受整数
    Float,
    /// 字符串
    Str,
    /// 列表
    List,
    /// 对象
    Object,
    /// 可空
    Optional(Box<Annotation>),
    /// 单个接口
    Interface(InterfaceInfo),
    /// 多个候选接口，取第一个可解析的
    InterfaceUnion(Vec<InterfaceInfo>),
    /// 以字符串为键、值为同一接口实例的映射
    InterfaceMap(InterfaceInfo),
}

impl Annotation {
    /// 单个接口注解
    pub fn interface<I: Interface + ?Sized>() -> Self {
        Self::Interface(I::info())
    }

    /// 接口映射注解
    pub fn interface_map<I: Interface + ?Sized>() -> Self {
        Self::InterfaceMap(I::info())
    }

    /// 可空注解
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// 是否为接口类注解（单个、联合或映射），此类参数不做字面值校验
    pub fn is_interface_type(&self) -> bool {
        match self {
            Self::Interface(_) | Self::InterfaceUnion(_) | Self::InterfaceMap(_) => true,
            Self::Optional(inner) => inner.is_interface_type(),
            _ => false,
        }
    }

    /// 是否为联合接口注解
    pub fn is_interface_union(&self) -> bool {
        matches!(self, Self::InterfaceUnion(_))
    }

    /// 是否为接口映射注解
    pub fn is_interface_mapping(&self) -> bool {
        matches!(self, Self::InterfaceMap(_))
    }

    /// 校验配置中的字面值
    pub fn accepts(&self, value: &JsonValue) -> bool {
        match self {
            Self::Any => true,
            Self::Bool => value.is_boolean(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::Str => value.is_string(),
            Self::List => value.is_array(),
            Self::Object => value.is_object(),
            Self::Optional(inner) => value.is_null() || inner.accepts(value),
            Self::Interface(_) | Self::InterfaceUnion(_) | Self::InterfaceMap(_) => true,
        }
    }

    /// 校验并给出不匹配时的实际类型
    pub fn check(&self, value: &JsonValue) -> Result<(), &'static str> {
        if self.is_interface_type() || self.accepts(value) {
            Ok(())
        } else {
            Err(json_type_name(value))
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Bool => f.write_str("bool"),
            Self::Integer => f.write_str("integer"),
            Self::Float => f.write_str("float"),
            Self::Str => f.write_str("string"),
            Self::List => f.write_str("list"),
            Self::Object => f.write_str("object"),
            Self::Optional(inner) => write!(f, "Optional[{inner}]"),
            Self::Interface(info) => f.write_str(info.name),
            Self::InterfaceUnion(members) => {
                let names: Vec<&str> = members.iter().map(|info| info.name).collect();
                write!(f, "Union[{}]", names.join(" | "))
            }
            Self::InterfaceMap(info) => write!(f, "Map[string, {}]", info.name),
        }
    }
}

/// 参数声明
#[derive(Debug, Clone)]
pub struct Argument {
    /// 参数名
    pub name: String,
    /// 类型注解
    pub annotation: Annotation,
    /// 参数种类
    pub kind: ParameterKind,
    /// 默认值
    pub default: Option<Value>,
    /// 声明时附加的描述
    pub description: Option<String>,
}

impl Argument {
    /// 创建位置或关键字参数
    pub fn new(name: impl Into<String>, annotation: Annotation) -> Self {
        Self {
            name: name.into(),
            annotation,
            kind: ParameterKind::PositionalOrKeyword,
            default: None,
            description: None,
        }
    }

    /// 设置参数种类
    pub fn with_kind(mut self, kind: ParameterKind) -> Self {
        self.kind = kind;
        self
    }

    /// 设置为仅位置参数
    pub fn positional_only(self) -> Self {
        self.with_kind(ParameterKind::PositionalOnly)
    }

    /// 设置为仅关键字参数
    pub fn keyword_only(self) -> Self {
        self.with_kind(ParameterKind::KeywordOnly)
    }

    /// 设置为可变位置参数
    pub fn var_positional(self) -> Self {
        self.with_kind(ParameterKind::VarPositional)
    }

    /// 设置为可变关键字参数
    pub fn var_keyword(self) -> Self {
        self.with_kind(ParameterKind::VarKeyword)
    }

    /// 设置默认值
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// 设置描述
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 是否有默认值
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// 默认值
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// 是否为接口类参数
    pub fn is_interface_type(&self) -> bool {
        self.annotation.is_interface_type()
    }

    /// 是否为联合接口参数
    pub fn is_interface_union(&self) -> bool {
        self.annotation.is_interface_union()
    }

    /// 是否为接口映射参数
    pub fn is_interface_mapping(&self) -> bool {
        self.annotation.is_interface_mapping()
    }
}
