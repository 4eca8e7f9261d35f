//! 元数据定义
//!
//! 提供端口与接口的元数据信息

use crate::naming;
use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 端口标识
///
/// 端口是一组相关接口的能力分组，使用点分路径命名，例如 `app.shapes`。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(String);

impl Port {
    /// 创建新的端口标识
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// 完整端口名
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 端口名的最后一段
    ///
    /// 按约定，适配器所在的子命名空间与该段同名。
    pub fn leaf(&self) -> &str {
        naming::leaf_name(&self.0)
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Port {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Port {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Port {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// 接口标记 trait
///
/// 每个可被解析的接口都必须实现此 trait。接口可以是 trait object
/// （`impl Interface for dyn Drawable`），也可以是具体类型。
pub trait Interface: 'static {
    /// 接口元数据
    fn info() -> InterfaceInfo;
}

/// 接口元数据
///
/// 相等性与哈希只由 `type_id` 决定。
#[derive(Debug, Clone, Copy)]
pub struct InterfaceInfo {
    /// 接口名称（类风格，例如 `Drawable`）
    pub name: &'static str,
    /// 所属端口
    pub port: &'static str,
    /// 类型ID
    pub type_id: TypeId,
    /// 完整类型名称
    pub type_name: &'static str,
    /// 声明时附加的描述
    pub description: Option<&'static str>,
}

impl InterfaceInfo {
    /// 创建新的接口元数据
    pub fn new<T: ?Sized + 'static>(name: &'static str, port: &'static str) -> Self {
        Self {
            name,
            port,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            description: None,
        }
    }

    /// 获取接口类型的元数据
    pub fn of<I: Interface + ?Sized>() -> Self {
        I::info()
    }

    /// 设置描述
    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    /// 所属端口
    pub fn port(&self) -> Port {
        Port::new(self.port)
    }

    /// 函数/文件风格的名称，例如 `MyInterface` → `my_interface`
    pub fn snake_name(&self) -> String {
        naming::to_snake_case(self.name)
    }

    /// 限定名 `port.Name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.port, self.name)
    }

    /// 是否为指定类型
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl PartialEq for InterfaceInfo {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for InterfaceInfo {}

impl Hash for InterfaceInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Display for InterfaceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (端口 {})", self.name, self.port)
    }
}
