//! 动态取值
//!
//! 绑定过程中在引擎与适配器之间流转的值

use crate::adapter::Callable;
use hexwire_common::InterfaceInfo;
use serde_json::Value as JsonValue;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// 类型擦除的适配器实例
///
/// 内部始终保存一个 `Arc<T>`，因此既可以承载具体类型，也可以承载 trait object。
#[derive(Clone)]
pub struct Instance {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Instance {
    /// 包装一个共享实例
    pub fn new<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// 包装一个具体值
    pub fn of<T: Send + Sync + 'static>(value: T) -> Self {
        Self::new(Arc::new(value))
    }

    /// 还原为 `Arc<T>`，`T` 必须与包装时的类型一致
    pub fn downcast<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
        self.inner.downcast_ref::<Arc<T>>().cloned()
    }

    /// 是否包装了 `T`
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.inner.is::<Arc<T>>()
    }

    /// 包装时的类型名称
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// 是否为同一个实例
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// 动态取值
#[derive(Debug, Clone)]
pub enum Value {
    /// 配置中的字面值
    Literal(JsonValue),
    /// 构造出的适配器实例
    Instance(Instance),
    /// 找到的可调用对象
    Callable(Callable),
    /// 多个值，例如扇出配置的解析结果
    Tuple(Vec<Value>),
    /// 按键组织的值，例如接口映射参数
    Map(BTreeMap<String, Value>),
    /// 联合接口参数的解析结果，附带实际命中的接口
    Union {
        /// 解析出的值
        value: Box<Value>,
        /// 命中的接口
        interface: InterfaceInfo,
    },
}

impl Value {
    /// 创建字面值
    pub fn literal(value: impl Into<JsonValue>) -> Self {
        Self::Literal(value.into())
    }

    /// 包装共享实例
    pub fn instance<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self::Instance(Instance::new(value))
    }

    /// 字面值
    pub fn as_literal(&self) -> Option<&JsonValue> {
        match self {
            Self::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// 适配器实例
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Instance(instance) => Some(instance),
            Self::Union { value, .. } => value.as_instance(),
            _ => None,
        }
    }

    /// 可调用对象
    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Self::Callable(callable) => Some(callable),
            Self::Union { value, .. } => value.as_callable(),
            _ => None,
        }
    }

    /// 还原实例为 `Arc<T>`
    pub fn downcast<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
        self.as_instance().and_then(Instance::downcast::<T>)
    }

    /// 提取为具体类型
    pub fn extract<T: FromValue>(&self) -> Option<T> {
        T::from_value(self)
    }

    /// 展开为多个值
    ///
    /// 数组和元组逐项展开，其他值包装为单个元素。
    pub fn into_items(self) -> Vec<Value> {
        match self {
            Self::Literal(JsonValue::Array(items)) => items.into_iter().map(Self::Literal).collect(),
            Self::Tuple(items) => items,
            other => vec![other],
        }
    }

    /// 展开为键值对，非映射值原样返回
    pub fn into_entries(self) -> Result<BTreeMap<String, Value>, Value> {
        match self {
            Self::Literal(JsonValue::Object(entries)) => Ok(entries
                .into_iter()
                .map(|(key, value)| (key, Self::Literal(value)))
                .collect()),
            Self::Map(entries) => Ok(entries),
            other => Err(other),
        }
    }

    /// 用于错误信息的类型描述
    pub fn describe(&self) -> String {
        match self {
            Self::Literal(value) => json_type_name(value).to_string(),
            Self::Instance(instance) => instance.type_name().to_string(),
            Self::Callable(callable) => format!("callable {}", callable.name()),
            Self::Tuple(items) => format!("tuple[{}]", items.len()),
            Self::Map(_) => "map".to_string(),
            Self::Union { value, interface } => {
                format!("union({}: {})", interface.name, value.describe())
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Instance(a), Self::Instance(b)) => a.ptr_eq(b),
            (Self::Callable(a), Self::Callable(b)) => a.ptr_eq(b),
            (Self::Tuple(a), Self::Tuple(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (
                Self::Union {
                    value: a,
                    interface: ia,
                },
                Self::Union {
                    value: b,
                    interface: ib,
                },
            ) => ia == ib && a == b,
            _ => false,
        }
    }
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        Self::Literal(value)
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Self::Instance(instance)
    }
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self {
        Self::Callable(callable)
    }
}

/// JSON 值的类型名称
pub fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(n) if n.is_f64() => "float",
        JsonValue::Number(_) => "integer",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "list",
        JsonValue::Object(_) => "object",
    }
}

/// 从动态取值提取具体类型
pub trait FromValue: Sized {
    /// 期望类型的描述
    fn expected() -> String;

    /// 尝试转换
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    fn expected() -> String {
        "any".to_string()
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for JsonValue {
    fn expected() -> String {
        "literal".to_string()
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_literal().cloned()
    }
}

impl FromValue for bool {
    fn expected() -> String {
        "bool".to_string()
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_literal()?.as_bool()
    }
}

impl FromValue for String {
    fn expected() -> String {
        "string".to_string()
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_literal()?.as_str().map(str::to_string)
    }
}

impl FromValue for f64 {
    fn expected() -> String {
        "float".to_string()
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_literal()?.as_f64()
    }
}

impl FromValue for f32 {
    fn expected() -> String {
        "float".to_string()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: &Value) -> Option<Self> {
        value.as_literal()?.as_f64().map(|v| v as f32)
    }
}

macro_rules! impl_from_value_int {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn expected() -> String {
                    stringify!($ty).to_string()
                }

                fn from_value(value: &Value) -> Option<Self> {
                    let literal = value.as_literal()?;
                    if let Some(v) = literal.as_i64() {
                        return <$ty>::try_from(v).ok();
                    }
                    literal.as_u64().and_then(|v| <$ty>::try_from(v).ok())
                }
            }
        )*
    };
}

impl_from_value_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromValue for Instance {
    fn expected() -> String {
        "instance".to_string()
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_instance().cloned()
    }
}

impl FromValue for Callable {
    fn expected() -> String {
        "callable".to_string()
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_callable().cloned()
    }
}

impl<T: ?Sized + 'static> FromValue for Arc<T> {
    fn expected() -> String {
        std::any::type_name::<T>().to_string()
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.downcast::<T>()
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn expected() -> String {
        format!("Option<{}>", T::expected())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Literal(JsonValue::Null) => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn expected() -> String {
        format!("list<{}>", T::expected())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Literal(JsonValue::Array(items)) => items
                .iter()
                .map(|item| T::from_value(&Value::Literal(item.clone())))
                .collect(),
            Value::Tuple(items) => items.iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn expected() -> String {
        format!("map<string, {}>", T::expected())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Literal(JsonValue::Object(entries)) => entries
                .iter()
                .map(|(key, item)| {
                    T::from_value(&Value::Literal(item.clone())).map(|v| (key.clone(), v))
                })
                .collect(),
            Value::Map(entries) => entries
                .iter()
                .map(|(key, item)| T::from_value(item).map(|v| (key.clone(), v)))
                .collect(),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for (T, InterfaceInfo) {
    fn expected() -> String {
        format!("union<{}>", T::expected())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Union { value, interface } => T::from_value(value).map(|v| (v, *interface)),
            _ => None,
        }
    }
}
