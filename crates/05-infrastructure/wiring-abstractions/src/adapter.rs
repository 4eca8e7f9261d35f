//! 适配器组合对象
//!
//! 由名称、签名与闭包组成的固定结构，替代运行时动态合成类型

use crate::argument::Argument;
use crate::namespace::{Constructible, Node};
use crate::signature::{CallArguments, Signature};
use crate::value::{Instance, Value};
use hexwire_common::{BoxError, ResolutionResult};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// 构造函数闭包类型
pub type FactoryFn = dyn Fn(&CallArguments) -> Result<Instance, BoxError> + Send + Sync;

/// 可调用对象闭包类型
pub type CallableFn = dyn Fn(&CallArguments) -> Result<Value, BoxError> + Send + Sync;

/// 由闭包实现的可构造类型
pub struct ConstructibleType {
    signature: Signature,
    factory: Arc<FactoryFn>,
    description: Option<String>,
}

impl ConstructibleType {
    /// 创建可构造类型，参数声明顺序在此校验
    pub fn new<F>(
        name: impl Into<String>,
        parameters: Vec<Argument>,
        factory: F,
    ) -> ResolutionResult<Self>
    where
        F: Fn(&CallArguments) -> Result<Instance, BoxError> + Send + Sync + 'static,
    {
        Ok(Self {
            signature: Signature::new(name, parameters)?,
            factory: Arc::new(factory),
            description: None,
        })
    }

    /// 设置描述
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 描述
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// 签名
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// 转换为命名空间节点
    pub fn into_node(self) -> Node {
        Node::Constructible(Arc::new(self))
    }
}

impl Constructible for ConstructibleType {
    fn name(&self) -> &str {
        self.signature.owner()
    }

    fn parameters(&self) -> &[Argument] {
        self.signature.parameters()
    }

    fn invoke(
        &self,
        positional: Vec<Value>,
        keyword: BTreeMap<String, Value>,
    ) -> Result<Instance, BoxError> {
        let call = self.signature.bind_call(positional, keyword)?;
        (self.factory)(&call)
    }
}

impl fmt::Debug for ConstructibleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructibleType")
            .field("signature", &self.signature)
            .field("description", &self.description)
            .field("factory", &"<function>")
            .finish()
    }
}

/// 可调用对象
///
/// 适配器查找命中可调用对象时原样返回，不再构造。
#[derive(Clone)]
pub struct Callable {
    signature: Arc<Signature>,
    func: Arc<CallableFn>,
}

impl Callable {
    /// 创建可调用对象
    pub fn new<F>(name: impl Into<String>, parameters: Vec<Argument>, func: F) -> ResolutionResult<Self>
    where
        F: Fn(&CallArguments) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Ok(Self {
            signature: Arc::new(Signature::new(name, parameters)?),
            func: Arc::new(func),
        })
    }

    /// 名称
    pub fn name(&self) -> &str {
        self.signature.owner()
    }

    /// 参数列表
    pub fn parameters(&self) -> &[Argument] {
        self.signature.parameters()
    }

    /// 调用，实参先经过签名校验
    pub fn call(
        &self,
        positional: Vec<Value>,
        keyword: BTreeMap<String, Value>,
    ) -> Result<Value, BoxError> {
        let call = self.signature.bind_call(positional, keyword)?;
        (self.func)(&call)
    }

    /// 是否为同一个可调用对象
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }

    /// 转换为命名空间节点
    pub fn into_node(self) -> Node {
        Node::Callable(self)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.name())
            .field("parameters", &self.parameters().len())
            .finish()
    }
}
