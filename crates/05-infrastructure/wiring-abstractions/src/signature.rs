//! 调用签名校验
//!
//! 声明期检查参数顺序，调用期把位置/关键字实参分配到具名参数上

use crate::argument::{Argument, ParameterKind};
use crate::value::{FromValue, Value};
use hexwire_common::{ResolutionError, ResolutionResult};
use std::collections::BTreeMap;

/// 校验过的参数列表
#[derive(Debug, Clone)]
pub struct Signature {
    owner: String,
    parameters: Vec<Argument>,
}

/// 声明顺序检查的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefaultState {
    BeforeFirstDefault,
    AfterFirstDefault,
}

impl Signature {
    /// 创建签名并校验声明顺序
    ///
    /// 参数种类必须按等级非递减；可变参数各至多一个；名称唯一；
    /// 出现第一个带默认值的位置参数之后，位置参数都必须带默认值。
    pub fn new(owner: impl Into<String>, parameters: Vec<Argument>) -> ResolutionResult<Self> {
        let owner = owner.into();
        let mut state = DefaultState::BeforeFirstDefault;
        let mut previous: Option<ParameterKind> = None;

        for (index, parameter) in parameters.iter().enumerate() {
            if let Some(previous) = previous {
                if parameter.kind < previous {
                    return Err(order_error(
                        parameter,
                        format!("{} 参数不能出现在 {} 参数之后", parameter.kind, previous),
                    ));
                }
                if parameter.kind == previous && parameter.kind.is_variadic() {
                    return Err(order_error(parameter, format!("{} 参数至多一个", parameter.kind)));
                }
            }

            if parameters[..index].iter().any(|p| p.name == parameter.name) {
                return Err(order_error(parameter, "参数名重复"));
            }

            if parameter.kind.is_positional() {
                match (state, parameter.has_default()) {
                    (DefaultState::BeforeFirstDefault, true) => {
                        state = DefaultState::AfterFirstDefault;
                    }
                    (DefaultState::AfterFirstDefault, false) => {
                        return Err(order_error(parameter, "无默认值的参数不能跟在有默认值的参数之后"));
                    }
                    _ => {}
                }
            }

            previous = Some(parameter.kind);
        }

        Ok(Self { owner, parameters })
    }

    /// 签名所属的类型或函数名
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// 按声明顺序的参数列表
    pub fn parameters(&self) -> &[Argument] {
        &self.parameters
    }

    /// 按名称获取参数
    pub fn parameter(&self, name: &str) -> Option<&Argument> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// 把实参分配到具名参数上
    pub fn bind_call(
        &self,
        positional: Vec<Value>,
        mut keyword: BTreeMap<String, Value>,
    ) -> ResolutionResult<CallArguments> {
        let mut positional = positional.into_iter();
        let mut values: Vec<(String, Value)> = Vec::with_capacity(self.parameters.len());

        for parameter in &self.parameters {
            let value = match parameter.kind {
                ParameterKind::PositionalOnly | ParameterKind::PositionalOrKeyword => {
                    if let Some(value) = positional.next() {
                        if parameter.kind == ParameterKind::PositionalOrKeyword
                            && keyword.contains_key(&parameter.name)
                        {
                            return Err(self.unexpected(&parameter.name));
                        }
                        Some(value)
                    } else if parameter.kind == ParameterKind::PositionalOrKeyword {
                        keyword.remove(&parameter.name)
                    } else {
                        None
                    }
                }
                ParameterKind::VarPositional => Some(Value::Tuple(positional.by_ref().collect())),
                ParameterKind::KeywordOnly => keyword.remove(&parameter.name),
                ParameterKind::VarKeyword => Some(Value::Map(std::mem::take(&mut keyword))),
            };

            let value = match value.or_else(|| parameter.default.clone()) {
                Some(value) => value,
                None => {
                    return Err(ResolutionError::MissingRequiredParameter {
                        parameter: parameter.name.clone(),
                        adapter: self.owner.clone(),
                    })
                }
            };
            values.push((parameter.name.clone(), value));
        }

        if positional.next().is_some() {
            return Err(self.unexpected("<positional>"));
        }
        if let Some(name) = keyword.keys().next() {
            return Err(self.unexpected(name));
        }

        Ok(CallArguments {
            owner: self.owner.clone(),
            values,
        })
    }

    fn unexpected(&self, argument: &str) -> ResolutionError {
        ResolutionError::UnexpectedArgument {
            argument: argument.to_string(),
            callee: self.owner.clone(),
        }
    }
}

fn order_error(parameter: &Argument, message: impl Into<String>) -> ResolutionError {
    ResolutionError::InvalidParameterOrder {
        parameter: parameter.name.clone(),
        message: message.into(),
    }
}

/// 分配到具名参数上的实参
///
/// 可变位置参数对应 [`Value::Tuple`]，可变关键字参数对应 [`Value::Map`]。
#[derive(Debug, Clone)]
pub struct CallArguments {
    owner: String,
    values: Vec<(String, Value)>,
}

impl CallArguments {
    /// 按名称获取原始值
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// 按名称提取为具体类型
    pub fn get<T: FromValue>(&self, name: &str) -> ResolutionResult<T> {
        let value = self
            .value(name)
            .ok_or_else(|| ResolutionError::MissingRequiredParameter {
                parameter: name.to_string(),
                adapter: self.owner.clone(),
            })?;
        T::from_value(value)
            .ok_or_else(|| ResolutionError::type_mismatch(name, T::expected(), value.describe()))
    }

    /// 按声明顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// 参数个数
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否没有参数
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
