//! 参数绑定
//!
//! 按声明顺序为每个参数取值，依次尝试：显式字面值、接口映射、联合接口、单个接口、默认值

use crate::engine::Session;
use hexwire_abstractions::{Annotation, Argument, ParameterKind, Value};
use hexwire_common::{InterfaceInfo, ResolutionError, ResolutionResult};
use hexwire_config::PortsMapping;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use tracing::debug;

/// 绑定好的实参
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArguments {
    /// 位置实参
    pub positional: Vec<Value>,
    /// 关键字实参
    pub keyword: BTreeMap<String, Value>,
}

impl BoundArguments {
    /// 按参数种类放入取值
    ///
    /// 可变位置参数展开数组和元组；可变关键字参数合并映射，
    /// 非映射值在宽松模式下以参数名为键放入，否则报类型不匹配。
    fn place(&mut self, parameter: &Argument, value: Value, lenient: bool) -> ResolutionResult<()> {
        match parameter.kind {
            ParameterKind::PositionalOnly | ParameterKind::PositionalOrKeyword => {
                self.positional.push(value);
            }
            ParameterKind::VarPositional => self.positional.extend(value.into_items()),
            ParameterKind::KeywordOnly => {
                self.keyword.insert(parameter.name.clone(), value);
            }
            ParameterKind::VarKeyword => match value.into_entries() {
                Ok(entries) => self.keyword.extend(entries),
                Err(other) if lenient => {
                    self.keyword.insert(parameter.name.clone(), other);
                }
                Err(other) => {
                    return Err(ResolutionError::type_mismatch(
                        parameter.name.as_str(),
                        "object",
                        other.describe(),
                    ))
                }
            },
        }
        Ok(())
    }
}

impl Session<'_> {
    /// 为参数列表准备实参
    pub(crate) fn bind_arguments(
        &mut self,
        owner: &str,
        parameters: &[Argument],
        kwargs: &BTreeMap<String, JsonValue>,
        mapping: &PortsMapping,
    ) -> ResolutionResult<BoundArguments> {
        let lenient = self.options().lenient_var_keyword;
        let mut bound = BoundArguments::default();

        for parameter in parameters {
            if let Some(value) = self.bind_parameter(owner, parameter, kwargs, mapping)? {
                bound.place(parameter, value, lenient)?;
            }
        }

        Ok(bound)
    }

    fn bind_parameter(
        &mut self,
        owner: &str,
        parameter: &Argument,
        kwargs: &BTreeMap<String, JsonValue>,
        mapping: &PortsMapping,
    ) -> ResolutionResult<Option<Value>> {
        if let Some(raw) = kwargs.get(&parameter.name) {
            parameter.annotation.check(raw).map_err(|actual| {
                ResolutionError::type_mismatch(
                    parameter.name.as_str(),
                    parameter.annotation.to_string(),
                    actual,
                )
            })?;
            debug!("参数 {} 使用配置的字面值", parameter.name);
            return Ok(Some(Value::Literal(raw.clone())));
        }

        // 可空的接口类参数在无法解析时取 null
        let (annotation, nullable) = match &parameter.annotation {
            Annotation::Optional(inner) if inner.is_interface_type() => (inner.as_ref(), true),
            other => (other, false),
        };
        let fallback = parameter
            .default_value()
            .cloned()
            .or_else(|| nullable.then(|| Value::Literal(JsonValue::Null)));

        match annotation {
            Annotation::InterfaceMap(interface) => {
                self.bind_interface_map(parameter, interface, mapping, fallback).map(Some)
            }
            Annotation::InterfaceUnion(members) => {
                self.bind_interface_union(parameter, members, mapping, fallback).map(Some)
            }
            Annotation::Interface(interface) => match self.resolve(interface, mapping) {
                Ok(value) => Ok(Some(value)),
                Err(error) if error.is_cyclic() => Err(error),
                Err(error) => match fallback {
                    Some(value) => {
                        debug!("参数 {} 解析失败，使用默认值: {}", parameter.name, error);
                        Ok(Some(value))
                    }
                    None => Err(error),
                },
            },
            _ => {
                if let Some(value) = fallback {
                    return Ok(Some(value));
                }
                if parameter.kind.is_variadic() {
                    return Ok(None);
                }
                Err(ResolutionError::MissingRequiredParameter {
                    parameter: parameter.name.clone(),
                    adapter: owner.to_string(),
                })
            }
        }
    }

    fn bind_interface_map(
        &mut self,
        parameter: &Argument,
        interface: &InterfaceInfo,
        mapping: &PortsMapping,
        fallback: Option<Value>,
    ) -> ResolutionResult<Value> {
        let port = interface.port();
        let Some(config) = mapping.get(port.as_str()) else {
            return fallback.ok_or_else(|| ResolutionError::PortNotConfigured {
                port: port.to_string(),
                interface: interface.name.to_string(),
            });
        };

        let Some((base, entries)) = config
            .structured()
            .and_then(|s| s.interface_mapping().map(|entries| (s, entries)))
        else {
            return Err(ResolutionError::configuration(
                port.as_str(),
                format!("参数 {} 需要 adapter 为接口映射的结构化配置", parameter.name),
            ));
        };

        let mut values = BTreeMap::new();
        for (key, entry) in entries {
            let layered = base.layer(key, entry)?;
            let overlay = mapping.merge(&PortsMapping::new().with(port.clone(), layered));
            debug!("解析接口映射条目: {}[{}]", parameter.name, key);
            values.insert(key.clone(), self.resolve(interface, &overlay)?);
        }
        Ok(Value::Map(values))
    }

    fn bind_interface_union(
        &mut self,
        parameter: &Argument,
        members: &[InterfaceInfo],
        mapping: &PortsMapping,
        fallback: Option<Value>,
    ) -> ResolutionResult<Value> {
        for member in members {
            if !mapping.contains(member.port) {
                continue;
            }
            match self.resolve(member, mapping) {
                Ok(value) => {
                    debug!("联合接口参数 {} 命中 {}", parameter.name, member.name);
                    return Ok(Value::Union {
                        value: Box::new(value),
                        interface: *member,
                    });
                }
                Err(error) if error.is_cyclic() => return Err(error),
                Err(error) => {
                    debug!("联合接口成员 {} 解析失败，尝试下一个: {}", member.name, error);
                }
            }
        }

        fallback.ok_or_else(|| ResolutionError::NoAdapterInUnion {
            parameter: parameter.name.clone(),
            candidates: members
                .iter()
                .map(|member| member.name)
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}
