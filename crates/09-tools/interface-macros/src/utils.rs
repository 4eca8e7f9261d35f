//! 宏工具函数

use proc_macro2::Span;
use syn::{Error, Expr, Ident, Lit, Result};

/// 读取字符串字面值参数
pub fn string_value(name: &str, value: &Expr) -> Result<String> {
    match value {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Str(lit_str) => Ok(lit_str.value()),
            other => Err(Error::new_spanned(other, format!("`{name}` 必须是字符串字面值"))),
        },
        other => Err(Error::new_spanned(other, format!("`{name}` 必须是字符串字面值"))),
    }
}

/// 校验端口名：点分的非空段，每段由字母、数字和下划线组成
pub fn validate_port(port: &str) -> std::result::Result<(), String> {
    if port.is_empty() {
        return Err("端口名不能为空".to_string());
    }
    for segment in port.split('.') {
        if segment.is_empty() {
            return Err(format!("端口名 `{port}` 含有空段"));
        }
        if !segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(format!("端口名 `{port}` 的段 `{segment}` 含有非法字符"));
        }
    }
    Ok(())
}

/// 生成注册函数名
pub fn registration_fn_ident(ident: &Ident) -> Ident {
    Ident::new(
        &format!("__hexwire_register_interface_{}", ident.to_string().to_lowercase()),
        Span::call_site(),
    )
}
