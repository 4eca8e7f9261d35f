//! 命名约定
//!
//! 类风格名称（接口、可构造类型）与函数/命名空间风格名称之间的转换

/// 将驼峰命名转换为蛇形命名
///
/// `MyInterface` → `my_interface`，`HTTPServer` → `http_server`，`FooBAR` → `foo_bar`。
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev: Option<char> = None;
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch.is_uppercase() && !result.is_empty() && !result.ends_with('_') {
            let after_lower = prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit());
            let before_lower = chars.peek().is_some_and(|next| next.is_lowercase());
            if after_lower || before_lower {
                result.push('_');
            }
        }
        result.extend(ch.to_lowercase());
        prev = Some(ch);
    }

    result
}

/// 拆分点分路径，忽略空段
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('.').filter(|segment| !segment.is_empty()).collect()
}

/// 点分路径的最后一段
pub fn leaf_name(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}
