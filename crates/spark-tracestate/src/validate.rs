//! `tracestate` 键与值的语法校验。
//!
//! # 设计背景（Why）
//! - 解析循环以“过滤谓词”方式使用校验器：任意输入都只返回布尔值，从不 panic、不分配。
//! - 语法取自 W3C Trace Context 第 3.3.1 节：
//!   - 简单键：`[a-z][a-z0-9_\-*/]{0,255}`；
//!   - 多租户键：`[a-z0-9][a-z0-9_\-*/]{0,240}@[a-z][a-z0-9_\-*/]{0,13}`；
//!   - 值：`[\x20-\x7e]{0,255}[\x21-\x7e]`，且不得包含 `,` 与 `=`。
//!
//! # 逻辑解析（How）
//! - 以字节切片逐段检查，替代正则以避免额外依赖与回溯开销；
//! - 多租户键先按 `@` 拆分，出现第二个 `@` 时后半段字符集校验自然失败。

/// 简单键允许的最大长度。
const MAX_KEY_LEN: usize = 256;
/// 多租户键中租户段的最大长度。
const MAX_TENANT_LEN: usize = 241;
/// 多租户键中系统段的最大长度。
const MAX_SYSTEM_LEN: usize = 14;
/// 值允许的最大长度。
const MAX_VALUE_LEN: usize = 256;

/// 判断 `key` 是否符合 `tracestate` 键语法。
///
/// # 契约说明（What）
/// - **输入参数**：任意字符串，包括空串与非 ASCII 内容。
/// - **返回值**：仅当 `key` 为合法简单键或合法多租户键时返回 `true`。
/// - **后置条件**：函数为纯函数，不会产生任何副作用。
///
/// # 风险提示（Trade-offs）
/// - 大写字母一律拒绝；W3C 未定义大小写折叠，本实现亦不做归一化。
pub fn is_valid_key(key: &str) -> bool {
    let bytes = key.as_bytes();
    match bytes.iter().position(|byte| *byte == b'@') {
        None => {
            bytes.len() <= MAX_KEY_LEN
                && bytes.first().is_some_and(u8::is_ascii_lowercase)
                && bytes[1..].iter().all(|byte| is_key_char(*byte))
        }
        Some(at) => {
            let (tenant, system) = (&bytes[..at], &bytes[at + 1..]);
            is_valid_tenant(tenant) && is_valid_system(system)
        }
    }
}

/// 判断 `value` 是否符合 `tracestate` 值语法。
///
/// # 契约说明（What）
/// - 非空，长度不超过 256；
/// - 每个字符位于可打印 ASCII 区间 `0x20..=0x7E`，且不是 `,` 或 `=`；
/// - 末尾字符不得为空格（内部空格合法）。
pub fn is_valid_value(value: &str) -> bool {
    let bytes = value.as_bytes();
    let Some(last) = bytes.last() else {
        return false;
    };
    bytes.len() <= MAX_VALUE_LEN
        && *last != b' '
        && bytes
            .iter()
            .all(|byte| matches!(byte, 0x20..=0x7e) && *byte != b',' && *byte != b'=')
}

fn is_valid_tenant(tenant: &[u8]) -> bool {
    tenant.len() <= MAX_TENANT_LEN
        && tenant
            .first()
            .is_some_and(|byte| byte.is_ascii_lowercase() || byte.is_ascii_digit())
        && tenant[1..].iter().all(|byte| is_key_char(*byte))
}

fn is_valid_system(system: &[u8]) -> bool {
    system.len() <= MAX_SYSTEM_LEN
        && system.first().is_some_and(u8::is_ascii_lowercase)
        && system[1..].iter().all(|byte| is_key_char(*byte))
}

fn is_key_char(byte: u8) -> bool {
    byte.is_ascii_lowercase() || byte.is_ascii_digit() || matches!(byte, b'_' | b'-' | b'*' | b'/')
}
