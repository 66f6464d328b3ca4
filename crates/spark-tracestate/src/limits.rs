//! 解析限额配置。
//!
//! # 设计背景（Why）
//! - W3C 规定 `tracestate` 最多 32 个成员、总长度不超过 512；部分网关出于内存或带宽考虑会进一步收紧。
//! - 限额只影响解析（不可信输入），不影响程序化的 `set`，与 [`TraceStateValue`](crate::TraceStateValue)
//!   的契约保持一致。
//!
//! # 契约说明（What）
//! - [`ParseLimits::W3C`] 为默认值；
//! - 任何自定义限额都必须落在 `1..=32` 与 `1..=512` 之内，越界返回
//!   [`TraceStateError::InvalidLimits`]；
//! - 通过 serde 反序列化时同样执行校验，缺省字段回退到 W3C 值。

use serde::Deserialize;

use crate::{MAX_ENTRIES, MAX_HEADER_LEN, TraceStateError};

/// `tracestate` 解析限额。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RawLimits")]
pub struct ParseLimits {
    max_entries: usize,
    max_header_len: usize,
}

impl ParseLimits {
    /// W3C Trace Context 规定的上限。
    pub const W3C: Self = Self {
        max_entries: MAX_ENTRIES,
        max_header_len: MAX_HEADER_LEN,
    };

    /// 构造自定义限额。
    ///
    /// # 契约说明
    /// - **输入参数**：`max_entries` ∈ `1..=32`，`max_header_len` ∈ `1..=512`；
    /// - **返回值**：越界时返回 [`TraceStateError::InvalidLimits`]，携带上限便于排障。
    pub fn new(max_entries: usize, max_header_len: usize) -> Result<Self, TraceStateError> {
        if !(1..=MAX_ENTRIES).contains(&max_entries)
            || !(1..=MAX_HEADER_LEN).contains(&max_header_len)
        {
            return Err(TraceStateError::InvalidLimits {
                max_entries,
                max_header_len,
                entries_ceiling: MAX_ENTRIES,
                len_ceiling: MAX_HEADER_LEN,
            });
        }
        Ok(Self {
            max_entries,
            max_header_len,
        })
    }

    /// 解析后保留的最大条目数。
    pub const fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// 原始头部允许的最大长度（字符，按 UTF-16 码元计）。
    pub const fn max_header_len(&self) -> usize {
        self.max_header_len
    }

    /// 从 TOML 文档加载限额。
    ///
    /// 文档为扁平表，字段均可省略：
    ///
    /// ```toml
    /// max_entries = 16
    /// max_header_len = 256
    /// ```
    #[cfg(feature = "toml")]
    pub fn from_toml_str(document: &str) -> Result<Self, TraceStateError> {
        toml::from_str(document).map_err(|err| TraceStateError::Config(err.message().to_owned()))
    }
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self::W3C
    }
}

/// 反序列化中间态；缺省字段回退到 W3C 上限，再经 [`ParseLimits::new`] 校验。
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLimits {
    #[serde(default = "default_max_entries")]
    max_entries: usize,
    #[serde(default = "default_max_header_len")]
    max_header_len: usize,
}

fn default_max_entries() -> usize {
    MAX_ENTRIES
}

fn default_max_header_len() -> usize {
    MAX_HEADER_LEN
}

impl TryFrom<RawLimits> for ParseLimits {
    type Error = TraceStateError;

    fn try_from(raw: RawLimits) -> Result<Self, Self::Error> {
        Self::new(raw.max_entries, raw.max_header_len)
    }
}
