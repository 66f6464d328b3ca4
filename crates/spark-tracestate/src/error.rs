//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 解析路径是 fail-open 的，永远不返回错误；本模块只服务于“严格”入口：
//!   校验后写入（[`TraceStateValue::try_set`](crate::TraceStateValue::try_set)）、
//!   条目自检、限额配置加载与 OpenTelemetry 互转。
//!
//! ## 设计要求（What）
//! - 派生 `thiserror::Error`，可直接交给 `anyhow`/`eyre` 等上层框架；
//! - 错误只携带键名，不携带值内容，避免把供应商私有数据带入日志。

use thiserror::Error;

/// `tracestate` 严格入口的错误域。
///
/// # 教案式说明
/// - **意图 (Why)**：让调用方区分“键不合法”“值不合法”“配置不合法”“互转失败”四类问题；
/// - **契约 (What)**：所有变体均为 `Send + Sync + 'static`，可安全跨线程传播；
/// - **设计权衡 (Trade-offs)**：使用 `String` 保存上下文，牺牲少量分配换取可读性。
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TraceStateError {
    /// 键不满足 W3C 键语法。
    #[error("tracestate key `{key}` is not valid")]
    InvalidKey { key: String },

    /// 值不满足 W3C 值语法；仅记录所属键。
    #[error("tracestate value for key `{key}` is not valid")]
    InvalidValue { key: String },

    /// 解析限额越界：只允许收紧 W3C 上限，不允许放宽或置零。
    #[error(
        "tracestate limits out of range: max_entries={max_entries} (1..={entries_ceiling}), \
         max_header_len={max_header_len} (1..={len_ceiling})"
    )]
    InvalidLimits {
        max_entries: usize,
        max_header_len: usize,
        entries_ceiling: usize,
        len_ceiling: usize,
    },

    /// 限额配置文档无法解码。
    #[error("tracestate limits config could not be decoded: {0}")]
    Config(String),

    /// 与外部追踪库的 `TraceState` 互转失败。
    #[error("tracestate interop failed: {0}")]
    Interop(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_never_leaks_values() {
        let err = TraceStateError::InvalidValue {
            key: "vendor".to_owned(),
        };
        let text = err.to_string();
        assert!(text.contains("vendor"));
        assert_eq!(text, "tracestate value for key `vendor` is not valid");
    }

    #[test]
    fn limits_error_reports_ceilings() {
        let err = TraceStateError::InvalidLimits {
            max_entries: 64,
            max_header_len: 512,
            entries_ceiling: 32,
            len_ceiling: 512,
        };
        assert!(err.to_string().contains("max_entries=64 (1..=32)"));
    }
}
