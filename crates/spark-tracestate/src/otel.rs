//! 与 OpenTelemetry `TraceState` 的互转。
//!
//! # 教案式说明
//! - **意图（Why）**：宿主若同时使用 OpenTelemetry SDK，需要在两种表示之间搬运 `tracestate`，
//!   且不得改变条目顺序。
//! - **逻辑（How）**：导出时按“最近在前”顺序逐条交给 [`OtelTraceState::from_key_value`]；
//!   导入时读取其头部字符串，再走本 crate 的 fail-open 解析。
//! - **契约（What）**：导出遇到 `set` 写入的非法条目时返回 [`TraceStateError::Interop`]；导入永不失败。

use opentelemetry::trace::TraceState as OtelTraceState;

use crate::{TraceStateError, TraceStateValue};

impl TraceStateValue {
    /// 转换为 OpenTelemetry 的 `TraceState`，保持条目顺序。
    pub fn to_otel(&self) -> Result<OtelTraceState, TraceStateError> {
        OtelTraceState::from_key_value(
            self.iter()
                .map(|entry| (entry.key.as_str(), entry.value.as_str())),
        )
        .map_err(|err| TraceStateError::Interop(format!("构造 otel TraceState 失败: {err}")))
    }
}

impl From<&OtelTraceState> for TraceStateValue {
    fn from(state: &OtelTraceState) -> Self {
        TraceStateValue::parse(Some(&state.header()))
    }
}
