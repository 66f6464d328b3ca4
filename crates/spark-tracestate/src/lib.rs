#![deny(unsafe_code)]
#![doc = "spark-tracestate: W3C Trace Context `tracestate` 传播值。"]
#![doc = ""]
#![doc = "== 职责 =="]
#![doc = "1. 将不可信的 `tracestate` 头解析为经过校验的有序条目集合，非法成员静默丢弃（fail-open）。"]
#![doc = "2. `set`/`unset` 以写时复制方式返回新值，保持“最近写入者在前”的顺序契约。"]
#![doc = "3. 序列化回线格式；对合法且未超限的输入无损往返。"]
#![doc = ""]
#![doc = "== 上下限 =="]
#![doc = "头部总长度上限 512 字符（按 UTF-16 码元计），条目上限 32 个；二者仅在解析阶段强制，程序化 `set` 不受约束。"]

/// 解析阶段的诊断事件。
///
/// # 设计背景（Why）
/// - 丢弃成员、截断条目属于“正常降级”，但运维排障需要可见信号；
/// - 统一事件字段与 target，避免调用点各自拼装日志格式。
///
/// # 契约说明（What）
/// - 事件只经由 `tracing` 发出，绝不影响解析结果与控制流；
/// - 值内容不会写入日志，仅记录键与丢弃原因。
mod diagnostics;

pub mod error;
pub mod limits;
#[cfg(feature = "otel")]
pub mod otel;
pub mod propagation;
pub mod state;
pub mod validate;

pub use error::TraceStateError;
pub use limits::ParseLimits;
pub use propagation::{Extractor, Injector, TRACESTATE_HEADER, extract, inject};
pub use state::{TraceStateEntry, TraceStateValue};
pub use validate::{is_valid_key, is_valid_value};

/// W3C 规定的 `tracestate` 条目上限。
pub const MAX_ENTRIES: usize = 32;

/// W3C 规定的 `tracestate` 头部总长度上限（字符，按 UTF-16 码元计）。
pub const MAX_HEADER_LEN: usize = 512;

/// 列表成员之间的分隔符。
pub(crate) const LIST_MEMBERS_SEPARATOR: char = ',';

/// 成员内部键与值之间的分隔符。
pub(crate) const LIST_MEMBER_KEY_VALUE_SPLITTER: char = '=';
