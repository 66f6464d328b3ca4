use tracing::{debug, warn};

/// 单个成员被丢弃的原因。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DropReason {
    MissingSeparator,
    InvalidKey,
    InvalidValue,
}

impl DropReason {
    fn as_str(self) -> &'static str {
        match self {
            DropReason::MissingSeparator => "missing_separator",
            DropReason::InvalidKey => "invalid_key",
            DropReason::InvalidValue => "invalid_value",
        }
    }
}

pub(crate) fn header_discarded(len: usize, limit: usize) {
    warn!(
        target: "spark_tracestate::parse",
        len,
        limit,
        "tracestate header exceeds length limit; discarding all members"
    );
}

pub(crate) fn member_dropped(reason: DropReason, key: Option<&str>) {
    // 值可能携带供应商私有数据，只记录键。
    debug!(
        target: "spark_tracestate::parse",
        reason = reason.as_str(),
        key = key.unwrap_or(""),
        "tracestate member dropped"
    );
}

pub(crate) fn entries_truncated(parsed: usize, retained: usize) {
    debug!(
        target: "spark_tracestate::parse",
        parsed,
        retained,
        "tracestate entries truncated to limit"
    );
}
