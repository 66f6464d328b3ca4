//! 载体无关的 `tracestate` 注入/提取接口。
//!
//! # 设计背景（Why）
//! - 传播层（HTTP 头、消息元数据、gRPC metadata）各有自己的载体类型；本模块只定义最小读写契约，
//!   不绑定任何具体载体。
//! - 形状与 OpenTelemetry 的 `Extractor`/`Injector` 保持一致，便于上层直接桥接。
//!
//! # 契约说明（What）
//! - [`extract`] 对缺失或不合法的头部一律降级为空值，永不失败；
//! - [`inject`] 对空值不写入任何头部，避免向下游发送空 `tracestate`。

use std::collections::HashMap;

use crate::TraceStateValue;

/// `tracestate` 头部名称（小写）。
pub const TRACESTATE_HEADER: &str = "tracestate";

/// 从载体读取头部。
pub trait Extractor {
    /// 读取 `key` 对应的头部值；名称比较应忽略大小写。
    fn get(&self, key: &str) -> Option<&str>;

    /// 列出载体中的全部头部名称。
    fn keys(&self) -> Vec<&str>;
}

/// 向载体写入头部。
pub trait Injector {
    /// 写入 `key` 对应的头部值，已有值被覆盖。
    fn set(&mut self, key: &str, value: String);
}

impl<S: std::hash::BuildHasher> Extractor for HashMap<String, String, S> {
    fn get(&self, key: &str) -> Option<&str> {
        self.get(&key.to_lowercase()).map(String::as_str)
    }

    fn keys(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }
}

impl<S: std::hash::BuildHasher> Injector for HashMap<String, String, S> {
    fn set(&mut self, key: &str, value: String) {
        self.insert(key.to_lowercase(), value);
    }
}

/// 从载体提取 `tracestate`，缺失时返回空值。
pub fn extract(extractor: &dyn Extractor) -> TraceStateValue {
    TraceStateValue::parse(extractor.get(TRACESTATE_HEADER))
}

/// 将 `tracestate` 写入载体；空值不写入。
pub fn inject(state: &TraceStateValue, injector: &mut dyn Injector) {
    if state.is_empty() {
        return;
    }
    injector.set(TRACESTATE_HEADER, state.serialize());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_reads_header_case_insensitively() {
        let mut carrier: HashMap<String, String> = HashMap::new();
        Injector::set(&mut carrier, "TraceState", "a=1,b=2".to_owned());
        let state = extract(&carrier);
        assert_eq!(state.serialize(), "a=1,b=2");
    }

    #[test]
    fn extract_missing_header_is_empty() {
        let carrier: HashMap<String, String> = HashMap::new();
        assert!(extract(&carrier).is_empty());
    }

    #[test]
    fn inject_skips_empty_state() {
        let mut carrier: HashMap<String, String> = HashMap::new();
        inject(&TraceStateValue::new(), &mut carrier);
        assert!(carrier.is_empty());

        inject(&TraceStateValue::new().set("vendor", "x"), &mut carrier);
        assert_eq!(
            carrier.get(TRACESTATE_HEADER).map(String::as_str),
            Some("vendor=x")
        );
    }

    #[test]
    fn extract_then_inject_round_trips() {
        let mut inbound: HashMap<String, String> = HashMap::new();
        inbound.insert(
            TRACESTATE_HEADER.to_owned(),
            "congo=t61rcWkgMzE, rojo=00f067aa0ba902b7".to_owned(),
        );
        let state = extract(&inbound).set("spark", "1");

        let mut outbound: HashMap<String, String> = HashMap::new();
        inject(&state, &mut outbound);
        assert_eq!(
            Extractor::get(&outbound, TRACESTATE_HEADER),
            Some("spark=1,congo=t61rcWkgMzE,rojo=00f067aa0ba902b7")
        );
    }
}
