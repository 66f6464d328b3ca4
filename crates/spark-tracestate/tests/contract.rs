//! `tracestate` 传播值的行为契约。
//!
//! # 教案级注释概览
//!
//! - **核心目标 (Why)**：把对外承诺的可观察行为（顺序、上限、丢弃、不可变）固化为黑盒用例，
//!   任何内部重构都必须保持这些断言成立。
//! - **设计手法 (How)**：只通过公开 API 构造输入并断言序列化结果，不依赖内部表示。

use spark_tracestate::{MAX_ENTRIES, TraceStateValue};

fn valid_members(count: usize) -> Vec<String> {
    (0..count).map(|index| format!("m{index}=v{index}")).collect()
}

#[test]
fn round_trip_reproduces_member_order() {
    let raw = "rojo=00f067aa0ba902b7,congo=t61rcWkgMzE,tenant@sys=with inner space";
    assert_eq!(TraceStateValue::parse(Some(raw)).serialize(), raw);
}

#[test]
fn round_trip_normalizes_whitespace() {
    let state = TraceStateValue::parse(Some("a=1 , b=2,\tc=3 "));
    assert_eq!(state.serialize(), "a=1,b=2,c=3");
}

#[test]
fn no_op_set_on_front_entry_is_idempotent() {
    let state = TraceStateValue::parse(Some("a=1,b=2"));
    assert_eq!(state.set("a", "1").serialize(), state.serialize());
}

#[test]
fn set_moves_updated_key_to_front() {
    let state = TraceStateValue::parse(Some("a=1,b=2,c=3")).set("b", "9");
    assert_eq!(state.serialize(), "b=9,a=1,c=3");
}

#[test]
fn unset_preserves_remaining_order() {
    let state = TraceStateValue::parse(Some("a=1,b=2,c=3")).unset("b");
    assert_eq!(state.serialize(), "a=1,c=3");
    assert_eq!(state.get("b"), None);
}

#[test]
fn oversized_header_drops_everything() {
    let raw = valid_members(80).join(",");
    assert!(raw.len() > 512);

    let state = TraceStateValue::parse(Some(&raw));
    assert!(state.is_empty());
    assert_eq!(state.serialize(), "");
}

#[test]
fn invalid_member_is_dropped_and_valid_members_kept() {
    let state = TraceStateValue::parse(Some("good=1, bad key=2,also=3"));
    let header = state.serialize();
    assert!(header.contains("good=1"));
    assert!(header.contains("also=3"));
    assert!(!header.contains("bad"));
    assert_eq!(state.len(), 2);
}

#[test]
fn cap_keeps_first_32_members_in_wire_order() {
    let members = valid_members(40);
    let state = TraceStateValue::parse(Some(&members.join(",")));

    assert_eq!(state.len(), MAX_ENTRIES);
    assert_eq!(state.serialize(), members[..32].join(","));
    for dropped in &members[32..] {
        let key = dropped.split_once('=').map(|(key, _)| key).unwrap_or_default();
        assert!(!state.contains_key(key), "{key} 应被截断");
    }
}

#[test]
fn mutations_never_affect_the_receiver() {
    let original = TraceStateValue::parse(Some("a=1,b=2"));
    let before = original.serialize();

    let updated = original.set("c", "3");
    let removed = original.unset("a");

    assert_eq!(original.serialize(), before);
    assert_eq!(updated.serialize(), "c=3,a=1,b=2");
    assert_eq!(removed.serialize(), "b=2");
}

#[test]
fn set_after_parse_is_not_capped() {
    let state = TraceStateValue::parse(Some(&valid_members(32).join(",")));
    let grown = state.set("extra", "1");
    assert_eq!(grown.len(), MAX_ENTRIES + 1);
    assert_eq!(grown.keys().next(), Some("extra"));
}

#[test]
fn members_missing_separator_are_dropped() {
    let state = TraceStateValue::parse(Some("orphan,a=1,=2,b="));
    assert_eq!(state.serialize(), "a=1");
}
